//! Benchmarks for the chess core: perft, movegen, and MCTS search groups.

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chess_core::mcts::{Evaluator, Mcts, MoveIndex};
use chess_core::tensor::Tensor;
use chess_core::Position;

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut pos = Position::new_starting();
                pos.perft(black_box(depth))
            })
        });
    }

    let kiwipete_fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut pos = Position::from_fen(kiwipete_fen).unwrap();
                pos.perft(black_box(depth))
            })
        });
    }

    group.finish();
}

fn bench_legal_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    let startpos = Position::new_starting();
    group.bench_function("startpos", |b| b.iter(|| black_box(startpos.legal_moves())));

    let middlegame =
        Position::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4").unwrap();
    group.bench_function("middlegame", |b| b.iter(|| black_box(middlegame.legal_moves())));

    group.finish();
}

/// Uniform policy, constant value — exercises tree shape/overhead without
/// depending on a real model.
struct UniformEvaluator {
    num_moves: usize,
}

impl Evaluator for UniformEvaluator {
    fn evaluate(&self, _tensor: &Tensor) -> (Vec<f32>, f32) {
        (vec![0.0; self.num_moves], 0.0)
    }
}

struct IdentityMoveIndex {
    uci_to_index: HashMap<String, usize>,
    index_to_uci: Vec<String>,
}

impl IdentityMoveIndex {
    fn from_position(pos: &Position) -> Self {
        let mut uci_to_index = HashMap::new();
        let mut index_to_uci = Vec::new();
        for mv in pos.legal_moves() {
            let uci = mv.to_uci();
            uci_to_index.insert(uci.clone(), index_to_uci.len());
            index_to_uci.push(uci);
        }
        IdentityMoveIndex { uci_to_index, index_to_uci }
    }
}

impl MoveIndex for IdentityMoveIndex {
    fn index_of(&self, uci: &str) -> Option<usize> {
        self.uci_to_index.get(uci).copied()
    }

    fn uci_of(&self, index: usize) -> Option<String> {
        self.index_to_uci.get(index).cloned()
    }
}

fn bench_mcts_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts");
    group.sample_size(10);

    for visits in [20, 50, 100] {
        group.bench_with_input(BenchmarkId::new("startpos", visits), &visits, |b, &visits| {
            b.iter(|| {
                let pos = Position::new_starting();
                let move_index = IdentityMoveIndex::from_position(&pos);
                let evaluator = UniformEvaluator { num_moves: move_index.index_to_uci.len() };
                let mut mcts = Mcts::with_seed(evaluator, move_index, 1.25, 0);
                black_box(mcts.search(&pos, visits))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_legal_moves, bench_mcts_search);
criterion_main!(benches);
