//! Perft-divide demo binary.
//! `cargo run --bin perft [fen] [depth]` defaults to the starting position
//! at depth 5.

use std::env;
use std::time::Instant;

use chess_core::Position;

const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let fen = args.first().map(String::as_str).unwrap_or(STARTING_FEN);
    let depth: u32 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(5);

    let mut pos = match Position::from_fen(fen) {
        Ok(pos) => pos,
        Err(err) => {
            eprintln!("invalid FEN '{fen}': {err}");
            std::process::exit(1);
        }
    };

    println!("perft divide: {fen} @ depth {depth}");
    let start = Instant::now();
    let mut divide = pos.perft_divide(depth);
    divide.sort_by_key(|(mv, _)| mv.to_uci());
    let mut total = 0u64;
    for (mv, nodes) in &divide {
        println!("  {mv}: {nodes}");
        total += nodes;
    }
    println!("total: {total} nodes in {:?}", start.elapsed());
}
