//! Round-trips a toy `UCI-string <-> policy-index` table through JSON
//! (`serde_json`) and drives `Mcts::direct_select_move` through it —
//! exercising the `MoveIndex` interface boundary the way a caller loading
//! the real table from disk would.

use std::collections::HashMap;

use chess_core::mcts::{Evaluator, Mcts, MoveIndex};
use chess_core::tensor::Tensor;
use chess_core::Position;

struct JsonMoveIndex {
    uci_to_index: HashMap<String, usize>,
    index_to_uci: Vec<String>,
}

impl MoveIndex for JsonMoveIndex {
    fn index_of(&self, uci: &str) -> Option<usize> {
        self.uci_to_index.get(uci).copied()
    }

    fn uci_of(&self, index: usize) -> Option<String> {
        self.index_to_uci.get(index).cloned()
    }
}

struct FixedLogitEvaluator {
    logits: Vec<f32>,
}

impl Evaluator for FixedLogitEvaluator {
    fn evaluate(&self, _tensor: &Tensor) -> (Vec<f32>, f32) {
        (self.logits.clone(), 0.0)
    }
}

#[test]
fn move_index_table_round_trips_through_json_and_drives_direct_selection() {
    let pos = Position::new_starting();

    // Build a table exactly like the external `UCI-string <-> policy-index`
    // mapping: one entry per legal move, in
    // some fixed external order.
    let uci_to_index: HashMap<String, usize> = pos
        .legal_moves()
        .iter()
        .enumerate()
        .map(|(i, mv)| (mv.to_uci(), i))
        .collect();

    let serialized = serde_json::to_string(&uci_to_index).unwrap();
    let deserialized: HashMap<String, usize> = serde_json::from_str(&serialized).unwrap();
    assert_eq!(deserialized, uci_to_index);

    let mut index_to_uci = vec![String::new(); deserialized.len()];
    for (uci, &idx) in &deserialized {
        index_to_uci[idx] = uci.clone();
    }
    let move_index = JsonMoveIndex { uci_to_index: deserialized, index_to_uci };

    let winning_uci = move_index.index_to_uci[0].clone();
    let mut logits = vec![-10.0; move_index.index_to_uci.len()];
    logits[0] = 10.0;

    let mcts = Mcts::with_seed(FixedLogitEvaluator { logits }, move_index, 1.25, 11);
    assert_eq!(mcts.direct_select_move(&pos), Some(winning_uci));
}

#[test]
fn direct_select_move_returns_none_on_terminal_position() {
    let pos = Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
    assert!(pos.is_checkmate());

    let move_index = JsonMoveIndex { uci_to_index: HashMap::new(), index_to_uci: Vec::new() };
    let evaluator = FixedLogitEvaluator { logits: Vec::new() };
    let mcts = Mcts::with_seed(evaluator, move_index, 1.25, 0);
    assert_eq!(mcts.direct_select_move(&pos), None);
}
