//! PUCT-style MCTS: selection, evaluator-driven expansion,
//! backpropagation, and final move selection, plus the non-MCTS "direct"
//! inference path the integration façade also exposes.
//!
//! The tree is an arena of owned `Node`s addressed by index (`node.rs`)
//! rather than parent/child pointers, since Rust has no cycle-collecting
//! GC to lean on for back-references.

mod interfaces;
mod node;

pub use interfaces::{Evaluator, MoveIndex};
pub use node::Node;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::SearchError;
use crate::position::Position;
use crate::types::GameState;

/// PUCT exploration constant.
pub const DEFAULT_C_PUCT: f32 = 1.25;

/// Drives MCTS search over `Position`s, guided by an injected `Evaluator`
/// and `MoveIndex`. Also exposes the façade's non-MCTS `direct_select_move`
/// path, since both share the same evaluator/move-index pair — there is
/// no separate façade type, the façade *is* these two methods on `Mcts`.
pub struct Mcts<E: Evaluator, M: MoveIndex> {
    evaluator: E,
    move_index: M,
    c_puct: f32,
    rng: StdRng,
}

impl<E: Evaluator, M: MoveIndex> Mcts<E, M> {
    /// `c_puct` defaults to 1.25; use `with_c_puct` to override it.
    /// The tie-breaking RNG is seeded from system entropy; use
    /// `with_seed` for reproducible tests.
    #[must_use]
    pub fn new(evaluator: E, move_index: M) -> Self {
        Self::with_c_puct(evaluator, move_index, DEFAULT_C_PUCT)
    }

    #[must_use]
    pub fn with_c_puct(evaluator: E, move_index: M, c_puct: f32) -> Self {
        Mcts {
            evaluator,
            move_index,
            c_puct,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic tie-breaking for tests: same seed, same move whenever
    /// the search also visits the same nodes in the same order.
    #[must_use]
    pub fn with_seed(evaluator: E, move_index: M, c_puct: f32, seed: u64) -> Self {
        Mcts {
            evaluator,
            move_index,
            c_puct,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Runs `num_visits` simulations from `root_position` and returns the
    /// UCI of the most-visited child, or `None` if the root is already
    /// terminal.
    pub fn search(&mut self, root_position: &Position, num_visits: u32) -> Option<String> {
        if root_position.is_game_over() {
            return None;
        }

        let mut arena: Vec<Node> = vec![Node::new(root_position.clone(), None, 0.0)];
        self.expand(&mut arena, 0);

        for _sim in 0..num_visits {
            let path = self.select(&arena, 0);
            let leaf = *path.last().expect("select always returns a non-empty path");

            let value = if arena[leaf].is_terminal() {
                Self::evaluate_terminal(&arena[leaf].position)
            } else {
                self.expand(&mut arena, leaf)
            };
            self.backup(&mut arena, &path, f64::from(value));

            #[cfg(feature = "logging")]
            log::debug!("mcts: completed simulation {}/{num_visits}", _sim + 1);
        }

        self.best_child_uci(&arena, 0)
    }

    /// `select_move` is the spec's façade name for the MCTS-driven path;
    /// it is exactly `search`.
    pub fn select_move(&mut self, position: &Position, num_visits: u32) -> Option<String> {
        self.search(position, num_visits)
    }

    /// Non-MCTS inference: encode
    /// the position once, mask the policy to legal move indices, and
    /// return the argmax UCI. `None` if the position is terminal or if no
    /// legal move appears in the move-index mapping (a partial-miss
    /// scenario here, unlike `expand`'s fatal-on-total-miss rule, since
    /// there is no uniform-prior fallback to lean on outside a tree).
    #[must_use]
    pub fn direct_select_move(&self, position: &Position) -> Option<String> {
        if position.is_game_over() {
            return None;
        }

        let tensor = position.to_tensor();
        let (logits, _value) = self.evaluator.evaluate(&tensor);

        let legal_indices: Vec<usize> = position
            .legal_moves()
            .iter()
            .filter_map(|mv| self.move_index.index_of(&mv.to_uci()))
            .collect();
        if legal_indices.is_empty() {
            return None;
        }

        let mut best_index = legal_indices[0];
        let mut best_logit = logits.get(best_index).copied().unwrap_or(f32::NEG_INFINITY);
        for &idx in &legal_indices[1..] {
            let logit = logits.get(idx).copied().unwrap_or(f32::NEG_INFINITY);
            if logit > best_logit {
                best_logit = logit;
                best_index = idx;
            }
        }

        self.move_index.uci_of(best_index)
    }

    fn select(&self, arena: &[Node], root: usize) -> Vec<usize> {
        let mut path = vec![root];
        let mut current = root;

        while !arena[current].is_leaf() && !arena[current].is_terminal() {
            let total_visits = arena[current].children.values().map(|&c| arena[c].visit_count).sum::<u32>().max(1);

            let mut best_score = f32::NEG_INFINITY;
            let mut best_child = current;
            for &child_idx in arena[current].children.values() {
                let child = &arena[child_idx];
                let score = child.mean_value as f32
                    + self.c_puct * child.prior * (total_visits as f32).sqrt() / (1.0 + child.visit_count as f32);
                if score > best_score {
                    best_score = score;
                    best_child = child_idx;
                }
            }

            current = best_child;
            path.push(current);
        }

        path
    }

    /// Expands `arena[idx]`: encodes its position, queries the evaluator,
    /// derives normalized priors per legal move, and
    /// appends one child per legal move to the arena. Returns the
    /// evaluator's scalar value.
    fn expand(&mut self, arena: &mut Vec<Node>, idx: usize) -> f32 {
        let tensor = arena[idx].position.to_tensor();
        let (logits, value) = self.evaluator.evaluate(&tensor);
        let probs = softmax(&logits);

        let legal_moves = arena[idx].position.legal_moves().to_vec();
        let num_legal = legal_moves.len();
        if num_legal == 0 {
            return value;
        }

        let indices: Vec<Option<usize>> = legal_moves
            .iter()
            .map(|mv| self.move_index.index_of(&mv.to_uci()))
            .collect();

        if indices.iter().all(Option::is_none) {
            let err = SearchError::UnmappedPolicy {
                fen: arena[idx].position.to_fen(),
                legal_move_count: num_legal,
            };
            #[cfg(feature = "logging")]
            log::error!("{err}");
            panic!("{err}");
        }

        let uniform = 1.0 / num_legal as f32;
        let raw_priors: Vec<f32> = indices
            .iter()
            .map(|idx| idx.and_then(|i| probs.get(i).copied()).unwrap_or(uniform))
            .collect();
        let total_raw: f32 = raw_priors.iter().sum();
        let priors: Vec<f32> = raw_priors.iter().map(|&p| p / total_raw).collect();

        for (mv, prior) in legal_moves.into_iter().zip(priors) {
            let mut child_position = arena[idx].position.clone();
            child_position.push(mv);
            let child_idx = arena.len();
            arena.push(Node::new(child_position, Some(idx), prior));
            arena[idx].children.insert(mv.to_uci(), child_idx);
        }

        value
    }

    fn backup(&self, arena: &mut [Node], path: &[usize], value: f64) {
        let mut value = value;
        for &idx in path.iter().rev() {
            arena[idx].record_visit(value);
            value = -value;
        }
    }

    fn evaluate_terminal(position: &Position) -> f32 {
        match position.game_state() {
            GameState::Checkmate => -1.0,
            GameState::Draw => 0.0,
            GameState::Active => unreachable!("evaluate_terminal called on a non-terminal node"),
        }
    }

    /// The UCI of the root's highest-visit-count child; ties broken
    /// uniformly at random.
    fn best_child_uci(&mut self, arena: &[Node], root: usize) -> Option<String> {
        let root_children = &arena[root].children;
        if root_children.is_empty() {
            return None;
        }
        let max_visits = root_children.values().map(|&idx| arena[idx].visit_count).max()?;
        let best: Vec<&String> = root_children
            .iter()
            .filter(|(_, &idx)| arena[idx].visit_count == max_visits)
            .map(|(uci, _)| uci)
            .collect();
        best.choose(&mut self.rng).map(|s| (*s).clone())
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|&x| x / sum).collect()
}
