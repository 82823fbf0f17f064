#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coarse classification of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameState {
    Active,
    Draw,
    Checkmate,
}
