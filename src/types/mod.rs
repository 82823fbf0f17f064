//! Core value types: colors, piece kinds, squares, bitboards, castling
//! rights, moves, and coarse game-state classification.

mod bitboard;
mod castling;
mod color;
mod game_state;
mod mv;
mod piece;
mod square;

pub use bitboard::{not64, Bitboard, BitboardIter};
pub use castling::CastlingRights;
pub use color::Color;
pub use game_state::GameState;
pub use mv::Move;
pub use piece::PieceKind;
pub use square::Square;
