//! Fixed `21x8x8` tensor encoding of a position, consumed by the
//! `Evaluator` boundary MCTS and direct inference call into.
//!
//! Row `r` of the tensor corresponds to rank `7-r` on the board — the same
//! top-down orientation `Position::serialize` uses, so the two stay in
//! sync by construction.

use crate::types::{Color, GameState, PieceKind, Square};

use super::position::Position;

pub const TENSOR_PLANES: usize = 21;
pub const TENSOR_RANKS: usize = 8;
pub const TENSOR_FILES: usize = 8;
pub const TENSOR_LEN: usize = TENSOR_PLANES * TENSOR_RANKS * TENSOR_FILES;

/// A contiguous `21*8*8` float buffer, row-major `[plane][rank][file]`.
/// This is the tensor type the `Evaluator` interface boundary consumes — a
/// flat buffer is all that abstraction needs, preferring plain data at the
/// FFI/model boundary over a bespoke tensor type.
#[derive(Clone, PartialEq)]
pub struct Tensor(pub [f32; TENSOR_LEN]);

impl Tensor {
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[inline]
    fn set(&mut self, plane: usize, row: usize, file: usize, value: f32) {
        self.0[plane * TENSOR_RANKS * TENSOR_FILES + row * TENSOR_FILES + file] = value;
    }

    #[inline]
    fn fill_plane(&mut self, plane: usize, value: f32) {
        let start = plane * TENSOR_RANKS * TENSOR_FILES;
        self.0[start..start + TENSOR_RANKS * TENSOR_FILES].fill(value);
    }
}

/// Piece-plane order within each color's six planes
/// (pawn, knight, bishop, rook, queen, king) — note this differs from the
/// `PieceKind` numeric encoding used everywhere else in the crate (which is
/// pawn/rook/bishop/knight/queen/king), so the encoder cannot just index by
/// `PieceKind::index()`.
const TENSOR_PIECE_ORDER: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

impl Position {
    /// Encodes this position into the fixed `21x8x8` tensor.
    #[must_use]
    pub fn to_tensor(&self) -> Tensor {
        let mut tensor = Tensor([0.0; TENSOR_LEN]);

        for color in Color::ALL {
            let plane_offset = if color == Color::White { 0 } else { 6 };
            for (piece_offset, &kind) in TENSOR_PIECE_ORDER.iter().enumerate() {
                let plane = plane_offset + piece_offset;
                let mut bb = self.bitboard(color, kind);
                while let Some(sq) = bb.pop_lsb() {
                    let row = 7 - sq.rank();
                    tensor.set(plane, row, sq.file(), 1.0);
                }
            }
        }

        tensor.fill_plane(12, if self.active_color() == Color::White { 1.0 } else { 0.0 });

        let castling = self.castling_rights();
        let castling_squares = [
            (13, castling.has_kingside(Color::White), Square::new(0, 7)),
            (14, castling.has_queenside(Color::White), Square::new(0, 0)),
            (15, castling.has_kingside(Color::Black), Square::new(7, 7)),
            (16, castling.has_queenside(Color::Black), Square::new(7, 0)),
        ];
        for (plane, held, home_sq) in castling_squares {
            if held {
                tensor.set(plane, 7 - home_sq.rank(), home_sq.file(), 1.0);
            }
        }

        if let Some(ep) = self.en_passant_square() {
            tensor.set(17, 7 - ep.rank(), ep.file(), 1.0);
        }

        match self.game_state() {
            GameState::Checkmate => tensor.fill_plane(18, 1.0),
            GameState::Draw => tensor.fill_plane(19, 1.0),
            GameState::Active => tensor.fill_plane(20, 1.0),
        }

        tensor
    }
}
