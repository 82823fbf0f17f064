//! The central `Position` entity: piece placement, game
//! metadata, incremental Zobrist hash, and the derived caches movegen and
//! MCTS rely on.

mod caches;
mod classify;
mod fen;
mod make;
mod perft;

use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use make::UnmakeInfo;

use crate::types::{Bitboard, CastlingRights, Color, GameState, Move, PieceKind, Square};
use crate::zobrist::ZOBRIST;

/// A full chess position: piece placement, game metadata, and the derived
/// caches (`pinned`, `attacked`, `check_mask`, move lists, game state) that
/// are rebuilt after every mutation.
///
/// `Position` is a plain value type: `Clone` performs a deep copy and no
/// field is shared between clones, so MCTS can clone a position per child
/// without any synchronization.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    /// `bitboards[color.index()][piece_kind.index()]`.
    pub(crate) bitboards: [[Bitboard; 6]; 2],
    /// `occupied[color.index()]`, maintained as the union of `bitboards`.
    pub(crate) occupied: [Bitboard; 2],
    /// Square → (kind, color) for every occupied square; `None` elsewhere.
    pub(crate) piece_map: Vec<Option<(PieceKind, Color)>>,
    pub(crate) active_color: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_square: Option<Square>,
    /// Whether a pawn of the side to move can actually capture
    /// `en_passant_square` — the flag the "capturable EP" Zobrist policy
    /// is conditioned on.
    pub(crate) en_passant_capturable: bool,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_count: u32,
    pub(crate) zobrist_hash: u64,
    pub(crate) repetition_counts: HashMap<u64, u32>,

    // Derived caches, rebuilt in `caches::rebuild` after every mutation.
    pub(crate) pinned: [Bitboard; 2],
    pub(crate) attacked: [Bitboard; 2],
    pub(crate) check_mask: Bitboard,
    pub(crate) pseudo_legal_moves: [Vec<Move>; 2],
    pub(crate) legal_moves: Vec<Move>,
    pub(crate) game_state: GameState,

    pub(crate) history: Vec<UnmakeInfo>,
}

impl Position {
    /// The standard chess starting position.
    #[must_use]
    pub fn new_starting() -> Self {
        // Parsing the well-known starting FEN keeps exactly one code path
        // (`fen::parse`) responsible for populating bitboards/occupied/
        // piece_map/hash consistently.
        Self::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("starting FEN is well-formed")
    }

    #[inline]
    #[must_use]
    pub fn active_color(&self) -> Color {
        self.active_color
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    #[must_use]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn fullmove_count(&self) -> u32 {
        self.fullmove_count
    }

    #[inline]
    #[must_use]
    pub fn zobrist_hash(&self) -> u64 {
        self.zobrist_hash
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn all_occupied(&self) -> Bitboard {
        self.occupied[0] | self.occupied[1]
    }

    #[inline]
    #[must_use]
    pub fn bitboard(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.bitboards[color.index()][kind.index()]
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(PieceKind, Color)> {
        self.piece_map[sq.index()]
    }

    /// `piece_at`, but keyed by algebraic notation (e.g. `"e4"`), matching
    /// the language-neutral surface.
    #[must_use]
    pub fn piece_at_algebraic(&self, algebraic: &str) -> Option<(PieceKind, Color)> {
        let sq: Square = algebraic.parse().ok()?;
        self.piece_at(sq)
    }

    #[inline]
    #[must_use]
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    #[inline]
    #[must_use]
    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    #[inline]
    #[must_use]
    pub fn ply(&self) -> u32 {
        let half_moves_played = (self.fullmove_count.saturating_sub(1)) * 2;
        match self.active_color {
            Color::White => half_moves_played,
            Color::Black => half_moves_played + 1,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_in_check(&self) -> bool {
        let king_sq = self.king_square(self.active_color);
        self.attacked[self.active_color.opponent().index()].contains(king_sq)
    }

    #[must_use]
    pub(crate) fn king_square(&self, color: Color) -> Square {
        self.bitboards[color.index()][PieceKind::King.index()]
            .lsb()
            .expect("a position always has exactly one king per side")
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.game_state == GameState::Checkmate
    }

    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.game_state == GameState::Draw
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_state != GameState::Active
    }

    /// A fixed 8x8 grid of FEN-style piece symbols (uppercase WHITE,
    /// lowercase BLACK, empty string for empty squares); row 0 is rank 8,
    /// column 0 is file a.
    #[must_use]
    pub fn serialize(&self) -> [[String; 8]; 8] {
        let mut grid: [[String; 8]; 8] = Default::default();
        for rank in 0..8 {
            for file in 0..8 {
                let sq = Square::new(rank, file);
                let row = 7 - rank;
                grid[row][file] = match self.piece_at(sq) {
                    Some((kind, color)) => kind.to_fen_char(color).to_string(),
                    None => String::new(),
                };
            }
        }
        grid
    }

    #[inline]
    pub(crate) fn zobrist_piece_toggle(&mut self, kind: PieceKind, color: Color, sq: Square) {
        self.zobrist_hash ^= ZOBRIST.piece_key(kind, color, sq);
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = self.serialize();
        for row in &grid {
            for cell in row {
                write!(f, "{} ", if cell.is_empty() { "." } else { cell.as_str() })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}
