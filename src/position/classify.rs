//! Game-state classification and the claimable-draw queries.

use crate::types::{Color, GameState, PieceKind};

use super::Position;

/// Squares where a bishop is "light"; used to detect same-colored-bishop
/// insufficient material (a dark-squared and a light-squared bishop, one
/// per side, cannot force mate).
const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;

impl Position {
    pub(crate) fn classify_game_state(&mut self) {
        let in_check = self.is_in_check();
        let no_moves = self.legal_moves.is_empty();

        self.game_state = if in_check && no_moves {
            GameState::Checkmate
        } else if no_moves
            || self.is_75_move_rule()
            || self.is_fivefold_repetition()
            || self.is_insufficient_material()
        {
            GameState::Draw
        } else {
            GameState::Active
        };
    }

    /// Claimable under the 50-move rule; does not by itself end the game.
    #[must_use]
    pub fn is_50_move_rule(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Auto-draw threshold: 75 moves without a pawn move or capture.
    #[must_use]
    pub fn is_75_move_rule(&self) -> bool {
        self.halfmove_clock >= 150
    }

    /// Claimable threefold repetition; does not by itself end the game.
    #[must_use]
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition_counts.get(&self.zobrist_hash).copied().unwrap_or(0) >= 3
    }

    /// Auto-draw threshold: some position has recurred five times.
    #[must_use]
    pub fn is_fivefold_repetition(&self) -> bool {
        self.repetition_counts.values().any(|&count| count >= 5)
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        self.game_state == GameState::Draw && !self.is_in_check() && self.legal_moves.is_empty()
    }

    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        let pawns = self.bitboards[0][PieceKind::Pawn.index()] | self.bitboards[1][PieceKind::Pawn.index()];
        let rooks = self.bitboards[0][PieceKind::Rook.index()] | self.bitboards[1][PieceKind::Rook.index()];
        let queens = self.bitboards[0][PieceKind::Queen.index()] | self.bitboards[1][PieceKind::Queen.index()];
        if !pawns.is_empty() || !rooks.is_empty() || !queens.is_empty() {
            return false;
        }

        let white_minors = self.bitboards[Color::White.index()][PieceKind::Knight.index()]
            | self.bitboards[Color::White.index()][PieceKind::Bishop.index()];
        let black_minors = self.bitboards[Color::Black.index()][PieceKind::Knight.index()]
            | self.bitboards[Color::Black.index()][PieceKind::Bishop.index()];
        let total_minors = white_minors.popcount() + black_minors.popcount();

        if total_minors == 0 {
            return true; // king vs king
        }
        if total_minors == 1 {
            return true; // king + one minor vs king
        }

        let white_bishops = self.bitboards[Color::White.index()][PieceKind::Bishop.index()];
        let black_bishops = self.bitboards[Color::Black.index()][PieceKind::Bishop.index()];
        let only_bishops = white_minors == white_bishops && black_minors == black_bishops;
        if total_minors == 2 && white_bishops.popcount() == 1 && black_bishops.popcount() == 1 && only_bishops {
            let white_on_light = (white_bishops.0 & LIGHT_SQUARES) != 0;
            let black_on_light = (black_bishops.0 & LIGHT_SQUARES) != 0;
            return white_on_light == black_on_light;
        }

        false
    }
}
