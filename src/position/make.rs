//! Make/unmake and the incremental Zobrist update it drives.
//!
//! `push` mutates atomically from the caller's perspective: every cache is
//! rebuilt before `push` returns, so there is no observable intermediate
//! state. `undo` reverses the most recent `push` using a saved
//! `UnmakeInfo` snapshot rather than a full position clone, keeping the
//! history stack cheap.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{Color, Move, PieceKind, Square};
use crate::zobrist::ZOBRIST;

use super::Position;

/// Enough state to reverse one `push`, consistent with this crate's
/// capturable-EP Zobrist policy.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnmakeInfo {
    mv: Move,
    moving_kind: PieceKind,
    moving_color: Color,
    captured: Option<(PieceKind, Square)>,
    castle_rook_move: Option<(Square, Square)>,
    prev_castling_rights_bits: u8,
    prev_en_passant_square: Option<Square>,
    prev_en_passant_capturable: bool,
    prev_halfmove_clock: u32,
    prev_fullmove_count: u32,
    prev_hash: u64,
}

impl Position {
    /// Applies `mv` if the game is active and `mv` is in `legal_moves()`.
    /// Returns `false` (leaving the position unchanged) otherwise.
    pub fn push(&mut self, mv: Move) -> bool {
        if self.game_state != crate::types::GameState::Active {
            #[cfg(feature = "logging")]
            log::trace!("push rejected: game is not active");
            return false;
        }
        if !self.legal_moves.contains(&mv) {
            #[cfg(feature = "logging")]
            log::trace!("push rejected: {mv} is not a legal move");
            return false;
        }

        let color = self.active_color;
        let (moving_kind, _) = self.piece_map[mv.from().index()]
            .expect("legal move origin is always occupied by the mover");

        let is_en_passant = moving_kind == PieceKind::Pawn
            && Some(mv.to()) == self.en_passant_square
            && self.piece_map[mv.to().index()].is_none();

        let captured_sq = if is_en_passant {
            Square::new(mv.from().rank(), mv.to().file())
        } else {
            mv.to()
        };
        let captured = self.piece_map[captured_sq.index()].map(|(kind, _)| (kind, captured_sq));

        let is_castle = moving_kind == PieceKind::King
            && (mv.to().file() as i32 - mv.from().file() as i32).abs() == 2;
        let castle_rook_move = if is_castle {
            let back_rank = mv.from().rank();
            if mv.to().file() == 6 {
                Some((Square::new(back_rank, 7), Square::new(back_rank, 5)))
            } else {
                Some((Square::new(back_rank, 0), Square::new(back_rank, 3)))
            }
        } else {
            None
        };

        let info = UnmakeInfo {
            mv,
            moving_kind,
            moving_color: color,
            captured,
            castle_rook_move,
            prev_castling_rights_bits: self.castling_rights.bits(),
            prev_en_passant_square: self.en_passant_square,
            prev_en_passant_capturable: self.en_passant_capturable,
            prev_halfmove_clock: self.halfmove_clock,
            prev_fullmove_count: self.fullmove_count,
            prev_hash: self.zobrist_hash,
        };

        // Side-to-move key is a pure toggle: XOR it against the pre-flip
        // mover, then flip `active_color` once, below — one fixed order.
        self.zobrist_hash ^= ZOBRIST.side_to_move;

        if self.en_passant_capturable {
            if let Some(old_ep) = self.en_passant_square {
                self.zobrist_hash ^= ZOBRIST.en_passant_key(old_ep.file());
            }
        }

        if let Some((captured_kind, sq)) = captured {
            let enemy = color.opponent();
            self.bitboards[enemy.index()][captured_kind.index()].clear(sq);
            self.occupied[enemy.index()].clear(sq);
            self.piece_map[sq.index()] = None;
            self.zobrist_piece_toggle(captured_kind, enemy, sq);
        }

        self.bitboards[color.index()][moving_kind.index()].clear(mv.from());
        self.occupied[color.index()].clear(mv.from());
        self.piece_map[mv.from().index()] = None;
        self.zobrist_piece_toggle(moving_kind, color, mv.from());

        let new_kind = mv.promotion().unwrap_or(moving_kind);
        self.bitboards[color.index()][new_kind.index()].set(mv.to());
        self.occupied[color.index()].set(mv.to());
        self.piece_map[mv.to().index()] = Some((new_kind, color));
        self.zobrist_piece_toggle(new_kind, color, mv.to());

        if let Some((rook_from, rook_to)) = castle_rook_move {
            self.bitboards[color.index()][PieceKind::Rook.index()].clear(rook_from);
            self.occupied[color.index()].clear(rook_from);
            self.piece_map[rook_from.index()] = None;
            self.zobrist_piece_toggle(PieceKind::Rook, color, rook_from);

            self.bitboards[color.index()][PieceKind::Rook.index()].set(rook_to);
            self.occupied[color.index()].set(rook_to);
            self.piece_map[rook_to.index()] = Some((PieceKind::Rook, color));
            self.zobrist_piece_toggle(PieceKind::Rook, color, rook_to);
        }

        let old_castling_rights = self.castling_rights;
        self.update_castling_rights(color, moving_kind, mv.from(), captured);
        if self.castling_rights != old_castling_rights {
            self.zobrist_hash ^= ZOBRIST.castling_key(old_castling_rights);
            self.zobrist_hash ^= ZOBRIST.castling_key(self.castling_rights);
        }

        let is_double_push =
            moving_kind == PieceKind::Pawn && (mv.to().rank() as i32 - mv.from().rank() as i32).abs() == 2;
        self.en_passant_square = if is_double_push {
            let mid_rank = (mv.from().rank() + mv.to().rank()) / 2;
            Some(Square::new(mid_rank, mv.from().file()))
        } else {
            None
        };

        self.halfmove_clock = if moving_kind == PieceKind::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock + 1
        };
        if color == Color::Black {
            self.fullmove_count += 1;
        }

        self.active_color = color.opponent();
        self.en_passant_capturable = self.compute_en_passant_capturable();
        if self.en_passant_capturable {
            if let Some(ep) = self.en_passant_square {
                self.zobrist_hash ^= ZOBRIST.en_passant_key(ep.file());
            }
        }

        *self.repetition_counts.entry(self.zobrist_hash).or_insert(0) += 1;

        self.rebuild_caches();
        self.classify_game_state();
        self.history.push(info);
        true
    }

    fn update_castling_rights(
        &mut self,
        color: Color,
        moving_kind: PieceKind,
        from: Square,
        captured: Option<(PieceKind, Square)>,
    ) {
        use crate::types::CastlingRights;

        let back_rank = if color == Color::White { 0 } else { 7 };
        if moving_kind == PieceKind::King {
            self.castling_rights.remove(
                CastlingRights::kingside_bit(color) | CastlingRights::queenside_bit(color),
            );
        } else if moving_kind == PieceKind::Rook {
            if from == Square::new(back_rank, 7) {
                self.castling_rights.remove(CastlingRights::kingside_bit(color));
            } else if from == Square::new(back_rank, 0) {
                self.castling_rights.remove(CastlingRights::queenside_bit(color));
            }
        }

        if let Some((PieceKind::Rook, sq)) = captured {
            let enemy = color.opponent();
            let enemy_back_rank = if enemy == Color::White { 0 } else { 7 };
            if sq == Square::new(enemy_back_rank, 7) {
                self.castling_rights.remove(CastlingRights::kingside_bit(enemy));
            } else if sq == Square::new(enemy_back_rank, 0) {
                self.castling_rights.remove(CastlingRights::queenside_bit(enemy));
            }
        }
    }

    /// Reverses the most recently pushed move. Returns `false` if there is
    /// no move to undo.
    pub fn undo(&mut self) -> bool {
        let Some(info) = self.history.pop() else {
            return false;
        };

        let color = info.moving_color;
        let enemy = color.opponent();
        let new_kind = info.mv.promotion().unwrap_or(info.moving_kind);

        self.bitboards[color.index()][new_kind.index()].clear(info.mv.to());
        self.occupied[color.index()].clear(info.mv.to());
        self.piece_map[info.mv.to().index()] = None;

        if let Some((rook_from, rook_to)) = info.castle_rook_move {
            self.bitboards[color.index()][PieceKind::Rook.index()].clear(rook_to);
            self.occupied[color.index()].clear(rook_to);
            self.piece_map[rook_to.index()] = None;

            self.bitboards[color.index()][PieceKind::Rook.index()].set(rook_from);
            self.occupied[color.index()].set(rook_from);
            self.piece_map[rook_from.index()] = Some((PieceKind::Rook, color));
        }

        self.bitboards[color.index()][info.moving_kind.index()].set(info.mv.from());
        self.occupied[color.index()].set(info.mv.from());
        self.piece_map[info.mv.from().index()] = Some((info.moving_kind, color));

        if let Some((captured_kind, sq)) = info.captured {
            self.bitboards[enemy.index()][captured_kind.index()].set(sq);
            self.occupied[enemy.index()].set(sq);
            self.piece_map[sq.index()] = Some((captured_kind, enemy));
        }

        let undone_hash = self.zobrist_hash;
        if let Some(count) = self.repetition_counts.get_mut(&undone_hash) {
            *count -= 1;
            if *count == 0 {
                self.repetition_counts.remove(&undone_hash);
            }
        }

        self.castling_rights = crate::types::CastlingRights::from_bits(info.prev_castling_rights_bits);
        self.en_passant_square = info.prev_en_passant_square;
        self.en_passant_capturable = info.prev_en_passant_capturable;
        self.halfmove_clock = info.prev_halfmove_clock;
        self.fullmove_count = info.prev_fullmove_count;
        self.zobrist_hash = info.prev_hash;
        self.active_color = color;

        self.rebuild_caches();
        self.classify_game_state();
        true
    }
}
