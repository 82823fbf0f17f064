//! FEN parsing and serialization.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::FenError;
use crate::types::{Bitboard, CastlingRights, Color, PieceKind, Square};
use crate::zobrist::ZOBRIST;

use super::Position;

impl Position {
    /// Parses a FEN string. On any syntactic failure, returns the error
    /// without touching any existing position (there is nothing to mutate
    /// here — parsing always builds a fresh value).
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let mut bitboards = [[Bitboard::EMPTY; 6]; 2];
        let mut occupied = [Bitboard::EMPTY; 2];
        let mut piece_map: Vec<Option<(PieceKind, Color)>> = vec![None; 64];

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRank {
                rank: parts[0].to_string(),
            });
        }
        for (rank_from_top, rank_str) in ranks.iter().enumerate() {
            let rank_index = 7 - rank_from_top;
            let mut file: u32 = 0;
            for ch in rank_str.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    file += skip;
                    if file > 8 {
                        return Err(FenError::TooManyFiles {
                            rank_index,
                            files: file,
                        });
                    }
                    continue;
                }
                if file >= 8 {
                    return Err(FenError::TooManyFiles {
                        rank_index,
                        files: file + 1,
                    });
                }
                let color = if ch.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let kind = PieceKind::from_char(ch).ok_or(FenError::InvalidPiece { ch })?;
                let sq = Square::new(rank_index, file as usize);
                bitboards[color.index()][kind.index()].set(sq);
                occupied[color.index()].set(sq);
                piece_map[sq.index()] = Some((kind, color));
                file += 1;
            }
            if file != 8 {
                return Err(FenError::TooManyFiles {
                    rank_index,
                    files: file,
                });
            }
        }

        let active_color = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        let mut castling_bits = 0u8;
        if parts[2] != "-" {
            for ch in parts[2].chars() {
                castling_bits |= match ch {
                    'K' => CastlingRights::W_KINGSIDE,
                    'Q' => CastlingRights::W_QUEENSIDE,
                    'k' => CastlingRights::B_KINGSIDE,
                    'q' => CastlingRights::B_QUEENSIDE,
                    _ => return Err(FenError::InvalidCastling { ch }),
                };
            }
        }
        let castling_rights = CastlingRights::from_bits(castling_bits);

        let en_passant_square = if parts[3] == "-" {
            None
        } else {
            let sq: Square = parts[3]
                .parse()
                .map_err(|_| FenError::InvalidEnPassant {
                    found: parts[3].to_string(),
                })?;
            if sq.rank() != 2 && sq.rank() != 5 {
                return Err(FenError::InvalidEnPassant {
                    found: parts[3].to_string(),
                });
            }
            Some(sq)
        };

        let halfmove_clock = if parts.len() > 4 {
            parts[4]
                .parse::<u32>()
                .map_err(|_| FenError::InvalidHalfmove {
                    found: parts[4].to_string(),
                })?
        } else {
            0
        };

        let fullmove_count = if parts.len() > 5 {
            let n = parts[5]
                .parse::<u32>()
                .map_err(|_| FenError::InvalidFullmove {
                    found: parts[5].to_string(),
                })?;
            if n == 0 {
                return Err(FenError::InvalidFullmove {
                    found: parts[5].to_string(),
                });
            }
            n
        } else {
            1
        };

        let mut pos = Position {
            bitboards,
            occupied,
            piece_map,
            active_color,
            castling_rights,
            en_passant_square,
            en_passant_capturable: false,
            halfmove_clock,
            fullmove_count,
            zobrist_hash: 0,
            repetition_counts: HashMap::new(),
            pinned: [Bitboard::EMPTY; 2],
            attacked: [Bitboard::EMPTY; 2],
            check_mask: Bitboard::ALL,
            pseudo_legal_moves: [Vec::new(), Vec::new()],
            legal_moves: Vec::new(),
            game_state: crate::types::GameState::Active,
            history: Vec::new(),
        };

        pos.en_passant_capturable = pos.compute_en_passant_capturable();
        pos.zobrist_hash = pos.rebuild_hash_from_scratch();
        pos.repetition_counts.insert(pos.zobrist_hash, 1);
        pos.rebuild_caches();
        pos.classify_game_state();
        Ok(pos)
    }

    /// Rebuilds the Zobrist hash from scratch under the capturable-EP
    /// policy, independent of any incremental bookkeeping. Used both for
    /// the initial hash on FEN load and by property tests that check
    /// incremental updates against a from-scratch rebuild.
    pub(crate) fn rebuild_hash_from_scratch(&self) -> u64 {
        let mut hash = 0u64;
        for sq_index in 0..64 {
            if let Some((kind, color)) = self.piece_map[sq_index] {
                hash ^= ZOBRIST.piece_key(kind, color, Square::from_index(sq_index));
            }
        }
        if self.active_color == Color::Black {
            hash ^= ZOBRIST.side_to_move;
        }
        hash ^= ZOBRIST.castling_key(self.castling_rights);
        if self.en_passant_capturable {
            if let Some(ep) = self.en_passant_square {
                hash ^= ZOBRIST.en_passant_key(ep.file());
            }
        }
        hash
    }

    /// True iff `en_passant_square` is set and a pawn of the side to move
    /// can actually capture onto it.
    pub(crate) fn compute_en_passant_capturable(&self) -> bool {
        let Some(ep) = self.en_passant_square else {
            return false;
        };
        let attacker_color = self.active_color;
        let rank = ep.rank() as i32;
        let expected_rank = if attacker_color == Color::White { 5 } else { 2 };
        if rank != expected_rank {
            return false;
        }
        for df in [-1i32, 1] {
            let file = ep.file() as i32 + df;
            if !(0..8).contains(&file) {
                continue;
            }
            let origin_rank = if attacker_color == Color::White {
                rank - 1
            } else {
                rank + 1
            };
            let origin = Square::new(origin_rank as usize, file as usize);
            if self.piece_map[origin.index()] == Some((PieceKind::Pawn, attacker_color)) {
                return true;
            }
        }
        false
    }

    /// `(active_color_symbol, castling_string, ep_algebraic_or_dash,
    /// halfmove_str, fullmove_str)`.
    #[must_use]
    pub fn fen_stats(&self) -> (String, String, String, String, String) {
        (
            self.active_color.to_string(),
            self.castling_rights.to_string(),
            self.en_passant_square
                .map(|sq| sq.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.halfmove_clock.to_string(),
            self.fullmove_count.to_string(),
        )
    }

    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8).rev() {
            let mut empty_run = 0u32;
            for file in 0..8 {
                match self.piece_map[Square::new(rank, file).index()] {
                    None => empty_run += 1,
                    Some((kind, color)) => {
                        if empty_run > 0 {
                            placement.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        placement.push(kind.to_fen_char(color));
                    }
                }
            }
            if empty_run > 0 {
                placement.push_str(&empty_run.to_string());
            }
            if rank != 0 {
                placement.push('/');
            }
        }

        let (side, castling, ep, halfmove, fullmove) = self.fen_stats();
        format!("{placement} {side} {castling} {ep} {halfmove} {fullmove}")
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn starting_fen_round_trips() {
        let pos = Position::from_fen(STARTING_FEN).unwrap();
        assert_eq!(pos.to_fen(), STARTING_FEN);
    }

    #[test]
    fn rejects_short_ranks() {
        assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN w KQkq - 0 1").is_err());
    }

    #[test]
    fn rejects_bad_side_to_move() {
        assert!(Position::from_fen(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"
        )
        .is_err());
    }

    #[test]
    fn rejects_en_passant_square_on_wrong_rank() {
        assert!(Position::from_fen(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e4 0 1"
        )
        .is_err());
    }

    #[test]
    fn en_passant_capturable_flag_true_only_when_reachable() {
        let pos =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
                .unwrap();
        assert!(pos.en_passant_capturable);

        let not_capturable =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
                .unwrap();
        assert!(!not_capturable.en_passant_capturable);
    }
}
