//! Zobrist key tables and incremental hash policy.
//!
//! Keys are generated once from a fixed seed (`StdRng::seed_from_u64`) so
//! hashes are reproducible across runs. The en-passant file key is only
//! ever folded into the hash when a pawn of the side to move can actually
//! capture en passant (the "capturable EP" policy) rather than always
//! hashing the file once the square is set — that avoids false repetition
//! mismatches when the en-passant square is present but uncapturable.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{CastlingRights, Color, PieceKind, Square};

/// Fixed seed so every run (and every test) derives identical keys.
const ZOBRIST_SEED: u64 = 1_234_567_890;

pub struct ZobristKeys {
    /// `piece[kind][color][square]`.
    pub piece: [[[u64; 64]; 2]; 6],
    pub side_to_move: u64,
    /// Indexed by the raw 4-bit castling-rights value (0..16), so lookups
    /// are a single array read with no branching on which rights changed.
    pub castling: [u64; 16],
    pub en_passant_file: [u64; 8],
}

impl ZobristKeys {
    fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut piece = [[[0u64; 64]; 2]; 6];
        for kind_table in piece.iter_mut() {
            for color_table in kind_table.iter_mut() {
                for key in color_table.iter_mut() {
                    *key = rng.gen();
                }
            }
        }
        let side_to_move = rng.gen();
        let mut castling = [0u64; 16];
        for key in castling.iter_mut() {
            *key = rng.gen();
        }
        let mut en_passant_file = [0u64; 8];
        for key in en_passant_file.iter_mut() {
            *key = rng.gen();
        }
        ZobristKeys {
            piece,
            side_to_move,
            castling,
            en_passant_file,
        }
    }

    #[inline]
    pub fn piece_key(&self, kind: PieceKind, color: Color, sq: Square) -> u64 {
        self.piece[kind.index()][color.index()][sq.index()]
    }

    #[inline]
    pub fn castling_key(&self, rights: CastlingRights) -> u64 {
        self.castling[rights.bits() as usize]
    }

    #[inline]
    pub fn en_passant_key(&self, file: usize) -> u64 {
        self.en_passant_file[file]
    }
}

pub static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::generate);
