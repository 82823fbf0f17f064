//! Bit utilities and precomputed attack tables.
//!
//! All tables are initialized once behind `once_cell::sync::Lazy`: the
//! statics are `Sync`, built lazily on first access, and immutable for the
//! rest of the process's life.

use once_cell::sync::Lazy;

use crate::types::{Bitboard, Color, Square};

/// The eight ray directions, in the fixed order the rest of this module
/// relies on: `lsb`-nearest-blocker directions come first (N, NE, E, NW are
/// interleaved with the `msb` directions below only by index, not by
/// grouping — see `USES_LSB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Direction {
    N = 0,
    Ne = 1,
    E = 2,
    Se = 3,
    S = 4,
    Sw = 5,
    W = 6,
    Nw = 7,
}

pub const ALL_DIRECTIONS: [Direction; 8] = [
    Direction::N,
    Direction::Ne,
    Direction::E,
    Direction::Se,
    Direction::S,
    Direction::Sw,
    Direction::W,
    Direction::Nw,
];

/// `(d_rank, d_file)` step for each direction, indexed like `ALL_DIRECTIONS`.
const DELTAS: [(i32, i32); 8] = [
    (1, 0),   // N
    (1, 1),   // NE
    (0, 1),   // E
    (-1, 1),  // SE
    (-1, 0),  // S
    (-1, -1), // SW
    (0, -1),  // W
    (1, -1),  // NW
];

/// The nearest blocker along a direction is found via `lsb` for these four
/// directions (squares increase as you travel away from the origin) and via
/// `msb` for the other four (squares decrease).
pub const fn uses_lsb(dir: Direction) -> bool {
    matches!(dir, Direction::N | Direction::Ne | Direction::E | Direction::Nw)
}

#[inline]
#[must_use]
pub const fn lsb(bb: u64) -> Option<u32> {
    if bb == 0 {
        None
    } else {
        Some(bb.trailing_zeros())
    }
}

#[inline]
#[must_use]
pub const fn msb(bb: u64) -> Option<u32> {
    if bb == 0 {
        None
    } else {
        Some(63 - bb.leading_zeros())
    }
}

#[inline]
pub fn pop_lsb(bb: &mut u64) -> Option<u32> {
    let idx = lsb(*bb)?;
    *bb &= *bb - 1;
    Some(idx)
}

#[inline]
#[must_use]
pub const fn mask(sq: Square) -> u64 {
    1u64 << sq.index()
}

#[inline]
#[must_use]
pub const fn not64(x: u64) -> u64 {
    !x
}

fn ray_from(origin: Square, dir: Direction) -> Bitboard {
    let (dr, df) = DELTAS[dir as usize];
    let mut bb = Bitboard::EMPTY;
    let mut rank = origin.rank() as i32 + dr;
    let mut file = origin.file() as i32 + df;
    while (0..8).contains(&rank) && (0..8).contains(&file) {
        bb.set(Square::new(rank as usize, file as usize));
        rank += dr;
        file += df;
    }
    bb
}

pub static RAYS: Lazy<[[Bitboard; 64]; 8]> = Lazy::new(|| {
    let mut table = [[Bitboard::EMPTY; 64]; 8];
    for dir in ALL_DIRECTIONS {
        for idx in 0..64 {
            table[dir as usize][idx] = ray_from(Square::from_index(idx), dir);
        }
    }
    table
});

/// `RAYS_DIRECTIONS_MAP[from][to]`: the direction from `from` to `to` if
/// they share a ray, else `None`.
pub static RAYS_DIRECTIONS_MAP: Lazy<Vec<Vec<Option<Direction>>>> = Lazy::new(|| {
    let mut map = vec![vec![None; 64]; 64];
    for from in 0..64 {
        for dir in ALL_DIRECTIONS {
            let mut ray = RAYS[dir as usize][from];
            while let Some(to) = ray.pop_lsb() {
                map[from][to.index()] = Some(dir);
            }
        }
    }
    map
});

/// Squares strictly between `a` and `b` if they lie on a shared ray, else
/// an empty bitboard.
#[must_use]
pub fn ray_between(a: Square, b: Square) -> Bitboard {
    let Some(dir) = RAYS_DIRECTIONS_MAP[a.index()][b.index()] else {
        return Bitboard::EMPTY;
    };
    let opposite = ALL_DIRECTIONS[(dir as usize + 4) % 8];
    RAYS[dir as usize][a.index()] & RAYS[opposite as usize][b.index()]
}

/// True iff `b` and `c` lie on the same ray from `a`.
#[must_use]
pub fn is_along_ray(a: Square, b: Square, c: Square) -> bool {
    let dir_b = RAYS_DIRECTIONS_MAP[a.index()][b.index()];
    let dir_c = RAYS_DIRECTIONS_MAP[a.index()][c.index()];
    matches!((dir_b, dir_c), (Some(d1), Some(d2)) if d1 == d2)
}

#[inline]
#[must_use]
pub const fn opp_color(c: Color) -> Color {
    c.opponent()
}

const KNIGHT_DELTAS: [(i32, i32); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

const KING_DELTAS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

fn mask_from_deltas(sq: Square, deltas: &[(i32, i32)]) -> Bitboard {
    let mut bb = Bitboard::EMPTY;
    for &(dr, df) in deltas {
        let rank = sq.rank() as i32 + dr;
        let file = sq.file() as i32 + df;
        if (0..8).contains(&rank) && (0..8).contains(&file) {
            bb.set(Square::new(rank as usize, file as usize));
        }
    }
    bb
}

pub static KNIGHT_MASKS: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    let mut table = [Bitboard::EMPTY; 64];
    for (idx, slot) in table.iter_mut().enumerate() {
        *slot = mask_from_deltas(Square::from_index(idx), &KNIGHT_DELTAS);
    }
    table
});

pub static KING_MASKS: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    let mut table = [Bitboard::EMPTY; 64];
    for (idx, slot) in table.iter_mut().enumerate() {
        *slot = mask_from_deltas(Square::from_index(idx), &KING_DELTAS);
    }
    table
});

/// `(d_rank, d_file)` for the two diagonal-forward attack squares, per color.
const fn pawn_attack_deltas(color: Color) -> [(i32, i32); 2] {
    match color {
        Color::White => [(1, -1), (1, 1)],
        Color::Black => [(-1, -1), (-1, 1)],
    }
}

pub static PAWN_ATK_MASKS: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    for color in Color::ALL {
        let deltas = pawn_attack_deltas(color);
        for idx in 0..64 {
            table[color.index()][idx] = mask_from_deltas(Square::from_index(idx), &deltas);
        }
    }
    table
});

pub static PAWN_SINGLE_PUSH_MASKS: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    for color in Color::ALL {
        let step: i32 = if color == Color::White { 1 } else { -1 };
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            let rank = sq.rank() as i32 + step;
            if (0..8).contains(&rank) {
                table[color.index()][idx] =
                    Bitboard::from_square(Square::new(rank as usize, sq.file()));
            }
        }
    }
    table
});

pub static PAWN_DOUBLE_PUSH_MASKS: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    for color in Color::ALL {
        let (start_rank, step): (usize, i32) = if color == Color::White {
            (1, 2)
        } else {
            (6, -2)
        };
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            if sq.rank() == start_rank {
                let rank = sq.rank() as i32 + step;
                table[color.index()][idx] =
                    Bitboard::from_square(Square::new(rank as usize, sq.file()));
            }
        }
    }
    table
});

pub static PAWN_PROMOTION_RANK: Lazy<[Bitboard; 2]> = Lazy::new(|| {
    [
        Bitboard(0x0000_0000_0000_00FF), // Black promotes onto rank 1
        Bitboard(0xFF00_0000_0000_0000), // White promotes onto rank 8
    ]
});

pub static PAWN_START_RANK: Lazy<[Bitboard; 2]> = Lazy::new(|| {
    let mut table = [Bitboard::EMPTY; 2];
    table[Color::White.index()] = Bitboard(0x0000_0000_0000_FF00); // rank 2
    table[Color::Black.index()] = Bitboard(0x00FF_0000_0000_0000); // rank 7
    table
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rays_stop_at_board_edge() {
        let corner = Square::new(0, 0); // a1
        assert_eq!(RAYS[Direction::S as usize][corner.index()], Bitboard::EMPTY);
        assert_eq!(RAYS[Direction::W as usize][corner.index()], Bitboard::EMPTY);
        assert!(!RAYS[Direction::N as usize][corner.index()].is_empty());
    }

    #[test]
    fn ray_between_excludes_endpoints() {
        let a = Square::new(0, 0);
        let b = Square::new(0, 7);
        let between = ray_between(a, b);
        assert!(!between.contains(a));
        assert!(!between.contains(b));
        assert_eq!(between.popcount(), 6);
    }

    #[test]
    fn ray_between_is_empty_off_ray() {
        let a = Square::new(0, 0);
        let b = Square::new(3, 5);
        assert_eq!(ray_between(a, b), Bitboard::EMPTY);
    }

    #[test]
    fn is_along_ray_detects_shared_file() {
        let king = Square::new(0, 4);
        let a = Square::new(3, 4);
        let b = Square::new(6, 4);
        assert!(is_along_ray(king, a, b));
        assert!(!is_along_ray(king, a, Square::new(3, 5)));
    }

    #[test]
    fn knight_mask_corner_has_two_targets() {
        assert_eq!(KNIGHT_MASKS[Square::new(0, 0).index()].popcount(), 2);
    }

    #[test]
    fn pawn_double_push_only_from_start_rank() {
        let e2 = Square::new(1, 4);
        let e3 = Square::new(2, 4);
        assert!(!PAWN_DOUBLE_PUSH_MASKS[Color::White.index()][e2.index()].is_empty());
        assert!(PAWN_DOUBLE_PUSH_MASKS[Color::White.index()][e3.index()].is_empty());
    }
}
