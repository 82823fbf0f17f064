//! Attack-map generation: the squares a piece threatens given the
//! current combined occupancy.

use crate::bits::{self, Direction, ALL_DIRECTIONS, KING_MASKS, KNIGHT_MASKS, PAWN_ATK_MASKS, RAYS};
use crate::types::{Bitboard, Color, PieceKind, Square};

const SLIDER_DIRECTIONS_ROOK: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];
const SLIDER_DIRECTIONS_BISHOP: [Direction; 4] =
    [Direction::Ne, Direction::Se, Direction::Sw, Direction::Nw];

fn ray_attack(sq: Square, dir: Direction, occupied: Bitboard) -> Bitboard {
    let ray = RAYS[dir as usize][sq.index()];
    let blockers = ray & occupied;
    if blockers.is_empty() {
        return ray;
    }
    // Nearest blocker: lsb for N/NE/E/NW (squares increase away from
    // origin), msb for S/SW/W/SE (squares decrease away from origin).
    let nearest = if bits::uses_lsb(dir) {
        blockers.lsb().expect("blockers is non-empty")
    } else {
        blockers.msb().expect("blockers is non-empty")
    };
    // Trim the ray to everything up to and including the blocker: take the
    // ray from the blocker in the *same* direction, then subtract it from
    // the full ray — what remains is the prefix ending at the blocker.
    let beyond = RAYS[dir as usize][nearest.index()];
    ray & !beyond
}

fn slider_attacks(sq: Square, occupied: Bitboard, directions: &[Direction; 4]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &dir in directions {
        attacks |= ray_attack(sq, dir, occupied);
    }
    attacks
}

/// All squares attacked by a piece of the given kind/color at `sq`, given
/// the combined (both-color) occupancy of the board.
#[must_use]
pub fn attacks_from(kind: PieceKind, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
    match kind {
        PieceKind::Pawn => PAWN_ATK_MASKS[color.index()][sq.index()],
        PieceKind::Knight => KNIGHT_MASKS[sq.index()],
        PieceKind::King => KING_MASKS[sq.index()],
        PieceKind::Rook => slider_attacks(sq, occupied, &SLIDER_DIRECTIONS_ROOK),
        PieceKind::Bishop => slider_attacks(sq, occupied, &SLIDER_DIRECTIONS_BISHOP),
        PieceKind::Queen => {
            slider_attacks(sq, occupied, &SLIDER_DIRECTIONS_ROOK)
                | slider_attacks(sq, occupied, &SLIDER_DIRECTIONS_BISHOP)
        }
    }
}

/// Every direction a sliding piece of `kind` attacks along; empty for
/// non-sliders. Used by the pin builder to reject a same-ray alignment the
/// slider can't actually attack along (a rook diagonal from the king, say).
#[must_use]
pub fn slider_directions(kind: PieceKind) -> &'static [Direction] {
    match kind {
        PieceKind::Rook => &SLIDER_DIRECTIONS_ROOK,
        PieceKind::Bishop => &SLIDER_DIRECTIONS_BISHOP,
        PieceKind::Queen => &ALL_DIRECTIONS,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_on_empty_board_sees_whole_rank_and_file() {
        let sq = Square::new(3, 3);
        let attacks = attacks_from(PieceKind::Rook, Color::White, sq, Bitboard::EMPTY);
        assert_eq!(attacks.popcount(), 14);
    }

    #[test]
    fn rook_attack_includes_blocker_square() {
        let sq = Square::new(0, 0);
        let blocker = Square::new(0, 3);
        let occupied = Bitboard::from_square(blocker);
        let attacks = attacks_from(PieceKind::Rook, Color::White, sq, occupied);
        assert!(attacks.contains(blocker));
        assert!(!attacks.contains(Square::new(0, 4)));
    }

    #[test]
    fn bishop_stops_at_first_blocker_each_diagonal() {
        let sq = Square::new(3, 3);
        let blocker = Square::new(5, 5);
        let occupied = Bitboard::from_square(blocker);
        let attacks = attacks_from(PieceKind::Bishop, Color::White, sq, occupied);
        assert!(attacks.contains(blocker));
        assert!(!attacks.contains(Square::new(6, 6)));
    }

    #[test]
    fn pawn_attacks_are_diagonal_forward_only() {
        let sq = Square::new(1, 4);
        let attacks = attacks_from(PieceKind::Pawn, Color::White, sq, Bitboard::EMPTY);
        assert!(attacks.contains(Square::new(2, 3)));
        assert!(attacks.contains(Square::new(2, 5)));
        assert_eq!(attacks.popcount(), 2);
    }
}
