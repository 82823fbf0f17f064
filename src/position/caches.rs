//! Derived-cache rebuilding: pins, attack maps, check mask, and
//! both pseudo-legal and legal move lists. Rebuilt in this fixed order
//! after every mutation and after FEN load, since later caches in the list
//! depend on earlier ones.

use crate::attacks::{attacks_from, slider_directions};
use crate::bits::ray_between;
use crate::movegen::{legal, pseudo};
use crate::types::{Bitboard, Color, PieceKind, Square};

use super::Position;

impl Position {
    pub(crate) fn rebuild_caches(&mut self) {
        self.rebuild_pinned();
        self.rebuild_attacked();
        self.rebuild_check_mask();
        self.pseudo_legal_moves[Color::White.index()] = pseudo::generate(self, Color::White);
        self.pseudo_legal_moves[Color::Black.index()] = pseudo::generate(self, Color::Black);
        self.legal_moves = legal::generate(self);
    }

    fn rebuild_pinned(&mut self) {
        self.pinned = [Bitboard::EMPTY; 2];
        let all_occ = self.all_occupied();
        for color in Color::ALL {
            let king_sq = self.king_square(color);
            let enemy = color.opponent();
            for kind in [PieceKind::Rook, PieceKind::Bishop, PieceKind::Queen] {
                let mut sliders = self.bitboards[enemy.index()][kind.index()];
                while let Some(slider_sq) = sliders.pop_lsb() {
                    let Some(dir) =
                        crate::bits::RAYS_DIRECTIONS_MAP[king_sq.index()][slider_sq.index()]
                    else {
                        continue; // king and slider share no ray at all.
                    };
                    if !slider_directions(kind).contains(&dir) {
                        continue; // shares a ray, but not one this piece attacks along.
                    }
                    let between = ray_between(king_sq, slider_sq);
                    let blockers = between & all_occ;
                    if blockers.popcount() != 1 {
                        continue;
                    }
                    let blocker_sq = blockers.lsb().expect("popcount == 1");
                    if let Some((_, blocker_color)) = self.piece_map[blocker_sq.index()] {
                        if blocker_color == color {
                            self.pinned[color.index()].set(blocker_sq);
                        }
                    }
                }
            }
        }
    }

    fn rebuild_attacked(&mut self) {
        self.attacked = [Bitboard::EMPTY; 2];
        let all_occ = self.all_occupied();
        for sq_index in 0..64 {
            if let Some((kind, color)) = self.piece_map[sq_index] {
                let sq = Square::from_index(sq_index);
                self.attacked[color.index()] |= attacks_from(kind, color, sq, all_occ);
            }
        }
    }

    fn rebuild_check_mask(&mut self) {
        let color = self.active_color;
        let enemy = color.opponent();
        let king_sq = self.king_square(color);
        let all_occ = self.all_occupied();

        let mut checkers: Vec<(PieceKind, Square)> = Vec::new();
        for sq_index in 0..64 {
            if let Some((kind, piece_color)) = self.piece_map[sq_index] {
                if piece_color != enemy {
                    continue;
                }
                let sq = Square::from_index(sq_index);
                if attacks_from(kind, enemy, sq, all_occ).contains(king_sq) {
                    checkers.push((kind, sq));
                }
            }
        }

        self.check_mask = match checkers.len() {
            0 => Bitboard::ALL,
            1 => {
                let (kind, sq) = checkers[0];
                let mut mask = Bitboard::from_square(sq);
                if matches!(kind, PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen) {
                    mask |= ray_between(king_sq, sq);
                }
                mask
            }
            _ => Bitboard::from_square(king_sq),
        };

        // En-passant refinement: a single checker that is a pawn sitting on
        // the square a friendly pawn could capture en passant gets the EP
        // destination folded into the check mask too, provided taking it
        // doesn't expose the king on the capture rank/file (the same
        // simulation `movegen::legal` runs for every EP move regardless of
        // check status).
        if checkers.len() == 1 {
            let (kind, checker_sq) = checkers[0];
            if kind == PieceKind::Pawn {
                if let Some(ep) = self.en_passant_square {
                    if self.en_passant_capturable && checker_sq.file() == ep.file() {
                        self.check_mask |= Bitboard::from_square(ep);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::types::Square;

    use super::Position;

    #[test]
    fn bishop_is_not_pinned_by_a_rook_on_its_diagonal() {
        let pos = Position::from_fen("4k3/8/8/8/8/6r1/5B2/4K3 w - - 0 1").unwrap();
        let f2 = Square::new(1, 5);
        assert!(!pos.pinned[crate::types::Color::White.index()].contains(f2));
        assert!(pos
            .legal_moves
            .iter()
            .any(|mv| mv.from() == f2 && mv.to() == Square::new(2, 4)));
    }
}
