//! Legal move filtering: pins, check mask, and king-safety
//! simulation for king moves (including castling) and en-passant captures.

use crate::attacks::attacks_from;
use crate::bits::is_along_ray;
use crate::position::Position;
use crate::types::{Color, Move, PieceKind, Square};

/// Filters the active color's pseudo-legal moves down to legal ones.
pub(crate) fn generate(pos: &Position) -> Vec<Move> {
    let color = pos.active_color();
    let king_sq = pos.king_square(color);
    let mut legal = Vec::with_capacity(48);

    for &mv in &pos.pseudo_legal_moves[color.index()] {
        let (kind, _) = pos
            .piece_at(mv.from())
            .expect("pseudo-legal move origin is always occupied");

        if kind == PieceKind::King {
            if king_destination_is_safe(pos, color, mv.from(), mv.to()) {
                legal.push(mv);
            }
            continue;
        }

        let is_en_passant =
            kind == PieceKind::Pawn && Some(mv.to()) == pos.en_passant_square() && mv.to().file() != mv.from().file();

        if is_en_passant {
            if !pos.check_mask.contains(mv.to()) {
                continue;
            }
            if pos.pinned[color.index()].contains(mv.from())
                && !is_along_ray(king_sq, mv.from(), mv.to())
            {
                continue;
            }
            let captured_sq = Square::new(mv.from().rank(), mv.to().file());
            if en_passant_is_legal(pos, color, mv.from(), mv.to(), captured_sq, king_sq) {
                legal.push(mv);
            }
            continue;
        }

        if !pos.check_mask.contains(mv.to()) {
            continue;
        }
        if pos.pinned[color.index()].contains(mv.from())
            && !is_along_ray(king_sq, mv.from(), mv.to())
        {
            continue;
        }
        legal.push(mv);
    }

    legal
}

/// Simulates a king move (including castling, whose rook hop never affects
/// king safety) on a cloned position and checks whether any enemy piece
/// attacks the destination. Cloning instead of mutate-then-restore removes
/// the interruption hazard the source's in-place simulation has.
fn king_destination_is_safe(pos: &Position, color: Color, from: Square, to: Square) -> bool {
    let mut sim = pos.clone();
    let enemy = color.opponent();

    sim.bitboards[color.index()][PieceKind::King.index()].clear(from);
    sim.occupied[color.index()].clear(from);
    sim.piece_map[from.index()] = None;

    if let Some((captured_kind, captured_color)) = sim.piece_map[to.index()] {
        sim.bitboards[captured_color.index()][captured_kind.index()].clear(to);
        sim.occupied[captured_color.index()].clear(to);
    }

    sim.bitboards[color.index()][PieceKind::King.index()].set(to);
    sim.occupied[color.index()].set(to);
    sim.piece_map[to.index()] = Some((PieceKind::King, color));

    !square_is_attacked_by(&sim, to, enemy)
}

/// Simulates the triple-square occupancy change of an en-passant capture
/// (mover vacates `from`, captured pawn vacates `captured_sq`, mover
/// arrives at `to`) and checks whether the king is then attacked — the
/// horizontal-pin discovered-check case that a per-piece pin mask can't
/// express, since it depends on two pieces leaving the rank at once.
fn en_passant_is_legal(
    pos: &Position,
    color: Color,
    from: Square,
    to: Square,
    captured_sq: Square,
    king_sq: Square,
) -> bool {
    let mut sim = pos.clone();
    let enemy = color.opponent();

    sim.bitboards[color.index()][PieceKind::Pawn.index()].clear(from);
    sim.occupied[color.index()].clear(from);
    sim.piece_map[from.index()] = None;

    sim.bitboards[enemy.index()][PieceKind::Pawn.index()].clear(captured_sq);
    sim.occupied[enemy.index()].clear(captured_sq);
    sim.piece_map[captured_sq.index()] = None;

    sim.bitboards[color.index()][PieceKind::Pawn.index()].set(to);
    sim.occupied[color.index()].set(to);
    sim.piece_map[to.index()] = Some((PieceKind::Pawn, color));

    !square_is_attacked_by(&sim, king_sq, enemy)
}

fn square_is_attacked_by(pos: &Position, sq: Square, by_color: Color) -> bool {
    let all_occ = pos.occupied[0] | pos.occupied[1];
    for sq_index in 0..64 {
        if let Some((kind, color)) = pos.piece_map[sq_index] {
            if color != by_color {
                continue;
            }
            if attacks_from(kind, by_color, Square::from_index(sq_index), all_occ).contains(sq) {
                return true;
            }
        }
    }
    false
}
