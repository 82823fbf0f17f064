use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::UciMoveError;

use super::{PieceKind, Square};

/// A move: `(from, to, promotion?)`. Packed into 16 bits — 6 for `from`,
/// 6 for `to`, 4 for an optional promotion kind — so `Move` stays `Copy`
/// and cheap to store in move lists and MCTS child maps.
///
/// Castling is represented implicitly as a king move to g1/c1/g8/c8;
/// en-passant as a pawn diagonal move onto the en-passant square. Neither
/// has a dedicated flag — callers that need to know "was this castling"
/// ask the position, not the move.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move(u16);

const FROM_SHIFT: u16 = 0;
const TO_SHIFT: u16 = 6;
const PROMO_SHIFT: u16 = 12;
const SIX_BIT_MASK: u16 = 0b11_1111;
const PROMO_MASK: u16 = 0b1111;

impl Move {
    #[must_use]
    pub fn new(from: Square, to: Square, promotion: Option<PieceKind>) -> Self {
        let promo_bits = match promotion {
            None => 0u16,
            Some(k) => k.index() as u16,
        };
        Move(
            (from.index() as u16) << FROM_SHIFT
                | (to.index() as u16) << TO_SHIFT
                | promo_bits << PROMO_SHIFT,
        )
    }

    #[inline]
    #[must_use]
    pub fn from(self) -> Square {
        Square::from_index(((self.0 >> FROM_SHIFT) & SIX_BIT_MASK) as usize)
    }

    #[inline]
    #[must_use]
    pub fn to(self) -> Square {
        Square::from_index(((self.0 >> TO_SHIFT) & SIX_BIT_MASK) as usize)
    }

    #[inline]
    #[must_use]
    pub fn promotion(self) -> Option<PieceKind> {
        let bits = ((self.0 >> PROMO_SHIFT) & PROMO_MASK) as usize;
        if bits == 0 {
            None
        } else {
            Some(PieceKind::from_index(bits))
        }
    }

    #[must_use]
    pub fn to_uci(self) -> String {
        self.to_string()
    }

    pub fn from_uci(s: &str) -> Result<Self, UciMoveError> {
        s.parse()
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self})")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promo) = self.promotion() {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = UciMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.len();
        if len != 4 && len != 5 {
            return Err(UciMoveError::InvalidLength { len });
        }
        let from: Square = s[0..2].parse()?;
        let to: Square = s[2..4].parse()?;
        let promotion = if len == 5 {
            let ch = s.chars().nth(4).expect("checked length == 5");
            match PieceKind::from_char(ch) {
                Some(PieceKind::Pawn) | Some(PieceKind::King) | None => {
                    return Err(UciMoveError::InvalidPromotion { ch });
                }
                Some(kind) => Some(kind),
            }
        } else {
            None
        };
        Ok(Move::new(from, to, promotion))
    }
}
