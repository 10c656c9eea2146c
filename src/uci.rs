//! Coordinate notation ("e2e4", "e7e8q") used by the advisor protocol and the
//! move history.

use std::fmt;
use std::str::FromStr;

use crate::board::{Piece, Square};
use crate::error::NotationError;
use crate::movegen::Move;
use crate::position::Position;

impl FromStr for Square {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NotationError::InvalidSquare(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }

        let file = match bytes[0] {
            b @ b'a'..=b'h' => b - b'a',
            _ => return Err(invalid()),
        };
        let rank = match bytes[1] {
            b @ b'1'..=b'8' => b - b'1',
            _ => return Err(invalid()),
        };

        Square::new(file, rank).ok_or_else(invalid)
    }
}

/// A move as written in coordinate notation, not yet checked against a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl UciMove {
    /// The legal move this text denotes in `position`, if any.
    pub fn resolve(&self, position: &Position) -> Option<Move> {
        position.find_move(self.from, self.to, self.promotion)
    }
}

impl FromStr for UciMove {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
            return Err(NotationError::InvalidMove(s.to_string()));
        }

        let from = text[0..2].parse()?;
        let to = text[2..4].parse()?;
        let promotion = match text[4..].chars().next() {
            None => None,
            Some(c) => match Piece::from_letter(c) {
                Some(piece @ (Piece::Queen | Piece::Rook | Piece::Bishop | Piece::Knight)) => Some(piece),
                _ => return Err(NotationError::InvalidPromotion(c)),
            },
        };

        Ok(UciMove { from, to, promotion })
    }
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = self.promotion {
            write!(f, "{}", piece.letter())?;
        }
        Ok(())
    }
}
