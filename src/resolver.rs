//! Turns a pair of tapped squares into a move.
//!
//! Two taps carry no promotion choice, so a pawn reaching the last rank is
//! tried as a queen promotion and reported back as needing a choice.

use std::fmt;

use tracing::debug;

use crate::board::{Piece, Square};
use crate::movegen::Move;
use crate::position::Position;

/// Pieces a pawn may promote to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromotionPiece {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl PromotionPiece {
    pub const ALL: [PromotionPiece; 4] = [
        PromotionPiece::Queen,
        PromotionPiece::Rook,
        PromotionPiece::Bishop,
        PromotionPiece::Knight,
    ];

    pub fn piece(self) -> Piece {
        match self {
            PromotionPiece::Queen => Piece::Queen,
            PromotionPiece::Rook => Piece::Rook,
            PromotionPiece::Bishop => Piece::Bishop,
            PromotionPiece::Knight => Piece::Knight,
        }
    }

    pub fn from_letter(letter: char) -> Option<PromotionPiece> {
        match letter.to_ascii_lowercase() {
            'q' => Some(PromotionPiece::Queen),
            'r' => Some(PromotionPiece::Rook),
            'b' => Some(PromotionPiece::Bishop),
            'n' => Some(PromotionPiece::Knight),
            _ => None,
        }
    }
}

impl fmt::Display for PromotionPiece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            PromotionPiece::Queen => "Queen (♛)",
            PromotionPiece::Rook => "Rook (♜)",
            PromotionPiece::Bishop => "Bishop (♝)",
            PromotionPiece::Knight => "Knight (♞)",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Legal as tapped.
    Plain(Move),
    /// Legal only with a promotion piece attached.
    PromotionRequired { from: Square, to: Square },
    Invalid,
}

/// Classifies `from -> to` against the legal moves of `position`. Pure.
pub fn resolve(position: &Position, from: Square, to: Square) -> Resolution {
    let legal = position.legal_moves();
    let matching = |promotion: Option<Piece>| {
        legal
            .iter()
            .copied()
            .find(|mv| mv.from == from && mv.to == to && mv.promotion == promotion)
    };

    let resolution = if let Some(mv) = matching(None) {
        Resolution::Plain(mv)
    } else if matching(Some(Piece::Queen)).is_some() {
        Resolution::PromotionRequired { from, to }
    } else {
        Resolution::Invalid
    };
    debug!(%from, %to, ?resolution, "resolved tap pair");
    resolution
}

/// Builds the promotion move once a piece has been chosen.
pub fn finalize_promotion(position: &Position, from: Square, to: Square, choice: PromotionPiece) -> Option<Move> {
    position.find_move(from, to, Some(choice.piece()))
}
