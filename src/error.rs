//! Error types shared across the crate.
//!
//! Nothing here is fatal to a session: FEN and notation errors reject input,
//! advisor errors end a turn without a remote reply.

use std::time::Duration;

use thiserror::Error;

use crate::board::Color;
use crate::uci::UciMove;

/// Errors produced while parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("FEN is missing the {0} field")]
    MissingField(&'static str),

    #[error("invalid piece placement: {0}")]
    InvalidPlacement(String),

    #[error("{0:?} must have exactly one king")]
    KingCount(Color),

    #[error("invalid side to move: {0}")]
    InvalidSideToMove(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastling(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassant(String),

    #[error("invalid move counter: {0}")]
    InvalidCounter(String),
}

/// Errors produced while parsing squares and coordinate-notation moves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("invalid square: {0:?}")]
    InvalidSquare(String),

    #[error("invalid move text: {0:?}")]
    InvalidMove(String),

    #[error("invalid promotion piece: {0:?}")]
    InvalidPromotion(char),
}

/// Failures of a remote advisor request.
///
/// `Timeout`, `Transport` and `Status` mean the advisor could not be reached;
/// the remaining variants mean it answered with something unusable.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisor did not answer within {0:?}")]
    Timeout(Duration),

    #[error("failed to reach advisor: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("advisor responded with HTTP status {0}")]
    Status(u16),

    #[error("advisor reply is not valid JSON: {0}")]
    Malformed(String),

    #[error("advisor reply does not contain a move")]
    MissingMove,

    #[error("advisor move {text:?} is not in coordinate notation")]
    InvalidNotation {
        text: String,
        #[source]
        source: NotationError,
    },

    #[error("advisor move {0} is not legal in the current position")]
    IllegalMove(UciMove),
}

impl AdvisorError {
    /// True when the advisor answered but the answer could not be used.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            AdvisorError::Malformed(_)
                | AdvisorError::MissingMove
                | AdvisorError::InvalidNotation { .. }
                | AdvisorError::IllegalMove(_)
        )
    }
}
