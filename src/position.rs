//! Game position with the rule bookkeeping a bare [`Board`] lacks.
//!
//! A [`Position`] is the authoritative board state of a session. It is only
//! ever advanced through [`Position::apply`], which keeps the repetition
//! record in step with the board so draw detection needs no outside help.

use std::fmt;

use crate::board::{Board, Color, Piece, Square, START_FEN};
use crate::error::FenError;
use crate::movegen::{pawn_attacks, Move, MoveGenerator};

/// The parts of a board that decide whether two positions repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PositionKey {
    pieces: [[u64; 6]; 2],
    side_to_move: Color,
    castling_rights: u8,
    en_passant_square: Option<Square>,
}

impl PositionKey {
    fn of(board: &Board) -> Self {
        let us = board.side_to_move;
        // An en passant square only matters if a pawn could actually take on it.
        let en_passant_square = board
            .en_passant_square
            .filter(|ep| pawn_attacks(*ep, us.opposite()) & board.bitboard(us, Piece::Pawn) != 0);
        Self {
            pieces: board.pieces,
            side_to_move: us,
            castling_rights: board.castling_rights,
            en_passant_square,
        }
    }
}

/// Derived classification of a position, in reporting priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
    DrawByRepetition,
    DrawByFiftyMove,
    DrawByInsufficientMaterial,
}

impl GameStatus {
    /// True for every status that ends the game.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Ongoing | GameStatus::Check)
    }

    /// User-facing text, or `None` for a quiet position.
    pub fn message(self) -> Option<&'static str> {
        match self {
            GameStatus::Ongoing => None,
            GameStatus::Check => Some("Check!"),
            GameStatus::Checkmate => Some("Checkmate!"),
            GameStatus::Stalemate => Some("Draw! (Stalemate)"),
            GameStatus::DrawByRepetition => Some("Draw! (Threefold Repetition)"),
            GameStatus::DrawByFiftyMove => Some("Draw! (Fifty-Move Rule)"),
            GameStatus::DrawByInsufficientMaterial => Some("Draw! (Insufficient Material)"),
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message().unwrap_or("Ongoing"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    // Keys of every position since the last pawn move or capture, current last.
    history: Vec<PositionKey>,
}

impl Position {
    pub fn new() -> Self {
        Self::from_board(Board::new())
    }

    pub fn from_board(board: Board) -> Self {
        let history = vec![PositionKey::of(&board)];
        Self { board, history }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Board::from_fen(fen).map(Self::from_board)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move
    }

    pub fn to_fen(&self) -> String {
        self.board.to_fen()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        MoveGenerator::new().legal_moves(&self.board)
    }

    /// Looks up the legal move matching a coordinate pair and promotion choice.
    pub fn find_move(&self, from: Square, to: Square, promotion: Option<Piece>) -> Option<Move> {
        self.legal_moves()
            .into_iter()
            .find(|mv| mv.from == from && mv.to == to && mv.promotion == promotion)
    }

    /// Returns the position after `mv`. `mv` must come from [`Position::legal_moves`].
    pub fn apply(&self, mv: &Move) -> Position {
        let mut board = self.board.clone();
        board.make_move(*mv);

        let mut history = if board.halfmove_clock == 0 {
            Vec::new()
        } else {
            self.history.clone()
        };
        history.push(PositionKey::of(&board));

        Position { board, history }
    }

    pub fn is_check(&self) -> bool {
        MoveGenerator::new().is_in_check(&self.board, self.board.side_to_move)
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.legal_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.legal_moves().is_empty()
    }

    /// The current position has now occurred at least three times.
    pub fn is_repetition(&self) -> bool {
        match self.history.last() {
            Some(current) => self.history.iter().filter(|key| *key == current).count() >= 3,
            None => false,
        }
    }

    /// Fifty full moves without a pawn move or capture, and no mate on the board.
    pub fn is_fifty_moves(&self) -> bool {
        self.board.halfmove_clock >= 100 && !self.legal_moves().is_empty()
    }

    pub fn is_insufficient_material(&self) -> bool {
        MoveGenerator::new().has_insufficient_material(&self.board)
    }

    /// Classifies the position. Only the highest-priority condition is returned:
    /// checkmate, stalemate, repetition, fifty-move rule, insufficient material, check.
    pub fn status(&self) -> GameStatus {
        let in_check = self.is_check();
        let has_moves = !self.legal_moves().is_empty();

        if !has_moves {
            return if in_check {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            };
        }
        if self.is_repetition() {
            GameStatus::DrawByRepetition
        } else if self.board.halfmove_clock >= 100 {
            GameStatus::DrawByFiftyMove
        } else if self.is_insufficient_material() {
            GameStatus::DrawByInsufficientMaterial
        } else if in_check {
            GameStatus::Check
        } else {
            GameStatus::Ongoing
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}
