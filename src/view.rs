//! Piece-by-square snapshot for whatever draws the board.

use std::fmt;

use crate::board::{Board, Color, Piece, Square};

pub fn piece_glyph(piece: Piece, color: Color) -> char {
    match (color, piece) {
        (Color::White, Piece::Pawn) => '♙',
        (Color::White, Piece::Knight) => '♘',
        (Color::White, Piece::Bishop) => '♗',
        (Color::White, Piece::Rook) => '♖',
        (Color::White, Piece::Queen) => '♕',
        (Color::White, Piece::King) => '♔',
        (Color::Black, Piece::Pawn) => '♟',
        (Color::Black, Piece::Knight) => '♞',
        (Color::Black, Piece::Bishop) => '♝',
        (Color::Black, Piece::Rook) => '♜',
        (Color::Black, Piece::Queen) => '♛',
        (Color::Black, Piece::King) => '♚',
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub square: Square,
    pub piece: Option<(Piece, Color)>,
    pub light: bool,
}

impl Cell {
    pub fn glyph(&self) -> Option<char> {
        self.piece.map(|(piece, color)| piece_glyph(piece, color))
    }
}

/// Rows run from rank 8 down to rank 1, files a to h, as seen by white.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub rows: Vec<Vec<Cell>>,
}

impl BoardView {
    pub fn of(board: &Board) -> Self {
        let rows = (0..8u8)
            .rev()
            .map(|rank| {
                (0..8u8)
                    .filter_map(|file| Square::new(file, rank))
                    .map(|square| Cell {
                        square,
                        piece: board.piece_at(square),
                        light: square.is_light(),
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Cell at screen position, row 0 being rank 8.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (row, cells) in self.rows.iter().enumerate() {
            write!(f, "{} ", 8 - row)?;
            for cell in cells {
                let c = cell.glyph().unwrap_or(if cell.light { '·' } else { ' ' });
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")
    }
}
