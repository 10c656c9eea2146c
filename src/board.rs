use std::fmt;

use crate::error::FenError;
use crate::movegen::Move;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// Castling right bits, KQkq from low to high.
pub const WHITE_KINGSIDE: u8 = 0b0001;
pub const WHITE_QUEENSIDE: u8 = 0b0010;
pub const BLACK_KINGSIDE: u8 = 0b0100;
pub const BLACK_QUEENSIDE: u8 = 0b1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase letter used by FEN and coordinate notation.
    pub fn letter(self) -> char {
        match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }

    pub fn from_letter(letter: char) -> Option<Piece> {
        match letter.to_ascii_lowercase() {
            'p' => Some(Piece::Pawn),
            'n' => Some(Piece::Knight),
            'b' => Some(Piece::Bishop),
            'r' => Some(Piece::Rook),
            'q' => Some(Piece::Queen),
            'k' => Some(Piece::King),
            _ => None,
        }
    }

    /// FEN symbol: uppercase for white, lowercase for black.
    pub fn symbol(self, color: Color) -> char {
        match color {
            Color::White => self.letter().to_ascii_uppercase(),
            Color::Black => self.letter(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Rank a pawn of this colour promotes on.
    pub fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

/// One of the 64 squares, indexed `rank * 8 + file` with a1 = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    pub fn new(file: u8, rank: u8) -> Option<Square> {
        if file < 8 && rank < 8 {
            Some(Square(rank * 8 + file))
        } else {
            None
        }
    }

    /// Callers guarantee `index < 64`.
    pub(crate) const fn from_index(index: u8) -> Square {
        Square(index & 63)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn file(self) -> u8 {
        self.0 % 8
    }

    pub fn rank(self) -> u8 {
        self.0 / 8
    }

    pub fn bit(self) -> u64 {
        1u64 << self.0
    }

    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Square> {
        let file = self.file() as i8 + file_delta;
        let rank = self.rank() as i8 + rank_delta;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square((rank * 8 + file) as u8))
        } else {
            None
        }
    }

    pub fn is_light(self) -> bool {
        (self.file() + self.rank()) % 2 == 1
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, (b'1' + self.rank()) as char)
    }
}

/// Iterates the squares set in a bitboard, lowest first.
pub fn squares(mut bitboard: u64) -> impl Iterator<Item = Square> {
    std::iter::from_fn(move || {
        if bitboard == 0 {
            return None;
        }
        let index = bitboard.trailing_zeros() as u8;
        bitboard &= bitboard - 1;
        Some(Square::from_index(index))
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub pieces: [[u64; 6]; 2], // [colour][Pawn, Knight, Bishop, Rook, Queen, King]
    pub side_to_move: Color,
    pub castling_rights: u8,
    pub en_passant_square: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

impl Board {
    pub fn new() -> Self {
        Self {
            pieces: [
                [
                    0x000000000000FF00,
                    0x0000000000000042,
                    0x0000000000000024,
                    0x0000000000000081,
                    0x0000000000000008,
                    0x0000000000000010,
                ],
                [
                    0x00FF000000000000,
                    0x4200000000000000,
                    0x2400000000000000,
                    0x8100000000000000,
                    0x0800000000000000,
                    0x1000000000000000,
                ],
            ],
            side_to_move: Color::White,
            castling_rights: WHITE_KINGSIDE | WHITE_QUEENSIDE | BLACK_KINGSIDE | BLACK_QUEENSIDE,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// A board with no pieces and no castling rights, white to move.
    pub fn empty() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn occupancy(&self, color: Color) -> u64 {
        self.pieces[color.index()].iter().fold(0, |acc, bb| acc | bb)
    }

    pub fn occupied(&self) -> u64 {
        self.occupancy(Color::White) | self.occupancy(Color::Black)
    }

    pub fn bitboard(&self, color: Color, piece: Piece) -> u64 {
        self.pieces[color.index()][piece.index()]
    }

    pub fn piece_at(&self, square: Square) -> Option<(Piece, Color)> {
        let mask = square.bit();
        for color in [Color::White, Color::Black] {
            for piece in Piece::ALL {
                if self.bitboard(color, piece) & mask != 0 {
                    return Some((piece, color));
                }
            }
        }
        None
    }

    pub fn put(&mut self, square: Square, piece: Piece, color: Color) {
        self.remove(square);
        self.pieces[color.index()][piece.index()] |= square.bit();
    }

    pub fn remove(&mut self, square: Square) {
        for side in self.pieces.iter_mut() {
            for bb in side.iter_mut() {
                *bb &= !square.bit();
            }
        }
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        squares(self.bitboard(color, Piece::King)).next()
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut fields = fen.split_whitespace();
        let placement = fields.next().ok_or(FenError::MissingField("placement"))?;
        let side = fields.next().ok_or(FenError::MissingField("side to move"))?;
        let castling = fields.next().ok_or(FenError::MissingField("castling"))?;
        let en_passant = fields.next().ok_or(FenError::MissingField("en passant"))?;
        let halfmove = fields.next().unwrap_or("0");
        let fullmove = fields.next().unwrap_or("1");

        let mut board = Board::empty();

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPlacement(placement.to_string()));
        }
        for (row, rank_text) in ranks.iter().enumerate() {
            let rank = 7 - row as u8;
            let mut file = 0u8;
            for c in rank_text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as u8;
                } else {
                    let piece = Piece::from_letter(c)
                        .ok_or_else(|| FenError::InvalidPlacement(placement.to_string()))?;
                    let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
                    let square = Square::new(file, rank)
                        .ok_or_else(|| FenError::InvalidPlacement(placement.to_string()))?;
                    board.put(square, piece, color);
                    file += 1;
                }
                if file > 8 {
                    return Err(FenError::InvalidPlacement(placement.to_string()));
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPlacement(placement.to_string()));
            }
        }
        for color in [Color::White, Color::Black] {
            if board.bitboard(color, Piece::King).count_ones() != 1 {
                return Err(FenError::KingCount(color));
            }
        }

        board.side_to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidSideToMove(other.to_string())),
        };

        if castling != "-" {
            for c in castling.chars() {
                board.castling_rights |= match c {
                    'K' => WHITE_KINGSIDE,
                    'Q' => WHITE_QUEENSIDE,
                    'k' => BLACK_KINGSIDE,
                    'q' => BLACK_QUEENSIDE,
                    _ => return Err(FenError::InvalidCastling(castling.to_string())),
                };
            }
        }

        board.en_passant_square = match en_passant {
            "-" => None,
            text => {
                let square: Square = text
                    .parse()
                    .map_err(|_| FenError::InvalidEnPassant(text.to_string()))?;
                // The square a pawn of the other side just skipped over.
                let (rank, pawn_step, them) = match board.side_to_move {
                    Color::White => (5, -1, Color::Black),
                    Color::Black => (2, 1, Color::White),
                };
                let pushed_pawn = square.offset(0, pawn_step);
                let vacated = square.offset(0, -pawn_step);
                let valid = square.rank() == rank
                    && board.piece_at(square).is_none()
                    && vacated.is_some_and(|sq| board.piece_at(sq).is_none())
                    && pushed_pawn.is_some_and(|sq| board.piece_at(sq) == Some((Piece::Pawn, them)));
                if !valid {
                    return Err(FenError::InvalidEnPassant(text.to_string()));
                }
                Some(square)
            }
        };

        board.halfmove_clock = halfmove
            .parse()
            .map_err(|_| FenError::InvalidCounter(halfmove.to_string()))?;
        board.fullmove_number = fullmove
            .parse()
            .map_err(|_| FenError::InvalidCounter(fullmove.to_string()))?;

        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match Square::new(file, rank).and_then(|sq| self.piece_at(sq)) {
                    Some((piece, color)) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.symbol(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling_rights == 0 {
            fen.push('-');
        } else {
            for (bit, c) in [
                (WHITE_KINGSIDE, 'K'),
                (WHITE_QUEENSIDE, 'Q'),
                (BLACK_KINGSIDE, 'k'),
                (BLACK_QUEENSIDE, 'q'),
            ] {
                if self.castling_rights & bit != 0 {
                    fen.push(c);
                }
            }
        }

        fen.push(' ');
        match self.en_passant_square {
            Some(square) => fen.push_str(&square.to_string()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }

    /// Plays a move produced by the move generator. No legality check is made.
    pub fn make_move(&mut self, mv: Move) {
        let us = self.side_to_move;
        let them = us.opposite();

        self.pieces[us.index()][mv.piece.index()] &= !mv.from.bit();

        if let Some(captured) = mv.captured_piece {
            let captured_square = if mv.is_en_passant {
                Square::new(mv.to.file(), mv.from.rank()).unwrap_or(mv.to)
            } else {
                mv.to
            };
            self.pieces[them.index()][captured.index()] &= !captured_square.bit();
        }

        let placed = mv.promotion.unwrap_or(mv.piece);
        self.pieces[us.index()][placed.index()] |= mv.to.bit();

        if mv.is_castling {
            let rank = mv.from.rank();
            let (rook_from, rook_to) = if mv.to.file() > mv.from.file() {
                (Square::new(7, rank), Square::new(5, rank))
            } else {
                (Square::new(0, rank), Square::new(3, rank))
            };
            if let (Some(rook_from), Some(rook_to)) = (rook_from, rook_to) {
                let rooks = &mut self.pieces[us.index()][Piece::Rook.index()];
                *rooks &= !rook_from.bit();
                *rooks |= rook_to.bit();
            }
        }

        // Any move touching a king or rook home square drops the matching right,
        // which also covers rooks captured on their corner.
        self.castling_rights &= !(rights_tied_to(mv.from) | rights_tied_to(mv.to));

        self.en_passant_square = if mv.piece == Piece::Pawn && mv.from.rank().abs_diff(mv.to.rank()) == 2 {
            Square::new(mv.from.file(), (mv.from.rank() + mv.to.rank()) / 2)
        } else {
            None
        };

        if mv.piece == Piece::Pawn || mv.captured_piece.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        self.side_to_move = them;
    }
}

fn rights_tied_to(square: Square) -> u8 {
    match square.index() {
        0 => WHITE_QUEENSIDE,
        4 => WHITE_KINGSIDE | WHITE_QUEENSIDE,
        7 => WHITE_KINGSIDE,
        56 => BLACK_QUEENSIDE,
        60 => BLACK_KINGSIDE | BLACK_QUEENSIDE,
        63 => BLACK_KINGSIDE,
        _ => 0,
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                let c = Square::new(file, rank)
                    .and_then(|sq| self.piece_at(sq))
                    .map_or('.', |(piece, color)| piece.symbol(color));
                write!(f, "{}", c)?;
                if file < 7 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
