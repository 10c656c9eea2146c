use std::fmt;

use crate::board::{
    squares, Board, Color, Piece, Square, BLACK_KINGSIDE, BLACK_QUEENSIDE, WHITE_KINGSIDE,
    WHITE_QUEENSIDE,
};
use crate::uci::UciMove;

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2),
    (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];
const KING_STEPS: [(i8, i8); 8] = [
    (0, 1), (1, 1), (1, 0), (1, -1),
    (0, -1), (-1, -1), (-1, 0), (-1, 1),
];
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub const PROMOTION_PIECES: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured_piece: Option<Piece>,
    pub promotion: Option<Piece>,
    pub is_en_passant: bool,
    pub is_castling: bool,
}

impl Move {
    pub fn new(from: Square, to: Square, piece: Piece) -> Self {
        Self {
            from,
            to,
            piece,
            captured_piece: None,
            promotion: None,
            is_en_passant: false,
            is_castling: false,
        }
    }

    pub fn new_en_passant(from: Square, to: Square) -> Self {
        Self {
            captured_piece: Some(Piece::Pawn),
            is_en_passant: true,
            ..Self::new(from, to, Piece::Pawn)
        }
    }

    pub fn new_castling(from: Square, to: Square) -> Self {
        Self {
            is_castling: true,
            ..Self::new(from, to, Piece::King)
        }
    }

    pub fn with_capture(self, captured: Option<Piece>) -> Self {
        Self {
            captured_piece: captured,
            ..self
        }
    }

    pub fn with_promotion(self, promotion: Piece) -> Self {
        Self {
            promotion: Some(promotion),
            ..self
        }
    }

    pub fn to_uci(&self) -> UciMove {
        UciMove {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

pub fn knight_attacks(square: Square) -> u64 {
    step_attacks(square, &KNIGHT_STEPS)
}

pub fn king_attacks(square: Square) -> u64 {
    step_attacks(square, &KING_STEPS)
}

/// Squares a pawn of `color` standing on `square` attacks.
pub fn pawn_attacks(square: Square, color: Color) -> u64 {
    let forward = match color {
        Color::White => 1,
        Color::Black => -1,
    };
    step_attacks(square, &[(-1, forward), (1, forward)])
}

pub fn bishop_attacks(square: Square, occupied: u64) -> u64 {
    sliding_attacks(square, occupied, &DIAGONALS)
}

pub fn rook_attacks(square: Square, occupied: u64) -> u64 {
    sliding_attacks(square, occupied, &ORTHOGONALS)
}

fn step_attacks(square: Square, steps: &[(i8, i8)]) -> u64 {
    steps
        .iter()
        .filter_map(|&(df, dr)| square.offset(df, dr))
        .fold(0, |acc, target| acc | target.bit())
}

fn sliding_attacks(square: Square, occupied: u64, directions: &[(i8, i8)]) -> u64 {
    let mut attacks = 0u64;
    for &(df, dr) in directions {
        let mut current = square;
        while let Some(target) = current.offset(df, dr) {
            attacks |= target.bit();
            if occupied & target.bit() != 0 {
                break;
            }
            current = target;
        }
    }
    attacks
}

/// Legal move generation and attack queries over a [`Board`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> Self {
        MoveGenerator
    }

    pub fn is_square_attacked(&self, board: &Board, square: Square, attacker: Color) -> bool {
        let occupied = board.occupied();
        let pieces = |piece| board.bitboard(attacker, piece);

        pawn_attacks(square, attacker.opposite()) & pieces(Piece::Pawn) != 0
            || knight_attacks(square) & pieces(Piece::Knight) != 0
            || king_attacks(square) & pieces(Piece::King) != 0
            || bishop_attacks(square, occupied) & (pieces(Piece::Bishop) | pieces(Piece::Queen)) != 0
            || rook_attacks(square, occupied) & (pieces(Piece::Rook) | pieces(Piece::Queen)) != 0
    }

    pub fn is_in_check(&self, board: &Board, color: Color) -> bool {
        match board.king_square(color) {
            Some(king) => self.is_square_attacked(board, king, color.opposite()),
            None => false,
        }
    }

    pub fn legal_moves(&self, board: &Board) -> Vec<Move> {
        let us = board.side_to_move;
        self.pseudo_legal_moves(board)
            .into_iter()
            .filter(|mv| {
                let mut after = board.clone();
                after.make_move(*mv);
                !self.is_in_check(&after, us)
            })
            .collect()
    }

    fn pseudo_legal_moves(&self, board: &Board) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        let us = board.side_to_move;
        let own = board.occupancy(us);
        let occupied = board.occupied();

        self.pawn_moves(board, &mut moves);

        for from in squares(board.bitboard(us, Piece::Knight)) {
            self.push_targets(board, from, Piece::Knight, knight_attacks(from) & !own, &mut moves);
        }
        for from in squares(board.bitboard(us, Piece::Bishop)) {
            let targets = bishop_attacks(from, occupied) & !own;
            self.push_targets(board, from, Piece::Bishop, targets, &mut moves);
        }
        for from in squares(board.bitboard(us, Piece::Rook)) {
            let targets = rook_attacks(from, occupied) & !own;
            self.push_targets(board, from, Piece::Rook, targets, &mut moves);
        }
        for from in squares(board.bitboard(us, Piece::Queen)) {
            let targets = (bishop_attacks(from, occupied) | rook_attacks(from, occupied)) & !own;
            self.push_targets(board, from, Piece::Queen, targets, &mut moves);
        }
        for from in squares(board.bitboard(us, Piece::King)) {
            self.push_targets(board, from, Piece::King, king_attacks(from) & !own, &mut moves);
            self.castling_moves(board, from, &mut moves);
        }

        moves
    }

    fn push_targets(&self, board: &Board, from: Square, piece: Piece, targets: u64, moves: &mut Vec<Move>) {
        for to in squares(targets) {
            let captured = board.piece_at(to).map(|(captured, _)| captured);
            moves.push(Move::new(from, to, piece).with_capture(captured));
        }
    }

    fn pawn_moves(&self, board: &Board, moves: &mut Vec<Move>) {
        let us = board.side_to_move;
        let them = us.opposite();
        let occupied = board.occupied();
        let enemies = board.occupancy(them);
        let (forward, start_rank) = match us {
            Color::White => (1, 1),
            Color::Black => (-1, 6),
        };

        for from in squares(board.bitboard(us, Piece::Pawn)) {
            if let Some(one) = from.offset(0, forward).filter(|sq| occupied & sq.bit() == 0) {
                push_pawn_move(Move::new(from, one, Piece::Pawn), us, moves);

                if from.rank() == start_rank {
                    if let Some(two) = one.offset(0, forward).filter(|sq| occupied & sq.bit() == 0) {
                        moves.push(Move::new(from, two, Piece::Pawn));
                    }
                }
            }

            for to in squares(pawn_attacks(from, us) & enemies) {
                let captured = board.piece_at(to).map(|(captured, _)| captured);
                push_pawn_move(Move::new(from, to, Piece::Pawn).with_capture(captured), us, moves);
            }

            if let Some(ep) = board.en_passant_square {
                if pawn_attacks(from, us) & ep.bit() != 0 {
                    moves.push(Move::new_en_passant(from, ep));
                }
            }
        }
    }

    fn castling_moves(&self, board: &Board, king: Square, moves: &mut Vec<Move>) {
        let us = board.side_to_move;
        let them = us.opposite();
        let (home, kingside, queenside) = match us {
            Color::White => (4, WHITE_KINGSIDE, WHITE_QUEENSIDE),
            Color::Black => (60, BLACK_KINGSIDE, BLACK_QUEENSIDE),
        };
        if king.index() != home || self.is_square_attacked(board, king, them) {
            return;
        }

        let occupied = board.occupied();
        let rooks = board.bitboard(us, Piece::Rook);
        let rank = king.rank();
        let at = |file| Square::new(file, rank);

        // (right, rook file, squares that must be empty, squares the king crosses)
        let sides = [
            (kingside, 7, &[5u8, 6][..], [5u8, 6]),
            (queenside, 0, &[1u8, 2, 3][..], [3u8, 2]),
        ];
        for (right, rook_file, between, crossed) in sides {
            if board.castling_rights & right == 0 {
                continue;
            }
            if !at(rook_file).is_some_and(|sq| rooks & sq.bit() != 0) {
                continue;
            }
            let path_clear = between
                .iter()
                .filter_map(|&file| at(file))
                .all(|sq| occupied & sq.bit() == 0);
            let path_safe = crossed
                .iter()
                .filter_map(|&file| at(file))
                .all(|sq| !self.is_square_attacked(board, sq, them));
            if path_clear && path_safe {
                if let Some(target) = at(crossed[1]) {
                    moves.push(Move::new_castling(king, target));
                }
            }
        }
    }

    /// True when neither side has enough material left to deliver mate.
    pub fn has_insufficient_material(&self, board: &Board) -> bool {
        let heavy = [Piece::Pawn, Piece::Rook, Piece::Queen];
        let has_heavy = [Color::White, Color::Black]
            .iter()
            .any(|&color| heavy.iter().any(|&piece| board.bitboard(color, piece) != 0));
        if has_heavy {
            return false;
        }

        let knights = board.bitboard(Color::White, Piece::Knight) | board.bitboard(Color::Black, Piece::Knight);
        let bishops = board.bitboard(Color::White, Piece::Bishop) | board.bitboard(Color::Black, Piece::Bishop);
        let minors = (knights | bishops).count_ones();

        if minors <= 1 {
            return true;
        }

        // Bishops only, all on one square colour.
        knights == 0 && {
            let mut colours = squares(bishops).map(Square::is_light);
            let first = colours.next();
            colours.all(|light| Some(light) == first)
        }
    }
}

fn push_pawn_move(mv: Move, us: Color, moves: &mut Vec<Move>) {
    if mv.to.rank() == us.promotion_rank() {
        for promotion in PROMOTION_PIECES {
            moves.push(mv.with_promotion(promotion));
        }
    } else {
        moves.push(mv);
    }
}
