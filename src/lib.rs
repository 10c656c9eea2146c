pub mod advisor;
pub mod board;
pub mod config;
pub mod error;
pub mod history;
pub mod movegen;
pub mod position;
pub mod resolver;
pub mod session;
pub mod uci;
pub mod view;

pub use advisor::{Advisor, HttpAdvisor, RandomAdvisor};
pub use board::{Board, Color, Piece, Square};
pub use config::AdvisorConfig;
pub use error::{AdvisorError, FenError, NotationError};
pub use history::{Attribution, HistoryEntry, HistoryLog};
pub use movegen::{Move, MoveGenerator};
pub use position::{GameStatus, Position};
pub use resolver::{PromotionPiece, Resolution};
pub use session::{Notification, NotificationKind, Phase, Session};
pub use uci::UciMove;
pub use view::BoardView;

#[cfg(test)]
mod tests {
    use super::*;
    use board::START_FEN;

    fn sq(text: &str) -> Square {
        text.parse().unwrap()
    }

    #[test]
    fn test_initial_position() {
        let board = Board::new();
        let generator = MoveGenerator::new();
        let moves = generator.legal_moves(&board);

        // White should have 20 legal moves in the initial position
        assert_eq!(moves.len(), 20);
        assert!(moves.iter().all(|mv| mv.piece == Piece::Pawn || mv.piece == Piece::Knight));
    }

    #[test]
    fn test_fen_round_trip() {
        assert_eq!(Board::new().to_fen(), START_FEN);
        assert_eq!(Board::from_fen(START_FEN).unwrap(), Board::new());

        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);

        assert!(matches!(Board::from_fen("8/8/8 w - - 0 1"), Err(FenError::InvalidPlacement(_))));
        assert!(matches!(Board::from_fen("8/8/8/8/8/8/8/8 w - - 0 1"), Err(FenError::KingCount(Color::White))));
        assert!(matches!(Board::from_fen(START_FEN.replace(" w ", " x ").as_str()), Err(FenError::InvalidSideToMove(_))));
        assert!(matches!(Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"), Err(FenError::MissingField(_))));
    }

    #[test]
    fn test_fen_counters_at_limit() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/4K2R b - - 65535 65535").unwrap();
        assert!(!position.legal_moves().is_empty());
        assert_eq!(position.status(), GameStatus::DrawByFiftyMove);

        let mv = "e8d8".parse::<UciMove>().unwrap().resolve(&position).unwrap();
        let after = position.apply(&mv);
        assert_eq!(after.board().halfmove_clock, u16::MAX);
        assert_eq!(after.board().fullmove_number, u16::MAX);

        let session = Session::from_position(after, RandomAdvisor::seeded(1));
        assert_eq!(session.phase(), Phase::Finished(GameStatus::DrawByFiftyMove));
    }

    #[test]
    fn test_en_passant_field() {
        // Black just played e7e5.
        let board = Board::from_fen("4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 2").unwrap();
        assert_eq!(board.en_passant_square, Some(sq("e6")));
        let moves = MoveGenerator::new().legal_moves(&board);
        assert!(moves.iter().any(|mv| mv.is_en_passant && mv.from == sq("d5") && mv.to == sq("e6")));

        // Wrong rank for the side to move.
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/3P4/4K3 w - e3 0 1"),
            Err(FenError::InvalidEnPassant(_))
        ));
        // No pawn went past the square.
        assert!(matches!(
            Board::from_fen("4k3/8/8/3P4/8/8/8/4K3 w - e6 0 2"),
            Err(FenError::InvalidEnPassant(_))
        ));
        // The pawn's start square is still occupied.
        assert!(matches!(
            Board::from_fen("4k3/4p3/8/3Pp3/8/8/8/4K3 w - e6 0 2"),
            Err(FenError::InvalidEnPassant(_))
        ));
        // A white pawn on e4 with black to move.
        assert!(Board::from_fen("4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1").is_ok());
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/3pP3/8/8/4K3 b - e6 0 1"),
            Err(FenError::InvalidEnPassant(_))
        ));
    }

    #[test]
    fn test_pawn_moves() {
        let mut board = Board::new();
        let generator = MoveGenerator::new();

        // Test pawn double push
        let moves = generator.legal_moves(&board);
        assert!(moves.iter().any(|mv| mv.piece == Piece::Pawn && mv.from == sq("e2") && mv.to == sq("e4")));

        // Set up a capture position
        board = Board::empty();
        board.put(sq("e1"), Piece::King, Color::White);
        board.put(sq("e8"), Piece::King, Color::Black);
        board.put(sq("e4"), Piece::Pawn, Color::White);
        board.put(sq("d5"), Piece::Pawn, Color::Black);

        let moves = generator.legal_moves(&board);
        let capture = moves.iter().find(|mv| mv.piece == Piece::Pawn && mv.captured_piece.is_some());
        assert_eq!(capture.map(|mv| mv.to), Some(sq("d5")));
    }

    #[test]
    fn test_castling() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let generator = MoveGenerator::new();

        let moves = generator.legal_moves(&board);
        let kingside = moves.iter().find(|mv| mv.is_castling && mv.to == sq("g1")).copied();
        let queenside = moves.iter().find(|mv| mv.is_castling && mv.to == sq("c1"));
        assert!(kingside.is_some());
        assert!(queenside.is_some());

        let mut after = board.clone();
        after.make_move(kingside.unwrap());
        assert_eq!(after.piece_at(sq("g1")), Some((Piece::King, Color::White)));
        assert_eq!(after.piece_at(sq("f1")), Some((Piece::Rook, Color::White)));
        assert_eq!(after.piece_at(sq("h1")), None);
        assert_eq!(after.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
    }

    #[test]
    fn test_castling_blocked_through_check() {
        // Black rook on f8 covers f1.
        let board = Board::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let moves = MoveGenerator::new().legal_moves(&board);
        assert!(!moves.iter().any(|mv| mv.is_castling && mv.to == sq("g1")));
        assert!(moves.iter().any(|mv| mv.is_castling && mv.to == sq("c1")));
    }

    #[test]
    fn test_rook_capture_removes_castling_right() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let capture = MoveGenerator::new()
            .legal_moves(&board)
            .into_iter()
            .find(|mv| mv.from == sq("a1") && mv.to == sq("a8"))
            .unwrap();
        let mut after = board.clone();
        after.make_move(capture);
        assert_eq!(after.to_fen(), "R3k2r/8/8/8/8/8/8/4K2R b Kk - 0 1");
    }

    #[test]
    fn test_en_passant() {
        let mut position = Position::new();
        for text in ["e2e4", "d7d5", "e4e5", "f7f5"] {
            let mv = text.parse::<UciMove>().unwrap().resolve(&position).unwrap();
            position = position.apply(&mv);
        }

        let en_passant = position
            .legal_moves()
            .into_iter()
            .find(|mv| mv.is_en_passant && mv.from == sq("e5") && mv.to == sq("f6"))
            .unwrap();
        let after = position.apply(&en_passant);
        assert_eq!(after.board().piece_at(sq("f5")), None);
        assert_eq!(after.board().piece_at(sq("f6")), Some((Piece::Pawn, Color::White)));
    }

    #[test]
    fn test_promotion() {
        let mut board = Board::empty();
        board.put(sq("a7"), Piece::Pawn, Color::White);
        board.put(sq("h1"), Piece::King, Color::White);
        board.put(sq("h8"), Piece::King, Color::Black);

        let moves = MoveGenerator::new().legal_moves(&board);
        let promotions = moves.iter().filter(|mv| mv.piece == Piece::Pawn && mv.promotion.is_some()).count();

        // Should have 4 promotion options (Queen, Rook, Bishop, Knight)
        assert_eq!(promotions, 4);
    }

    #[test]
    fn test_check() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/2Q1K3 b - - 0 1").unwrap();
        let generator = MoveGenerator::new();
        assert!(!generator.is_in_check(&board, Color::Black));

        let board = Board::from_fen("4k3/8/8/8/8/8/8/3KQ3 b - - 0 1").unwrap();
        assert!(generator.is_in_check(&board, Color::Black));
        assert_eq!(Position::from_board(board).status(), GameStatus::Check);
    }

    #[test]
    fn test_checkmate() {
        let mut board = Board::empty();
        board.put(sq("b1"), Piece::Queen, Color::White);
        board.put(sq("c1"), Piece::King, Color::White);
        board.put(sq("a1"), Piece::King, Color::Black);
        board.side_to_move = Color::Black;

        assert!(MoveGenerator::new().legal_moves(&board).is_empty());
        let position = Position::from_board(board);
        assert!(position.is_checkmate());
        assert_eq!(position.status(), GameStatus::Checkmate);
    }

    #[test]
    fn test_stalemate() {
        let mut board = Board::empty();
        board.put(sq("a1"), Piece::King, Color::White);
        board.put(sq("c2"), Piece::King, Color::Black);
        board.put(sq("b3"), Piece::Queen, Color::Black);

        let generator = MoveGenerator::new();
        assert!(!generator.is_in_check(&board, Color::White));
        assert!(generator.legal_moves(&board).is_empty());

        let position = Position::from_board(board);
        assert!(position.is_stalemate());
        assert_eq!(position.status(), GameStatus::Stalemate);
    }

    #[test]
    fn test_insufficient_material() {
        // King vs King
        let position = Position::from_fen("8/8/8/4k3/8/8/8/3K4 w - - 0 1").unwrap();
        assert_eq!(position.status(), GameStatus::DrawByInsufficientMaterial);

        // King and bishop vs King
        let position = Position::from_fen("8/8/8/4k3/8/8/8/3KB3 w - - 0 1").unwrap();
        assert_eq!(position.status(), GameStatus::DrawByInsufficientMaterial);

        // Bishops on the same square colour
        let position = Position::from_fen("8/8/3b4/4k3/8/8/8/3KB3 w - - 0 1").unwrap();
        assert!(position.is_insufficient_material());

        // Bishops on opposite colours can still mate
        let position = Position::from_fen("8/8/2b5/4k3/8/8/8/3KB3 w - - 0 1").unwrap();
        assert!(!position.is_insufficient_material());

        // Two knights are not a dead draw by this rule
        let position = Position::from_fen("8/8/8/4k3/8/8/8/2NKN3 w - - 0 1").unwrap();
        assert!(!position.is_insufficient_material());

        let position = Position::from_fen("8/8/8/4k3/8/8/4P3/3K4 w - - 0 1").unwrap();
        assert!(!position.is_insufficient_material());
    }

    #[test]
    fn test_fifty_move_rule() {
        let position = Position::from_fen("8/8/8/4k3/8/8/8/R3K3 w - - 100 80").unwrap();
        assert!(position.is_fifty_moves());
        assert_eq!(position.status(), GameStatus::DrawByFiftyMove);

        let position = Position::from_fen("8/8/8/4k3/8/8/8/R3K3 w - - 99 80").unwrap();
        assert_eq!(position.status(), GameStatus::Ongoing);
    }

    #[test]
    fn test_threefold_repetition() {
        let mut position = Position::new();
        for _ in 0..2 {
            for text in ["b1c3", "b8c6", "c3b1", "c6b8"] {
                assert!(!position.is_repetition());
                let mv = text.parse::<UciMove>().unwrap().resolve(&position).unwrap();
                position = position.apply(&mv);
            }
        }
        assert!(position.is_repetition());
        assert_eq!(position.status(), GameStatus::DrawByRepetition);
    }

    #[test]
    fn test_move_validation() {
        // The rook is pinned against its king along the e-file.
        let board = Board::from_fen("4r1k1/8/8/8/8/8/4R3/4K3 w - - 0 1").unwrap();
        let moves = MoveGenerator::new().legal_moves(&board);
        assert!(!moves.iter().any(|mv| mv.from == sq("e2") && mv.to == sq("a2")));
        assert!(moves.iter().any(|mv| mv.from == sq("e2") && mv.to == sq("e8")));
    }

    #[test]
    fn test_perft_initial_position() {
        let board = Board::new();
        let generator = MoveGenerator::new();

        assert_eq!(perft(&board, &generator, 1), 20);
        assert_eq!(perft(&board, &generator, 2), 400);
        assert_eq!(perft(&board, &generator, 3), 8902);
    }

    #[test]
    fn test_perft_kiwipete() {
        let board = Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
        let generator = MoveGenerator::new();

        assert_eq!(perft(&board, &generator, 1), 48);
        assert_eq!(perft(&board, &generator, 2), 2039);
    }

    // Helper function to perform perft
    fn perft(board: &Board, generator: &MoveGenerator, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = generator.legal_moves(board);
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for mv in moves {
            let mut new_board = board.clone();
            new_board.make_move(mv);
            nodes += perft(&new_board, generator, depth - 1);
        }

        nodes
    }
}
