//! Integration tests for `Position`: perft node counts and a handful of
//! literal end-to-end scenarios (scholar's mate, en passant, castling,
//! promotion, repetition).

use chess_core::{Color, GameState, Move, Position};

const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[test]
fn perft_positions() {
    struct TestPosition {
        name: &'static str,
        fen: &'static str,
        depths: &'static [(u32, u64)],
    }

    const TEST_POSITIONS: &[TestPosition] = &[
        TestPosition {
            name: "starting position",
            fen: STARTING_FEN,
            depths: &[(1, 20), (2, 400), (3, 8902), (4, 197_281)],
        },
        TestPosition {
            name: "kiwipete",
            fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            depths: &[(1, 48), (2, 2039), (3, 97_862)],
        },
    ];

    for position in TEST_POSITIONS {
        for &(depth, expected) in position.depths {
            let mut pos = Position::from_fen(position.fen).unwrap();
            let nodes = pos.perft(depth);
            assert_eq!(nodes, expected, "perft mismatch for {} at depth {depth}", position.name);
        }
    }
}

#[test]
fn perft_depth_five_from_start_matches_reference_count() {
    let mut pos = Position::new_starting();
    assert_eq!(pos.perft(5), 4_865_609);
}

#[test]
fn starting_position_has_twenty_legal_moves_and_e4_updates_fen() {
    let mut pos = Position::from_fen(STARTING_FEN).unwrap();
    assert_eq!(pos.legal_moves().len(), 20);

    assert!(pos.push(Move::from_uci("e2e4").unwrap()));
    assert_eq!(
        pos.to_fen(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
    );
}

#[test]
fn scholars_mate_ends_in_checkmate() {
    let mut pos = Position::new_starting();
    let moves = ["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"];
    for uci in moves {
        assert!(pos.push(Move::from_uci(uci).unwrap()), "{uci} should be legal");
    }
    assert!(pos.is_checkmate());
    assert_eq!(pos.game_state(), GameState::Checkmate);
}

#[test]
fn en_passant_capture_removes_captured_pawn() {
    let mut pos =
        Position::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3").unwrap();
    assert!(pos.push(Move::from_uci("e5d6").unwrap()));
    assert_eq!(pos.piece_at_algebraic("d5"), None);
    assert_eq!(
        pos.piece_at_algebraic("d6"),
        Some((chess_core::PieceKind::Pawn, Color::White))
    );
}

#[test]
fn white_short_castle_moves_king_and_rook() {
    let mut pos = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
    assert!(pos.push(Move::from_uci("e1g1").unwrap()));
    assert_eq!(
        pos.piece_at_algebraic("g1"),
        Some((chess_core::PieceKind::King, Color::White))
    );
    assert_eq!(
        pos.piece_at_algebraic("f1"),
        Some((chess_core::PieceKind::Rook, Color::White))
    );
    assert_eq!(pos.castling_rights().to_string(), "kq");
}

#[test]
fn pawn_promotes_to_queen() {
    let mut pos = Position::from_fen("8/P7/8/8/8/8/8/4k2K w - - 0 1").unwrap();
    assert!(pos.push(Move::from_uci("a7a8q").unwrap()));
    assert_eq!(
        pos.piece_at_algebraic("a8"),
        Some((chess_core::PieceKind::Queen, Color::White))
    );
    assert_eq!(pos.piece_at_algebraic("a7"), None);
}

#[test]
fn knight_shuffle_reaches_threefold_then_fivefold_repetition() {
    let mut pos = Position::new_starting();
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];

    // The starting position itself already counts once; three more full
    // shuffles (each returning to the starting position) bring the count
    // to four, so a fourth shuffle's worth of moves is needed to reach the
    // fifth occurrence. Push shuffles until fivefold triggers, checking
    // threefold along the way.
    let mut saw_threefold_before_fivefold = false;
    'outer: loop {
        for uci in shuffle {
            assert!(pos.push(Move::from_uci(uci).unwrap()));
        }
        if pos.is_threefold_repetition() && !pos.is_fivefold_repetition() {
            saw_threefold_before_fivefold = true;
        }
        if pos.is_fivefold_repetition() {
            break 'outer;
        }
    }

    assert!(saw_threefold_before_fivefold);
    assert!(pos.is_fivefold_repetition());
    assert_eq!(pos.game_state(), GameState::Draw);
}

#[test]
fn undo_restores_fen_and_hash() {
    let mut pos = Position::new_starting();
    let before_fen = pos.to_fen();
    let before_hash = pos.zobrist_hash();

    assert!(pos.push(Move::from_uci("e2e4").unwrap()));
    assert_ne!(pos.to_fen(), before_fen);

    assert!(pos.undo());
    assert_eq!(pos.to_fen(), before_fen);
    assert_eq!(pos.zobrist_hash(), before_hash);
}

#[test]
fn push_rejects_illegal_move_and_leaves_position_unchanged() {
    let mut pos = Position::new_starting();
    let before = pos.to_fen();
    // e2e5 is not a legal pawn move from the starting position.
    assert!(!pos.push(Move::from_uci("e2e5").unwrap()));
    assert_eq!(pos.to_fen(), before);
}
