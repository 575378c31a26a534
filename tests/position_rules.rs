use botboard::board::cozy::{Position, PositionError};
use cozy_chess::{Color, Piece, Square};
use pretty_assertions::assert_eq;

#[test]
fn startpos_has_twenty_legal_moves() {
    let pos = Position::startpos();
    assert_eq!(pos.legal_moves().len(), 20);
}

#[test]
fn applies_a_legal_move() {
    let mut pos = Position::startpos();
    pos.apply_uci("e2e4").expect("e2e4 is legal from the start position");
    assert!(pos.fen().starts_with("rnbqkbnr/pppppppp/8/8/4P3/8/PPPPPPPP/RNBQKBNR b"));
    assert_eq!(pos.side_to_move(), Color::Black);
}

#[test]
fn rejects_wrong_side_move_and_leaves_position_unchanged() {
    // White opens, so Black's e7e5 is illegal here
    let mut pos = Position::startpos();
    let before = pos.fen();
    let err = pos.apply_uci("e7e5").unwrap_err();
    assert!(matches!(err, PositionError::IllegalMove(_)), "got {err:?}");
    assert_eq!(pos.fen(), before);
    assert_eq!(pos.legal_moves().len(), 20);
}

#[test]
fn distinguishes_malformed_from_illegal() {
    let mut pos = Position::startpos();
    let before = pos.fen();
    for bad in ["", "zzzz", "e2", "e2e9", "i2i4", "e2e4x", "e7e8k"] {
        let err = pos.apply_uci(bad).unwrap_err();
        assert!(matches!(err, PositionError::MalformedMove(_)), "{bad:?} gave {err:?}");
    }
    // well-formed but not playable
    let err = pos.apply_uci("e2e5").unwrap_err();
    assert!(matches!(err, PositionError::IllegalMove(_)), "got {err:?}");
    assert_eq!(pos.fen(), before);
}

#[test]
fn promotion_requires_the_piece_suffix() {
    let mut pos = Position::from_fen("8/4P1k1/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let err = pos.apply_uci("e7e8").unwrap_err();
    assert!(matches!(err, PositionError::IllegalMove(_)), "got {err:?}");
    pos.apply_uci("e7e8q").expect("queening is legal");
    assert_eq!(pos.board().piece_on(Square::E8), Some(Piece::Queen));
}

#[test]
fn accepts_standard_castling_notation() {
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    pos.apply_uci("e1g1").expect("white short castle");
    assert_eq!(pos.board().king(Color::White), Square::G1);
    assert_eq!(pos.board().piece_on(Square::F1), Some(Piece::Rook));

    pos.apply_uci("e8c8").expect("black long castle");
    assert_eq!(pos.board().king(Color::Black), Square::C8);
    assert_eq!(pos.board().piece_on(Square::D8), Some(Piece::Rook));
}

#[test]
fn fen_round_trips() {
    let fens = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2k5/8/8/8/5K2/8/8 w - - 12 40",
    ];
    for fen in fens {
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.fen(), fen);
        let again = Position::from_fen(&pos.fen()).unwrap();
        assert_eq!(again.fen(), pos.fen());
    }
}

#[test]
fn rejects_garbage_fen() {
    assert!(matches!(
        Position::from_fen("not a fen at all"),
        Err(PositionError::InvalidFen(_))
    ));
}
