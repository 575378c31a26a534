use botboard::board::cozy::{Position, Termination};
use cozy_chess::Color;

fn played(moves: &[&str]) -> Position {
    let mut pos = Position::startpos();
    for m in moves {
        pos.apply_uci(m).expect("test move sequence is legal");
    }
    pos
}

#[test]
fn startpos_is_ongoing() {
    assert_eq!(Position::startpos().termination(), Termination::Ongoing);
}

#[test]
fn fools_mate_is_won_by_black() {
    let pos = played(&["f2f3", "e7e5", "g2g4", "d8h4"]);
    assert_eq!(pos.termination(), Termination::Checkmate { winner: Color::Black });
}

#[test]
fn scholars_mate_is_won_by_white() {
    let pos = played(&["e2e4", "e7e5", "d1h5", "b8c6", "f1c4", "g8f6", "h5f7"]);
    assert_eq!(pos.termination(), Termination::Checkmate { winner: Color::White });
}

#[test]
fn back_rank_mate_from_fen() {
    let pos = Position::from_fen("3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
    assert_eq!(pos.termination(), Termination::Checkmate { winner: Color::White });
}

#[test]
fn stalemate_is_not_checkmate() {
    let pos = Position::from_fen("7k/5K2/6Q1/8/8/8/8/8 b - - 0 1").unwrap();
    assert_eq!(pos.termination(), Termination::Stalemate);
}

#[test]
fn bare_kings_are_a_draw() {
    let pos = Position::from_fen("8/8/4k3/8/8/4K3/8/8 w - - 0 1").unwrap();
    assert_eq!(pos.termination(), Termination::InsufficientMaterial);
}

#[test]
fn lone_minor_piece_is_a_draw() {
    for fen in [
        "8/8/4k3/8/8/4KB2/8/8 w - - 0 1",
        "8/8/4k3/8/8/4KN2/8/8 w - - 0 1",
        "8/8/2n1k3/8/8/4K3/8/8 w - - 0 1",
    ] {
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.termination(), Termination::InsufficientMaterial, "{fen}");
    }
}

#[test]
fn same_colored_bishops_are_a_draw() {
    // both bishops on light squares
    let pos = Position::from_fen("8/8/4k1b1/8/8/4KB2/8/8 w - - 0 1").unwrap();
    assert_eq!(pos.termination(), Termination::InsufficientMaterial);
}

#[test]
fn opposite_colored_bishops_are_not_a_draw() {
    let pos = Position::from_fen("8/8/4kb2/8/8/4KB2/8/8 w - - 0 1").unwrap();
    assert_eq!(pos.termination(), Termination::Ongoing);
}

#[test]
fn mating_material_is_not_a_draw() {
    for fen in [
        "8/8/4k3/8/8/4KR2/8/8 w - - 0 1",
        "8/8/4k3/8/8/3NKN2/8/8 w - - 0 1",
        "8/4p3/4k3/8/8/4K3/8/8 w - - 0 1",
    ] {
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.termination(), Termination::Ongoing, "{fen}");
    }
}

#[test]
fn exhausted_halfmove_clock_is_a_draw() {
    let pos = Position::from_fen("8/8/4k3/8/8/4K3/4R3/8 w - - 100 80").unwrap();
    assert_eq!(pos.termination(), Termination::FiftyMoveRule);
}
