use cozy_chess::{Board as CozyBoard, Color, Move, Piece, Square};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PositionError {
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
    #[error("malformed move string {0:?}, expected coordinate notation like e7e5")]
    MalformedMove(String),
    #[error("illegal move: {0}")]
    IllegalMove(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    Ongoing,
}

#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: CozyBoard::default() }
    }

    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        CozyBoard::from_fen(fen, false)
            .map(|b| Self { board: b })
            .map_err(|e| PositionError::InvalidFen(format!("{e:?}")))
    }

    pub fn board(&self) -> &CozyBoard {
        &self.board
    }

    pub fn fen(&self) -> String {
        self.board.to_string()
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        let mut out = Vec::new();
        self.board.generate_moves(|moves| {
            out.extend(moves);
            false
        });
        out
    }

    /// Validates a coordinate-notation move against the legal-move set and
    /// plays it. The position is left untouched on any error.
    pub fn apply_uci(&mut self, uci: &str) -> Result<Move, PositionError> {
        if !is_coordinate_move(uci) {
            return Err(PositionError::MalformedMove(uci.to_string()));
        }
        let mv = self
            .find_legal(uci)
            .or_else(|| self.castle_alias(uci).and_then(|a| self.find_legal(a)))
            .ok_or_else(|| PositionError::IllegalMove(uci.to_string()))?;
        self.board.play(mv);
        Ok(mv)
    }

    pub fn termination(&self) -> Termination {
        if !self.has_legal_moves() {
            return if self.board.checkers().is_empty() {
                Termination::Stalemate
            } else {
                Termination::Checkmate { winner: !self.board.side_to_move() }
            };
        }
        if self.board.halfmove_clock() >= 100 {
            return Termination::FiftyMoveRule;
        }
        if self.insufficient_material() {
            return Termination::InsufficientMaterial;
        }
        Termination::Ongoing
    }

    fn find_legal(&self, uci: &str) -> Option<Move> {
        let mut found = None;
        self.board.generate_moves(|moves| {
            for m in moves {
                if m.to_string() == uci {
                    found = Some(m);
                    break;
                }
            }
            found.is_some()
        });
        found
    }

    // Castling comes in as the standard king-two-squares notation; movegen
    // encodes it as king-takes-rook.
    fn castle_alias(&self, uci: &str) -> Option<&'static str> {
        let (home, alias) = match uci {
            "e1g1" => (Square::E1, "e1h1"),
            "e1c1" => (Square::E1, "e1a1"),
            "e8g8" => (Square::E8, "e8h8"),
            "e8c8" => (Square::E8, "e8a8"),
            _ => return None,
        };
        (self.board.king(self.board.side_to_move()) == home).then_some(alias)
    }

    fn has_legal_moves(&self) -> bool {
        let mut any = false;
        self.board.generate_moves(|_| {
            any = true;
            true
        });
        any
    }

    fn insufficient_material(&self) -> bool {
        let b = &self.board;
        let heavy = b.pieces(Piece::Pawn) | b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
        if !heavy.is_empty() {
            return false;
        }
        let knights = b.pieces(Piece::Knight);
        let bishops = b.pieces(Piece::Bishop);
        if knights.len() + bishops.len() <= 1 {
            return true;
        }
        if !knights.is_empty() {
            return false;
        }
        // bishops confined to one square colour cannot deliver mate
        let mut light = false;
        let mut dark = false;
        for sq in bishops {
            if (sq.file() as usize + sq.rank() as usize) % 2 == 0 {
                dark = true;
            } else {
                light = true;
            }
        }
        !(light && dark)
    }
}

fn is_coordinate_move(s: &str) -> bool {
    let b = s.as_bytes();
    matches!(b.len(), 4 | 5)
        && (b'a'..=b'h').contains(&b[0])
        && (b'1'..=b'8').contains(&b[1])
        && (b'a'..=b'h').contains(&b[2])
        && (b'1'..=b'8').contains(&b[3])
        && (b.len() == 4 || matches!(b[4], b'q' | b'r' | b'b' | b'n'))
}
