use anyhow::Result;
use clap::Parser;
use cozy_chess::{Color, File, Piece, Rank, Square};
use std::io;
use std::io::Write;
use std::path::PathBuf;

use botboard::board::cozy::Position;
use botboard::engine::EngineProcess;
use botboard::session::{GameSession, Outcome, Phase, SessionEvent};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play chess against an external bot process", long_about = None)]
struct Args {
    /// Path to the bot executable
    #[arg(long)]
    engine: PathBuf,

    /// Your color: 'w' for white, 'b' for black
    #[arg(long, default_value = "b")]
    color: String,

    /// Starting FEN position
    #[arg(long)]
    fen: Option<String>,
}

fn parse_color(color_str: &str) -> Result<Color> {
    match color_str.to_lowercase().as_str() {
        "w" | "white" => Ok(Color::White),
        "b" | "black" => Ok(Color::Black),
        _ => anyhow::bail!("Invalid color: use 'w' or 'b'"),
    }
}

fn piece_char(piece: Piece, color: Color) -> char {
    let c = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    match color {
        Color::White => c.to_ascii_uppercase(),
        Color::Black => c,
    }
}

// Board from the human's point of view, like the original flipped display
fn print_board(pos: &Position, flipped: bool) {
    let board = pos.board();
    let mut ranks: Vec<Rank> = Rank::ALL.to_vec();
    let mut files: Vec<File> = File::ALL.to_vec();
    if flipped {
        files.reverse();
    } else {
        ranks.reverse();
    }
    println!();
    for rank in &ranks {
        print!("{} ", *rank as usize + 1);
        for file in &files {
            let sq = Square::new(*file, *rank);
            let c = match board.piece_on(sq).zip(board.color_on(sq)) {
                Some((piece, color)) => piece_char(piece, color),
                None => '.',
            };
            print!(" {c}");
        }
        println!();
    }
    print!("  ");
    for file in &files {
        print!(" {}", (b'a' + *file as u8) as char);
    }
    println!();
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Checkmate { winner } => {
            let winner = match winner {
                Color::White => "White",
                Color::Black => "Black",
            };
            println!("\nCheckmate! {winner} wins.");
        }
        Outcome::Stalemate => println!("\nStalemate!"),
        Outcome::InsufficientMaterial => println!("\nDraw due to insufficient material."),
        Outcome::FiftyMoveRule => println!("\nGame over!"),
        Outcome::EngineUnavailable => println!("\nThe bot process is gone; game aborted."),
        Outcome::EngineProtocol { reply } => {
            println!("\nThe bot sent an unusable move ({reply}); game aborted.")
        }
    }
}

/// Prints the user-facing part of a batch of session events. Returns true
/// once the game has ended.
fn report(events: &[SessionEvent]) -> bool {
    let mut over = false;
    for ev in events {
        match ev {
            SessionEvent::EngineMovePlayed(mv) => println!("Bot plays: {mv}"),
            SessionEvent::GameEnded(outcome) => {
                print_outcome(outcome);
                over = true;
            }
            _ => {}
        }
    }
    over
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let human = parse_color(&args.color)?;

    let engine = EngineProcess::spawn(&args.engine)?;
    let position = match &args.fen {
        Some(fen) => Position::from_fen(fen)?,
        None => Position::startpos(),
    };
    let mut session = GameSession::with_position(engine, human, position);
    let flipped = human == Color::Black;

    let mut events = session.begin();
    print_board(session.position(), flipped);
    if matches!(session.phase(), Phase::AwaitingEngineMove) {
        println!("Bot is thinking...");
        events.extend(session.wait_engine());
        print_board(session.position(), flipped);
    }
    if report(&events) {
        session.shutdown();
        return Ok(());
    }

    loop {
        print!("Enter your move (e.g., e7e5): ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" {
            break;
        }

        match session.submit_move(input) {
            Ok(events) => {
                print_board(session.position(), flipped);
                if report(&events) {
                    break;
                }
                println!("Bot is thinking...");
                let events = session.wait_engine();
                print_board(session.position(), flipped);
                if report(&events) {
                    break;
                }
            }
            Err(e) => println!("{e}"),
        }
    }

    session.shutdown();
    Ok(())
}
