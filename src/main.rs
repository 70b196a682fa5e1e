use std::process::ExitCode;
use std::time::Duration;

use hourglass::{Board, Engine};

const DEFAULT_BUDGET_MS: u64 = 2000;

fn usage() -> ExitCode {
    eprintln!("usage: hourglass [FEN] [budget-ms]");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() > 2 {
        return usage();
    }

    let board = match args.first() {
        Some(fen) => match Board::from_fen(fen) {
            Ok(board) => board,
            Err(err) => {
                eprintln!("invalid FEN {fen:?}: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => Board::new(),
    };

    let budget_ms = match args.get(1) {
        Some(raw) => match raw.parse::<u64>() {
            Ok(ms) => ms,
            Err(_) => return usage(),
        },
        None => DEFAULT_BUDGET_MS,
    };

    let mut engine = Engine::new();
    match engine.choose_move(&board, Duration::from_millis(budget_ms)) {
        Some(mv) => {
            println!("bestmove {mv}");
            ExitCode::SUCCESS
        }
        None => {
            println!("bestmove (none)");
            ExitCode::SUCCESS
        }
    }
}
