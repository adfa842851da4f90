use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use npuzzle_common::board::Board;
use npuzzle_solver::{Heuristic, Solver};

use std::{
    io::{IsTerminal, Read, stdin},
    path::PathBuf,
};

/// Finds a shortest solution to a sliding-tile puzzle.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Heuristic used to rank search states (hamming or manhattan)
    #[arg(
        long,
        value_name = "NAME",
        default_value = "manhattan",
        value_parser = parse_heuristic
    )]
    heuristic: Heuristic,
    /// Print the parsed board without solving it
    #[arg(short, long)]
    preview: bool,
    /// Path to a puzzle file (the dimension, then the tiles in row order)
    file: Option<PathBuf>,
}

fn parse_heuristic(name: &str) -> Result<Heuristic, String> {
    match name {
        "hamming" => Ok(Heuristic::Hamming),
        "manhattan" => Ok(Heuristic::Manhattan),
        _ => Err(format!(
            "unknown heuristic {name:?}, expected hamming or manhattan"
        )),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let Cli {
        heuristic,
        preview,
        file,
    } = Cli::parse();

    let content = if let Some(file) = &file {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?
    } else if !stdin().is_terminal() {
        let mut content = String::new();
        stdin()
            .read_to_string(&mut content)
            .context("Failed to read from stdin")?;
        content
    } else {
        bail!("No puzzle `file` provided.");
    };

    let board = Board::parse(&content).context("Failed to parse puzzle")?;
    if preview {
        println!("{board}");
        return Ok(());
    }

    let solver = Solver::with_heuristic(board, heuristic)?;
    info!(
        "explored {} states in {:?} using the {:?} heuristic",
        solver.states(),
        solver.elapsed(),
        solver.heuristic(),
    );

    match solver.solution() {
        Some(path) => {
            println!("Minimum number of moves = {}", solver.moves());
            for board in path {
                println!("{board}");
            }
        }
        None => println!("No solution possible"),
    }

    Ok(())
}
