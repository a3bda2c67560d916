//! Tictac-Rust: a minimax engine for N×N Tic-Tac-Toe.
//!
//! ## Usage
//!
//! - `tictac-rust` - Show a demo
//! - `tictac-rust serve` - Answer protocol requests on stdin/stdout
//! - `tictac-rust move "<board>"` - Print the next board for one position
//! - `tictac-rust arena` - Play the engine against a random mover

use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use tictac_rust::board::{blank, from_string};
use tictac_rust::constants::{DEFAULT_ARENA_GAMES, DEFAULT_SIDE_LEN};
use tictac_rust::protocol::MoveServer;
use tictac_rust::search::Searcher;
use tictac_rust::session::run_arena;

/// Tictac-Rust: a minimax engine for N×N Tic-Tac-Toe
#[derive(Parser)]
#[command(name = "tictac-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer move requests on stdin/stdout
    Serve,
    /// Print the engine's next board for a serialized board
    Move {
        /// Board cells in row-major order: ' ', 'X' or 'O'
        board: String,
    },
    /// Play the engine against a random mover and report the tally
    Arena {
        /// Board side length
        #[arg(long, default_value_t = DEFAULT_SIDE_LEN)]
        side: usize,
        /// Number of games
        #[arg(long, default_value_t = DEFAULT_ARENA_GAMES)]
        games: usize,
        /// Seed for the random mover
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run a simple demo of the engine
    Demo,
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries protocol responses
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Some(Commands::Serve) => {
            info!("serving on stdin/stdout");
            let mut server = MoveServer::new();
            server
                .run(io::stdin().lock(), io::stdout().lock())
                .context("protocol I/O failed")?;
            let stats = server.searcher().stats();
            info!(
                nodes = stats.nodes,
                cache_hits = stats.cache_hits,
                cutoffs = stats.cutoffs,
                "session closed"
            );
        }
        Some(Commands::Move { board }) => {
            let next = Searcher::new()
                .next_move(&board)
                .with_context(|| format!("cannot search board {board:?}"))?;
            println!("{next}");
        }
        Some(Commands::Arena { side, games, seed }) => {
            let mut rng = match seed {
                Some(seed) => fastrand::Rng::with_seed(seed),
                None => fastrand::Rng::new(),
            };
            let mut searcher = Searcher::new();
            let session = run_arena(&mut searcher, &mut rng, side, games)?;
            println!(
                "{} games on {side}x{side}: opponent won {}, drew {}, lost {}",
                session.games(),
                session.wins,
                session.draws,
                session.losses
            );
            let stats = searcher.stats();
            println!(
                "nodes {} | cache entries {} | hit rate {:.1}% | cutoffs {}",
                stats.nodes,
                searcher.cache_len(),
                stats.hit_rate(),
                stats.cutoffs
            );
        }
        Some(Commands::Demo) | None => run_demo()?,
    }
    Ok(())
}

fn run_demo() -> Result<()> {
    println!("Tictac-Rust: Minimax Tic-Tac-Toe Engine\n");

    // Demo 1: engine plays itself on 3x3
    println!("=== Self-play on 3x3 ===");
    let mut searcher = Searcher::new();
    let mut board = blank(3);
    while board.is_leaf_and_score().is_none() {
        board = searcher.best_move(&board).best;
    }
    println!("{}\n", board.render());
    println!("Outcome: {:?}\n", board.outcome());

    // Demo 2: one move on a larger board
    println!("=== Depth-limited move on 4x4 ===");
    let start = from_string("XX  OO          ")?;
    let result = searcher.best_move(&start);
    println!("{}\n", start.render());
    println!("{}\n", result.best.render());
    println!("Score: {:.3}", result.score);
    Ok(())
}
