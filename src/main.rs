//! Gomoku-AI command line.
//!
//! ## Usage
//!
//! - `gomoku-ai` / `gomoku-ai demo` - AI plays against a Monte Carlo opponent
//! - `gomoku-ai analyze [FILE]` - Evaluate a board read from FILE or stdin

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use gomoku_ai::board::{Board, Cell, LinearMove};
use gomoku_ai::budget::ThinkBudget;
use gomoku_ai::constants::{
    DEFAULT_BOARD_SIZE, DEFAULT_MAX_DEPTH, DEFAULT_THRESHOLD, DEFAULT_TRIALS, DEFAULT_WIN_LENGTH,
};
use gomoku_ai::options::AiOptions;
use gomoku_ai::patterns::winner;
use gomoku_ai::playout::{best_move, filter_by_threshold, ranked_moves};
use gomoku_ai::search::search;
use gomoku_ai::session::{GameSession, SessionConfig, Turn};

/// Gomoku-AI: Monte Carlo + minimax engine for N-in-a-row games
#[derive(Parser)]
#[command(name = "gomoku-ai")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Let the AI play a full game against a Monte Carlo opponent
    Demo {
        /// Side length of the square board
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
        size: usize,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Print the win check, Monte Carlo ranking and search result for a board
    Analyze {
        /// Board file, one row per line using X, O and '.'; stdin if omitted
        file: Option<PathBuf>,

        /// Side the AI plays
        #[arg(long, value_enum, default_value_t = Side::O)]
        ai: Side,

        #[command(flatten)]
        engine: EngineArgs,
    },
}

#[derive(Args, Clone)]
struct EngineArgs {
    /// Stones in a row needed to win
    #[arg(long, default_value_t = DEFAULT_WIN_LENGTH)]
    win_length: usize,

    /// Minimax depth in plies
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    depth: usize,

    /// Monte Carlo playouts per move
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    trials: usize,

    /// Minimum Monte Carlo score for a search candidate
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Disable alpha-beta pruning
    #[arg(long)]
    no_alpha_beta: bool,

    /// Think-time limit per move in milliseconds
    #[arg(long)]
    think_ms: Option<u64>,

    /// RNG seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,
}

impl EngineArgs {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            win_length: self.win_length,
            max_depth: self.depth,
            use_alpha_beta: !self.no_alpha_beta,
            trials: self.trials,
            threshold: self.threshold,
            think_time: self.think_ms.map(Duration::from_millis),
            seed: self.seed,
        }
    }

    fn budget(&self) -> ThinkBudget {
        match self.think_ms {
            Some(ms) => ThinkBudget::with_time_limit(Duration::from_millis(ms)),
            None => ThinkBudget::unlimited(),
        }
    }

    fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Side {
    X,
    O,
}

impl From<Side> for Cell {
    fn from(side: Side) -> Self {
        match side {
            Side::X => Cell::X,
            Side::O => Cell::O,
        }
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Some(Commands::Demo { size, engine }) => run_demo(size, &engine),
        Some(Commands::Analyze { file, ai, engine }) => run_analyze(file, ai.into(), &engine),
        None => {
            let engine = EngineArgs {
                win_length: DEFAULT_WIN_LENGTH,
                depth: DEFAULT_MAX_DEPTH,
                trials: DEFAULT_TRIALS,
                threshold: DEFAULT_THRESHOLD,
                no_alpha_beta: false,
                think_ms: None,
                seed: None,
            };
            run_demo(11, &engine)
        }
    }
}

fn run_demo(size: usize, engine: &EngineArgs) -> Result<()> {
    let mut session =
        GameSession::with_config(size, size, Cell::X, engine.session_config()).context("cannot start session")?;
    let mut opponent_rng = engine.rng();
    println!("Gomoku-AI demo, session {}\n", session.id());

    while !session.is_over() {
        let board = session.board().clone();
        let Some(((col, row), score)) = best_move(
            &board,
            session.options(),
            board.num_free_cells(),
            engine.trials,
            session.human_player(),
            &mut opponent_rng,
            &engine.budget(),
        )?
        else {
            break;
        };
        session.play(col, row)?;
        println!("X plays ({col}, {row}), monte carlo score {score:.3}");

        match session.make_move()? {
            Turn::HumanWon => break,
            Turn::Draw => break,
            Turn::AiMoved { position, score, .. } => {
                println!("O plays {position:?}, search score {score}");
            }
        }
        println!("{}", session.board());
    }

    match session.winner() {
        Some(player) => {
            println!("{player} wins along {:?}", session.intervals());
            info!(%player, "demo finished");
        }
        None => println!("draw"),
    }
    Ok(())
}

fn run_analyze(file: Option<PathBuf>, ai: Cell, engine: &EngineArgs) -> Result<()> {
    let text = match &file {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("cannot read stdin")?;
            buf
        }
    };
    let board: Board = text.parse().context("cannot parse board")?;
    let options = AiOptions::new(ai, engine.win_length, engine.depth, !engine.no_alpha_beta)?;
    println!("{board}");

    if let Some((player, intervals)) = winner(&board, &options)? {
        println!("{player} has already won: {intervals:?}");
        return Ok(());
    }
    if board.num_free_cells() == 0 {
        bail!("board is full");
    }

    let budget = engine.budget();
    let mut rng = engine.rng();
    let ranked = ranked_moves(&board, &options, board.num_free_cells(), engine.trials, ai, &mut rng, &budget)?;
    println!("monte carlo ranking for {ai}:");
    for &(idx, score) in ranked.iter().take(5) {
        println!("  {:?} {score:.4}", board.from_linear(idx)?);
    }

    let candidates = filter_by_threshold(&ranked, engine.threshold);
    let candidates = (!candidates.is_empty()).then_some(candidates);
    let result = search(
        &board,
        &options,
        candidates.as_deref(),
        LinearMove::new(0, ai.opponent()),
        engine.depth,
        &budget,
    )?;
    match result.position {
        Some(idx) => println!(
            "best move {:?}, score {}, {} nodes",
            board.from_linear(idx)?,
            result.score,
            result.nodes
        ),
        None => println!("no move found, score {}", result.score),
    }
    Ok(())
}
