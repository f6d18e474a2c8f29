use std::{
    env,
    fs::{self, File},
    io::{self, BufRead},
    path::PathBuf,
    str::FromStr,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use draughts::{DrawRules, MOVE_GEN, Position, Variant, perft_divide, perft_full};
use mimalloc::MiMalloc;
use tracing::{Level, debug, level_filters::LevelFilter, warn};
use tracing_subscriber::{Registry, layer::SubscriberExt, prelude::*, util::SubscriberInitExt};

use draughts_cli::{
    DEFAULT_LOGS_DIRECTORY, LOG_FILE_NAME, LOG_PATH_ENV, Response, Session, repl,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Rules to play by, see the `variants` command.
    #[arg(long, default_value = "international")]
    variant: String,

    /// Start from this position instead of the initial one.
    #[arg(long)]
    fen: Option<String>,

    #[arg(long, default_value_t = 3)]
    repetition_threshold: usize,

    #[arg(long, default_value_t = 50)]
    fifty_move_limit: u16,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Count the positions reachable in `depth` plies.
    Perft {
        depth: usize,
        /// Break the count down per ply instead of per root move.
        #[arg(long)]
        full: bool,
    },
    /// List the legal moves.
    Moves,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    enable_logging()?;

    let position = starting_position(&cli)?;

    match cli.command {
        Some(Commands::Perft { depth, full }) => cli_perft(&position, depth, full),
        Some(Commands::Moves) => cli_moves(&position),
        None => repl_main_loop(position),
    }
}

fn starting_position(cli: &Cli) -> Result<Position> {
    let variant = Variant::lookup(&cli.variant)?;
    let draw_rules = DrawRules {
        repetition_threshold: cli.repetition_threshold,
        fifty_move_limit: cli.fifty_move_limit,
        ..DrawRules::default()
    };

    let position = match &cli.fen {
        Some(fen) => Position::from_fen(variant, fen)
            .with_context(|| format!("Couldn't parse given fen: `{}`", fen))?,
        None => Position::start(variant),
    };
    Ok(position.with_draw_rules(draw_rules))
}

fn cli_perft(position: &Position, depth: usize, full: bool) -> Result<()> {
    if full {
        println!("{}", perft_full(position, &MOVE_GEN, depth)?);
        return Ok(());
    }

    let (move_counts, tot_moves) = perft_divide(position, &MOVE_GEN, depth)?;
    let mut move_counts: Vec<_> = move_counts.into_iter().collect();
    move_counts.sort();
    for (mve, move_nodes) in move_counts {
        println!("{}:  {}", mve, move_nodes);
    }
    println!("Total: {:?}", tot_moves);
    Ok(())
}

fn cli_moves(position: &Position) -> Result<()> {
    for mve in position.legal_moves() {
        println!("{}", position.move_notation(&mve)?);
    }
    Ok(())
}

fn repl_main_loop(position: Position) -> Result<()> {
    let mut session = Session::new(MOVE_GEN, position);

    for line in io::stdin().lock().lines() {
        let line = line.context("Couldn't read from stdin")?;
        debug!("{}", line);
        if line.trim().is_empty() {
            continue;
        }

        match session.handle_command(&line) {
            Ok(Response::Quit) => break,
            Ok(response) => repl!("{}", response),
            Err(err) => warn!(target: "repl", "{:#}", err),
        }
    }
    Ok(())
}

fn enable_logging() -> Result<()> {
    let log_path = if let Ok(log_path_str) = env::var(LOG_PATH_ENV) {
        PathBuf::from_str(&log_path_str)?
    } else {
        let log_path = get_default_log_path()?;
        let log_path_dir = log_path
            .parent()
            .context("Default log path has no parent directory")?;
        if !log_path_dir.exists() {
            fs::create_dir_all(log_path_dir)?;
        }
        log_path
    };

    let log_file =
        File::create(log_path.clone()).context(format!("Couldn't create file {:?}", log_path))?;

    let repl_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() == "repl"
        }));

    let stderr_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => tracing_subscriber::EnvFilter::new("info")
            .add_directive("repl=off".parse::<tracing_subscriber::filter::Directive>()?),
    };
    let stderr_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_writer(io::stderr)
        .with_filter(stderr_filter);

    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_filter(LevelFilter::from_level(Level::DEBUG));

    Registry::default()
        .with(repl_layer)
        .with(stderr_layer)
        .with(log_layer)
        .init();

    Ok(())
}

fn get_default_log_path() -> Result<PathBuf> {
    let mut log_path = dirs::home_dir().context("Home directory not set")?;
    log_path.push(PathBuf::from(DEFAULT_LOGS_DIRECTORY));
    log_path.push(LOG_FILE_NAME);
    Ok(log_path)
}
