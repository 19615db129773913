mod board;
mod play;

use std::{io, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use facts_core::gameplay::classic::ClassicOptions;
use facts_core::gameplay::sprint::SprintOptions;
use facts_core::{ClassicGame, GameKind, SprintGame};
use facts_leaderboard::{FileStorage, Leaderboard};
use facts_schema::{ClassicScore, SprintScore};
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "facts")]
#[command(about = "Arithmetic fact games for the terminal", long_about = None)]
struct Cli {
    /// Where leaderboards are kept
    #[arg(long, global = true, env = "MATH_FACTS_DATA_DIR", default_value = ".math-facts")]
    data_dir: PathBuf,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the available games
    List,
    /// Play a game; answers are read one per line, `q` exits
    Play {
        game: String,
        /// Run length in seconds (timed games)
        #[arg(long)]
        time: Option<u32>,
        /// Tables to practise, e.g. `3,4,7` (timed games)
        #[arg(long, value_delimiter = ',')]
        tables: Vec<u8>,
        /// Times table to race through (sprint)
        #[arg(long)]
        factor: Option<u8>,
    },
    /// Show or clear a game's leaderboard
    Leaderboard {
        game: String,
        #[arg(long)]
        clear: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let storage = FileStorage::new(cli.data_dir.clone());
    tracing::debug!(data_dir = %cli.data_dir.display(), "using data directory");

    let mut out = io::stdout().lock();
    match cli.command {
        Command::List => {
            for kind in GameKind::ALL {
                board::print_game(&mut out, kind)?;
            }
        }
        Command::Play {
            game,
            time,
            tables,
            factor,
        } => {
            let kind = parse_game(&game)?;
            if kind.is_sprint() {
                let mut game = SprintGame::new(storage, SprintOptions::default());
                if let Some(factor) = factor {
                    game.select_factor(factor).context("invalid --factor")?;
                }
                play::run(&mut game, &mut out)?;
                board::print_sprint(&mut out, &game.leaderboard().load_all())?;
            } else {
                let mut game = ClassicGame::new(
                    kind,
                    storage,
                    StdRng::from_os_rng(),
                    ClassicOptions::default(),
                )?;
                if let Some(secs) = time {
                    game.select_custom_duration(secs).context("invalid --time")?;
                }
                if !tables.is_empty() {
                    game.set_all_tables(false);
                    for n in tables {
                        game.toggle_table(n).context("invalid --tables")?;
                    }
                }
                play::run(&mut game, &mut out)?;
                board::print_classic(&mut out, &game.leaderboard().load_all())?;
            }
        }
        Command::Leaderboard { game, clear } => {
            let kind = parse_game(&game)?;
            if clear {
                let cleared = if kind.is_sprint() {
                    Leaderboard::<SprintScore, _>::open(kind.id(), &storage).clear()
                } else {
                    Leaderboard::<ClassicScore, _>::open(kind.id(), &storage).clear()
                };
                anyhow::ensure!(cleared, "could not clear leaderboard for {}", kind.title());
                board::print_cleared(&mut out, kind)?;
            } else if kind.is_sprint() {
                let scores = Leaderboard::<SprintScore, _>::open(kind.id(), &storage);
                board::print_sprint(&mut out, &scores.load_all())?;
            } else {
                let scores = Leaderboard::<ClassicScore, _>::open(kind.id(), &storage);
                board::print_classic(&mut out, &scores.load_all())?;
            }
        }
    }

    Ok(())
}

fn parse_game(id: &str) -> anyhow::Result<GameKind> {
    id.parse::<GameKind>()
        .with_context(|| format!("try one of: {}", game_ids()))
}

fn game_ids() -> String {
    GameKind::ALL
        .iter()
        .map(|k| k.id())
        .collect::<Vec<_>>()
        .join(", ")
}
