//! # chipbot: a chat poker dealer
//!
//! Connects the [`chipbot_engine`] tables to a chat surface. Messages are
//! parsed into [`command::Command`]s, run against the channel's game, and
//! answered with [`dispatcher::Outgoing`] messages; dealt hands and the
//! showdown board are attached as PNG pictures of the cards.
//!
//! The [`run`] entry point drives the bot from line-based input, one event
//! per line (see [`console`]), which is how the binary and the integration
//! tests talk to it.
//!
//! ```no_run
//! use std::io;
//! let mut input = io::stdin().lock();
//! let code = chipbot::run(
//!     vec!["chipbot", "--in-memory", "--assets", "Cards"],
//!     &mut input,
//!     &mut io::stdout(),
//!     &mut io::stderr(),
//! );
//! assert_eq!(code, 0);
//! ```

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;

pub mod command;
pub mod config;
pub mod console;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod render;
pub mod store;

pub use dispatcher::{Dispatcher, Incoming, IncomingReaction, Outgoing, Target};
pub use error::BotError;

use config::Overrides;
use console::{Event, Transcript};
use render::DirAssets;
use store::SqliteStore;

#[derive(Debug, Parser)]
#[command(name = "chipbot", version, about = "Chat poker dealer reading events from stdin")]
struct Cli {
    /// TOML config file; defaults to $CHIPBOT_CONFIG
    #[arg(long)]
    config: Option<PathBuf>,
    /// Command prefix, e.g. `!`
    #[arg(long)]
    prefix: Option<String>,
    /// SQLite database holding player accounts
    #[arg(long)]
    database: Option<PathBuf>,
    /// Directory of card pictures named like `AS.png`
    #[arg(long)]
    assets: Option<PathBuf>,
    /// Where rendered hand pictures are written
    #[arg(long)]
    image_dir: Option<PathBuf>,
    /// Fixed deck seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,
    /// Keep player accounts in memory instead of the database file
    #[arg(long)]
    in_memory: bool,
    /// Print the resolved configuration and exit
    #[arg(long)]
    show_config: bool,
}

/// Runs the bot until `input` is exhausted.
///
/// Returns `0` on success and `2` when the arguments, the configuration or
/// the player store are unusable, or when output cannot be written.
pub fn run<I, S>(args: I, input: &mut dyn BufRead, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
    let cli = match Cli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return 2;
                    }
                    0
                }
                _ => {
                    let _ = write!(err, "{}", e);
                    2
                }
            };
        }
    };

    match serve(cli, input, out, err) {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "chipbot stopped");
            let _ = writeln!(err, "chipbot: {}", e);
            2
        }
    }
}

fn serve(
    cli: Cli,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), BotError> {
    let overrides = Overrides {
        prefix: cli.prefix,
        database: cli.database,
        assets: cli.assets,
        image_dir: cli.image_dir,
        seed: cli.seed,
    };
    let config::ConfigResolved { config, sources } =
        config::load_with_sources(cli.config.as_deref(), &overrides)?;

    if cli.show_config {
        let display = serde_json::json!({
            "prefix": { "value": config.prefix, "source": sources.prefix },
            "database": { "value": config.database.display().to_string(), "source": sources.database },
            "assets": { "value": config.assets.display().to_string(), "source": sources.assets },
            "image_dir": { "value": config.image_dir.display().to_string(), "source": sources.image_dir },
            "seed": { "value": config.seed, "source": sources.seed },
            "table": { "value": config.table, "source": sources.table },
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&display)?)?;
        return Ok(());
    }

    let store = if cli.in_memory {
        SqliteStore::in_memory()?
    } else {
        SqliteStore::open(&config.database)?
    };
    let mut dispatcher = Dispatcher::new(
        config.table_config(),
        store,
        DirAssets::new(config.assets.clone()),
    );
    let mut transcript = Transcript::new(config.image_dir.clone());
    tracing::info!(
        prefix = %config.prefix,
        assets = %config.assets.display(),
        in_memory = cli.in_memory,
        "chipbot ready"
    );

    for (number, line) in input.lines().enumerate() {
        let line = line?;
        let event = match console::parse_event(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(line = number + 1, error = %e, "skipping input line");
                writeln!(err, "line {}: {}", number + 1, e)?;
                continue;
            }
        };
        let replies = match event {
            Event::Message(msg) => dispatcher.handle(&msg),
            Event::Reaction(reaction) => dispatcher.handle_reaction(&reaction),
        };
        for reply in &replies {
            transcript.write(out, reply)?;
        }
    }
    Ok(())
}
