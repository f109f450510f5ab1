//! msgbridge CLI: the main entry point.
//!
//! Commands:
//! - `to-internal` converts external (AGUI) JSON to internal (GQL) JSON
//! - `to-external` converts internal JSON back to external JSON
//! - `roundtrip`   checks that a conversation survives both directions
//! - `status`      reports the lifecycle status of every tool call
//! - `config`      shows, locates, validates, or initializes configuration

use clap::{Parser, Subcommand};
use msgbridge_config::{BridgeConfig, LogFormat, LoggingConfig};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "msgbridge",
    about = "msgbridge: AGUI <-> GQL message conversion",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print compact JSON instead of pretty-printed
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert external messages to the internal representation
    ToInternal {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Convert internal messages to the external representation
    ToExternal {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Convert external messages to internal and back, reporting what survived
    Roundtrip {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Show the lifecycle status of each action execution
    Status {
        /// Input file with internal messages (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: commands::config_cmd::ConfigAction,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = BridgeConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();
    init_tracing(cli.verbose, &config.logging);
    if let Err(e) = &loaded {
        tracing::warn!(error = %e, "Ignoring invalid configuration, using defaults");
    }

    let pretty = !cli.compact && config.output.pretty;

    match cli.command {
        Commands::ToInternal { file } => commands::convert::to_internal(file.as_deref(), pretty)?,
        Commands::ToExternal { file } => commands::convert::to_external(file.as_deref(), pretty)?,
        Commands::Roundtrip { file } => commands::convert::roundtrip(file.as_deref(), pretty)?,
        Commands::Status { file } => commands::status::run(file.as_deref(), &config, pretty)?,
        Commands::Config { action } => commands::config_cmd::run(action, loaded)?,
    }

    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins, then `--verbose`, then
/// the configured level. Logs go to stderr so stdout stays parseable.
fn init_tracing(verbose: bool, logging: &LoggingConfig) {
    let filter = if verbose { "debug" } else { logging.level.as_str() };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
