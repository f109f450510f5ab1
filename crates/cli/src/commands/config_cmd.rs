//! `msgbridge config`: configuration management commands.

use clap::Subcommand;
use msgbridge_config::{BridgeConfig, ConfigError};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file path
    Path,
    /// Load and validate the config file
    Validate,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(
    action: ConfigAction,
    loaded: Result<BridgeConfig, ConfigError>,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => show(loaded),
        ConfigAction::Path => {
            println!("{}", BridgeConfig::config_path().display());
            Ok(())
        }
        ConfigAction::Validate => validate(loaded),
        ConfigAction::Init { force } => {
            let path = BridgeConfig::config_path();
            init(&path, force)?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
    }
}

fn show(loaded: Result<BridgeConfig, ConfigError>) -> Result<(), Box<dyn std::error::Error>> {
    let config = loaded.map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

fn validate(loaded: Result<BridgeConfig, ConfigError>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match loaded {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");
            if !BridgeConfig::config_path().exists() {
                println!("   ⚠️  No config file, defaults in effect (run `msgbridge config init`)");
            }
            println!();
            println!("   Log level:     {}", config.logging.level);
            println!("   Log format:    {:?}", config.logging.format);
            println!("   Pretty output: {}", config.output.pretty);
            println!("   Show results:  {}", config.status.show_results);
            Ok(())
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            Err(e.into())
        }
    }
}

/// Write the default configuration to `path`, creating parent directories.
fn init(path: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )
        .into());
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, BridgeConfig::default_toml())?;
    tracing::info!(path = %path.display(), "Wrote default configuration");
    Ok(())
}
