//! Cadence CLI
//!
//! Drives the internal asset router and the deep-link dispatcher from the
//! command line, with the same configuration the desktop client uses.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config_bridge;
mod theme;

use commands::open::SurfaceMode;
use commands::resolve::ResolveArgs;
use commands::{config, open, register, resolve};

/// Cadence - local resource router and deep-link dispatcher
#[derive(Parser)]
#[command(name = "cadence")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Load this config file instead of the layered search
    #[arg(short, long, global = true, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an internal-scheme URI and show the response
    Resolve {
        /// URI such as app://main/index.html
        uri: String,

        /// Request method
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Override the install directory
        #[arg(long)]
        install_dir: Option<PathBuf>,

        /// Refuse files whose real path leaves the root through a link
        #[arg(long)]
        strict_symlinks: bool,

        /// Print the response body
        #[arg(long)]
        body: bool,
    },

    /// Dispatch a deep link to a surface that prints commands to stdout
    Open {
        /// URI such as cadence://play/abc123
        uri: String,

        /// Simulate a surface that does not exist yet
        #[arg(long, conflicts_with = "ready_after_ms")]
        uninitialized: bool,

        /// Simulate a surface that becomes ready after this many milliseconds
        #[arg(long)]
        ready_after_ms: Option<u64>,
    },

    /// Register as the OS handler for the deep-link scheme
    Register {
        /// Desktop entry to register
        #[arg(long, default_value = "cadence.desktop")]
        desktop_file: String,

        /// Register even if disabled in config
        #[arg(long)]
        force: bool,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the resolved configuration
    Show {
        /// Output format: toml or json
        #[arg(short, long, default_value = "toml")]
        format: String,
    },
    /// Show configuration file locations
    Paths,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let resolved = config_bridge::load_config(cli.config.as_deref())?;
    let cfg = &resolved.config;

    let mut log_config = config_bridge::to_log_config(cfg);
    if cli.verbose {
        "debug".clone_into(&mut log_config.level);
    }
    if let Err(e) = cadence_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match cli.command {
        Commands::Resolve {
            uri,
            method,
            install_dir,
            strict_symlinks,
            body,
        } => {
            resolve::run_resolve(
                cfg,
                ResolveArgs {
                    uri: &uri,
                    method: &method,
                    install_dir: install_dir.as_deref(),
                    strict_symlinks,
                    show_body: body,
                },
            )
            .await?;
        },
        Commands::Open {
            uri,
            uninitialized,
            ready_after_ms,
        } => {
            let mode = match (uninitialized, ready_after_ms) {
                (true, _) => SurfaceMode::Uninitialized,
                (false, Some(ms)) => SurfaceMode::ReadyAfter(Duration::from_millis(ms)),
                (false, None) => SurfaceMode::Ready,
            };
            open::run_open(cfg, &uri, mode).await?;
        },
        Commands::Register {
            desktop_file,
            force,
        } => {
            register::run_register(cfg, &desktop_file, force)?;
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show { format } => config::show_config(&resolved, &format)?,
            ConfigCommands::Paths => config::show_paths(&resolved),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_open_flags_conflict() {
        let parsed = Cli::try_parse_from([
            "cadence",
            "open",
            "cadence://play/x",
            "--uninitialized",
            "--ready-after-ms",
            "5",
        ]);
        assert!(parsed.is_err());
    }
}
