//! `httpdir` command-line interface.
//!
//! Inspects an in-memory tree the way a file server would see it.
//!
//! # Examples
//!
//! ```bash
//! # Mirror a host directory and list its root
//! httpdir --mount ./public ls /
//!
//! # Print a file from a manifest-built tree
//! httpdir --manifest site.toml cat /docs/index.html
//!
//! # Walk everything reachable through listings, as JSON
//! HTTPDIR_MANIFEST=site.toml httpdir --format json tree
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use httpdir_cli::commands;
use httpdir_cli::config::MANIFEST_ENV;
use httpdir_cli::{ExitCode, OutputFormat, TreeSource};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Browse in-memory directory trees built from manifests or host directories.
#[derive(Parser, Debug)]
#[command(name = "httpdir")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// TOML manifest describing the tree (ignored when --mount is given)
    #[arg(long, global = true, env = MANIFEST_ENV)]
    manifest: Option<PathBuf>,

    /// Host directory to mirror as the tree
    #[arg(long, global = true)]
    mount: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: OutputFormat,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List a directory, or show a file's own entry
    Ls {
        /// Path inside the tree
        #[arg(default_value = "/")]
        path: String,

        /// Read the listing this many entries at a time
        #[arg(long)]
        page: Option<NonZeroUsize>,
    },

    /// Write a file's content to stdout
    Cat {
        /// Path inside the tree
        path: String,
    },

    /// Show the stat record of an opened path
    Stat {
        /// Path inside the tree
        path: String,
    },

    /// Walk every directory reachable through listings
    Tree,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("failed to initialize logging: {e}");
    }

    let exit_code = match execute(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::for_error(&e)
        }
    };
    std::process::exit(exit_code.as_i32());
}

/// Installs a stderr subscriber so stdout carries only command output.
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

fn execute(cli: Cli) -> Result<ExitCode> {
    let source = TreeSource::from_flags(cli.manifest, cli.mount)?;
    tracing::debug!(?source, format = %cli.format, "loading tree");
    let tree = source.load()?;

    match cli.command {
        Commands::Ls { path, page } => commands::ls::run(&tree, &path, page, cli.format),
        Commands::Cat { path } => commands::cat::run(&tree, &path),
        Commands::Stat { path } => commands::stat::run(&tree, &path, cli.format),
        Commands::Tree => commands::tree::run(&tree, cli.format),
    }
}
