//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// pkgsense - Detect which catalog software is installed on this machine.
#[derive(Debug, Parser)]
#[command(name = "pkgsense")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check which catalog items are installed
    Check(CheckArgs),

    /// List supported package managers
    Managers,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Catalog file (defaults to ./pkgsense.yml)
    #[arg(value_name = "CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Package manager to verify against (overrides the catalog and detection)
    #[arg(short, long, value_name = "ID", env = "PKGSENSE_MANAGER")]
    pub manager: Option<String>,

    /// Seconds allowed for each package manager listing
    #[arg(short, long, value_name = "SECS", env = "PKGSENSE_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also search version manager directories (nvm, volta, cargo, ...)
    #[arg(long)]
    pub probe_version_managers: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
