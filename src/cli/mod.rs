//! CLI argument parsing for mdtriage
//!
//! Global flags: --root, --format, --quiet, --verbose, --log-level,
//! --log-json. Subcommands cover the full run plus read-only views of
//! each pipeline stage.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Human,
    /// Machine-readable JSON
    Json,
}

/// mdtriage - markdown documentation triage and consolidation
#[derive(Parser, Debug)]
#[command(name = "mdtriage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Documentation root to triage (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level filter (overrides MDTRIAGE_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full reorganization: classify, group, merge, archive
    Run {
        /// Compute everything, write nothing
        #[arg(long)]
        dry_run: bool,

        /// Skip archiving flagged files
        #[arg(long)]
        no_archive: bool,

        /// Directory name (under the root) for consolidated output
        #[arg(long)]
        output_dir: Option<String>,
    },

    /// Classify every file and print the results
    Classify,

    /// Show the consolidation groups that a run would merge
    Groups,

    /// Show per-file freshness indicators
    Freshness,

    /// Show outdated-content flags (stale, superseded, removable, archivable)
    Outdated,
}
