//! CLI argument parsing using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tsqlbracket_core::BracketizeOptions;

/// tsqlbracket - bracket-quote identifiers in T-SQL scripts
#[derive(Parser, Debug)]
#[command(name = "tsqlbracket")]
#[command(
    about = "Rewrite T-SQL scripts so schema, table, and column names are [bracketed]",
    long_about = None
)]
#[command(version)]
pub struct Args {
    /// SQL files to rewrite in place (arguments not ending in .sql are skipped)
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Report which files would change without writing them (exit 1 if any would)
    #[arg(long)]
    pub check: bool,

    /// Rewrite batches that contain comments (the comments are removed)
    #[arg(long)]
    pub strip_comments: bool,

    /// Report format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// Compact JSON output (no pretty-printing)
    #[arg(short, long)]
    pub compact: bool,

    /// Suppress warnings on stderr
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn bracketize_options(&self) -> BracketizeOptions {
        BracketizeOptions {
            strip_comments: self.strip_comments,
        }
    }
}

/// Report format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per file and per skipped batch
    Text,
    /// JSON report of every file and batch
    Json,
}
