//! Report formatting.

pub mod json;
pub mod text;

pub use json::format_json;
pub use text::format_text;

use serde::Serialize;
use tsqlbracket_core::{BatchReport, RewriteCounts, ScriptOutcome};

/// What the run did (or would do) with one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAction {
    /// The file was rewritten on disk.
    Bracketed,
    /// `--check` mode: the file would be rewritten.
    WouldBracket,
    /// Output matched the input; the file was not touched.
    Unchanged,
}

/// Per-file result, shared by the text and JSON formats.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub action: FileAction,
    pub counts: RewriteCounts,
    pub batches: Vec<BatchReport>,
}

impl FileReport {
    pub fn new(path: String, outcome: &ScriptOutcome, check: bool) -> Self {
        let action = match (outcome.changed, check) {
            (false, _) => FileAction::Unchanged,
            (true, false) => FileAction::Bracketed,
            (true, true) => FileAction::WouldBracket,
        };

        Self {
            path,
            action,
            counts: outcome.counts(),
            batches: outcome.batches.clone(),
        }
    }
}
