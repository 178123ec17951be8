//! Human-readable report lines.

use super::{FileAction, FileReport};
use owo_colors::OwoColorize;
use std::fmt::Write;
use tsqlbracket_core::BatchStatus;

/// Format one file's report. Batch numbers are 1-based.
pub fn format_text(report: &FileReport, colored: bool) -> String {
    let mut out = String::new();

    for batch in &report.batches {
        let number = batch.index + 1;
        match &batch.status {
            BatchStatus::ParseFailed { error } => {
                let label = "Failed to parse";
                if colored {
                    write!(out, "{}", label.red()).unwrap();
                } else {
                    out.push_str(label);
                }
                writeln!(out, " batch {number} in {}: {error}", report.path).unwrap();
            }
            BatchStatus::SkippedComments => {
                let label = "Skipped";
                if colored {
                    write!(out, "{}", label.yellow()).unwrap();
                } else {
                    out.push_str(label);
                }
                writeln!(
                    out,
                    " batch {number} in {}: contains comments",
                    report.path
                )
                .unwrap();
            }
            BatchStatus::Rewritten | BatchStatus::Blank => {}
        }
    }

    let summary = match report.action {
        FileAction::Bracketed => "Bracketed identifiers in",
        FileAction::WouldBracket => "Would bracket identifiers in",
        FileAction::Unchanged => "No changes needed for",
    };

    if colored {
        let summary = match report.action {
            FileAction::Unchanged => summary.dimmed().to_string(),
            _ => summary.green().to_string(),
        };
        writeln!(out, "{summary} {}", report.path.bold()).unwrap();
    } else {
        writeln!(out, "{summary} {}", report.path).unwrap();
    }

    out
}
