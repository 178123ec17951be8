//! Whole-script bracketing: split into batches, rewrite each one, reassemble.

use crate::batch::{join_batches, split_batches};
use crate::error::ParseError;
use crate::parser::{parse_batch, render_batch};
use crate::rewriter::{rewrite_statements, RewriteCounts};
use serde::Serialize;
#[cfg(feature = "tracing")]
use tracing::debug;

/// Knobs for [`bracketize_script`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BracketizeOptions {
    /// Rewrite batches that contain comments even though rendering drops them.
    pub strip_comments: bool,
}

/// What happened to a single batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchStatus {
    /// Parsed, rewritten and rendered.
    Rewritten,
    /// Only whitespace; passed through untouched.
    Blank,
    /// Contains comments; left untouched so they are not lost.
    SkippedComments,
    /// Not valid T-SQL; left untouched.
    ParseFailed { error: ParseError },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Zero-based position of the batch in the script.
    pub index: usize,
    #[serde(flatten)]
    pub status: BatchStatus,
    pub counts: RewriteCounts,
}

#[derive(Debug, Clone)]
pub struct ScriptOutcome {
    /// The reassembled script.
    pub sql: String,
    /// Whether `sql` differs from the input.
    pub changed: bool,
    pub batches: Vec<BatchReport>,
}

impl ScriptOutcome {
    pub fn parse_failures(&self) -> impl Iterator<Item = (&BatchReport, &ParseError)> {
        self.batches.iter().filter_map(|batch| match &batch.status {
            BatchStatus::ParseFailed { error } => Some((batch, error)),
            _ => None,
        })
    }

    pub fn skipped_for_comments(&self) -> impl Iterator<Item = &BatchReport> {
        self.batches
            .iter()
            .filter(|batch| batch.status == BatchStatus::SkippedComments)
    }

    /// Totals across all batches.
    pub fn counts(&self) -> RewriteCounts {
        let mut total = RewriteCounts::default();
        for batch in &self.batches {
            total.merge(batch.counts);
        }
        total
    }
}

/// Bracket identifiers in one batch of T-SQL (no `GO` handling).
pub fn bracketize_sql(sql: &str) -> Result<String, ParseError> {
    let mut statements = parse_batch(sql)?;
    rewrite_statements(&mut statements);
    Ok(render_batch(&statements, sql))
}

/// Bracket identifiers across a whole script.
///
/// A batch that fails to parse keeps its original text and does not stop the other batches.
pub fn bracketize_script(script: &str, options: &BracketizeOptions) -> ScriptOutcome {
    let mut rendered = Vec::new();
    let mut batches = Vec::new();

    for (index, batch) in split_batches(script).into_iter().enumerate() {
        let (text, status, counts) = process_batch(batch, options);

        #[cfg(feature = "tracing")]
        debug!(
            batch = index,
            status = ?status,
            bracketed = counts.total(),
            preserved = counts.preserved,
            "processed batch"
        );

        rendered.push(text);
        batches.push(BatchReport {
            index,
            status,
            counts,
        });
    }

    let sql = join_batches(&rendered);
    let changed = sql != script;

    ScriptOutcome {
        sql,
        changed,
        batches,
    }
}

fn process_batch(batch: &str, options: &BracketizeOptions) -> (String, BatchStatus, RewriteCounts) {
    let untouched = |status| (batch.to_string(), status, RewriteCounts::default());

    if batch.trim().is_empty() {
        return untouched(BatchStatus::Blank);
    }

    if !options.strip_comments && contains_comment_markers(batch) {
        return untouched(BatchStatus::SkippedComments);
    }

    match parse_batch(batch) {
        Ok(mut statements) => {
            let counts = rewrite_statements(&mut statements);
            (
                render_batch(&statements, batch),
                BatchStatus::Rewritten,
                counts,
            )
        }
        Err(error) => untouched(BatchStatus::ParseFailed { error }),
    }
}

fn contains_comment_markers(sql: &str) -> bool {
    sql.contains("--") || sql.contains("/*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_every_batch() {
        let outcome = bracketize_script(
            "SELECT id FROM users\nGO\nSELECT name FROM orders\n",
            &BracketizeOptions::default(),
        );
        assert_eq!(
            outcome.sql,
            "SELECT [id] FROM [users]\nGO\nSELECT [name] FROM [orders]\n"
        );
        assert!(outcome.changed);
        assert_eq!(outcome.batches.len(), 2);
        assert_eq!(outcome.counts().total(), 4);
    }

    #[test]
    fn parse_failure_keeps_batch_text_and_continues() {
        let script = "SELECT * FROM\nGO\nSELECT id FROM users\n";
        let outcome = bracketize_script(script, &BracketizeOptions::default());
        assert_eq!(outcome.sql, "SELECT * FROM\nGO\nSELECT [id] FROM [users]\n");
        let failures: Vec<_> = outcome.parse_failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0.index, 0);
        assert_eq!(outcome.batches[1].status, BatchStatus::Rewritten);
    }

    #[test]
    fn already_bracketed_script_is_unchanged() {
        let script = "SELECT [id] FROM [dbo].[Users]\nGO\nSELECT [name] FROM [orders];\n";
        let outcome = bracketize_script(script, &BracketizeOptions::default());
        assert!(!outcome.changed, "{}", outcome.sql);
        assert_eq!(outcome.sql, script);
    }

    #[test]
    fn comments_are_guarded_by_default() {
        let script = "-- nightly report\nSELECT id FROM users\n";
        let outcome = bracketize_script(script, &BracketizeOptions::default());
        assert!(!outcome.changed);
        assert_eq!(outcome.skipped_for_comments().count(), 1);
    }

    #[test]
    fn comments_can_be_stripped() {
        let script = "/* nightly */ SELECT id FROM users";
        let options = BracketizeOptions {
            strip_comments: true,
        };
        let outcome = bracketize_script(script, &options);
        assert_eq!(outcome.sql, "SELECT [id] FROM [users]");
    }

    #[test]
    fn blank_batches_pass_through() {
        let script = "\nGO\nSELECT 1\n";
        let outcome = bracketize_script(script, &BracketizeOptions::default());
        assert_eq!(outcome.batches[0].status, BatchStatus::Blank);
        assert_eq!(outcome.sql, script);
    }

    #[test]
    fn escaped_closing_bracket_survives_rewrite() {
        let script = "SELECT [Order]]Id] FROM t\n";
        let first = bracketize_script(script, &BracketizeOptions::default());
        assert_eq!(first.sql, "SELECT [Order]]Id] FROM [t]\n");

        let second = bracketize_script(&first.sql, &BracketizeOptions::default());
        assert_eq!(second.parse_failures().count(), 0);
        assert!(!second.changed, "{}", second.sql);
    }

    #[test]
    fn bracketize_sql_reports_parse_errors() {
        assert!(bracketize_sql("SELECT * FROM").is_err());
        assert_eq!(
            bracketize_sql("SELECT a.id FROM dbo.Users AS a").unwrap(),
            "SELECT a.[id] FROM [dbo].[Users] AS a"
        );
    }
}
