//! Batch segmentation on standalone `GO` separator lines.

use regex::Regex;
use std::sync::OnceLock;

/// Separator written between batches when a script is reassembled.
pub const BATCH_SEPARATOR: &str = "GO";

fn separator_regex() -> &'static Regex {
    static SEPARATOR_REGEX: OnceLock<Regex> = OnceLock::new();
    SEPARATOR_REGEX.get_or_init(|| Regex::new(r"(?i)^\s*GO\s*$").expect("Invalid regex pattern"))
}

/// True when `line` (with or without its terminator) holds only the batch separator.
pub fn is_separator_line(line: &str) -> bool {
    separator_regex().is_match(line.trim_end_matches(['\r', '\n']))
}

/// Split a script into batches, dropping the separator lines.
///
/// Each batch borrows a contiguous slice of `script`, line terminators included. A script
/// without separators yields a single batch equal to the whole input.
pub fn split_batches(script: &str) -> Vec<&str> {
    let mut batches = Vec::new();
    let mut start = 0;
    let mut offset = 0;

    for line in script.split_inclusive('\n') {
        if is_separator_line(line) {
            batches.push(&script[start..offset]);
            start = offset + line.len();
        }
        offset += line.len();
    }

    batches.push(&script[start..]);
    batches
}

/// Reassemble batches, putting a `GO` line between each adjacent pair.
pub fn join_batches<S: AsRef<str>>(batches: &[S]) -> String {
    let separator = format!("{BATCH_SEPARATOR}\n");
    let mut script = String::new();
    for (index, batch) in batches.iter().enumerate() {
        if index > 0 {
            script.push_str(&separator);
        }
        script.push_str(batch.as_ref());
    }
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_separator_yields_single_batch() {
        let script = "SELECT 1\nSELECT 2\n";
        assert_eq!(split_batches(script), vec![script]);
    }

    #[test]
    fn empty_script_yields_single_empty_batch() {
        assert_eq!(split_batches(""), vec![""]);
    }

    #[test]
    fn splits_on_separator_lines() {
        let script = "SELECT 1\nGO\nSELECT 2\n";
        assert_eq!(split_batches(script), vec!["SELECT 1\n", "SELECT 2\n"]);
    }

    #[test]
    fn separator_is_case_insensitive_and_ignores_padding() {
        let script = "SELECT 1\n  go  \r\nSELECT 2\n\tGo\nSELECT 3";
        assert_eq!(
            split_batches(script),
            vec!["SELECT 1\n", "SELECT 2\n", "SELECT 3"]
        );
    }

    #[test]
    fn separator_must_stand_alone() {
        let script = "SELECT go FROM t\nGOTO label\nGO 5\n";
        assert_eq!(split_batches(script), vec![script]);
    }

    #[test]
    fn leading_and_trailing_separators_produce_empty_batches() {
        assert_eq!(split_batches("GO\nSELECT 1\nGO\n"), vec!["", "SELECT 1\n", ""]);
    }

    #[test]
    fn join_inserts_separator_between_batches() {
        assert_eq!(
            join_batches(&["SELECT 1\n", "SELECT 2\n"]),
            "SELECT 1\nGO\nSELECT 2\n"
        );
        assert_eq!(join_batches(&["SELECT 1"]), "SELECT 1");
    }

    #[test]
    fn split_then_join_round_trips_canonical_scripts() {
        let script = "SELECT 1\nGO\nSELECT 2\nGO\nSELECT 3\n";
        assert_eq!(join_batches(&split_batches(script)), script);
    }

    #[test]
    fn separator_detection() {
        assert!(is_separator_line("GO"));
        assert!(is_separator_line("go\r\n"));
        assert!(!is_separator_line("GO;"));
        assert!(!is_separator_line("-- GO"));
    }
}
