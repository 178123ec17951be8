//! JSON report formatting.

use super::FileReport;

/// Format all file reports as a JSON array.
///
/// If `compact` is true, outputs minified JSON without whitespace.
pub fn format_json(reports: &[FileReport], compact: bool) -> String {
    if compact {
        serde_json::to_string(reports).expect("serialization cannot fail")
    } else {
        serde_json::to_string_pretty(reports).expect("serialization cannot fail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsqlbracket_core::{bracketize_script, BracketizeOptions};

    fn reports() -> Vec<FileReport> {
        let outcome = bracketize_script(
            "SELECT id FROM users\nGO\nSELECT * FROM\n",
            &BracketizeOptions::default(),
        );
        vec![FileReport::new("q.sql".to_string(), &outcome, false)]
    }

    #[test]
    fn test_json_pretty() {
        let json = format_json(&reports(), false);
        assert!(json.contains('\n'));
        assert!(json.contains("\"action\": \"bracketed\""));
    }

    #[test]
    fn test_json_compact() {
        let json = format_json(&reports(), true);
        assert!(!json.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let batches = value[0]["batches"].as_array().unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0]["status"], "rewritten");
        assert_eq!(batches[0]["counts"]["columns"], 1);
        assert_eq!(batches[1]["status"], "parse_failed");
        assert!(batches[1]["error"]["message"].is_string());
        assert_eq!(value[0]["counts"]["relations"], 1);
    }
}
