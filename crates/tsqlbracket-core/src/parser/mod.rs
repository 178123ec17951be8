//! Parse and render collaborator.
//!
//! Grammar knowledge lives entirely in `sqlparser`; this module pins the T-SQL dialect on both
//! sides so the rewriter only ever sees an owned statement tree.

use crate::error::ParseError;
use sqlparser::ast::Statement;
use sqlparser::dialect::MsSqlDialect;
use sqlparser::parser::Parser;

/// Parse one batch of T-SQL into its statements.
///
/// The returned vector owns every node of the batch; nothing is shared with other batches.
pub fn parse_batch(sql: &str) -> Result<Vec<Statement>, ParseError> {
    let dialect = MsSqlDialect {};
    Parser::parse_sql(&dialect, sql).map_err(ParseError::from)
}

/// Render statements back to T-SQL text.
///
/// Statements are joined with `;\n`. A trailing `;` is kept when the original batch had one,
/// and the original batch's surrounding whitespace is re-attached so that stable input
/// renders byte-for-byte identical.
pub fn render_batch(statements: &[Statement], original: &str) -> String {
    let trimmed = original.trim();
    let (leading, trailing) = surrounding_whitespace(original);

    let mut rendered = statements
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";\n");

    if trimmed.ends_with(';') && !statements.is_empty() {
        rendered.push(';');
    }

    format!("{leading}{rendered}{trailing}")
}

/// Split off the whitespace before and after the trimmed content of `text`.
fn surrounding_whitespace(text: &str) -> (&str, &str) {
    let start = text.len() - text.trim_start().len();
    let end = text.trim_end().len();
    if start >= end {
        return (text, "");
    }
    (&text[..start], &text[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_select() {
        let statements = parse_batch("SELECT * FROM users").unwrap();
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_parse_invalid_sql() {
        assert!(parse_batch("SELECT * FROM").is_err());
    }

    #[test]
    fn test_parse_multiple_statements() {
        let statements = parse_batch("SELECT * FROM users; SELECT * FROM orders;").unwrap();
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_parse_bracketed_identifiers() {
        let statements = parse_batch("SELECT [id] FROM [dbo].[Users]").unwrap();
        assert_eq!(
            statements[0].to_string(),
            "SELECT [id] FROM [dbo].[Users]"
        );
    }

    #[test]
    fn test_render_keeps_trailing_semicolon() {
        let original = "SELECT 1; SELECT 2;";
        let statements = parse_batch(original).unwrap();
        assert_eq!(render_batch(&statements, original), "SELECT 1;\nSELECT 2;");
    }

    #[test]
    fn test_render_reattaches_surrounding_whitespace() {
        let original = "\n  SELECT 1\n\n";
        let statements = parse_batch(original).unwrap();
        assert_eq!(render_batch(&statements, original), "\n  SELECT 1\n\n");
    }

    #[test]
    fn test_surrounding_whitespace_of_blank_text() {
        assert_eq!(surrounding_whitespace("  \n"), ("  \n", ""));
        assert_eq!(surrounding_whitespace(""), ("", ""));
    }
}
