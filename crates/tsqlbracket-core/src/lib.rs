//! Bracket-quote schema, table, and column identifiers in T-SQL scripts.
//!
//! ```
//! use tsqlbracket_core::bracketize_sql;
//!
//! let sql = bracketize_sql("SELECT c AS y FROM dbo.t").unwrap();
//! assert_eq!(sql, "SELECT [c] AS y FROM [dbo].[t]");
//! ```

pub mod batch;
pub mod bracket;
pub mod document;
pub mod error;
pub mod parser;
pub mod rewriter;

pub use batch::{join_batches, split_batches, BATCH_SEPARATOR};
pub use bracket::{bracket_name, strip_brackets};
pub use document::{
    bracketize_script, bracketize_sql, BatchReport, BatchStatus, BracketizeOptions,
    ScriptOutcome,
};
pub use error::{ParseError, ParseErrorKind, Position};
pub use parser::{parse_batch, render_batch};
pub use rewriter::{rewrite_statements, IdentRole, RewriteCounts};
