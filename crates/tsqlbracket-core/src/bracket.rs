//! Canonical bracket quoting for single identifiers.

use sqlparser::ast::Ident;

/// Return the innermost unbracketed content of `name`.
///
/// Balanced outer pairs are peeled first (`[[Foo]]`), then any leftover one-sided
/// brackets at either end (`Foo]`, `[Foo`). Whitespace just inside the brackets is
/// dropped. Bracket characters in the middle of the name are kept.
pub fn strip_brackets(name: &str) -> &str {
    let mut inner = name.trim();

    while inner.len() >= 2 && inner.starts_with('[') && inner.ends_with(']') {
        inner = inner[1..inner.len() - 1].trim();
    }

    loop {
        let next = inner.trim_start_matches('[').trim_end_matches(']').trim();
        if next == inner {
            return inner;
        }
        inner = next;
    }
}

/// Wrap `name` in exactly one pair of brackets.
///
/// Idempotent: `bracket_name(&bracket_name(x)) == bracket_name(x)`.
pub fn bracket_name(name: &str) -> String {
    format!("[{}]", strip_brackets(name))
}

/// Rewrite an identifier node so it renders as `[value]`.
///
/// The renderer prints a `[`-quoted value verbatim, so a `]` inside the name is stored doubled
/// (`Order]Id` renders as `[Order]]Id]`). The parser undoes the doubling on the next read.
pub fn bracket_ident(ident: &mut Ident) {
    ident.value = escape_closing_brackets(strip_brackets(&ident.value));
    ident.quote_style = Some('[');
}

fn escape_closing_brackets(name: &str) -> String {
    name.replace(']', "]]")
}

/// True for T-SQL variables and parameters (`@id`, `@@ROWCOUNT`).
///
/// Bracketing one of these would turn it into a column reference.
pub fn is_variable(ident: &Ident) -> bool {
    ident.quote_style.is_none() && ident.value.starts_with('@')
}
