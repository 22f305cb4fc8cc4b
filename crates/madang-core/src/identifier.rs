//! Identifier quoting and parameter naming

/// Quote a table or column name in brackets, doubling any closing bracket
pub fn quote_identifier(identifier: &str) -> String {
    format!("[{}]", identifier.replace(']', "]]"))
}

/// Derive a `@name` bind parameter from a column name.
///
/// Characters outside `[A-Za-z0-9_]` become `_`.
pub fn param_name(column: &str) -> String {
    let sanitized: String = column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("@{}", sanitized)
}
