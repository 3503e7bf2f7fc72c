//! Identifier validation for SQL injection prevention.
//!
//! Table, column, and schema names cannot be passed as prepared-statement
//! parameters - only data values can. Every identifier that ends up spliced
//! into DDL or query text therefore goes through [`validate_identifier`] at
//! descriptor/generator construction time, which is the single choke point
//! for rejecting hostile or malformed names.

use crate::error::{AcctError, Result};

/// Maximum identifier length (PostgreSQL truncates at 63 bytes; H2 allowed
/// more, but nothing in the accounting schema comes close).
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validate an identifier for use in generated SQL.
///
/// Accepts the conservative unquoted-identifier alphabet: a leading ASCII
/// letter or underscore followed by letters, digits, and underscores. This
/// is stricter than what quoting would allow, but the generated DDL splices
/// identifiers unquoted, so the alphabet must be injection-proof on its own.
///
/// # Errors
///
/// Returns [`AcctError::Schema`] with a descriptive message.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(AcctError::Schema("Identifier cannot be empty".to_string()));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(AcctError::Schema(format!(
            "Identifier exceeds maximum length of {} bytes (got {}): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    let mut chars = name.chars();
    let first = chars.next().unwrap();
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(AcctError::Schema(format!(
            "Identifier must start with a letter or underscore: {:?}",
            name
        )));
    }

    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        return Err(AcctError::Schema(format!(
            "Identifier contains invalid character {:?}: {:?}",
            bad, name
        )));
    }

    Ok(())
}

/// Qualify a table name with its schema: `schema.table`.
///
/// Both parts must already be validated; this is a pure join.
pub fn qualify(schema: &str, table: &str) -> String {
    format!("{}.{}", schema, table)
}

/// Escape a string literal for direct splicing into SQL text by doubling
/// single quotes. Used by the query builder for IN-list and search-text
/// fragments, which render values inline rather than binding them.
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}
