//! Error types for the persistence engine.

use thiserror::Error;

/// Main error type for schema-mapping and query operations.
#[derive(Error, Debug)]
pub enum AcctError {
    /// Entity type was never registered with the table registry.
    #[error("Unknown entity type: {0}")]
    UnknownEntity(String),

    /// A column declared a semantic type the type mapper does not know.
    #[error("Unsupported column type '{token}' on field {field}")]
    UnsupportedType { field: String, token: String },

    /// No template block exists for the (file, name) pair.
    #[error("Query template not found: {file}/{name}")]
    TemplateNotFound { file: String, name: String },

    /// Placeholder substitution targeted a marker that is absent from the
    /// query text (never declared, or already substituted once).
    #[error("Placeholder '{{{0}}}' not present in query text")]
    Placeholder(String),

    /// Descriptor or configuration invariant violation (bad identifier,
    /// duplicate primary column, empty schema name, etc.)
    #[error("Schema error: {0}")]
    Schema(String),

    /// Database driver error during read or write execution.
    #[error("Database error: {0}")]
    Execution(#[from] tokio_postgres::Error),

    /// Connection pool error with context.
    #[error("Pool error: {message}\n  Context: {context}")]
    Pool { message: String, context: String },

    /// A result column carried a type outside the supported value set.
    #[error("Cannot decode column {column}: {message}")]
    Decode { column: String, message: String },

    /// IO error (template files, config files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AcctError {
    /// Create a Pool error with context about where it occurred.
    pub fn pool(message: impl ToString, context: impl Into<String>) -> Self {
        AcctError::Pool {
            message: message.to_string(),
            context: context.into(),
        }
    }

    /// Create an UnsupportedType error naming the offending field.
    pub fn unsupported_type(field: impl Into<String>, token: impl Into<String>) -> Self {
        AcctError::UnsupportedType {
            field: field.into(),
            token: token.into(),
        }
    }

    /// Process exit code for CLI consumers.
    pub fn exit_code(&self) -> u8 {
        match self {
            AcctError::UnknownEntity(_)
            | AcctError::UnsupportedType { .. }
            | AcctError::Schema(_)
            | AcctError::Io(_)
            | AcctError::Yaml(_) => 2,
            AcctError::TemplateNotFound { .. } | AcctError::Placeholder(_) => 3,
            AcctError::Pool { .. } => 4,
            AcctError::Execution(_) | AcctError::Decode { .. } => 5,
        }
    }

    /// Format error with full details including the source chain.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, AcctError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_names_field() {
        let err = AcctError::unsupported_type("expense_date", "instant");
        assert_eq!(
            err.to_string(),
            "Unsupported column type 'instant' on field expense_date"
        );
    }

    #[test]
    fn test_template_not_found_carries_both_keys() {
        let err = AcctError::TemplateNotFound {
            file: "account".to_string(),
            name: "findByCode".to_string(),
        };
        assert!(err.to_string().contains("account/findByCode"));
    }
}
