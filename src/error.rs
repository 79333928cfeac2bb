use thiserror::Error;

/// Main error type for symdex operations
#[derive(Error, Debug)]
pub enum SymdexError {
    /// A record parsed syntactically but is missing a required field.
    /// `record` is the zero-based position of the record in its table.
    #[error("Malformed index record {record}: {reason}")]
    MalformedIndex { record: usize, reason: String },

    #[error("Syntax error at offset {offset}: {reason}")]
    Syntax { offset: usize, reason: String },

    #[error("Unknown table format: {0}")]
    UnknownFormat(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for symdex operations
pub type Result<T> = std::result::Result<T, SymdexError>;

impl SymdexError {
    pub(crate) fn malformed(record: usize, reason: impl Into<String>) -> Self {
        SymdexError::MalformedIndex {
            record,
            reason: reason.into(),
        }
    }

    pub(crate) fn syntax(offset: usize, reason: impl Into<String>) -> Self {
        SymdexError::Syntax {
            offset,
            reason: reason.into(),
        }
    }

    /// Check if this error was caused by the table contents rather than the environment
    pub fn is_table_error(&self) -> bool {
        matches!(
            self,
            SymdexError::MalformedIndex { .. }
                | SymdexError::Syntax { .. }
                | SymdexError::Json(_)
                | SymdexError::UnknownFormat(_)
        )
    }
}
