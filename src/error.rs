//! Error types for dwq.

use thiserror::Error;

/// The main error type for dwq operations.
#[derive(Debug, Error)]
pub enum DwqError {
    /// Case expression builder finished with zero when-fragments.
    #[error("Invalid case expression: {0}")]
    InvalidCase(String),

    /// Operation not available for the selected dialect.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Clause argument is neither a string nor a flat sequence of strings.
    #[error("Invalid argument shape: {0}")]
    InvalidArgs(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement execution error, surfaced unmodified from the data source.
    #[error("Execution error: {0}")]
    Execution(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DwqError {
    /// Create an unsupported-operation error naming the dialect.
    pub fn unsupported(op: &str, dialect: &str) -> Self {
        Self::Unsupported(format!("{op} is not available for the {dialect} dialect"))
    }
}

/// Result type alias for dwq operations.
pub type DwqResult<T> = Result<T, DwqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DwqError::unsupported("hash", "sqlite");
        assert_eq!(
            err.to_string(),
            "Unsupported operation: hash is not available for the sqlite dialect"
        );
    }
}
