//! Error types and handling infrastructure for devsense.
//!
//! This module provides a centralized error type using `thiserror`; the binary layers
//! `anyhow` on top for context.
//!
//! Running outside an interactive environment is not an error: sessions fall back to
//! documented defaults. The variants here cover faults that callers must see, most
//! importantly a capability query that fails inside the environment itself.

use thiserror::Error;

/// The main error type for devsense operations.
#[derive(Error, Debug)]
pub enum DetectError {
    /// The environment's capability-query mechanism faulted
    #[error("Media query {query} failed: {message}")]
    QueryFailed { query: String, message: String },

    /// Device profile could not be read or parsed
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// A profile name that is neither a preset nor a readable file
    #[error("Unknown device profile: {name}")]
    UnknownProfile { name: String },

    /// Terminal I/O failures (size queries, event polling)
    #[error("Terminal operation failed: {message}")]
    TerminalError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid command line arguments
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic error for cases not covered by specific variants
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for devsense operations.
pub type Result<T> = std::result::Result<T, DetectError>;

impl DetectError {
    /// Create a QueryFailed error for the given media query
    pub fn query_failed(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::QueryFailed {
            query: query.into(),
            message: message.into(),
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a TerminalError from an io::Error with additional context
    pub fn terminal(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::TerminalError {
            message: message.into(),
            source,
        }
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a generic Other error with a descriptive message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

// Terminal polling and size queries surface io::Error
impl From<std::io::Error> for DetectError {
    fn from(err: std::io::Error) -> Self {
        Self::TerminalError {
            message: "Terminal I/O failed".to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let failed = DetectError::query_failed("(pointer: fine)", "matchMedia unavailable");
        assert_eq!(
            failed.to_string(),
            "Media query (pointer: fine) failed: matchMedia unavailable"
        );

        let unknown = DetectError::UnknownProfile {
            name: "toaster".to_string(),
        };
        assert_eq!(unknown.to_string(), "Unknown device profile: toaster");

        let config = DetectError::config("missing [pointer] table");
        assert_eq!(
            config.to_string(),
            "Configuration error: missing [pointer] table"
        );
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(
            DetectError::invalid_argument("bad flag"),
            DetectError::InvalidArgument { .. }
        ));
        assert!(matches!(
            DetectError::other("unknown"),
            DetectError::Other { .. }
        ));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "not a tty");
        let err: DetectError = io_err.into();

        match err {
            DetectError::TerminalError { message, source } => {
                assert_eq!(message, "Terminal I/O failed");
                assert_eq!(source.kind(), std::io::ErrorKind::Other);
            }
            _ => panic!("Expected TerminalError variant"),
        }
    }
}
