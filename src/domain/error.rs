//! Error types for the inspector.
//!
//! This module defines the centralized error type [`InspectorError`] and a type alias
//! [`Result`] used by every trace operation and sink. A disabled trace level is never
//! an error: it is the normal no-op path.

use thiserror::Error;

/// The main error type for inspector operations.
///
/// Trace operations surface these to the protocol client, which is expected to log
/// and continue. Tracing must never abort the protocol operation it observes.
#[derive(Debug, Error)]
pub enum InspectorError {
    /// A trace body could not be converted to its indented textual form.
    ///
    /// Raised before anything reaches the sink, so the failed trace call emits
    /// no partial record.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The logging sink rejected or failed to write a record.
    ///
    /// Never retried here. Retry policy, if any, belongs to the sink.
    #[error("Sink error: {0}")]
    Sink(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations, typically while a file
    /// sink opens, writes or rotates its output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for InspectorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for inspector operations.
pub type Result<T> = std::result::Result<T, InspectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_become_serialization_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = InspectorError::from(err);
        assert!(matches!(err, InspectorError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error: "));
    }

    #[test]
    fn io_errors_convert() {
        let err: InspectorError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert_eq!(err.to_string(), "IO error: disk full");
    }
}
