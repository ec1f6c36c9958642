//! Error taxonomy shared by the fetch and persistence paths

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuoteError {
    /// A hard deadline expired; the in-flight operation was abandoned.
    #[error("{operation} timed out after {}ms", .after.as_millis())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode quote response: {0}")]
    Decode(String),

    #[error("failed to store quote: {0}")]
    StorageWrite(String),

    #[error("quote not found for pair: {0}")]
    NotFound(String),
}

impl QuoteError {
    pub fn timeout(operation: &'static str, after: Duration) -> Self {
        QuoteError::Timeout { operation, after }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, QuoteError::Timeout { .. })
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(err: serde_json::Error) -> Self {
        QuoteError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display_includes_operation_and_deadline() {
        let err = QuoteError::timeout("quote fetch", Duration::from_millis(200));
        assert_eq!(err.to_string(), "quote fetch timed out after 200ms");
        assert!(err.is_timeout());
    }

    #[test]
    fn test_json_error_maps_to_decode() {
        let err: QuoteError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, QuoteError::Decode(_)));
        assert!(!err.is_timeout());
    }
}
