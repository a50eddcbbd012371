/*
    error.rs - Error types for the document store seam

    Every backend (the in-memory tree, a remote document database client)
    reports failures through StoreError so callers above the seam never
    see backend-specific types.
*/

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur talking to the document store
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backend rejected or failed the request
    #[error("Store backend error: {0}")]
    Backend(String),

    /// A path segment violates the store's key rules
    #[error("Invalid store path: {0}")]
    InvalidPath(String),

    /// A value could not be converted to or from JSON
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::Backend("connection reset".to_string());
        assert_eq!(err.to_string(), "Store backend error: connection reset");

        let err = StoreError::InvalidPath("a.b".to_string());
        assert!(err.to_string().contains("a.b"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<bool>("not json").unwrap_err();
        let err: StoreError = json_err.into();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
