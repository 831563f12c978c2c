//! Error types for remote storage operations

use thiserror::Error;

/// Result type alias for backend operations
pub type BackendResult<T> = std::result::Result<T, StoreError>;

/// Errors raised by an [`AssetStore`](super::AssetStore)
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend could not be configured (bad connection string, etc.)
    #[error("Invalid {backend} configuration: {message}")]
    InvalidConfig { backend: String, message: String },

    /// Blob name cannot be expressed as an object path
    #[error("Invalid blob name '{name}': {message}")]
    InvalidName { name: String, message: String },

    /// Existence check failed for a reason other than "not found"
    #[error("Failed to check existence of '{name}': {source}")]
    Exists {
        name: String,
        #[source]
        source: object_store::Error,
    },

    /// Upload was rejected or the transport failed
    #[error("Failed to upload '{name}': {source}")]
    Upload {
        name: String,
        #[source]
        source: object_store::Error,
    },

    /// Generic backend error with context
    #[error("{message}")]
    Other { message: String },
}

impl StoreError {
    /// Create an invalid configuration error
    pub fn invalid_config<S: Into<String>>(backend: &str, message: S) -> Self {
        StoreError::InvalidConfig {
            backend: backend.to_string(),
            message: message.into(),
        }
    }

    /// Check if this error is a configuration problem rather than a transport failure
    pub fn is_config_error(&self) -> bool {
        matches!(self, StoreError::InvalidConfig { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let err = StoreError::invalid_config("azure", "AccountName is missing");
        assert!(err.is_config_error());
        assert_eq!(
            err.to_string(),
            "Invalid azure configuration: AccountName is missing"
        );
    }

    #[test]
    fn test_upload_error_keeps_source() {
        use std::error::Error;
        let err = StoreError::Upload {
            name: "css/site-0123456789.css".to_string(),
            source: object_store::Error::NotImplemented,
        };
        assert!(!err.is_config_error());
        assert!(err.source().is_some());
        assert!(err.to_string().contains("css/site-0123456789.css"));
    }
}
