//! Error types for manifest operations

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for manifest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during manifest operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Manifest file not found
    #[error("Manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },
}

impl Error {
    /// Create a manifest not found error
    pub fn manifest_not_found<P: Into<PathBuf>>(path: P) -> Self {
        Error::ManifestNotFound { path: path.into() }
    }

    /// Check if this error indicates the manifest file is missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ManifestNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_not_found_error() {
        let err = Error::manifest_not_found("/srv/content/fingerprints.json");
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Manifest not found: /srv/content/fingerprints.json"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let err: Error = io::Error::other("disk gone").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
