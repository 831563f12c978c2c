/*!
 * Error types for cdn-sync
 */

use crate::backend::StoreError;
use std::fmt;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, SyncError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CONFIG: i32 = 2;

#[derive(Debug)]
pub enum SyncError {
    /// One or more required settings were not supplied
    MissingConfig(Vec<String>),

    /// A setting was supplied but is unusable
    Config(String),

    /// Local file I/O failed
    Io(io::Error),

    /// Walking the asset directory failed
    Walk { path: PathBuf, message: String },

    /// Remote storage call failed
    Storage(StoreError),

    /// Manifest could not be read or written
    Manifest(cdn_core_manifest::Error),
}

impl SyncError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncError::MissingConfig(_) | SyncError::Config(_) => EXIT_CONFIG,
            SyncError::Manifest(e) if e.is_not_found() => EXIT_CONFIG,
            SyncError::Storage(e) if e.is_config_error() => EXIT_CONFIG,
            _ => EXIT_FAILURE,
        }
    }

    /// Whether the run was rejected before touching remote storage
    pub fn is_config_error(&self) -> bool {
        self.exit_code() == EXIT_CONFIG
    }

    /// Message followed by any causes not already part of it
    pub fn chain(&self) -> String {
        use std::error::Error as _;

        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        message
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::MissingConfig(_) | SyncError::Config(_) => ErrorCategory::Configuration,
            SyncError::Io(_) | SyncError::Walk { .. } => ErrorCategory::IoError,
            SyncError::Storage(e) if e.is_config_error() => ErrorCategory::Configuration,
            SyncError::Storage(_) => ErrorCategory::Transport,
            SyncError::Manifest(e) if e.is_not_found() => ErrorCategory::Configuration,
            SyncError::Manifest(_) => ErrorCategory::Manifest,
        }
    }
}

/// Error category for classification and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or invalid settings
    Configuration,
    /// Local filesystem errors
    IoError,
    /// Remote storage errors
    Transport,
    /// Manifest parse/persist errors
    Manifest,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::IoError => write!(f, "io"),
            ErrorCategory::Transport => write!(f, "transport"),
            ErrorCategory::Manifest => write!(f, "manifest"),
        }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::MissingConfig(items) => {
                write!(
                    f,
                    "One or more configuration options were missing: {}",
                    items.join(", ")
                )
            }
            SyncError::Config(msg) => write!(f, "Configuration error: {}", msg),
            SyncError::Io(err) => write!(f, "I/O error: {}", err),
            SyncError::Walk { path, message } => {
                write!(f, "Failed to scan {}: {}", path.display(), message)
            }
            SyncError::Storage(err) => write!(f, "Storage error: {}", err),
            SyncError::Manifest(err) => write!(f, "Manifest error: {}", err),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Io(err) => Some(err),
            SyncError::Storage(err) => Some(err),
            SyncError::Manifest(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for SyncError {
    fn from(err: io::Error) -> Self {
        SyncError::Io(err)
    }
}

impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        SyncError::Storage(err)
    }
}

impl From<cdn_core_manifest::Error> for SyncError {
    fn from(err: cdn_core_manifest::Error) -> Self {
        SyncError::Manifest(err)
    }
}

impl From<walkdir::Error> for SyncError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        match err.into_io_error() {
            Some(io_err) => SyncError::Walk {
                path,
                message: io_err.to_string(),
            },
            None => SyncError::Walk {
                path,
                message: "filesystem loop detected".to_string(),
            },
        }
    }
}
