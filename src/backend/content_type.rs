//! Content-type lookup by file extension

/// Fallback for extensions with no registered MIME type
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Resolve the content type to store with a blob named `name`
pub fn content_type_for(name: &str) -> String {
    mime_guess::from_path(name)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}
