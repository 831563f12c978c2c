//! Remote storage for synchronized assets
//!
//! The reconciler only needs two things from a container: whether a blob
//! already exists, and a way to upload one with a content type. [`AssetStore`]
//! is that seam; [`ObjectStoreBackend`] implements it over any
//! `object_store::ObjectStore`, and [`azure::connect`] builds one for an Azure
//! Blob container from a storage connection string.
//!
//! # Example
//!
//! ```no_run
//! use cdn_sync::backend::{AssetStore, ObjectStoreBackend};
//! use bytes::Bytes;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = ObjectStoreBackend::in_memory();
//!     if !backend.exists("img/logo.png").await? {
//!         backend
//!             .upload("img/logo.png", Bytes::from_static(b"..."), "image/png")
//!             .await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod azure;
pub mod content_type;
pub mod error;
mod object;

pub use content_type::content_type_for;
pub use error::{BackendResult, StoreError};
pub use object::ObjectStoreBackend;

use async_trait::async_trait;
use bytes::Bytes;

/// Remote container operations used by a sync run
///
/// Blob names are forward-slash separated and relative to the container root.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Check whether a blob named `name` exists
    ///
    /// # Errors
    ///
    /// A missing blob is `Ok(false)`; any other failure is an error.
    async fn exists(&self, name: &str) -> BackendResult<bool>;

    /// Upload `content` as blob `name` with the given content type
    async fn upload(&self, name: &str, content: Bytes, content_type: &str) -> BackendResult<()>;

    /// Backend identifier for logging (e.g. "azure", "memory")
    fn backend_name(&self) -> &str;
}
