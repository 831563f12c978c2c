/*!
 * cdn-sync - Fingerprinted static asset publishing
 *
 * Walks a local asset directory and mirrors it into a blob container:
 * - Files listed in the manifest are uploaded under content-fingerprinted names
 * - Other files are uploaded under their original names
 * - Blobs that already exist are skipped
 * - The manifest is rewritten with the public URL of each tracked asset
 */

pub mod backend;
pub mod collect;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod logging;
pub mod markup;
pub mod output;
pub mod reconcile;
pub mod sync;

// Re-export commonly used types
pub use backend::{AssetStore, ObjectStoreBackend};
pub use cdn_core_manifest::{resolve, Manifest, ManifestSnapshot};
pub use collect::ExtensionSet;
pub use config::{ConfigSources, Settings, SyncConfig};
pub use error::{Result, SyncError};
pub use reconcile::{RunTally, SyncReport};
pub use sync::run_sync;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
