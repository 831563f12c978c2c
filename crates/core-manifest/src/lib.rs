//! Asset manifest for cdn-sync
//!
//! A manifest maps logical asset paths (rooted at `/`) to the public URL the
//! asset is served from. A sync run fills the URLs in; rendering code reads
//! them back through [`resolve`].
//!
//! # Example
//!
//! ```no_run
//! use cdn_core_manifest::{resolve, Manifest};
//!
//! let mut manifest = Manifest::load("wwwroot/content/fingerprints.json")?;
//! manifest.set("/content/css/site.css", "https://cdn.example.com/content/css/site-3f2a9c0d1e.css");
//! manifest.save("wwwroot/content/fingerprints.json")?;
//!
//! assert_eq!(
//!     resolve("/content/css/site.css", &manifest),
//!     "https://cdn.example.com/content/css/site-3f2a9c0d1e.css"
//! );
//! # Ok::<(), cdn_core_manifest::Error>(())
//! ```

pub mod error;
pub mod manifest;
pub mod resolve;

pub use error::{Error, Result};
pub use manifest::Manifest;
pub use resolve::{resolve, ManifestSnapshot};
