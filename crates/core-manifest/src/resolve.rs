//! Read-side URL resolution for rendering
//!
//! Rendering code looks asset paths up in the manifest and falls back to the
//! path itself when the asset is untracked or was never resolved.

use crate::error::Result;
use crate::manifest::Manifest;
use once_cell::sync::OnceCell;
use std::path::PathBuf;

/// Resolve `key` to its manifest URL, or return `key` unchanged
pub fn resolve<'a>(key: &'a str, manifest: &'a Manifest) -> &'a str {
    match manifest.get(key) {
        Some(url) if !url.is_empty() => url,
        _ => key,
    }
}

/// A manifest loaded on first use and immutable afterwards
///
/// A missing file yields an empty snapshot, so every lookup falls back to the
/// original path.
#[derive(Debug)]
pub struct ManifestSnapshot {
    path: PathBuf,
    manifest: OnceCell<Manifest>,
}

impl ManifestSnapshot {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            manifest: OnceCell::new(),
        }
    }

    /// The loaded manifest, reading the file on the first call
    pub fn manifest(&self) -> Result<&Manifest> {
        self.manifest.get_or_try_init(|| match Manifest::load(&self.path) {
            Ok(manifest) => Ok(manifest),
            Err(e) if e.is_not_found() => Ok(Manifest::new()),
            Err(e) => Err(e),
        })
    }

    /// Resolve `key` against the snapshot
    pub fn url<'a>(&'a self, key: &'a str) -> Result<&'a str> {
        Ok(resolve(key, self.manifest()?))
    }
}
