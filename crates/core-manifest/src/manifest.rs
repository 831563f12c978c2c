//! Asset manifest: logical asset path to resolved public URL
//!
//! The on-disk form is a flat JSON object. Values start out empty and are
//! filled in with CDN URLs by a sync run. `null` values load as empty strings.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Mapping from `/`-prefixed logical asset key to resolved URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, String>,
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Option<String>>::deserialize(deserializer)?;
        Ok(Self {
            entries: raw
                .into_iter()
                .map(|(key, url)| (key, url.unwrap_or_default()))
                .collect(),
        })
    }
}

impl Manifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` is tracked by this manifest
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Resolved URL for `key`, if tracked (may be empty)
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Set the resolved URL for `key`, returning the previous value
    pub fn set(&mut self, key: impl Into<String>, url: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), url.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, url)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys whose URL is still empty
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, url)| url.is_empty())
            .map(|(key, _)| key)
    }

    /// Parse a manifest from JSON text
    ///
    /// Any string key is accepted. Keys without a leading `/` can never match
    /// a scanned file, so they survive a run unchanged.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Keys that do not start with `/`
    pub fn unrooted(&self) -> impl Iterator<Item = &str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(|key| !key.starts_with('/'))
    }

    /// Serialize to indented JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a manifest from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::manifest_not_found(path));
        }

        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Write the manifest to `path`, replacing any existing file
    ///
    /// The JSON is written to a temporary file in the same directory and
    /// renamed over the target, so readers never observe a half-written file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let json = self.to_json()?;
        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(json.as_bytes())?;
        temp.write_all(b"\n")?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for Manifest
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_null_values_load_as_empty() {
        let manifest = Manifest::from_json(r#"{"/css/site.css": null, "/js/app.js": ""}"#).unwrap();
        assert_eq!(manifest.get("/css/site.css"), Some(""));
        assert_eq!(manifest.get("/js/app.js"), Some(""));
        assert_eq!(manifest.unresolved().count(), 2);
    }

    #[test]
    fn test_unrooted_keys_survive_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fingerprints.json");
        std::fs::write(&path, r#"{"/css/site.css": "", "legacy/app.js": "https://old.example.com/app.js"}"#)
            .unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.unrooted().collect::<Vec<_>>(), vec!["legacy/app.js"]);

        manifest.save(&path).unwrap();
        let reloaded = Manifest::load(&path).unwrap();
        assert_eq!(reloaded, manifest);
        assert_eq!(reloaded.get("legacy/app.js"), Some("https://old.example.com/app.js"));
    }

    #[test]
    fn test_set_and_unresolved() {
        let mut manifest: Manifest = [("/css/site.css", ""), ("/js/app.js", "")]
            .into_iter()
            .collect();

        let previous = manifest.set("/css/site.css", "https://cdn.example.com/css/site-0123456789.css");
        assert_eq!(previous, Some(String::new()));

        let unresolved: Vec<_> = manifest.unresolved().collect();
        assert_eq!(unresolved, vec!["/js/app.js"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Manifest::load(dir.path().join("fingerprints.json")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = Manifest::load(dir.path()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_save_then_load_preserves_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fingerprints.json");

        let manifest: Manifest = [
            ("/content/css/site.css", "https://cdn.example.com/content/css/site-a1b2c3d4e5.css"),
            ("/content/img/missing.png", ""),
        ]
        .into_iter()
        .collect();

        manifest.save(&path).unwrap();
        let loaded = Manifest::load(&path).unwrap();
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fingerprints.json");
        std::fs::write(&path, r#"{"/a.css": "", "/b.css": ""}"#).unwrap();

        let manifest: Manifest = [("/a.css", "https://cdn.example.com/a-0000000000.css")]
            .into_iter()
            .collect();
        manifest.save(&path).unwrap();

        let loaded = Manifest::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(!loaded.contains("/b.css"));
    }

    #[test]
    fn test_saved_json_is_indented() {
        let manifest: Manifest = [("/a.css", "")].into_iter().collect();
        let json = manifest.to_json().unwrap();
        assert!(json.contains("\n  \"/a.css\": \"\""));
    }
}
