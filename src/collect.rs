/*!
 * Asset discovery: recursive enumeration of files with allowed extensions
 */

use crate::error::{Result, SyncError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default allow-list of static asset extensions
pub const DEFAULT_EXTENSIONS: &str =
    ".css,.eot,.gif,.jpeg,.jpg,.js,.otf,.png,.svg,.ttf,.woff,.woff2,.xsl";

/// Case-insensitive set of file extensions, stored as lower-case `.ext`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet {
    extensions: HashSet<String>,
}

impl ExtensionSet {
    /// Build from items such as `.css`, `CSS` or ` .Js `; empty items are ignored
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = items
            .into_iter()
            .filter_map(|item| {
                let ext = item.as_ref().trim().trim_start_matches('.').to_ascii_lowercase();
                (!ext.is_empty()).then(|| format!(".{}", ext))
            })
            .collect();
        Self { extensions }
    }

    /// Parse a comma-separated list
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Whether `path`'s extension is in the set
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.extensions
                    .contains(&format!(".{}", ext.to_ascii_lowercase()))
            })
            .unwrap_or(false)
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::parse(DEFAULT_EXTENSIONS)
    }
}

/// A local asset found during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    /// Absolute (or caller-rooted) filesystem path
    pub path: PathBuf,
    /// Path relative to the key root, forward-slash separated, no leading slash
    pub relative: String,
}

impl AssetFile {
    /// Manifest key for this file: the relative path with a leading `/`
    pub fn key(&self) -> String {
        format!("/{}", self.relative)
    }
}

/// Forward-slash path of `path` relative to `root`
pub fn relative_path(path: &Path, root: &Path) -> Result<String> {
    let stripped = path.strip_prefix(root).map_err(|_| {
        SyncError::Config(format!(
            "{} is not under key root {}",
            path.display(),
            root.display()
        ))
    })?;

    let parts: Vec<_> = stripped
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

/// Lazily enumerate regular files under `source_dir` whose extension is allowed
///
/// Relative paths are computed against `key_root`, which must contain
/// `source_dir`. `exclude` (typically the manifest file) is never yielded.
/// Traversal order is unspecified. Walk errors are yielded as `Err` items.
pub fn collect<'a>(
    source_dir: &Path,
    key_root: &'a Path,
    extensions: &'a ExtensionSet,
    exclude: Option<&'a Path>,
) -> impl Iterator<Item = Result<AssetFile>> + 'a {
    WalkDir::new(source_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => return Some(Err(SyncError::from(e))),
            };

            if !entry.file_type().is_file() || !extensions.matches(entry.path()) {
                return None;
            }
            if exclude.is_some_and(|excluded| entry.path() == excluded) {
                return None;
            }

            Some(relative_path(entry.path(), key_root).map(|relative| AssetFile {
                path: entry.path().to_path_buf(),
                relative,
            }))
        })
}
