/*!
 * Configuration for a sync run
 *
 * Settings are looked up by name in priority order: command-line overrides,
 * then the settings file, then the process environment, then the built-in
 * default. Empty values are treated as unset at every layer.
 */

use crate::collect::{ExtensionSet, DEFAULT_EXTENSIONS};
use crate::error::{Result, SyncError};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONTAINER_NAME: &str = "containerName";
pub const CONTAINER_URL: &str = "containerUrl";
pub const CONNECTION_STRING: &str = "storageAccountConnectionString";
pub const FILE_LIST: &str = "fileList";
pub const EXTENSIONS: &str = "extensions";
pub const SOURCE_DIR: &str = "sourceDir";
pub const KEY_ROOT: &str = "keyRoot";

/// Settings file looked up when `--config` is not given
pub const DEFAULT_SETTINGS_FILE: &str = "cdn.json";

/// A flat name → value settings layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-empty value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Set `name` only when `value` is present
    pub fn set_opt(&mut self, name: &str, value: Option<String>) {
        if let Some(value) = value {
            self.set(name, value);
        }
    }

    /// Load a settings file; `.toml` files are parsed as TOML, anything else as JSON
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            toml::from_str(&contents).map_err(|e| {
                SyncError::Config(format!("Invalid settings file {}: {}", path.display(), e))
            })
        } else {
            serde_json::from_str(&contents).map_err(|e| {
                SyncError::Config(format!("Invalid settings file {}: {}", path.display(), e))
            })
        }
    }

    /// `cdn.json` in the working directory, else next to the executable
    pub fn discover() -> Option<PathBuf> {
        let cwd = PathBuf::from(DEFAULT_SETTINGS_FILE);
        if cwd.is_file() {
            return Some(cwd);
        }

        let exe_dir = std::env::current_exe().ok()?.parent()?.to_path_buf();
        Some(exe_dir.join(DEFAULT_SETTINGS_FILE)).filter(|p| p.is_file())
    }
}

/// Priority-ordered sources for setting lookup
pub struct ConfigSources<'a> {
    pub overrides: &'a Settings,
    pub file: &'a Settings,
    pub env: &'a dyn Fn(&str) -> Option<String>,
}

impl<'a> ConfigSources<'a> {
    /// Sources reading the real process environment
    pub fn with_process_env(overrides: &'a Settings, file: &'a Settings) -> Self {
        Self {
            overrides,
            file,
            env: &process_env,
        }
    }

    /// First non-empty value for `name`, highest priority first
    pub fn lookup(&self, name: &str) -> Option<String> {
        self.overrides
            .get(name)
            .or_else(|| self.file.get(name))
            .map(str::to_string)
            .or_else(|| (self.env)(name).filter(|v| !v.is_empty()))
    }
}

/// Fully resolved configuration for one run
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub container_name: String,
    /// Public base URL of the container, always ending in `/`
    pub container_url: String,
    pub connection_string: SecretString,
    /// Manifest file (absolute)
    pub file_list: PathBuf,
    pub extensions: ExtensionSet,
    /// Directory scanned for assets
    pub source_dir: PathBuf,
    /// Directory manifest keys are relative to
    pub key_root: PathBuf,
    pub dry_run: bool,
}

impl SyncConfig {
    /// Resolve all settings, reporting every missing item at once
    pub fn resolve(sources: &ConfigSources<'_>) -> Result<Self> {
        let mut missing = Vec::new();
        let mut required = |name: &str| {
            let value = sources.lookup(name);
            if value.is_none() {
                missing.push(format!("{} is missing", name));
            }
            value.unwrap_or_default()
        };

        let container_name = required(CONTAINER_NAME);
        let container_url = required(CONTAINER_URL);
        let file_list = required(FILE_LIST);
        let connection_string = required(CONNECTION_STRING);

        let file_list = if file_list.is_empty() {
            PathBuf::new()
        } else {
            let path = absolute(Path::new(&file_list))?;
            match existing(&path) {
                Some(canonical) if canonical.is_file() => canonical,
                _ => {
                    missing.push(format!("{} was not found", path.display()));
                    path
                }
            }
        };

        if !missing.is_empty() {
            return Err(SyncError::MissingConfig(missing));
        }

        let extensions = ExtensionSet::parse(
            &sources
                .lookup(EXTENSIONS)
                .unwrap_or_else(|| DEFAULT_EXTENSIONS.to_string()),
        );
        if extensions.is_empty() {
            return Err(SyncError::Config(format!("{} lists no file extensions", EXTENSIONS)));
        }

        let source_dir = match sources.lookup(SOURCE_DIR) {
            Some(dir) => existing_dir(SOURCE_DIR, &dir)?,
            None => parent_or_self(&file_list),
        };
        let key_root = match sources.lookup(KEY_ROOT) {
            Some(dir) => existing_dir(KEY_ROOT, &dir)?,
            None => parent_or_self(&source_dir),
        };
        if !source_dir.starts_with(&key_root) {
            return Err(SyncError::Config(format!(
                "{} ({}) is not inside {} ({})",
                SOURCE_DIR,
                source_dir.display(),
                KEY_ROOT,
                key_root.display()
            )));
        }

        Ok(Self {
            container_name,
            container_url: with_trailing_slash(container_url),
            connection_string: SecretString::new(connection_string.into_boxed_str()),
            file_list,
            extensions,
            source_dir,
            key_root,
            dry_run: false,
        })
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Canonical form of `path`, or `None` if it does not exist
fn existing(path: &Path) -> Option<PathBuf> {
    std::fs::canonicalize(path).ok()
}

/// Canonical directory for setting `name`, so path comparisons see through `..` and symlinks
fn existing_dir(name: &str, dir: &str) -> Result<PathBuf> {
    let path = absolute(Path::new(dir))?;
    existing(&path).filter(|p| p.is_dir()).ok_or_else(|| {
        SyncError::MissingConfig(vec![format!("{} ({}) was not found", name, path.display())])
    })
}

fn parent_or_self(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(path)
        .to_path_buf()
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn manifest_in(dir: &TempDir) -> PathBuf {
        let content = dir.path().join("wwwroot/content");
        std::fs::create_dir_all(&content).unwrap();
        let path = content.join("fingerprints.json");
        std::fs::write(&path, "{}").unwrap();
        path
    }

    fn complete(file_list: &Path) -> Settings {
        let mut settings = Settings::new();
        settings.set(CONTAINER_NAME, "cdn");
        settings.set(CONTAINER_URL, "https://cdn.example.com/cdn");
        settings.set(CONNECTION_STRING, "UseDevelopmentStorage=true");
        settings.set(FILE_LIST, file_list.to_string_lossy());
        settings
    }

    #[test]
    fn test_precedence_order() {
        let mut overrides = Settings::new();
        overrides.set(CONTAINER_NAME, "from-cli");
        let mut file = Settings::new();
        file.set(CONTAINER_NAME, "from-file");
        file.set(CONTAINER_URL, "from-file-url");

        let env: HashMap<&str, &str> = [
            (CONTAINER_NAME, "from-env"),
            (CONTAINER_URL, "from-env-url"),
            (FILE_LIST, "from-env-list"),
        ]
        .into_iter()
        .collect();
        let env_fn = |name: &str| env.get(name).map(|v| v.to_string());

        let sources = ConfigSources {
            overrides: &overrides,
            file: &file,
            env: &env_fn,
        };
        assert_eq!(sources.lookup(CONTAINER_NAME).as_deref(), Some("from-cli"));
        assert_eq!(sources.lookup(CONTAINER_URL).as_deref(), Some("from-file-url"));
        assert_eq!(sources.lookup(FILE_LIST).as_deref(), Some("from-env-list"));
        assert_eq!(sources.lookup(EXTENSIONS), None);
    }

    #[test]
    fn test_empty_values_fall_through() {
        let mut overrides = Settings::new();
        overrides.set(CONTAINER_NAME, "");
        let mut file = Settings::new();
        file.set(CONTAINER_NAME, "from-file");

        let sources = ConfigSources {
            overrides: &overrides,
            file: &file,
            env: &no_env,
        };
        assert_eq!(sources.lookup(CONTAINER_NAME).as_deref(), Some("from-file"));
    }

    #[test]
    fn test_missing_settings_are_all_reported() {
        let empty = Settings::new();
        let sources = ConfigSources {
            overrides: &empty,
            file: &empty,
            env: &no_env,
        };

        match SyncConfig::resolve(&sources) {
            Err(SyncError::MissingConfig(items)) => {
                assert_eq!(
                    items,
                    vec![
                        "containerName is missing",
                        "containerUrl is missing",
                        "fileList is missing",
                        "storageAccountConnectionString is missing",
                    ]
                );
            }
            other => panic!("expected MissingConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_manifest_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let settings = complete(&dir.path().join("absent.json"));
        let empty = Settings::new();
        let sources = ConfigSources {
            overrides: &settings,
            file: &empty,
            env: &no_env,
        };

        let err = SyncConfig::resolve(&sources).unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("absent.json was not found"));
    }

    #[test]
    fn test_resolve_defaults() {
        let dir = TempDir::new().unwrap();
        let manifest = manifest_in(&dir);
        let settings = complete(&manifest);
        let empty = Settings::new();
        let sources = ConfigSources {
            overrides: &settings,
            file: &empty,
            env: &no_env,
        };

        let config = SyncConfig::resolve(&sources).unwrap();
        let root = std::fs::canonicalize(dir.path()).unwrap();
        assert_eq!(config.container_url, "https://cdn.example.com/cdn/");
        assert_eq!(config.extensions, ExtensionSet::default());
        assert_eq!(config.file_list, root.join("wwwroot/content/fingerprints.json"));
        assert_eq!(config.source_dir, root.join("wwwroot/content"));
        assert_eq!(config.key_root, root.join("wwwroot"));
        assert!(!config.dry_run);
    }

    #[test]
    fn test_source_dir_must_be_inside_key_root() {
        let dir = TempDir::new().unwrap();
        let manifest = manifest_in(&dir);
        let elsewhere = dir.path().join("elsewhere");
        std::fs::create_dir_all(&elsewhere).unwrap();
        let mut settings = complete(&manifest);
        settings.set(KEY_ROOT, elsewhere.to_string_lossy());
        let empty = Settings::new();
        let sources = ConfigSources {
            overrides: &settings,
            file: &empty,
            env: &no_env,
        };

        let err = SyncConfig::resolve(&sources).unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }

    #[test]
    fn test_missing_source_dir_is_reported() {
        let dir = TempDir::new().unwrap();
        let manifest = manifest_in(&dir);
        let mut settings = complete(&manifest);
        settings.set(SOURCE_DIR, dir.path().join("nope").to_string_lossy());
        let empty = Settings::new();
        let sources = ConfigSources {
            overrides: &settings,
            file: &empty,
            env: &no_env,
        };

        let err = SyncConfig::resolve(&sources).unwrap_err();
        assert!(matches!(err, SyncError::MissingConfig(_)));
    }

    #[test]
    fn test_indirect_source_dir_still_excludes_manifest() {
        let dir = TempDir::new().unwrap();
        let manifest = manifest_in(&dir);
        std::fs::write(dir.path().join("wwwroot/content/app.json"), "{}").unwrap();

        let mut settings = complete(&manifest);
        settings.set(
            SOURCE_DIR,
            dir.path().join("wwwroot/content/../content").to_string_lossy(),
        );
        settings.set(EXTENSIONS, ".json");
        let empty = Settings::new();
        let sources = ConfigSources {
            overrides: &settings,
            file: &empty,
            env: &no_env,
        };

        let config = SyncConfig::resolve(&sources).unwrap();
        assert_eq!(config.source_dir, parent_or_self(&config.file_list));

        let found: Vec<_> = crate::collect::collect(
            &config.source_dir,
            &config.key_root,
            &config.extensions,
            Some(&config.file_list),
        )
        .map(|f| f.unwrap().relative)
        .collect();
        assert_eq!(found, vec!["content/app.json"]);
    }

    #[test]
    fn test_settings_file_formats() {
        let dir = TempDir::new().unwrap();
        let json = dir.path().join("cdn.json");
        std::fs::write(&json, r#"{"containerName": "cdn", "extensions": ".css,.js"}"#).unwrap();
        let toml_path = dir.path().join("cdn.toml");
        std::fs::write(&toml_path, "containerName = \"cdn\"\nextensions = \".css,.js\"\n").unwrap();

        let from_json = Settings::from_file(&json).unwrap();
        let from_toml = Settings::from_file(&toml_path).unwrap();
        assert_eq!(from_json, from_toml);
        assert_eq!(from_json.get(CONTAINER_NAME), Some("cdn"));
    }

    #[test]
    fn test_invalid_settings_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cdn.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(Settings::from_file(&path), Err(SyncError::Config(_))));
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
        assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
        assert_eq!(LogLevel::Info.to_tracing_level(), tracing::Level::INFO);
        assert_eq!(LogLevel::Debug.to_tracing_level(), tracing::Level::DEBUG);
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
    }
}
