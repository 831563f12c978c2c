/*!
 * cdn-sync CLI - Command Line Interface
 *
 * Every setting can be given as a flag, in the settings file (`cdn.json` by
 * default) or as an environment variable of the same name.
 */

use cdn_sync::{
    backend::azure,
    config::{
        ConfigSources, LogLevel, Settings, SyncConfig, CONNECTION_STRING, CONTAINER_NAME,
        CONTAINER_URL, EXTENSIONS, FILE_LIST, KEY_ROOT, SOURCE_DIR,
    },
    error::{Result, SyncError, EXIT_SUCCESS},
    logging::{self, LogConfig},
    output::OutputWriter,
    run_sync, ManifestSnapshot,
};
use clap::{Parser, Subcommand, ValueEnum};
use secrecy::ExposeSecret;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cdn-sync")]
#[command(version, about = "Publish static assets to a blob container under fingerprinted names", long_about = None)]
struct Cli {
    /// Blob container name
    #[arg(long = "containerName", alias = "container-name", value_name = "NAME")]
    container_name: Option<String>,

    /// Public base URL of the container
    #[arg(long = "containerUrl", alias = "container-url", value_name = "URL")]
    container_url: Option<String>,

    /// Storage account connection string
    #[arg(
        long = "storageAccountConnectionString",
        alias = "connection-string",
        value_name = "CONNECTION_STRING"
    )]
    connection_string: Option<String>,

    /// Manifest file; its directory is the one scanned
    #[arg(long = "fileList", alias = "file-list", value_name = "PATH")]
    file_list: Option<String>,

    /// Comma-separated extensions to publish
    #[arg(long = "extensions", value_name = "LIST")]
    extensions: Option<String>,

    /// Directory to scan (defaults to the manifest's directory)
    #[arg(long = "sourceDir", alias = "source-dir", value_name = "PATH")]
    source_dir: Option<String>,

    /// Directory manifest keys are relative to (defaults to the parent of the scanned directory)
    #[arg(long = "keyRoot", alias = "key-root", value_name = "PATH")]
    key_root: Option<String>,

    /// Settings file (JSON, or TOML by extension)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Check existence but upload nothing and leave the manifest untouched
    #[arg(long)]
    dry_run: bool,

    /// Log level
    #[arg(long, value_enum, default_value = "info", global = true)]
    log_level: LogLevelArg,

    /// Write JSON logs to this file
    #[arg(long, value_name = "FILE", global = true)]
    log: Option<PathBuf>,

    /// Verbose output (same as --log-level debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the URL each asset path resolves to in the manifest
    Resolve {
        /// Asset paths such as /content/css/site.css
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = OutputWriter::new(cli.json);

    let code = match run(cli, &output) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            output.error(&e.chain());
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli, output: &OutputWriter) -> Result<()> {
    let overrides = cli.overrides();
    let file_settings = load_settings(cli.config.as_deref())?;
    let sources = ConfigSources::with_process_env(&overrides, &file_settings);

    if let Some(Commands::Resolve { paths }) = cli.command {
        return handle_resolve(&sources, &paths, output);
    }

    let log_config = LogConfig {
        level: cli.log_level.into(),
        file: cli.log.clone(),
        verbose: cli.verbose,
    };
    if let Err(e) = logging::init_logging(&log_config) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    // Settings are validated before any remote call
    let mut sync_config = SyncConfig::resolve(&sources)?;
    sync_config.dry_run = cli.dry_run;

    let store = azure::connect(
        sync_config.connection_string.expose_secret(),
        &sync_config.container_name,
    )?;

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(run_sync(&sync_config, &store))?;

    output.summary(&report);
    Ok(())
}

impl Cli {
    /// Settings given on the command line, keyed like the settings file
    fn overrides(&self) -> Settings {
        let mut settings = Settings::new();
        settings.set_opt(CONTAINER_NAME, self.container_name.clone());
        settings.set_opt(CONTAINER_URL, self.container_url.clone());
        settings.set_opt(CONNECTION_STRING, self.connection_string.clone());
        settings.set_opt(FILE_LIST, self.file_list.clone());
        settings.set_opt(EXTENSIONS, self.extensions.clone());
        settings.set_opt(SOURCE_DIR, self.source_dir.clone());
        settings.set_opt(KEY_ROOT, self.key_root.clone());
        settings
    }
}

/// Explicit `--config` must exist; the default file is optional
fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => {
            if !path.is_file() {
                return Err(SyncError::MissingConfig(vec![format!(
                    "{} was not found",
                    path.display()
                )]));
            }
            Settings::from_file(path)
        }
        None => match Settings::discover() {
            Some(path) => Settings::from_file(&path),
            None => Ok(Settings::new()),
        },
    }
}

fn handle_resolve(sources: &ConfigSources<'_>, paths: &[String], output: &OutputWriter) -> Result<()> {
    let file_list = sources
        .lookup(FILE_LIST)
        .ok_or_else(|| SyncError::MissingConfig(vec![format!("{} is missing", FILE_LIST)]))?;

    let snapshot = ManifestSnapshot::new(file_list);
    for path in paths {
        output.resolution(path, snapshot.url(path)?);
    }
    Ok(())
}
