//! Structured logging and tracing for the Trian LOD fix tool.
//!
//! Sets up span-based, filterable logging via the `tracing` ecosystem: console
//! output with uptime timestamps and module paths, plus an optional JSON log
//! file for post-mortem analysis of large scene passes.
//!
//! Logging is installed before the configuration is read, so messages from
//! loading or creating `config.ron` are not lost. The configured level and
//! file logging are applied afterwards through [`LogHandle::apply_config`].
//! `RUST_LOG`, when set, always wins over the config.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};
use trian_config::Config;

/// Filter used when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file written inside the log directory.
pub const LOG_FILE_NAME: &str = "trian.log";

/// Errors setting up or reconfiguring logging.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// A global subscriber was already installed.
    #[error("logging already initialized: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),

    /// The configured log level is not a valid filter directive.
    #[error("invalid log filter {directive:?}: {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// The installed subscriber is gone and can no longer be reconfigured.
    #[error("failed to reload log filter: {0}")]
    Reload(#[from] reload::Error),

    /// The JSON log file could not be created.
    #[error("failed to open log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writer for the JSON layer. Output is discarded until a file is attached.
#[derive(Clone, Default)]
struct FileSlot(Arc<Mutex<Option<File>>>);

impl FileSlot {
    fn attach(&self, file: File) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(file);
        }
    }

    fn is_attached(&self) -> bool {
        self.0.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }
}

impl Write for FileSlot {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.0.lock() {
            Ok(mut slot) => match slot.as_mut() {
                Some(file) => file.write(buf),
                None => Ok(buf.len()),
            },
            // A writer panicked mid-event; drop output rather than spread the panic.
            Err(_) => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.0.lock() {
            Ok(mut slot) => slot.as_mut().map_or(Ok(()), |file| file.flush()),
            Err(_) => Ok(()),
        }
    }
}

/// Control over the installed subscriber, returned by [`init_logging`].
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    file: FileSlot,
    log_dir: Option<PathBuf>,
    env_override: bool,
}

/// Initialize the global tracing subscriber.
///
/// Sets up structured logging with:
/// - Console output with uptime timestamps, module paths, and severity levels
/// - A JSON file layer, attached right away when `debug_build` is set and
///   a `log_dir` is given, or later by [`LogHandle::apply_config`]
/// - Environment-based filtering (respects RUST_LOG), falling back to
///   [`DEFAULT_FILTER`] until a config is applied
/// - Forwarding of `log` crate records, so crates logging through the `log`
///   facade show up too
///
/// Failing to open the log file in a debug build is not fatal: a warning is
/// logged and console logging keeps working.
///
/// # Examples
///
/// ```no_run
/// use trian_config::Config;
/// use trian_log::init_logging;
///
/// let log_dir = std::path::Path::new("./logs");
/// let logging = init_logging(Some(log_dir), cfg!(debug_assertions))?;
/// let config = Config::load_or_create(std::path::Path::new("./config"))?;
/// logging.apply_config(&config)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool) -> Result<LogHandle, LogError> {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let env_override = env_filter.is_some();
    let (filter_layer, filter) =
        reload::Layer::new(env_filter.unwrap_or_else(default_env_filter));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let file = FileSlot::default();
    let writer = file.clone();
    let file_layer = fmt::layer()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::uptime())
        .json();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;
    // Level filtering happens in the subscriber; let every `log` record through.
    log::set_max_level(log::LevelFilter::Trace);

    let handle = LogHandle {
        filter,
        file,
        log_dir: log_dir.map(Path::to_path_buf),
        env_override,
    };

    if debug_build
        && let Err(e) = handle.attach_file()
    {
        tracing::warn!("{e}");
    }
    Ok(handle)
}

impl LogHandle {
    /// Apply the log level and file logging settings of `config`.
    ///
    /// The level is ignored when `RUST_LOG` was set at startup. Returns the
    /// path of the JSON log file if one is attached.
    pub fn apply_config(&self, config: &Config) -> Result<Option<PathBuf>, LogError> {
        if !self.env_override {
            let directive = filter_directive(Some(config));
            let filter =
                EnvFilter::try_new(&directive).map_err(|source| LogError::InvalidFilter {
                    directive: directive.clone(),
                    source,
                })?;
            self.filter.reload(filter)?;
            tracing::debug!(filter = %directive, "log filter applied");
        }

        if config.debug.log_to_file && !self.file.is_attached() {
            self.attach_file()?;
        }
        Ok(self.log_file())
    }

    /// Path of the JSON log file, if one is attached.
    pub fn log_file(&self) -> Option<PathBuf> {
        match &self.log_dir {
            Some(dir) if self.file.is_attached() => Some(log_file_path(dir)),
            _ => None,
        }
    }

    fn attach_file(&self) -> Result<(), LogError> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(());
        };
        let path = log_file_path(log_dir);
        let file = std::fs::create_dir_all(log_dir)
            .and_then(|()| File::create(&path))
            .map_err(|source| LogError::LogFile {
                path: path.clone(),
                source,
            })?;
        self.file.attach(file);
        Ok(())
    }
}

/// The filter directive a subscriber would be built with, ignoring `RUST_LOG`.
pub fn filter_directive(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => {
            config.debug.log_level.clone()
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Location of the JSON log file inside `log_dir`.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

/// Create an `EnvFilter` with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
