//! Logging setup using tracing.
//!
//! Loggers are built explicitly: a [`LoggerRegistry`] owned by the caller
//! hands out one [`LoggerHandle`] per identity. Each handle is an independent
//! `tracing` dispatcher writing to a size-capped rotating file and,
//! optionally, to stderr.
//!
//! # Example
//!
//! ```rust,ignore
//! use opskit_util::{setup_logging, LogConfig, LogLevel, LoggerRegistry};
//!
//! let mut registry = LoggerRegistry::new();
//! let handle = setup_logging(
//!     &mut registry,
//!     LogConfig::new("/var/log/ci/build.log", 3).with_level(LogLevel::Debug),
//! )?;
//! handle.install()?;
//! tracing::info!("build started");
//! // 2024-01-01 12:00:00 INFO build started
//! ```

use crate::rotate::{RotatingFileWriter, DEFAULT_MAX_BYTES};
use crate::{Error, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use tracing::{Dispatch, Event, Level, Subscriber};
use tracing_subscriber::filter::{filter_fn, LevelFilter};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

/// Timestamp layout used by formatted log lines.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Identity used for the logger configured without a name.
pub const ROOT_LOGGER: &str = "root";

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parse a log level from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    fn as_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Logging configuration for one logger identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log file path.
    pub path: PathBuf,
    /// Number of rotated backups to keep.
    pub backup_count: usize,
    /// Minimum severity recorded.
    #[serde(default)]
    pub level: LogLevel,
    /// Logger identity; `None` configures the root logger.
    #[serde(default)]
    pub name: Option<String>,
    /// Whether to mirror logs to stderr.
    #[serde(default = "default_add_stream")]
    pub add_stream: bool,
    /// Write bare messages instead of `date time LEVEL message` lines.
    #[serde(default)]
    pub disable_formatter: bool,
    /// Size cap per log file in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
}

fn default_add_stream() -> bool {
    true
}

fn default_max_bytes() -> u64 {
    DEFAULT_MAX_BYTES
}

impl LogConfig {
    /// Configuration for the root logger writing to `path`.
    pub fn new(path: impl Into<PathBuf>, backup_count: usize) -> Self {
        Self {
            path: path.into(),
            backup_count,
            level: LogLevel::Info,
            name: None,
            add_stream: default_add_stream(),
            disable_formatter: false,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    /// Load a configuration from a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_stream(mut self, add_stream: bool) -> Self {
        self.add_stream = add_stream;
        self
    }

    pub fn with_formatter_disabled(mut self, disable_formatter: bool) -> Self {
        self.disable_formatter = disable_formatter;
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// The registry identity this configuration applies to.
    pub fn identity(&self) -> &str {
        self.name.as_deref().unwrap_or(ROOT_LOGGER)
    }
}

/// Event format: `YYYY-MM-DD HH:MM:SS LEVEL message`, or the bare message.
#[derive(Debug, Clone, Copy)]
struct LineFormat {
    timestamped: bool,
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        if self.timestamped {
            write!(
                writer,
                "{} {} ",
                Local::now().format(TIMESTAMP_FORMAT),
                level_name(event.metadata().level())
            )?;
        }
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Level token written in formatted lines.
fn level_name(level: &Level) -> &'static str {
    if *level == Level::ERROR {
        "ERROR"
    } else if *level == Level::WARN {
        "WARNING"
    } else if *level == Level::INFO {
        "INFO"
    } else if *level == Level::DEBUG {
        "DEBUG"
    } else {
        "TRACE"
    }
}

/// Whether `target` is `name` itself or a `name::` descendant.
fn target_matches(target: &str, name: &str) -> bool {
    match target.strip_prefix(name) {
        Some(rest) => rest.is_empty() || rest.starts_with("::"),
        None => false,
    }
}

/// A configured logger.
#[derive(Debug, Clone)]
pub struct LoggerHandle {
    name: Option<String>,
    dispatch: Dispatch,
    file: RotatingFileWriter,
}

impl LoggerHandle {
    fn build(config: &LogConfig) -> Result<Self> {
        if config.path.as_os_str().is_empty() {
            return Err(Error::config("log path cannot be empty"));
        }

        let file = RotatingFileWriter::new(&config.path, config.max_bytes, config.backup_count)?;
        let format = LineFormat {
            timestamped: !config.disable_formatter,
        };
        let level = config.level.as_filter();

        let name = config.name.clone();
        let filter = filter_fn(move |meta| {
            if *meta.level() > level {
                return false;
            }
            match &name {
                Some(name) => target_matches(meta.target(), name),
                None => true,
            }
        });

        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file.clone())
            .event_format(format);

        let stream_layer = config.add_stream.then(|| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::io::stderr)
                .event_format(format)
        });

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(stream_layer);

        Ok(Self {
            name: config.name.clone(),
            dispatch: Dispatch::new(subscriber),
            file,
        })
    }

    /// Logger name, `None` for the root logger.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The underlying dispatcher.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Path of the active log file.
    pub fn log_path(&self) -> PathBuf {
        self.file.path()
    }

    /// Run `f` with this logger as the current thread's default.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Make this logger the process-wide default.
    ///
    /// Fails if a global default has already been set.
    pub fn install(&self) -> Result<()> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())
            .map_err(|e| Error::config(e.to_string()))
    }
}

/// Caller-owned registry of configured loggers, one per identity.
#[derive(Debug, Default)]
pub struct LoggerRegistry {
    loggers: HashMap<String, LoggerHandle>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the logger identified by `config.name`.
    ///
    /// Each identity can be configured once; a second attempt fails with
    /// [`Error::AlreadyConfigured`].
    pub fn configure(&mut self, config: LogConfig) -> Result<LoggerHandle> {
        let identity = config.identity().to_string();
        if self.loggers.contains_key(&identity) {
            return Err(Error::AlreadyConfigured(identity));
        }

        let handle = LoggerHandle::build(&config)?;
        tracing::debug!(
            logger = %identity,
            path = %config.path.display(),
            level = config.level.as_str(),
            "Configured logger"
        );
        self.loggers.insert(identity, handle.clone());
        Ok(handle)
    }

    /// Look up a configured logger; `None` looks up the root logger.
    pub fn get(&self, name: Option<&str>) -> Option<&LoggerHandle> {
        self.loggers.get(name.unwrap_or(ROOT_LOGGER))
    }

    /// Whether the identity has been configured.
    pub fn is_configured(&self, name: Option<&str>) -> bool {
        self.get(name).is_some()
    }
}

/// Install log handlers writing to a rotating file and, optionally, stderr.
///
/// Shorthand for [`LoggerRegistry::configure`].
pub fn setup_logging(registry: &mut LoggerRegistry, config: LogConfig) -> Result<LoggerHandle> {
    registry.configure(config)
}
