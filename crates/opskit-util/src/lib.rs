//! Operational helpers for opskit.
//!
//! This crate collects small, independent utilities used by release and CI
//! tooling:
//! - Error types, including the `NotFound`/`BadRequest` request errors
//! - Idempotent directory creation
//! - Synchronous shell command execution with an optional quiet mode
//! - Logging setup with a size-capped rotating file sink
//! - Comma-delimited argument splitting
//! - Scoped temporary directories
//! - YAML structured log messages

pub mod args;
pub mod error;
pub mod fs;
pub mod log;
pub mod message;
pub mod rotate;
pub mod shell;
pub mod temp;

pub use args::split_arg_string;
pub use error::{Error, RequestError, RequestErrorKind, Result};
pub use fs::ensure_dir;
pub use log::{setup_logging, LogConfig, LogLevel, LoggerHandle, LoggerRegistry};
pub use message::StructuredMessage;
pub use rotate::RotatingFileWriter;
pub use shell::{run_shell_command, ShellCommand};
pub use temp::{temp_dir, with_temp_dir, ScopedTempDir};
