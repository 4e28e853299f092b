//! Synchronous shell command execution.
//!
//! Commands are run directly (no shell is involved). A command given as a
//! single line is split on single spaces; there is no quoting support, so
//! arguments containing spaces must be passed in tokenized form.

use crate::{Error, Result};
use std::fmt;
use std::process::{Command, Stdio};
use tracing::error;

/// A command to run, either as a line or as pre-split arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// A single line, split on `' '` into arguments.
    Line(String),
    /// Already tokenized arguments; the first names the executable.
    Args(Vec<String>),
}

impl ShellCommand {
    /// The argument tokens, executable first.
    ///
    /// Line commands are split on every single space, so repeated spaces
    /// produce empty arguments.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            ShellCommand::Line(line) => line.split(' ').map(str::to_string).collect(),
            ShellCommand::Args(args) => args.clone(),
        }
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellCommand::Line(line) => write!(f, "{}", line),
            ShellCommand::Args(args) => write!(f, "{}", args.join(" ")),
        }
    }
}

impl From<&str> for ShellCommand {
    fn from(line: &str) -> Self {
        ShellCommand::Line(line.to_string())
    }
}

impl From<String> for ShellCommand {
    fn from(line: String) -> Self {
        ShellCommand::Line(line)
    }
}

impl From<Vec<String>> for ShellCommand {
    fn from(args: Vec<String>) -> Self {
        ShellCommand::Args(args)
    }
}

impl From<Vec<&str>> for ShellCommand {
    fn from(args: Vec<&str>) -> Self {
        ShellCommand::Args(args.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for ShellCommand {
    fn from(args: &[&str]) -> Self {
        ShellCommand::Args(args.iter().map(|s| s.to_string()).collect())
    }
}

/// Run a command and return its standard output.
///
/// The caller blocks until the process exits. Stdin, stderr and the
/// environment are inherited; only stdout is captured.
///
/// On a non-zero exit an error line is logged. With `quiet_mode` unset the
/// failure is returned as [`Error::CommandFailed`]; with it set, `Ok(None)`
/// is returned instead. Failing to start the process is always an error.
pub fn run_shell_command(
    cmd: impl Into<ShellCommand>,
    quiet_mode: bool,
) -> Result<Option<Vec<u8>>> {
    let cmd = cmd.into();
    let tokens = cmd.tokens();
    let (program, args) = tokens
        .split_first()
        .ok_or_else(|| Error::invalid_input("Command cannot be empty"))?;

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()?;

    if output.status.success() {
        return Ok(Some(output.stdout));
    }

    error!("Command generated error: {}", cmd);
    if quiet_mode {
        return Ok(None);
    }

    Err(Error::CommandFailed {
        command: cmd.to_string(),
        status: output.status,
        output: output.stdout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LogConfig, LogLevel, LoggerRegistry};
    use tempfile::tempdir;

    #[test]
    fn test_tokens_line() {
        let cmd = ShellCommand::from("git log -n 1");
        assert_eq!(cmd.tokens(), vec!["git", "log", "-n", "1"]);
    }

    #[test]
    fn test_tokens_no_quoting() {
        let cmd = ShellCommand::from("echo 'a b'");
        assert_eq!(cmd.tokens(), vec!["echo", "'a", "b'"]);

        let cmd = ShellCommand::from("echo  x");
        assert_eq!(cmd.tokens(), vec!["echo", "", "x"]);
    }

    #[test]
    fn test_tokens_args() {
        let cmd = ShellCommand::from(vec!["echo", "a b"]);
        assert_eq!(cmd.tokens(), vec!["echo", "a b"]);
        assert_eq!(cmd.to_string(), "echo a b");
    }

    #[test]
    fn test_display_line() {
        let cmd = ShellCommand::from(String::from("make  build"));
        assert_eq!(cmd.to_string(), "make  build");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_true() {
        let output = run_shell_command("true", false).unwrap();
        assert_eq!(output, Some(Vec::new()));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_captures_stdout() {
        let output = run_shell_command("echo hello world", false).unwrap();
        assert_eq!(output, Some(b"hello world\n".to_vec()));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_tokenized_keeps_spaces() {
        let args: &[&str] = &["printf", "%s|", "a b", "c"];
        let output = run_shell_command(args, false).unwrap();
        assert_eq!(output, Some(b"a b|c|".to_vec()));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_false_quiet() {
        let output = run_shell_command("false", true).unwrap();
        assert!(output.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_false_raises() {
        let err = run_shell_command("false", false).unwrap_err();
        match err {
            Error::CommandFailed {
                command, status, ..
            } => {
                assert_eq!(command, "false");
                assert!(!status.success());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_run_failure_keeps_partial_output() {
        let args = vec!["sh", "-c", "echo partial; exit 3"];
        let err = run_shell_command(args, false).unwrap_err();
        match err {
            Error::CommandFailed { status, output, .. } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(output, b"partial\n".to_vec());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_run_missing_program_is_io_error_even_when_quiet() {
        let err = run_shell_command("opskit-definitely-not-a-program", true).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_logs_only_on_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shell.log");
        let mut registry = LoggerRegistry::new();
        let handle = registry
            .configure(
                LogConfig::new(&path, 1)
                    .with_level(LogLevel::Debug)
                    .with_stream(false)
                    .with_formatter_disabled(true),
            )
            .unwrap();

        handle.in_scope(|| run_shell_command("true", false)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

        handle.in_scope(|| run_shell_command("false", true)).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Command generated error: false\n"
        );

        let err = handle.in_scope(|| run_shell_command("false -x", false));
        assert!(err.is_err());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Command generated error: false\nCommand generated error: false -x\n"
        );
    }

    #[test]
    fn test_run_empty_args() {
        let err = run_shell_command(Vec::<String>::new(), false).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
