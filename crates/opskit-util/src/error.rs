//! Error handling utilities.
//!
//! Every helper in this crate returns [`Result`]. Request-level conditions
//! that callers translate into responses are modelled separately as
//! [`RequestError`], a closed set of kinds each carrying a fixed code.

use std::fmt;
use std::process::ExitStatus;
use thiserror::Error;

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for opskit utilities.
#[derive(Debug, Error)]
pub enum Error {
    /// IO operation failed (directory creation, process spawn, log file, temp dir)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A child process exited unsuccessfully
    #[error("Command '{command}' failed with {status}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        /// Standard output captured before the process exited.
        output: Vec<u8>,
    },

    /// Invalid input or argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// YAML serialization/deserialization failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A logger identity was configured twice
    #[error("Logger '{0}' is already configured")]
    AlreadyConfigured(String),

    /// Request-level condition raised for callers to translate
    #[error(transparent)]
    Request(#[from] RequestError),
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The request error code, if this is a request-level error.
    pub fn error_code(&self) -> Option<u16> {
        match self {
            Error::Request(err) => Some(err.error_code()),
            _ => None,
        }
    }
}

/// Kinds of request-level errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestErrorKind {
    /// Requested resource not found
    NotFound,
    /// Incorrectly formatted request
    BadRequest,
}

impl RequestErrorKind {
    /// The HTTP-like code attached to this kind.
    pub fn code(&self) -> u16 {
        match self {
            RequestErrorKind::NotFound => 404,
            RequestErrorKind::BadRequest => 400,
        }
    }

    fn default_message(&self) -> &'static str {
        match self {
            RequestErrorKind::NotFound => "Requested resource not found",
            RequestErrorKind::BadRequest => "Incorrectly formatted request",
        }
    }
}

/// A tagged request error with an optional message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    kind: RequestErrorKind,
    message: Option<String>,
}

impl RequestError {
    /// Create a request error of the given kind without a message.
    pub fn new(kind: RequestErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Create a not found error (code 404).
    pub fn not_found() -> Self {
        Self::new(RequestErrorKind::NotFound)
    }

    /// Create a bad request error (code 400).
    pub fn bad_request() -> Self {
        Self::new(RequestErrorKind::BadRequest)
    }

    /// Attach a message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Get the error kind.
    pub fn kind(&self) -> RequestErrorKind {
        self.kind
    }

    /// Get the error code (404 or 400).
    pub fn error_code(&self) -> u16 {
        self.kind.code()
    }

    /// Get the message, if one was attached.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}", message),
            None => write!(f, "{}", self.kind.default_message()),
        }
    }
}

impl std::error::Error for RequestError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_not_found_code() {
        let err = RequestError::not_found();
        assert_eq!(err.error_code(), 404);
        assert_eq!(err.kind(), RequestErrorKind::NotFound);
        assert!(err.message().is_none());
    }

    #[test]
    fn test_bad_request_code() {
        let err = RequestError::bad_request();
        assert_eq!(err.error_code(), 400);
        assert_eq!(err.kind(), RequestErrorKind::BadRequest);
    }

    #[test]
    fn test_request_error_default_display() {
        assert_eq!(
            RequestError::not_found().to_string(),
            "Requested resource not found"
        );
        assert_eq!(
            RequestError::bad_request().to_string(),
            "Incorrectly formatted request"
        );
    }

    #[test]
    fn test_request_error_with_message() {
        let err = RequestError::not_found().with_message("no such build: 42");
        assert_eq!(err.to_string(), "no such build: 42");
        assert_eq!(err.message(), Some("no such build: 42"));
        assert_eq!(err.error_code(), 404);
    }

    #[test]
    fn test_request_error_into_error() {
        let err: Error = RequestError::bad_request().into();
        assert_eq!(err.error_code(), Some(400));
        assert_eq!(err.to_string(), "Incorrectly formatted request");
        assert!(matches!(err, Error::Request(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("IO error"));
        assert!(StdError::source(&err).is_some());
        assert_eq!(err.error_code(), None);
    }

    #[test]
    fn test_error_from_yaml() {
        let yaml_err = serde_yaml::from_str::<Vec<String>>("{unclosed").unwrap_err();
        let err: Error = yaml_err.into();
        assert!(err.to_string().starts_with("YAML error"));
    }

    #[test]
    fn test_error_helpers() {
        let err = Error::invalid_input("empty command");
        assert_eq!(err.to_string(), "Invalid input: empty command");
        let err = Error::config("bad level");
        assert_eq!(err.to_string(), "Configuration error: bad level");
    }

    #[test]
    fn test_already_configured_display() {
        let err = Error::AlreadyConfigured("ci".to_string());
        assert_eq!(err.to_string(), "Logger 'ci' is already configured");
    }
}
