//! YAML structured log messages.
//!
//! A [`StructuredMessage`] renders its positional values as a single YAML
//! document so log lines stay machine readable:
//!
//! ```rust,ignore
//! use opskit_util::structured_message;
//!
//! tracing::info!("{}", structured_message!("build", 42, true));
//! // 2024-01-01 12:00:00 INFO - - build
//! //   - 42
//! //   - true
//! ```

use crate::Result;
use serde::Serialize;
use std::fmt;

pub use serde_yaml::Value;

/// An ordered list of values rendered as a YAML document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredMessage {
    args: Vec<Value>,
}

impl StructuredMessage {
    /// Create a message from positional values.
    pub fn new(args: Vec<Value>) -> Self {
        Self { args }
    }

    /// Append a value.
    pub fn push(&mut self, value: impl Into<Value>) -> &mut Self {
        self.args.push(value.into());
        self
    }

    /// Append any serializable value.
    pub fn push_serialized<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        self.args.push(serde_yaml::to_value(value)?);
        Ok(self)
    }

    /// The positional values.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Render the message, without the trailing newline.
    pub fn render(&self) -> Result<String> {
        let mut rendered = serde_yaml::to_string(&[&self.args])?;
        if rendered.ends_with('\n') {
            rendered.pop();
        }
        Ok(rendered)
    }
}

impl fmt::Display for StructuredMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.render().map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

/// Build a [`StructuredMessage`] from positional values.
///
/// Each argument must convert into a YAML [`Value`] (strings, numbers,
/// booleans, vectors of those).
#[macro_export]
macro_rules! structured_message {
    ($($arg:expr),* $(,)?) => {
        $crate::message::StructuredMessage::new(vec![
            $(::std::convert::Into::<$crate::message::Value>::into($arg)),*
        ])
    };
}
