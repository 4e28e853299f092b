//! Filesystem helpers.

use crate::Result;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Ensure a directory exists, creating it if it doesn't.
///
/// Only the last path component is created; a missing parent is an error.
/// An existing directory is left alone. An existing non-directory at `path`
/// is reported as an IO error.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match std::fs::create_dir(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Created directory");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(e.into()),
    }
}
