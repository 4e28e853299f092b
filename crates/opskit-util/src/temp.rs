//! Scoped temporary directories.
//!
//! # Example
//!
//! ```rust,ignore
//! use opskit_util::with_temp_dir;
//!
//! let listing = with_temp_dir(|dir| {
//!     std::fs::write(dir.join("manifest.yaml"), "---")?;
//!     let dir = dir.display().to_string();
//!     run_shell_command(vec!["ls", dir.as_str()], false)
//! })?;
//! // The directory is gone here, even if the closure failed.
//! ```

use crate::Result;
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, warn};

const TEMP_PREFIX: &str = "opskit-";

/// RAII guard owning a temporary directory.
///
/// The directory and everything under it is removed when the guard is
/// dropped, including during unwinding.
#[derive(Debug)]
pub struct ScopedTempDir {
    inner: Option<TempDir>,
}

impl ScopedTempDir {
    /// Create a uniquely named directory in the platform temp location.
    pub fn new() -> Result<Self> {
        let inner = tempfile::Builder::new().prefix(TEMP_PREFIX).tempdir()?;
        debug!(path = %inner.path().display(), "Created temporary directory");
        Ok(Self { inner: Some(inner) })
    }

    /// Path of the directory.
    pub fn path(&self) -> &Path {
        match &self.inner {
            Some(dir) => dir.path(),
            None => Path::new(""),
        }
    }

    /// Remove the directory now, reporting any removal error.
    pub fn close(mut self) -> Result<()> {
        match self.inner.take() {
            Some(dir) => {
                let path = dir.path().to_path_buf();
                dir.close()?;
                debug!(path = %path.display(), "Removed temporary directory");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl AsRef<Path> for ScopedTempDir {
    fn as_ref(&self) -> &Path {
        self.path()
    }
}

impl Drop for ScopedTempDir {
    fn drop(&mut self) {
        if let Some(dir) = self.inner.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                warn!(path = %path.display(), error = %e, "Failed to remove temporary directory");
            }
        }
    }
}

/// Create a temporary directory removed when the returned guard drops.
pub fn temp_dir() -> Result<ScopedTempDir> {
    ScopedTempDir::new()
}

/// Run `f` with a fresh temporary directory, removing it afterwards.
///
/// The directory is removed whether `f` succeeds, fails or panics. An error
/// from `f` takes precedence over an error removing the directory.
pub fn with_temp_dir<T, F>(f: F) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    let dir = temp_dir()?;
    let value = f(dir.path())?;
    dir.close()?;
    Ok(value)
}
