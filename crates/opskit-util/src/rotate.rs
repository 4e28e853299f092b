//! Size-capped rotating log file.
//!
//! The writer appends to `path` until a write would take the file to
//! `max_bytes` or beyond. The file is then rotated: `path.{n-1}` becomes
//! `path.{n}` down to `path` becoming `path.1`, the oldest backup beyond
//! `backup_count` is discarded, and writing continues in a fresh `path`.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing_subscriber::fmt::MakeWriter;

/// Default size cap per file (512 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 512 * 1024 * 1024;

/// Shared handle to a rotating log file.
///
/// Cloning is cheap; all clones write to the same file under a lock.
#[derive(Debug, Clone)]
pub struct RotatingFileWriter {
    inner: Arc<Mutex<RotatingFile>>,
}

#[derive(Debug)]
struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backup_count: usize,
    file: File,
    size: u64,
}

impl RotatingFileWriter {
    /// Open (or create) `path` for appending.
    ///
    /// Rotation is disabled when either `max_bytes` or `backup_count` is zero.
    pub fn new(path: impl AsRef<Path>, max_bytes: u64, backup_count: usize) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = open_append(&path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            inner: Arc::new(Mutex::new(RotatingFile {
                path,
                max_bytes,
                backup_count,
                file,
                size,
            })),
        })
    }

    /// Path of the active log file.
    pub fn path(&self) -> PathBuf {
        self.lock().path.clone()
    }

    /// Bytes written to the active file so far.
    pub fn size(&self) -> u64 {
        self.lock().size
    }

    /// Path of the `index`-th backup (`1` is the most recent).
    pub fn backup_path(&self, index: usize) -> PathBuf {
        backup_path(&self.lock().path, index)
    }

    fn lock(&self) -> MutexGuard<'_, RotatingFile> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RotatingFile {
    fn should_rollover(&self, incoming: usize) -> bool {
        self.max_bytes > 0
            && self.backup_count > 0
            && self.size > 0
            && self.size + incoming as u64 >= self.max_bytes
    }

    fn rollover(&mut self) -> io::Result<()> {
        self.file.flush()?;

        for index in (1..self.backup_count).rev() {
            let src = backup_path(&self.path, index);
            if src.exists() {
                let dst = backup_path(&self.path, index + 1);
                if dst.exists() {
                    std::fs::remove_file(&dst)?;
                }
                std::fs::rename(&src, &dst)?;
            }
        }

        let first = backup_path(&self.path, 1);
        if first.exists() {
            std::fs::remove_file(&first)?;
        }
        if self.path.exists() {
            std::fs::rename(&self.path, &first)?;
        }

        self.file = open_append(&self.path)?;
        self.size = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.should_rollover(buf.len()) {
            self.rollover()?;
        }
        let written = self.file.write(buf)?;
        self.size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().flush()
    }
}

/// Locked writer handed out per event by [`RotatingFileWriter`].
pub struct RotatingFileGuard<'a>(MutexGuard<'a, RotatingFile>);

impl Write for RotatingFileGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingFileGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingFileGuard(self.lock())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{index}"));
    PathBuf::from(name)
}
