//! CSV step log sink.
//!
//! The environment owns the text format (header and rows); this module only
//! decides where the text goes and keeps write failures from stopping a run.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error};

/// First `<dir>/<stem>_<n>.csv` that does not exist yet, counting from 0
pub fn next_log_path(dir: impl AsRef<Path>, stem: &str) -> PathBuf {
    let dir = dir.as_ref();
    let mut n = 0usize;
    loop {
        let candidate = dir.join(format!("{stem}_{n}.csv"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Appends log text to a file, opening it lazily.
///
/// A failed write is reported through `tracing` and dropped; the next write
/// tries again.
#[derive(Debug)]
pub struct StepLogger {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    failed_writes: usize,
}

impl StepLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
            failed_writes: 0,
        }
    }

    /// Logger writing to the next free rotation name in `dir`
    pub fn rotating(dir: impl AsRef<Path>, stem: &str) -> Self {
        Self::new(next_log_path(dir, stem))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of writes that could not be persisted
    pub fn failed_writes(&self) -> usize {
        self.failed_writes
    }

    pub fn write(&mut self, text: &str) {
        if let Err(e) = self.try_write(text) {
            self.failed_writes += 1;
            self.writer = None;
            error!(path = %self.path.display(), error = %e, "failed to write step log");
        }
    }

    pub fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            if let Err(e) = w.flush() {
                self.failed_writes += 1;
                error!(path = %self.path.display(), error = %e, "failed to flush step log");
            }
        }
    }

    fn try_write(&mut self, text: &str) -> io::Result<()> {
        if self.writer.is_none() {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
            debug!(path = %self.path.display(), "opened step log");
            self.writer = Some(BufWriter::new(file));
        }

        match self.writer.as_mut() {
            Some(w) => w.write_all(text.as_bytes()),
            None => Ok(()),
        }
    }
}

impl Drop for StepLogger {
    fn drop(&mut self) {
        self.flush();
    }
}
