//! Append-only record of captured faults.
//!
//! Each captured runtime fault is written as one JSON object per line.
//! Parent directories are created on demand. The dispatcher treats journal
//! failures as non-fatal: they are logged at `warn` and otherwise ignored.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::fault::CapturedError;

/// A JSON-lines fault log on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultJournal {
    path: PathBuf,
}

impl FaultJournal {
    /// Create a journal writing to `path`. Nothing is touched until the
    /// first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The journal file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record.
    pub fn append(&self, error: &CapturedError) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let line = serde_json::to_string(error)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }
}
