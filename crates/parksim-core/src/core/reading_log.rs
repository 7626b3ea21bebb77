//! Append-only CSV log store for readings.
//!
//! The store is a flat text file with one header line followed by one line per
//! reading:
//!
//! ```text
//! timestamp,distance_cm
//! 2025-01-02 03:04:05,30.00
//! 2025-01-02 03:04:06,182.00
//! ```
//!
//! Records are only ever appended. Each append opens, writes and closes the
//! file so a crash can at most leave the final line truncated.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::reading::Reading;

/// Column header written once when the store is first created.
pub const HEADER: &str = "timestamp,distance_cm";

/// Handle to the log store file.
#[derive(Debug, Clone)]
pub struct ReadingLog {
    path: PathBuf,
}

impl ReadingLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the store with its header if it does not exist yet.
    ///
    /// Returns `true` when the file was created by this call. An existing
    /// store is left untouched.
    ///
    /// # Errors
    /// Returns an error if the file is missing and cannot be created.
    pub fn ensure_header(&self) -> Result<bool> {
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to create log file {}", self.path.display())
                });
            }
        };

        writeln!(file, "{HEADER}")
            .with_context(|| format!("Failed to write header to {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "created log store");
        Ok(true)
    }

    /// Appends one reading as a `timestamp,distance` line.
    ///
    /// The store must already exist (see [`ReadingLog::ensure_header`]), so a
    /// file removed mid-session is reported instead of silently recreated
    /// without its header.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or written.
    pub fn append(&self, reading: &Reading) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open log file {}", self.path.display()))?;

        writeln!(file, "{}", reading.csv_record())
            .with_context(|| format!("Failed to write to log file {}", self.path.display()))?;

        Ok(())
    }

    /// Appends a reading, downgrading failures to a warning on stderr.
    ///
    /// Returns whether the reading was persisted.
    pub fn record(&self, reading: &Reading) -> bool {
        match self.append(reading) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "reading not persisted");
                eprintln!(
                    "Warning: could not open log file {} for writing.",
                    self.path.display()
                );
                false
            }
        }
    }
}
