//! Flat-file error log for connection failures
//!
//! Each entry is `[<local timestamp>]`, the message, and a blank line.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use madang_core::CoreError;

/// Failures the database engine reported
pub const DB_ERROR_LOG: &str = "db_error_log.txt";
/// Every other failure (configuration, missing files, I/O)
pub const GENERAL_ERROR_LOG: &str = "general_error_log.txt";

#[derive(Debug, Clone)]
pub struct ErrorLog {
    dir: PathBuf,
}

impl ErrorLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Append a connection failure to the file matching its origin.
    ///
    /// Never fails; a log that cannot be written is only traced.
    pub fn record(&self, error: &CoreError) {
        let file = if error.is_provider_reported() {
            DB_ERROR_LOG
        } else {
            GENERAL_ERROR_LOG
        };
        let path = self.dir.join(file);

        if let Err(e) = Self::append(&path, &error.to_string()) {
            tracing::warn!(path = %path.display(), error = %e, "failed to write error log");
        }
    }

    fn append(path: &Path, message: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        write!(
            file,
            "[{}]\n{}\n\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            message
        )
    }
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self::new(".")
    }
}
