//! Persistent fatal-error marker.
//!
//! Once a cycle fails, the marker file holds the reason and the process
//! refuses to start another cycle until an operator clears it. Clearing is
//! never automatic.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{error, info, warn};

use crate::error::{RiskError, RiskResult};

/// File-backed stop latch.
#[derive(Debug, Clone)]
pub struct ErrorMarker {
    path: PathBuf,
}

impl ErrorMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True iff the marker file exists and holds non-whitespace content.
    ///
    /// An unreadable marker counts as set.
    #[must_use]
    pub fn has_unresolved_error(&self) -> bool {
        match fs::read_to_string(&self.path) {
            Ok(content) => !content.trim().is_empty(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Error marker unreadable, treating as set");
                true
            }
        }
    }

    /// Contents of the marker, if any.
    pub fn reason(&self) -> Option<String> {
        fs::read_to_string(&self.path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Append `<RFC3339 timestamp> <reason>` to the marker.
    pub fn record(&self, reason: &str) -> RiskResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        let line = reason.replace('\n', " ");
        writeln!(file, "{} {}", Utc::now().to_rfc3339(), line).map_err(|e| self.io_error(e))?;

        error!(path = %self.path.display(), reason = %line, "FATAL ERROR RECORDED");
        Ok(())
    }

    /// Operator reset: truncate the marker.
    pub fn clear(&self) -> RiskResult<()> {
        match fs::metadata(&self.path) {
            Ok(_) => {
                let previous = self.reason();
                fs::write(&self.path, b"").map_err(|e| self.io_error(e))?;
                info!(path = %self.path.display(), previous_reason = ?previous, "Error marker cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> RiskError {
        RiskError::MarkerIo {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_marker_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        let marker = ErrorMarker::new(dir.path().join("error.log"));

        assert!(!marker.has_unresolved_error());
        assert!(marker.reason().is_none());
    }

    #[test]
    fn test_whitespace_marker_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("error.log");
        fs::write(&path, "  \n\t\n").unwrap();

        assert!(!ErrorMarker::new(&path).has_unresolved_error());
    }

    #[test]
    fn test_record_creates_dirs_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let marker = ErrorMarker::new(dir.path().join("logs").join("error.log"));

        marker.record("buy order 1 rejected").unwrap();
        marker.record("second\nfailure").unwrap();

        assert!(marker.has_unresolved_error());
        let content = fs::read_to_string(marker.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" buy order 1 rejected"));
        assert!(lines[1].ends_with(" second failure"));
    }

    #[test]
    fn test_clear_resets_marker() {
        let dir = tempfile::tempdir().unwrap();
        let marker = ErrorMarker::new(dir.path().join("error.log"));

        marker.clear().unwrap();
        marker.record("boom").unwrap();
        assert!(marker.has_unresolved_error());

        marker.clear().unwrap();
        assert!(!marker.has_unresolved_error());
        assert!(marker.path().exists());
    }
}
