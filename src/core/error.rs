//! Stager error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while staging a dependency.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("download failed: {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("download failed: {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("archive {} is missing and network access is disabled", .0.display())]
    Offline(PathBuf),

    #[error(
        "{algorithm} integrity check failed for '{}'\n  expected: {expected}\n  got:      {actual}",
        .path.display()
    )]
    ChecksumMismatch {
        path: PathBuf,
        algorithm: &'static str,
        expected: String,
        actual: String,
    },

    #[error("cannot read archive {}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("no entries in {} match pattern '{pattern}'", .archive.display())]
    NoMatches { archive: PathBuf, pattern: String },

    #[error(
        "cannot move {} -> {}: source does not exist",
        .from.display(),
        .to.display()
    )]
    MissingSource { from: PathBuf, to: PathBuf },

    #[error("cannot {action} {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest: {0}")]
    Manifest(String),

    #[error(
        "another prepare run is active in this directory. If this is incorrect, delete '{}'",
        .0.display()
    )]
    Locked(PathBuf),
}

impl StageError {
    /// Build a `map_err` adapter that tags an I/O error with what was being done to which path.
    pub(crate) fn io(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }

    pub(crate) fn archive(path: &Path) -> impl FnOnce(zip::result::ZipError) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Archive { path, source }
    }
}

pub type Result<T, E = StageError> = std::result::Result<T, E>;
