//! Acquire helpers
//!
//! Make sure the archive is present in the working directory, downloading it
//! when there is no cached copy.
//!
//! A cached archive is reused as-is unless the caller asked for validation:
//! a manifest checksum verifies every copy, and `verify_cache` checks that a
//! cached copy at least parses as a zip. A cached copy that fails either
//! check is discarded and fetched again once.

pub mod download;
pub mod verify;

use crate::core::error::{Result, StageError};
use crate::core::output;
use crate::manifest::Checksum;
use std::path::Path;

use super::internal::fs_utils;

/// Switches that change how the fetch stage treats the cache and the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    /// Never touch the network; a missing archive is an error.
    pub offline: bool,
    /// Discard any cached archive first.
    pub refresh: bool,
    /// Check a cached archive parses as a zip before reusing it.
    pub verify_cache: bool,
}

/// What the fetch stage did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Cached,
    Downloaded { bytes: u64 },
}

/// Ensure `archive` exists, downloading it from `url` if needed.
pub fn ensure_archive(
    url: &str,
    archive: &Path,
    checksum: Option<&Checksum>,
    opts: FetchOptions,
) -> Result<FetchOutcome> {
    if opts.refresh && fs_utils::remove_if_exists(archive)? {
        output::detail(&format!("discarded cached {}", archive.display()));
    }

    if archive.is_file() {
        match validate_cached(archive, checksum, opts.verify_cache) {
            Ok(()) => {
                output::skip(&format!(
                    "{} already present, skipping download",
                    archive.display()
                ));
                return Ok(FetchOutcome::Cached);
            }
            Err(e) if opts.offline => return Err(e),
            Err(e) => {
                output::warning(&format!("cached archive rejected: {}", e));
                fs_utils::remove_if_exists(archive)?;
            }
        }
    }

    if opts.offline {
        return Err(StageError::Offline(archive.to_path_buf()));
    }

    let bytes = download::download(url, archive, checksum)?;

    Ok(FetchOutcome::Downloaded { bytes })
}

fn validate_cached(archive: &Path, checksum: Option<&Checksum>, verify_cache: bool) -> Result<()> {
    if let Some(checksum) = checksum {
        verify::verify_checksum(archive, checksum)?;
    }
    if verify_cache {
        verify::verify_readable_zip(archive)?;
    }
    Ok(())
}
