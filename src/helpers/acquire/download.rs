//! Archive download
//!
//! Streams a remote file into a temporary file next to its destination and
//! only moves it into place once the transfer has completed and, when a
//! checksum is given, verified. A failed, truncated or mismatching download
//! never appears under the destination name.

use crate::core::error::{Result, StageError};
use crate::core::output;
use crate::manifest::Checksum;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use super::super::internal::fs_utils;
use super::super::internal::progress::{self, ProgressGuard, upgrade_to_bytes};
use super::super::internal::url_utils::redact_url;
use super::verify;

/// Default HTTP timeout in seconds
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;

const USER_AGENT: &str = concat!("quetoo-prepare/", env!("CARGO_PKG_VERSION"));

/// Get HTTP timeout from `PREPARE_HTTP_TIMEOUT` or use default.
/// Cached (only reads env var once).
fn get_http_timeout() -> Duration {
    static TIMEOUT: OnceLock<Duration> = OnceLock::new();
    *TIMEOUT.get_or_init(|| {
        let secs = std::env::var("PREPARE_HTTP_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        Duration::from_secs(secs.clamp(5, 3600))
    })
}

/// Download `url` to `dest`. Returns the number of bytes written.
///
/// Non-2xx responses are errors. Nothing is written to `dest` unless the
/// whole body was received and matches `checksum`.
pub fn download(url: &str, dest: &Path, checksum: Option<&Checksum>) -> Result<u64> {
    fs_utils::ensure_parent_dir(dest)?;

    let filename = dest
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "download".to_string());

    output::detail(&format!("downloading {} from {}", filename, redact_url(url)));

    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut staging = tempfile::Builder::new()
        .prefix(&format!(".{}.", filename))
        .suffix(".part")
        .tempfile_in(parent)
        .map_err(StageError::io("create temporary file in", parent))?;

    let total_bytes = fetch_into(url, staging.as_file_mut(), &filename)?;

    // The staging file is removed when dropped on the error path.
    if let Some(checksum) = checksum {
        verify::verify_checksum(staging.path(), checksum).map_err(|e| match e {
            StageError::ChecksumMismatch {
                algorithm,
                expected,
                actual,
                ..
            } => StageError::ChecksumMismatch {
                path: dest.to_path_buf(),
                algorithm,
                expected,
                actual,
            },
            other => other,
        })?;
    }

    staging
        .persist(dest)
        .map_err(|e| StageError::io("write", dest)(e.error))?;

    output::detail(&format!("downloaded {} ({} bytes)", filename, total_bytes));
    Ok(total_bytes)
}

/// Perform the GET and stream the body into `file` with a progress bar.
fn fetch_into(url: &str, file: &mut std::fs::File, filename: &str) -> Result<u64> {
    let pb = progress::create_spinner(&format!("downloading {}", filename));
    let _guard = ProgressGuard::new(&pb);

    let response = ureq::get(url)
        .timeout(get_http_timeout())
        .set("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| match e {
            ureq::Error::Status(status, _) => StageError::HttpStatus {
                url: redact_url(url),
                status,
            },
            other => StageError::Download {
                url: redact_url(url),
                reason: other.to_string(),
            },
        })?;

    if let Some(len) = response
        .header("content-length")
        .and_then(|s| s.parse().ok())
    {
        upgrade_to_bytes(&pb, len);
    }

    let mut reader = response.into_reader();
    let mut buffer = [0u8; 8192];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| StageError::Download {
            url: redact_url(url),
            reason: format!("read error: {}", e),
        })?;

        if bytes_read == 0 {
            break;
        }

        file.write_all(&buffer[..bytes_read])
            .map_err(|e| StageError::Download {
                url: redact_url(url),
                reason: format!("write error: {}", e),
            })?;

        total_bytes += bytes_read as u64;
        pb.set_position(total_bytes);
    }

    file.flush().map_err(|e| StageError::Download {
        url: redact_url(url),
        reason: format!("write error: {}", e),
    })?;

    Ok(total_bytes)
}
