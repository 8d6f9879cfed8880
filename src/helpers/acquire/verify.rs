//! Archive integrity checks
//!
//! - `verify_checksum(path, checksum)` - digest check against a manifest checksum
//! - `verify_readable_zip(path)` - structural check that the central directory and
//!   every local entry header parse

use crate::core::error::{Result, StageError};
use crate::core::output;
use crate::manifest::Checksum;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::super::internal::hash;

/// Verify a file against a manifest checksum.
pub fn verify_checksum(path: &Path, checksum: &Checksum) -> Result<()> {
    output::detail(&format!(
        "verifying {} of {}",
        checksum.algorithm.name().to_lowercase(),
        path.display()
    ));
    hash::verify_file_hash(path, &checksum.value, checksum.algorithm)
}

/// Verify a file opens as a zip archive and every entry header is readable.
pub fn verify_readable_zip(path: &Path) -> Result<()> {
    let file = File::open(path).map_err(StageError::io("open", path))?;
    let mut archive =
        zip::ZipArchive::new(BufReader::new(file)).map_err(StageError::archive(path))?;
    for i in 0..archive.len() {
        archive.by_index(i).map_err(StageError::archive(path))?;
    }
    Ok(())
}
