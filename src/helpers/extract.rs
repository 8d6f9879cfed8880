//! Zip extraction by glob
//!
//! Each rule selects archive entries by matching their full names against a
//! glob and writes the matches *flat* into the destination directory: only
//! the entry's file name is kept, its directories inside the archive are
//! dropped. A rule that matches nothing is an error, since it almost always
//! means the upstream archive layout changed.

use crate::core::error::{Result, StageError};
use crate::manifest::OverwriteMode;
use glob::{MatchOptions, Pattern};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use super::internal::fs_utils;

/// `*` and `?` never cross a `/` in an entry name.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Result of applying one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    /// Files written into the destination.
    pub written: Vec<PathBuf>,
    /// Files left alone because they already existed (`OverwriteMode::Skip`).
    pub skipped: Vec<PathBuf>,
}

impl Extracted {
    pub fn total(&self) -> usize {
        self.written.len() + self.skipped.len()
    }
}

/// Open a zip archive for repeated rule application.
pub fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let file = File::open(path).map_err(StageError::io("open", path))?;
    ZipArchive::new(BufReader::new(file)).map_err(StageError::archive(path))
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern)
        .map_err(|e| StageError::Manifest(format!("invalid pattern '{}': {}", pattern, e)))
}

/// Names of the file entries matching `pattern`.
pub fn matching_entries<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    pattern: &str,
) -> Result<Vec<String>> {
    let pattern = compile(pattern)?;
    Ok(archive
        .file_names()
        .filter(|name| !name.ends_with('/'))
        .filter(|name| pattern.matches_with(name, MATCH_OPTIONS))
        .map(str::to_string)
        .collect())
}

/// Extract every file entry matching `pattern` flat into `dest`.
///
/// `archive_path` is only used for error messages.
pub fn extract_matching<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    archive_path: &Path,
    pattern: &str,
    dest: &Path,
    mode: OverwriteMode,
) -> Result<Extracted> {
    let compiled = compile(pattern)?;
    let mut result = Extracted::default();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(StageError::archive(archive_path))?;

        if entry.is_dir() || !compiled.matches_with(entry.name(), MATCH_OPTIONS) {
            continue;
        }

        // Skip entries with unsafe paths
        let Some(file_name) = entry
            .enclosed_name()
            .and_then(|p| p.file_name().map(PathBuf::from))
        else {
            continue;
        };

        if result.total() == 0 {
            std::fs::create_dir_all(dest).map_err(StageError::io("create directory", dest))?;
        }

        let outpath = dest.join(file_name);

        match mode {
            OverwriteMode::Skip if outpath.exists() => {
                result.skipped.push(outpath);
                continue;
            }
            // A previous run may have left a read-only copy behind.
            OverwriteMode::All => {
                fs_utils::remove_if_exists(&outpath)?;
            }
            OverwriteMode::Skip => {}
        }

        let mut outfile = File::create(&outpath).map_err(StageError::io("create", &outpath))?;
        std::io::copy(&mut entry, &mut outfile).map_err(StageError::io("write", &outpath))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode & 0o7777))
                    .map_err(StageError::io("set permissions on", &outpath))?;
            }
        }

        result.written.push(outpath);
    }

    if result.total() == 0 {
        return Err(StageError::NoMatches {
            archive: archive_path.to_path_buf(),
            pattern: pattern.to_string(),
        });
    }

    Ok(result)
}
