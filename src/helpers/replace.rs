//! Stale file replacement
//!
//! Clears every replacement target first, then moves each freshly extracted
//! file onto the name its stale counterpart had.

use crate::core::error::Result;
use crate::core::output;
use crate::manifest::Replacement;
use std::path::{Path, PathBuf};

use super::internal::fs_utils;

/// One applied replacement, with paths resolved against the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    pub from: PathBuf,
    pub to: PathBuf,
    /// Whether a stale file was removed from `to` first.
    pub removed_stale: bool,
}

/// Apply `replacements` under `work_dir`.
///
/// A missing stale file is fine; a missing source is not.
pub fn apply(work_dir: &Path, replacements: &[Replacement]) -> Result<Vec<Replaced>> {
    let mut removed = Vec::with_capacity(replacements.len());
    for r in replacements {
        let to = work_dir.join(&r.to);
        let was_there = fs_utils::remove_if_exists(&to)?;
        if was_there {
            output::detail(&format!("removed stale {}", r.to.display()));
        }
        removed.push(was_there);
    }

    let mut applied = Vec::with_capacity(replacements.len());
    for (r, removed_stale) in replacements.iter().zip(removed) {
        let from = work_dir.join(&r.from);
        let to = work_dir.join(&r.to);
        fs_utils::move_file(&from, &to)?;
        output::detail(&format!("{} -> {}", r.from.display(), r.to.display()));
        applied.push(Replaced {
            from,
            to,
            removed_stale,
        });
    }

    Ok(applied)
}
