//! Common filesystem utilities
//!
//! Shared filesystem operations used by the extract and replace stages.

use crate::core::error::{Result, StageError};
use std::path::{Component, Path};

/// Ensure a file's parent directory exists.
///
/// Creates the parent directory (and all ancestors) if it doesn't exist.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(StageError::io("create directory", parent))?;
    }
    Ok(())
}

/// Remove a file if it exists. Returns whether something was removed.
///
/// A missing file is not an error.
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path).map_err(StageError::io("remove", path))?;
    Ok(true)
}

/// Move/rename a file, creating parent directories as needed.
///
/// Fails with `MissingSource` when `src` does not exist.
pub fn move_file(src: &Path, dest: &Path) -> Result<()> {
    if !src.is_file() {
        return Err(StageError::MissingSource {
            from: src.to_path_buf(),
            to: dest.to_path_buf(),
        });
    }
    ensure_parent_dir(dest)?;
    std::fs::rename(src, dest).map_err(StageError::io("move", src))
}

/// Check if path is safe (no path traversal).
///
/// Rejects absolute paths and paths containing "..".
pub fn is_safe_path(path: &Path) -> bool {
    !path.is_absolute()
        && !path.has_root()
        && !path.components().any(|c| c == Component::ParentDir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_parent_dir() {
        let temp = tempdir().unwrap();
        let nested = temp.path().join("a/b/c/file.txt");

        ensure_parent_dir(&nested).unwrap();
        assert!(temp.path().join("a/b/c").exists());
    }

    #[test]
    fn test_ensure_parent_dir_already_exists() {
        let temp = tempdir().unwrap();
        ensure_parent_dir(&temp.path().join("file.txt")).unwrap();
    }

    #[test]
    fn test_remove_if_exists() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("OpenAL32.dll");
        std::fs::write(&file, "old").unwrap();

        assert!(remove_if_exists(&file).unwrap());
        assert!(!file.exists());
        // Second call is a no-op, not an error
        assert!(!remove_if_exists(&file).unwrap());
    }

    #[test]
    fn test_move_file_creates_parents() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("soft_oal.dll");
        let dest = temp.path().join("x64/OpenAL32.dll");
        std::fs::write(&src, "content").unwrap();

        move_file(&src, &dest).unwrap();

        assert!(!src.exists());
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "content");
    }

    #[test]
    fn test_move_file_missing_source() {
        let temp = tempdir().unwrap();
        let result = move_file(&temp.path().join("gone.dll"), &temp.path().join("dest.dll"));
        assert!(matches!(result, Err(StageError::MissingSource { .. })));
    }

    #[test]
    fn test_is_safe_path() {
        assert!(is_safe_path(Path::new("bin/Win32")));
        assert!(is_safe_path(Path::new("tmp2.zip")));
        assert!(!is_safe_path(Path::new("/absolute/path")));
        assert!(!is_safe_path(Path::new("../escape")));
        assert!(!is_safe_path(Path::new("libs/../../etc")));
    }
}
