//! Staging manifests
//!
//! A manifest names the archive to fetch, the glob rules that carve it up
//! into destination directories, and the renames applied afterwards. The
//! built-in manifest stages OpenAL Soft for the Quetoo Visual Studio build;
//! a TOML file with the same shape can stage anything else:
//!
//! ```toml
//! name = "OpenAL"
//! url = "http://kcat.strangesoft.net/openal-binaries/openal-soft-1.18.2-bin.zip"
//! archive = "tmp2.zip"
//! overwrite = "all"          # or "skip"
//! verify_cache = false
//! checksum = { algorithm = "sha256", value = "..." }   # optional
//!
//! [[extract]]
//! pattern = "openal-soft-1.18.2-bin/include/AL/*.h"
//! dest = "AL"
//!
//! [[replace]]
//! from = "bin/Win32/soft_oal.dll"
//! to = "bin/Win32/OpenAL32.dll"
//! ```

use crate::core::error::{Result, StageError};
use crate::helpers::internal::fs_utils::is_safe_path;
use crate::helpers::internal::hash::HashAlgorithm;
use crate::helpers::internal::url_utils::{UrlScheme, validate_url_scheme};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const OPENAL_VERSION: &str = "1.18.2";

/// What to do when an extracted file already exists in its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwriteMode {
    /// Overwrite silently.
    #[default]
    All,
    /// Keep the existing file.
    Skip,
}

/// Expected digest of the archive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Checksum {
    pub algorithm: HashAlgorithm,
    pub value: String,
}

/// Extract every archive entry matching `pattern` into `dest`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractRule {
    pub pattern: String,
    pub dest: PathBuf,
}

/// Move `from` to `to`, removing a stale `to` first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Replacement {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub name: String,
    pub url: String,
    pub archive: PathBuf,
    #[serde(default)]
    pub checksum: Option<Checksum>,
    #[serde(default)]
    pub verify_cache: bool,
    #[serde(default)]
    pub overwrite: OverwriteMode,
    #[serde(default)]
    pub extract: Vec<ExtractRule>,
    #[serde(default)]
    pub replace: Vec<Replacement>,
}

impl Manifest {
    /// The OpenAL Soft binary distribution, laid out for `libs/openal`.
    pub fn openal() -> Self {
        let root = format!("openal-soft-{}-bin", OPENAL_VERSION);
        let rule = |pattern: &str, dest: &str| ExtractRule {
            pattern: format!("{}/{}", root, pattern),
            dest: PathBuf::from(dest),
        };
        let rename = |from: &str, to: &str| Replacement {
            from: PathBuf::from(from),
            to: PathBuf::from(to),
        };

        Self {
            name: "OpenAL".to_string(),
            url: format!(
                "http://kcat.strangesoft.net/openal-binaries/openal-soft-{}-bin.zip",
                OPENAL_VERSION
            ),
            archive: PathBuf::from("tmp2.zip"),
            checksum: None,
            verify_cache: false,
            overwrite: OverwriteMode::All,
            extract: vec![
                rule("include/AL/*.h", "AL"),
                rule("libs/Win32/*.lib", "libs/Win32"),
                rule("libs/Win64/*.lib", "libs/x64"),
                rule("bin/Win32/*.dll", "bin/Win32"),
                rule("bin/Win64/*.dll", "bin/x64"),
            ],
            replace: vec![
                rename("bin/Win32/soft_oal.dll", "bin/Win32/OpenAL32.dll"),
                rename("bin/x64/soft_oal.dll", "bin/x64/OpenAL32.dll"),
            ],
        }
    }

    /// Parse and validate a manifest from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let manifest: Self =
            toml::from_str(content).map_err(|e| StageError::Manifest(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read, parse and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(StageError::io("read", path))?;
        Self::from_toml(&content).map_err(|e| match e {
            StageError::Manifest(msg) => {
                StageError::Manifest(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Check the manifest is internally consistent and only touches
    /// paths below the working directory.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(StageError::Manifest(msg)) };

        validate_url_scheme(&self.url, &[UrlScheme::Http, UrlScheme::Https])
            .map_err(StageError::Manifest)?;

        check_relative("archive", &self.archive)?;

        if self.extract.is_empty() {
            return invalid("at least one [[extract]] rule is required".to_string());
        }
        for rule in &self.extract {
            if let Err(e) = glob::Pattern::new(&rule.pattern) {
                return invalid(format!("invalid pattern '{}': {}", rule.pattern, e));
            }
            check_relative("extract.dest", &rule.dest)?;
        }

        for r in &self.replace {
            check_relative("replace.from", &r.from)?;
            check_relative("replace.to", &r.to)?;
            if r.from == r.to {
                return invalid(format!(
                    "replace.from and replace.to are both '{}'",
                    r.from.display()
                ));
            }
        }

        if let Some(checksum) = &self.checksum {
            let Ok(digest) = hex::decode(&checksum.value) else {
                return invalid(format!("checksum value '{}' is not hex", checksum.value));
            };
            let expected = checksum.algorithm.digest_len();
            if digest.len() != expected {
                return invalid(format!(
                    "{} checksum must be {} hex digits, got {}",
                    checksum.algorithm.name().to_lowercase(),
                    expected * 2,
                    checksum.value.len()
                ));
            }
        }

        Ok(())
    }
}

fn check_relative(field: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(StageError::Manifest(format!("{} must not be empty", field)));
    }
    if !is_safe_path(path) {
        return Err(StageError::Manifest(format!(
            "{} must be a relative path without '..': {}",
            field,
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
name = "zlib"
url = "https://example.com/zlib.zip"
archive = "zlib.zip"

[[extract]]
pattern = "zlib/include/*.h"
dest = "include"
"#;

    #[test]
    fn test_openal_manifest_is_valid() {
        let m = Manifest::openal();
        m.validate().unwrap();
        assert_eq!(m.archive, PathBuf::from("tmp2.zip"));
        assert_eq!(m.extract.len(), 5);
        assert_eq!(m.replace.len(), 2);
        assert_eq!(m.overwrite, OverwriteMode::All);
        assert!(m.checksum.is_none());
    }

    #[test]
    fn test_openal_destinations() {
        let dests: Vec<_> = Manifest::openal()
            .extract
            .into_iter()
            .map(|r| r.dest)
            .collect();
        assert_eq!(
            dests,
            ["AL", "libs/Win32", "libs/x64", "bin/Win32", "bin/x64"].map(PathBuf::from)
        );
    }

    #[test]
    fn test_openal_renames_target_runtime_dirs() {
        let m = Manifest::openal();
        assert_eq!(m.replace[0].from, PathBuf::from("bin/Win32/soft_oal.dll"));
        assert_eq!(m.replace[0].to, PathBuf::from("bin/Win32/OpenAL32.dll"));
        assert_eq!(m.replace[1].from, PathBuf::from("bin/x64/soft_oal.dll"));
        assert_eq!(m.replace[1].to, PathBuf::from("bin/x64/OpenAL32.dll"));
    }

    #[test]
    fn test_parse_minimal_uses_defaults() {
        let m = Manifest::from_toml(MINIMAL).unwrap();
        assert_eq!(m.name, "zlib");
        assert_eq!(m.overwrite, OverwriteMode::All);
        assert!(!m.verify_cache);
        assert!(m.replace.is_empty());
    }

    #[test]
    fn test_parse_full() {
        let toml = r#"
name = "zlib"
url = "https://example.com/zlib.zip"
archive = "cache/zlib.zip"
verify_cache = true
overwrite = "skip"
checksum = { algorithm = "blake3", value = "abababababababababababababababababababababababababababababababab" }

[[extract]]
pattern = "zlib/include/*.h"
dest = "include"

[[replace]]
from = "lib/zlib1.dll"
to = "lib/zlib.dll"
"#;

        let m = Manifest::from_toml(toml).unwrap();
        assert!(m.verify_cache);
        assert_eq!(m.overwrite, OverwriteMode::Skip);
        assert_eq!(
            m.checksum,
            Some(Checksum {
                algorithm: HashAlgorithm::Blake3,
                value: "ab".repeat(32)
            })
        );
        assert_eq!(m.replace[0].to, PathBuf::from("lib/zlib.dll"));
    }

    #[test]
    fn test_rejects_unknown_field() {
        let toml = MINIMAL.replace("archive =", "archvie =");
        assert!(matches!(
            Manifest::from_toml(&toml),
            Err(StageError::Manifest(_))
        ));
    }

    #[test]
    fn test_rejects_bad_url_scheme() {
        let toml = MINIMAL.replace("https://", "ftp://");
        let err = Manifest::from_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("URL must use one of"));
    }

    #[test]
    fn test_rejects_path_escape() {
        let toml = MINIMAL.replace("dest = \"include\"", "dest = \"../include\"");
        let err = Manifest::from_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("extract.dest"));
    }

    #[test]
    fn test_rejects_missing_rules() {
        let toml = MINIMAL.split("[[extract]]").next().unwrap();
        let err = Manifest::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn test_rejects_invalid_glob() {
        let toml = MINIMAL.replace("zlib/include/*.h", "zlib/[include");
        let err = Manifest::from_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("invalid pattern"));
    }

    #[test]
    fn test_rejects_non_hex_checksum() {
        let mut m = Manifest::openal();
        m.checksum = Some(Checksum {
            algorithm: HashAlgorithm::Sha256,
            value: "not-hex".into(),
        });
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_rejects_checksum_of_wrong_length() {
        let mut m = Manifest::openal();
        m.checksum = Some(Checksum {
            algorithm: HashAlgorithm::Sha256,
            value: "abcd".into(),
        });
        let err = m.validate().unwrap_err();
        assert!(err.to_string().contains("sha256 checksum must be 64 hex digits"));

        // A sha256-sized digest is too short for sha512
        m.checksum = Some(Checksum {
            algorithm: HashAlgorithm::Sha512,
            value: "ab".repeat(32),
        });
        assert!(m.validate().is_err());

        m.checksum = Some(Checksum {
            algorithm: HashAlgorithm::Sha512,
            value: "ab".repeat(64),
        });
        m.validate().unwrap();
    }

    #[test]
    fn test_load_reports_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "name = ").unwrap();

        let err = Manifest::load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
