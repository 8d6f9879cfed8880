//! The dependency stager
//!
//! Runs the three stages strictly in order against one working directory:
//!
//! 1. **fetch** - download the archive unless a cached copy is present
//! 2. **extract** - apply every extraction rule
//! 3. **replace** - clear stale files, rename extracted ones into place
//!
//! Any failure aborts the run where it happened. Nothing is rolled back.

use crate::core::error::Result;
use crate::core::lock::acquire_dir_lock;
use crate::core::output;
use crate::helpers::acquire::{self, FetchOptions, FetchOutcome};
use crate::helpers::extract::{self, Extracted};
use crate::helpers::internal::progress::with_spinner;
use crate::helpers::replace::{self, Replaced};
use crate::helpers::{FileHashes, compute_all_hashes};
use crate::manifest::{ExtractRule, Manifest};
use std::path::PathBuf;

const STAGES: usize = 3;

/// Everything a successful run did.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub fetch: FetchOutcome,
    pub extracted: Vec<(ExtractRule, Extracted)>,
    pub replaced: Vec<Replaced>,
}

/// Archive entries one rule would extract.
#[derive(Debug, Clone)]
pub struct RuleMatches {
    pub rule: ExtractRule,
    pub entries: Vec<String>,
}

pub struct Stager {
    work_dir: PathBuf,
    manifest: Manifest,
    fetch_options: FetchOptions,
}

impl Stager {
    pub fn new(work_dir: impl Into<PathBuf>, manifest: Manifest) -> Self {
        Self {
            work_dir: work_dir.into(),
            manifest,
            fetch_options: FetchOptions::default(),
        }
    }

    pub fn with_fetch_options(mut self, fetch_options: FetchOptions) -> Self {
        self.fetch_options = fetch_options;
        self
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Absolute (or work-dir relative) location of the cached archive.
    pub fn archive_path(&self) -> PathBuf {
        self.work_dir.join(&self.manifest.archive)
    }

    /// Run all three stages.
    pub fn run(&self) -> Result<StageReport> {
        let _lock = acquire_dir_lock(&self.work_dir)?;
        output::action(&format!("Staging {}", self.manifest.name));

        output::stage(1, STAGES, "fetch");
        let fetch = self.fetch_stage()?;

        output::stage(2, STAGES, "extract");
        let extracted = self.extract_stage()?;

        output::stage(3, STAGES, "replace");
        let replaced = replace::apply(&self.work_dir, &self.manifest.replace)?;

        output::success(&format!("{} staged", self.manifest.name));
        Ok(StageReport {
            fetch,
            extracted,
            replaced,
        })
    }

    /// Only make sure the archive is present.
    pub fn fetch(&self) -> Result<FetchOutcome> {
        let _lock = acquire_dir_lock(&self.work_dir)?;
        output::action(&format!("Fetching {}", self.manifest.name));
        self.fetch_stage()
    }

    /// Report what each rule matches in the cached archive. Writes nothing.
    pub fn list(&self) -> Result<Vec<RuleMatches>> {
        let archive_path = self.archive_path();
        let mut archive = extract::open_archive(&archive_path)?;

        self.manifest
            .extract
            .iter()
            .map(|rule| {
                Ok(RuleMatches {
                    rule: rule.clone(),
                    entries: extract::matching_entries(&mut archive, &rule.pattern)?,
                })
            })
            .collect()
    }

    /// Digests of the cached archive.
    pub fn hash(&self) -> Result<FileHashes> {
        compute_all_hashes(&self.archive_path())
    }

    /// Delete the cached archive. Returns whether there was one.
    pub fn clean(&self) -> Result<bool> {
        let _lock = acquire_dir_lock(&self.work_dir)?;
        crate::helpers::internal::fs_utils::remove_if_exists(&self.archive_path())
    }

    fn fetch_stage(&self) -> Result<FetchOutcome> {
        let mut opts = self.fetch_options;
        opts.verify_cache |= self.manifest.verify_cache;

        acquire::ensure_archive(
            &self.manifest.url,
            &self.archive_path(),
            self.manifest.checksum.as_ref(),
            opts,
        )
    }

    fn extract_stage(&self) -> Result<Vec<(ExtractRule, Extracted)>> {
        let archive_path = self.archive_path();
        let mut archive = extract::open_archive(&archive_path)?;
        let mut results = Vec::with_capacity(self.manifest.extract.len());

        for rule in &self.manifest.extract {
            let dest = self.work_dir.join(&rule.dest);
            let extracted = with_spinner(&format!("extracting {}", rule.pattern), || {
                extract::extract_matching(
                    &mut archive,
                    &archive_path,
                    &rule.pattern,
                    &dest,
                    self.manifest.overwrite,
                )
            })?;

            output::sub_action(&format!(
                "{} ({} written, {} kept)",
                rule.dest.display(),
                extracted.written.len(),
                extracted.skipped.len()
            ));
            results.push((rule.clone(), extracted));
        }

        Ok(results)
    }
}
