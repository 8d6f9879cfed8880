//! Dependency stager for the Quetoo Visual Studio build
//!
//! Fetches a pre-built third-party zip (OpenAL Soft by default), carves it
//! into the directories the solution expects, and renames the runtime
//! libraries into place.
//!
//! # Stages
//!
//! 1. **fetch** - download `archive` from `url` unless it is already cached
//! 2. **extract** - for every `[[extract]]` rule, copy the entries matching
//!    `pattern` flat into `dest`
//! 3. **replace** - for every `[[replace]]` rule, delete a stale `to` and
//!    move `from` onto it
//!
//! # Example
//!
//! ```no_run
//! use quetoo_prepare::{Manifest, Stager};
//!
//! let report = Stager::new("libs/openal", Manifest::openal()).run()?;
//! println!("{:?}", report.fetch);
//! # Ok::<(), quetoo_prepare::StageError>(())
//! ```
//!
//! # Environment
//!
//! - `PREPARE_HTTP_TIMEOUT` - HTTP timeout in seconds (default 300)

pub mod core;
pub mod helpers;
pub mod manifest;
pub mod stager;

pub use crate::core::error::{Result, StageError};
pub use crate::core::output;
pub use helpers::acquire::{FetchOptions, FetchOutcome};
pub use manifest::{Checksum, ExtractRule, Manifest, OverwriteMode, Replacement};
pub use stager::{RuleMatches, StageReport, Stager};
