//! Stage helpers
//!
//! - `acquire` - make the archive present (cache, download, verify)
//! - `extract` - glob rules over the archive into destination directories
//! - `replace` - clear stale files and rename extracted ones into place

pub mod acquire;
pub mod extract;
pub(crate) mod internal;
pub mod replace;

pub use internal::hash::{FileHashes, HashAlgorithm, compute_all_hashes};
