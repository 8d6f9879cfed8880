//! Internal utility modules
//!
//! Shared functionality used by the acquire, extract and replace helpers.

pub mod fs_utils;
pub mod hash;
pub mod progress;
pub mod url_utils;
