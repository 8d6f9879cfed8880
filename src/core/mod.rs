//! Core infrastructure shared by every stage
//!
//! Error types, the working directory lock, and terminal output.

pub mod error;
pub mod lock;
pub mod output;
