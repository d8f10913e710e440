//! Small platform helpers shared across modules.
//!
//! - [`path`] - Tilde expansion and relative path resolution
//! - [`thread`] - Named background threads

pub mod path;
pub mod thread;
