//! Configuration & shared types
//!
//! Closed type definitions, the error taxonomy, and control-surface paths.

pub mod paths;
pub mod types;

pub use paths::ControlPaths;
pub use types::*;
