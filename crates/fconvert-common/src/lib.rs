//! Shared building blocks for fconvert.
//!
//! This crate holds the pieces shared between the CLI and the converter
//! invocation layer: the target format type, the destination path policy,
//! and the common error type.

pub mod error;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use types::TargetFormat;
