//! fconvert - batch media conversion launcher
//!
//! This library crate exposes the conversion orchestration engine for
//! integration testing; the `fconvert` binary is a thin argument-parsing
//! layer on top of it.

pub mod conversion;
pub mod progress;
