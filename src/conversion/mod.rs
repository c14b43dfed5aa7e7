//! Conversion orchestration.
//!
//! This module is the policy layer around the external converters. It
//! includes:
//!
//! - The per-run request and settings types
//! - Single-job execution with skip/overwrite/cleanup handling
//! - Fan-out over the input file list with bounded concurrency
//!
//! Every input file resolves to exactly one [`JobOutcome`]; nothing in here
//! aborts the run on a per-file failure.

mod job;
mod orchestrator;

pub use job::{run_job, FailureKind, JobOutcome};
pub use orchestrator::{run_all, RunSummary};

use std::num::NonZeroUsize;
use std::path::PathBuf;

use fconvert_common::TargetFormat;

/// One source file to be converted to the target format.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Source file path as given on the command line.
    pub source: PathBuf,
    /// Requested target format.
    pub format: TargetFormat,
}

/// Run-wide conversion options, immutable after argument parsing.
#[derive(Debug, Clone, Default)]
pub struct ConversionSettings {
    /// Destination directory for converted files; the source's directory
    /// when unset.
    pub output_dir: Option<PathBuf>,
    /// Overwrite existing destinations instead of skipping them.
    pub force: bool,
    /// Delete source files after successful conversion.
    pub cleanup_source: bool,
    /// Emit per-file report lines.
    pub verbose: bool,
    /// Render the live completion counter.
    pub show_progress: bool,
    /// Maximum concurrent conversions; unbounded when unset, sequential
    /// when set to 1.
    pub max_concurrency: Option<NonZeroUsize>,
}
