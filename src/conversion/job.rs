//! A single conversion job.
//!
//! One job converts one source file to one destination under the current
//! settings. Every code path resolves to a [`JobOutcome`]; nothing escapes
//! the job boundary, so one file's failure never disturbs its siblings.

use std::fmt;
use std::path::PathBuf;

use fconvert_av::convert::{classify_stderr, command_for, FailureCause};
use fconvert_av::ToolCommand;
use fconvert_common::paths;
use tracing::debug;

use super::{ConversionRequest, ConversionSettings};

/// Probable cause of a failed job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The output directory could not be created.
    DirectoryCreation,
    /// The destination already exists and the converter refused to replace it.
    DestinationExists,
    /// The source file could not be opened by the converter.
    SourceMissing,
    /// The external converter failed; the detail carries its stderr.
    ExternalTool,
    /// A filesystem operation failed.
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::DirectoryCreation => "output directory",
            FailureKind::DestinationExists => "destination exists",
            FailureKind::SourceMissing => "source missing",
            FailureKind::ExternalTool => "converter error",
            FailureKind::Io => "I/O error",
        };
        f.write_str(s)
    }
}

/// Terminal classification of one finished job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The conversion completed. `cleanup_warning` is set when the source
    /// file could not be deleted afterwards; that never downgrades the
    /// outcome.
    Succeeded {
        destination: PathBuf,
        cleanup_warning: Option<String>,
    },
    /// Nothing was done.
    Skipped { destination: PathBuf, reason: String },
    /// The conversion did not produce the destination.
    Failed { kind: FailureKind, detail: String },
}

impl JobOutcome {
    /// Create a skipped outcome.
    pub fn skipped(destination: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Skipped {
            destination: destination.into(),
            reason: reason.into(),
        }
    }

    /// Create a failed outcome.
    pub fn failed(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            detail: detail.into(),
        }
    }

    /// True when the conversion produced its destination.
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded { .. })
    }

    /// True when the job did not run at all.
    pub fn is_skipped(&self) -> bool {
        matches!(self, JobOutcome::Skipped { .. })
    }

    /// True when the conversion failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, JobOutcome::Failed { .. })
    }
}

/// Convert one source file under the current settings.
pub async fn run_job(request: &ConversionRequest, settings: &ConversionSettings) -> JobOutcome {
    let destination = paths::destination_for(
        &request.source,
        &request.format,
        settings.output_dir.as_deref(),
    );

    if let Some(dir) = settings.output_dir.as_deref() {
        if let Err(e) = paths::ensure_output_dir(dir) {
            return JobOutcome::failed(FailureKind::DirectoryCreation, e.to_string());
        }
    }

    if destination.exists() {
        if !settings.force {
            return JobOutcome::skipped(destination, "destination exists");
        }
        debug!("removing existing destination {}", destination.display());
        if let Err(e) = std::fs::remove_file(&destination) {
            return JobOutcome::failed(
                FailureKind::Io,
                format!("failed to remove {}: {e}", destination.display()),
            );
        }
    }

    let command = command_for(&request.source, &destination, &request.format);
    run_with_command(request, settings, destination, command).await
}

/// Execute an already-selected converter command and fold the result into
/// an outcome. Split from [`run_job`] so tests can substitute the command.
async fn run_with_command(
    request: &ConversionRequest,
    settings: &ConversionSettings,
    destination: PathBuf,
    command: ToolCommand,
) -> JobOutcome {
    let output = match command.output().await {
        Ok(output) => output,
        Err(e) if e.is_program_missing() => {
            return JobOutcome::failed(
                FailureKind::ExternalTool,
                format!(
                    "{} not found (install it or adjust PATH)",
                    command.program_name()
                ),
            );
        }
        Err(e) => return JobOutcome::failed(FailureKind::ExternalTool, e.to_string()),
    };

    if !output.status.success() {
        return match classify_stderr(&output.stderr) {
            FailureCause::DestinationExists => JobOutcome::failed(
                FailureKind::DestinationExists,
                destination.display().to_string(),
            ),
            FailureCause::SourceMissing => JobOutcome::failed(
                FailureKind::SourceMissing,
                request.source.display().to_string(),
            ),
            FailureCause::Unknown => JobOutcome::failed(
                FailureKind::ExternalTool,
                output.stderr.trim().to_string(),
            ),
        };
    }

    let cleanup_warning = if settings.cleanup_source {
        match std::fs::remove_file(&request.source) {
            Ok(()) => None,
            Err(e) => Some(format!(
                "converted, but failed to delete source {}: {e}",
                request.source.display()
            )),
        }
    } else {
        None
    };

    JobOutcome::Succeeded {
        destination,
        cleanup_warning,
    }
}
