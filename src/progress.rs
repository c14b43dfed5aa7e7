//! Progress reporting.
//!
//! Two reporters implement the same interface: an interactive one that
//! redraws a single status line in place, and a plain append-only one. The
//! orchestration code only ever talks to the [`Reporter`] trait and never
//! touches terminal control itself.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressState, ProgressStyle};

use crate::conversion::{ConversionRequest, ConversionSettings, JobOutcome, RunSummary};

/// Sink for per-job completion events and the end-of-run summary.
///
/// Implementations must be safe to call from concurrently finishing jobs;
/// the completion counter advances exactly once per call.
pub trait Reporter: Send + Sync {
    /// Record one finished job and emit its report lines.
    fn job_finished(&self, request: &ConversionRequest, outcome: &JobOutcome);

    /// Number of jobs recorded so far.
    fn position(&self) -> u64;

    /// Emit the end-of-run summary. Called exactly once, after the last job.
    fn finish(&self, summary: &RunSummary, elapsed: Duration);
}

/// Build the reporter matching the current settings.
pub fn reporter_for(settings: &ConversionSettings, total: u64) -> Arc<dyn Reporter> {
    if settings.show_progress {
        Arc::new(InteractiveReporter::new(total, settings.verbose))
    } else {
        Arc::new(PlainReporter::new(total, settings.verbose))
    }
}

/// Report lines for one finished job.
///
/// Failures always get a line; conversions and skips only in verbose mode.
/// A cleanup warning rides along with its success line.
fn report_lines(request: &ConversionRequest, outcome: &JobOutcome, verbose: bool) -> Vec<String> {
    let mut lines = Vec::new();
    match outcome {
        JobOutcome::Succeeded {
            destination,
            cleanup_warning,
        } => {
            if verbose {
                lines.push(format!(
                    "Converted {} -> {}",
                    request.source.display(),
                    destination.display()
                ));
            }
            if let Some(warning) = cleanup_warning {
                lines.push(format!("Warning: {warning}"));
            }
        }
        JobOutcome::Skipped {
            destination,
            reason,
        } => {
            if verbose {
                lines.push(format!("Skipped {} ({reason})", destination.display()));
            }
        }
        JobOutcome::Failed { kind, detail } => {
            lines.push(format!(
                "Failed {} ({kind}: {detail})",
                request.source.display()
            ));
        }
    }
    lines
}

fn summary_line(summary: &RunSummary, elapsed: Duration) -> String {
    format!(
        "Done: {} converted, {} skipped, {} failed ({}ms)",
        summary.converted,
        summary.skipped,
        summary.failed,
        elapsed.as_millis()
    )
}

/// Interactive single-line counter, redrawn in place as jobs finish.
///
/// Report lines are printed through the bar so they land above the status
/// line instead of scrolling it away.
pub struct InteractiveReporter {
    bar: ProgressBar,
    verbose: bool,
}

impl InteractiveReporter {
    pub fn new(total: u64, verbose: bool) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template("{pos}/{len} ({percent_exact}%)")
                .unwrap()
                .with_key(
                    "percent_exact",
                    |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                        let _ = write!(w, "{:.2}", state.fraction() * 100.0);
                    },
                ),
        );
        Self { bar, verbose }
    }
}

impl Reporter for InteractiveReporter {
    fn job_finished(&self, request: &ConversionRequest, outcome: &JobOutcome) {
        for line in report_lines(request, outcome, self.verbose) {
            self.bar.println(line);
        }
        self.bar.inc(1);
    }

    fn position(&self) -> u64 {
        self.bar.position()
    }

    fn finish(&self, summary: &RunSummary, elapsed: Duration) {
        self.bar.finish();
        println!("{}", summary_line(summary, elapsed));
    }
}

/// Append-only reporter: plain log lines, no cursor control.
pub struct PlainReporter {
    completed: AtomicU64,
    total: u64,
    verbose: bool,
}

impl PlainReporter {
    pub fn new(total: u64, verbose: bool) -> Self {
        Self {
            completed: AtomicU64::new(0),
            total,
            verbose,
        }
    }
}

impl Reporter for PlainReporter {
    fn job_finished(&self, request: &ConversionRequest, outcome: &JobOutcome) {
        let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        for line in report_lines(request, outcome, self.verbose) {
            println!("{line}");
        }
        if self.verbose {
            println!("{done}/{} done", self.total);
        }
    }

    fn position(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }

    fn finish(&self, summary: &RunSummary, elapsed: Duration) {
        println!("{}", summary_line(summary, elapsed));
    }
}
