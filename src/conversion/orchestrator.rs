//! Fan-out/fan-in over conversion jobs.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::error;

use crate::progress::Reporter;

use super::{job, ConversionRequest, ConversionSettings, FailureKind, JobOutcome};

/// Aggregate counts for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Jobs that produced their destination.
    pub converted: usize,
    /// Jobs skipped because the destination already existed.
    pub skipped: usize,
    /// Jobs that failed.
    pub failed: usize,
}

impl RunSummary {
    fn tally(outcomes: &[JobOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome {
                JobOutcome::Succeeded { .. } => summary.converted += 1,
                JobOutcome::Skipped { .. } => summary.skipped += 1,
                JobOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }
}

/// Run every request to completion and collect one outcome per request.
///
/// Outcomes come back in input order. A `max_concurrency` of 1 runs the
/// requests strictly sequentially; unset fans all of them out at once; any
/// other value bounds how many converters run at a time. Job failures are
/// isolated: a failed or aborted job never prevents its siblings from
/// completing or being reported.
///
/// The wall-clock duration from first dispatch to last completion is handed
/// to the reporter exactly once, with the aggregate counts.
pub async fn run_all(
    requests: Vec<ConversionRequest>,
    settings: Arc<ConversionSettings>,
    reporter: Arc<dyn Reporter>,
) -> Vec<JobOutcome> {
    let started = Instant::now();

    let outcomes = match settings.max_concurrency {
        Some(limit) if limit.get() == 1 => run_sequential(&requests, &settings, &reporter).await,
        limit => {
            let permits = limit
                .map(NonZeroUsize::get)
                .unwrap_or_else(|| requests.len().max(1));
            run_pooled(&requests, permits, &settings, &reporter).await
        }
    };

    let summary = RunSummary::tally(&outcomes);
    reporter.finish(&summary, started.elapsed());
    outcomes
}

/// Strictly sequential execution in input order.
async fn run_sequential(
    requests: &[ConversionRequest],
    settings: &Arc<ConversionSettings>,
    reporter: &Arc<dyn Reporter>,
) -> Vec<JobOutcome> {
    let mut outcomes = Vec::with_capacity(requests.len());
    for request in requests {
        let outcome = job::run_job(request, settings).await;
        reporter.job_finished(request, &outcome);
        outcomes.push(outcome);
    }
    outcomes
}

/// Worker-pool execution: all jobs spawned, at most `permits` running.
async fn run_pooled(
    requests: &[ConversionRequest],
    permits: usize,
    settings: &Arc<ConversionSettings>,
    reporter: &Arc<dyn Reporter>,
) -> Vec<JobOutcome> {
    let semaphore = Arc::new(Semaphore::new(permits));
    let mut tasks = JoinSet::new();

    for (index, request) in requests.iter().cloned().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let settings = Arc::clone(settings);
        let reporter = Arc::clone(reporter);
        tasks.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    // The semaphore is never closed while the pool runs.
                    let outcome =
                        JobOutcome::failed(FailureKind::Io, "worker pool shut down");
                    reporter.job_finished(&request, &outcome);
                    return (index, outcome);
                }
            };
            let outcome = job::run_job(&request, &settings).await;
            reporter.job_finished(&request, &outcome);
            (index, outcome)
        });
    }

    let mut slots: Vec<Option<JobOutcome>> = vec![None; requests.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => slots[index] = Some(outcome),
            Err(e) => error!("conversion task aborted: {e}"),
        }
    }

    // An aborted task still owes its request an outcome.
    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.unwrap_or_else(|| {
                let outcome = JobOutcome::failed(FailureKind::Io, "conversion task aborted");
                reporter.job_finished(&requests[index], &outcome);
                outcome
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::PlainReporter;
    use fconvert_common::TargetFormat;
    use std::path::Path;

    /// Create a source and a pre-existing destination so the job is skipped
    /// without touching any external tool.
    fn skippable_request(dir: &Path, stem: &str) -> ConversionRequest {
        let source = dir.join(format!("{stem}.txt"));
        let destination = dir.join(format!("{stem}.png"));
        std::fs::write(&source, b"source").expect("write source");
        std::fs::write(&destination, b"existing").expect("write destination");
        ConversionRequest {
            source,
            format: TargetFormat::from("png"),
        }
    }

    fn settings(max_concurrency: Option<usize>) -> Arc<ConversionSettings> {
        Arc::new(ConversionSettings {
            max_concurrency: max_concurrency.and_then(NonZeroUsize::new),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_every_request_yields_an_outcome_unbounded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let requests: Vec<_> = (0..5)
            .map(|i| skippable_request(dir.path(), &format!("f{i}")))
            .collect();
        let reporter = Arc::new(PlainReporter::new(requests.len() as u64, false));

        let outcomes = run_all(requests, settings(None), reporter.clone()).await;

        assert_eq!(outcomes.len(), 5);
        assert!(outcomes.iter().all(JobOutcome::is_skipped));
        assert_eq!(reporter.position(), 5);
    }

    #[tokio::test]
    async fn test_every_request_yields_an_outcome_bounded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let requests: Vec<_> = (0..4)
            .map(|i| skippable_request(dir.path(), &format!("f{i}")))
            .collect();
        let reporter = Arc::new(PlainReporter::new(requests.len() as u64, false));

        let outcomes = run_all(requests, settings(Some(2)), reporter.clone()).await;

        assert_eq!(outcomes.len(), 4);
        assert_eq!(reporter.position(), 4);
    }

    #[tokio::test]
    async fn test_sequential_outcomes_keep_input_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let skip_a = skippable_request(dir.path(), "a");
        let skip_b = skippable_request(dir.path(), "b");
        // Fails at the converter: the source does not exist and "zzz" is
        // not a producible format.
        let failing = ConversionRequest {
            source: dir.path().join("missing.txt"),
            format: TargetFormat::from("zzz"),
        };

        let reporter = Arc::new(PlainReporter::new(3, false));
        let outcomes = run_all(
            vec![skip_a, failing, skip_b],
            settings(Some(1)),
            reporter.clone(),
        )
        .await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_skipped());
        assert!(outcomes[1].is_failure());
        assert!(outcomes[2].is_skipped());
        assert_eq!(reporter.position(), 3);
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_siblings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good = skippable_request(dir.path(), "good");
        let bad = ConversionRequest {
            // Fails at the converter (missing source, or missing tool).
            source: dir.path().join("missing.txt"),
            format: TargetFormat::from("zzz"),
        };
        let reporter = Arc::new(PlainReporter::new(2, false));

        let outcomes = run_all(vec![bad, good], settings(None), reporter.clone()).await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].is_failure());
        assert!(outcomes[1].is_skipped());
        assert_eq!(reporter.position(), 2);
    }
}
