use super::detect;
use crate::core::io::sink::{BatchOutcome, BatchRecord, BatchSummary, ResultSink};
use crate::core::io::source::StructureSource;
use crate::engine::config::{BatchConfig, ConfigError, MAX_WORKERS, validate_bridge_size};
use crate::engine::error::BatchError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks::bridges;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, error, info, info_span, instrument, warn};

const WORKER_THREAD_PREFIX: &str = "metaromatic-worker-";

#[derive(Debug, Default)]
struct Tally {
    processed: usize,
    failures: usize,
}

/// Number of worker threads actually started: the request clamped to [`MAX_WORKERS`],
/// and never more than there are identifiers (but at least one).
pub fn effective_workers(requested: usize, identifiers: usize) -> usize {
    let clamped = if requested > MAX_WORKERS {
        warn!(
            requested,
            max = MAX_WORKERS,
            "Requested worker count exceeds the limit; clamping."
        );
        MAX_WORKERS
    } else {
        requested
    };
    clamped.min(identifiers).max(1)
}

/// Runs detection for one identifier and packages the outcome. Never fails: every
/// error becomes a [`BatchOutcome::Failure`].
pub fn process_identifier(
    identifier: &str,
    source: &dyn StructureSource,
    config: &BatchConfig,
) -> BatchRecord {
    let silent = ProgressReporter::new();
    let outcome = match detect::query(source, identifier, &config.detection, &silent) {
        Ok(interactions) => {
            let bridges = config
                .bridge_size
                .map(|size| bridges::run(&interactions, size));
            BatchOutcome::Success {
                interactions,
                bridges,
            }
        }
        Err(e) => {
            debug!(identifier, kind = e.code(), "Detection failed: {}", e);
            BatchOutcome::Failure {
                kind: e.code().to_string(),
                reason: e.to_string(),
            }
        }
    };
    BatchRecord {
        identifier: identifier.to_string(),
        outcome,
    }
}

/// Processes `identifiers` on a dedicated rayon pool sized to the effective worker count.
///
/// Identifiers are dealt round-robin: worker `w` takes indices `w`, `w + n`, `w + 2n`, ...
/// Each worker checks `cancel` before starting its next identifier; an identifier in
/// progress always runs to completion. One record is inserted into `sink` per processed
/// identifier, followed by a single summary once all workers have joined.
///
/// # Errors
///
/// Returns [`BatchError::InvalidConfig`] before any worker starts if `config` is invalid,
/// [`BatchError::ThreadPool`] if the pool cannot be built, or [`BatchError::Sink`] if the
/// final summary cannot be stored. Failures to store
/// individual records are logged and do not stop the run.
#[instrument(skip_all, name = "batch_workflow", fields(identifiers = identifiers.len()))]
pub fn run(
    identifiers: &[String],
    source: &dyn StructureSource,
    sink: &dyn ResultSink,
    config: &BatchConfig,
    cancel: &AtomicBool,
    reporter: &ProgressReporter,
) -> Result<BatchSummary, BatchError> {
    config.detection.validate()?;
    if config.workers == 0 {
        return Err(ConfigError::InvalidWorkerCount.into());
    }
    if let Some(size) = config.bridge_size {
        validate_bridge_size(size)?;
    }

    let workers = effective_workers(config.workers, identifiers.len());
    let started = Instant::now();
    let tally = Mutex::new(Tally::default());

    info!(workers, "Starting batch run.");
    reporter.report(Progress::TaskStart {
        total_steps: identifiers.len() as u64,
    });

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("{WORKER_THREAD_PREFIX}{i}"))
        .build()?;

    pool.scope(|scope| {
        for worker_id in 0..workers {
            let tally = &tally;
            scope.spawn(move |_| {
                let _span = info_span!("worker", id = worker_id).entered();
                for identifier in identifiers.iter().skip(worker_id).step_by(workers) {
                    if cancel.load(Ordering::SeqCst) {
                        debug!("Cancellation requested; worker stopping.");
                        break;
                    }

                    let record = process_identifier(identifier, source, config);
                    if let Err(e) = sink.insert(&record) {
                        error!(identifier = %identifier, "Failed to store batch record: {}", e);
                    }

                    let mut counts = tally.lock().unwrap_or_else(PoisonError::into_inner);
                    counts.processed += 1;
                    if !record.is_success() {
                        counts.failures += 1;
                    }
                    drop(counts);
                    reporter.report(Progress::TaskIncrement);
                }
            });
        }
    });

    let tally = tally.into_inner().unwrap_or_else(PoisonError::into_inner);
    let cancelled = cancel.load(Ordering::SeqCst) && tally.processed < identifiers.len();
    reporter.report(Progress::TaskFinish);

    let summary = BatchSummary {
        workers,
        chain: config.detection.chain,
        cutoff_distance: config.detection.cutoff_distance,
        cutoff_angle: config.detection.cutoff_angle,
        model: config.detection.model.to_string(),
        bridge_size: config.bridge_size,
        requested: identifiers.len(),
        processed: tally.processed,
        failures: tally.failures,
        cancelled,
        elapsed_seconds: started.elapsed().as_secs_f64(),
    };
    info!(
        processed = summary.processed,
        failures = summary.failures,
        cancelled,
        "Batch run finished."
    );
    sink.insert_summary(&summary)?;
    Ok(summary)
}
