use super::{progress_handler, structure_source};
use crate::cli::BatchArgs;
use crate::config::models::AppConfig;
use crate::error::{CliError, Result};
use crate::utils::ids::read_identifiers;
use metaromatic::core::io::sink::JsonLinesSink;
use metaromatic::engine::config::{BatchConfigBuilder, DEFAULT_WORKERS};
use metaromatic::engine::progress::ProgressReporter;
use metaromatic::workflows::batch;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

pub async fn run(args: BatchArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    let batch_config = BatchConfigBuilder::new()
        .detection(config.detection.clone())
        .workers(args.workers.or(config.workers).unwrap_or(DEFAULT_WORKERS))
        .bridge_size(args.bridge_size.or(config.bridge_size))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let identifiers = read_identifiers(&args.ids)?;
    info!(
        "Loaded {} identifier(s) from {:?}",
        identifiers.len(),
        &args.ids
    );

    let sink = JsonLinesSink::create(&args.out)?;
    let source = structure_source(config);

    let cancel = Arc::new(AtomicBool::new(false));
    let listener = {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received; finishing in-flight structures before stopping.");
                cancel.store(true, Ordering::SeqCst);
            }
        })
    };

    let progress_handler = progress_handler(quiet);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Processing {} structure(s) with up to {} worker(s)...",
        identifiers.len(),
        batch_config.workers
    );
    let result = tokio::task::block_in_place(|| {
        batch::run(
            &identifiers,
            source.as_ref(),
            &sink,
            &batch_config,
            &cancel,
            &reporter,
        )
    });
    listener.abort();
    let summary = result?;

    if summary.cancelled {
        println!(
            "Batch cancelled after {} of {} structure(s).",
            summary.processed, summary.requested
        );
    }
    println!(
        "✓ {} processed, {} failed in {:.1}s. Results written to: {}",
        summary.processed,
        summary.failures,
        summary.elapsed_seconds,
        args.out.display()
    );
    Ok(())
}
