use crate::core::models::interaction::{Bridge, Interaction};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Sink lock was poisoned by a panicking writer")]
    Poisoned,
}

/// Outcome of running the detection pipeline on one identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum BatchOutcome {
    Success {
        interactions: Vec<Interaction>,
        #[serde(skip_serializing_if = "Option::is_none")]
        bridges: Option<Vec<Bridge>>,
    },
    Failure {
        /// Stable machine-readable failure category.
        kind: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRecord {
    pub identifier: String,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

impl BatchRecord {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Success { .. })
    }
}

/// Run-level summary written once after the worker pool has drained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub workers: usize,
    pub chain: char,
    pub cutoff_distance: f64,
    pub cutoff_angle: f64,
    pub model: String,
    pub bridge_size: Option<usize>,
    pub requested: usize,
    pub processed: usize,
    pub failures: usize,
    pub cancelled: bool,
    pub elapsed_seconds: f64,
}

/// Persistence backend for batch results. One `insert` per processed identifier.
pub trait ResultSink: Send + Sync {
    fn insert(&self, record: &BatchRecord) -> Result<(), SinkError>;

    fn insert_summary(&self, summary: &BatchSummary) -> Result<(), SinkError>;
}

#[derive(Serialize)]
#[serde(tag = "document", rename_all = "kebab-case")]
enum Document<'a> {
    Record(&'a BatchRecord),
    Summary(&'a BatchSummary),
}

/// Appends one JSON document per line to a file. Each write is flushed immediately so
/// records survive an interrupted run.
pub struct JsonLinesSink {
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesSink {
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    fn write_document(&self, document: &Document) -> Result<(), SinkError> {
        let line = serde_json::to_string(document)?;
        let mut writer = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

impl ResultSink for JsonLinesSink {
    fn insert(&self, record: &BatchRecord) -> Result<(), SinkError> {
        self.write_document(&Document::Record(record))
    }

    fn insert_summary(&self, summary: &BatchSummary) -> Result<(), SinkError> {
        self.write_document(&Document::Summary(summary))
    }
}

/// Keeps everything in memory; useful for embedding and tests.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<BatchRecord>>,
    summary: Mutex<Option<BatchSummary>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<BatchRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn summary(&self) -> Option<BatchSummary> {
        self.summary.lock().ok().and_then(|s| s.clone())
    }
}

impl ResultSink for MemorySink {
    fn insert(&self, record: &BatchRecord) -> Result<(), SinkError> {
        self.records
            .lock()
            .map_err(|_| SinkError::Poisoned)?
            .push(record.clone());
        Ok(())
    }

    fn insert_summary(&self, summary: &BatchSummary) -> Result<(), SinkError> {
        *self.summary.lock().map_err(|_| SinkError::Poisoned)? = Some(summary.clone());
        Ok(())
    }
}
