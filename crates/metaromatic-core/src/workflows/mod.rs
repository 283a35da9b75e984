//! # Workflows Module
//!
//! Top-level entry points that chain the engine stages into complete procedures.
//!
//! - **Detection** ([`detect`]) - one structure in, interactions (and optionally
//!   bridges) out. Configuration is validated before any structure data is read.
//! - **Batch** ([`batch`]) - a bounded pool of worker threads running detection over a
//!   list of identifiers, persisting one record per identifier through a
//!   [`ResultSink`](crate::core::io::sink::ResultSink).
//!
//! Every entry point takes an explicit
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter) and opens its own
//! `tracing` span; there is no process-global state in the library.

pub mod batch;
pub mod detect;

#[cfg(test)]
pub(crate) mod fixtures;
