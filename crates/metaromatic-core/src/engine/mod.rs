//! # Engine Module
//!
//! Validated configuration, the error taxonomy, progress reporting, and the stages of
//! the detection pipeline.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Thresholds, lone-pair model selection and batch options
//! - **Error Handling** ([`error`]) - The discriminated failure taxonomy of a detection query
//! - **Progress Monitoring** ([`progress`]) - Explicitly passed progress/telemetry handle
//! - **Pipeline Stages** ([`tasks`]) - Ring midpoints, lone-pair reconstruction,
//!   interaction detection and bridge extraction
//!
//! Every stage is a pure function over owned value types and holds no shared state, so
//! independent queries may run concurrently without synchronization.

pub mod config;
pub mod error;
pub mod progress;
pub mod tasks;
