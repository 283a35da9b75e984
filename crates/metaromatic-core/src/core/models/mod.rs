//! # Core Models Module
//!
//! Strongly-typed value objects produced and consumed by the detection pipeline.
//! No model is mutated after construction.
//!
//! - [`residue`] - Residue kinds and validated residue groups
//! - [`atom`] - Atom records extracted from coordinate files
//! - [`interaction`] - Midpoints, lone pairs, interactions and bridges

pub mod atom;
pub mod interaction;
pub mod residue;
