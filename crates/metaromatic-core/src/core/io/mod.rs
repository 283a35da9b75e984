//! Input/output collaborators of the detection pipeline.
//!
//! - [`pdb`] extracts atom records of interest from PDB-formatted coordinate files.
//! - [`source`] resolves structure identifiers to file contents (local directory or the
//!   RCSB archive).
//! - [`sink`] persists per-identifier batch outcomes and the run summary.
//! - [`table`] exports interaction lists as CSV.

pub mod pdb;
pub mod sink;
pub mod source;
pub mod table;
