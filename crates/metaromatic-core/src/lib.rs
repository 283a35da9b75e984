//! # Met-Aromatic Core Library
//!
//! Detection of interactions between methionine sulfur lone pairs and the aromatic
//! rings of phenylalanine, tyrosine and tryptophan in protein crystal structures, and
//! reduction of those interactions into multi-residue "bridge" networks.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless value types (`AtomRecord`, `Interaction`, ...),
//!   fixed atom-name tables, geometry helpers and I/O collaborators (structure sources,
//!   result sinks, PDB atom extraction).
//!
//! - **[`engine`]: The Logic Core.** Validated configuration, the error taxonomy, progress
//!   reporting, and the individual pipeline stages (`midpoints`, `lone_pairs`,
//!   `interactions`, `bridges`).
//!
//! - **[`workflows`]: The Public API.** Complete procedures built from the stages above: a
//!   single-structure query and the concurrent batch scheduler.

pub mod core;
pub mod engine;
pub mod workflows;
