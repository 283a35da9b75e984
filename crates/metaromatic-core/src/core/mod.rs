//! # Core Module
//!
//! Fundamental building blocks shared by every stage of the Met-aromatic pipeline.
//!
//! - **Value Types** ([`models`]) - Atom records, residue groups, midpoints, lone pairs,
//!   interactions and bridges
//! - **Atom-Name Tables** ([`topology`]) - Which atoms matter for each residue kind, and how
//!   ring atoms map onto hexagon positions
//! - **File I/O** ([`io`]) - Coordinate-file extraction, structure sources, result sinks and
//!   tabular export
//! - **Geometry** ([`utils`]) - Vector angles, ring-edge midpoints and rounding

pub mod io;
pub mod models;
pub mod topology;
pub mod utils;
