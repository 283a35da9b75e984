//! # Topology Module
//!
//! Fixed atom-name tables describing which atoms of each residue kind take part in
//! Met-aromatic detection.
//!
//! - [`rings`] - Methionine side-chain names and aromatic ring-position tables
//!
//! ```ignore
//! use metaromatic::core::topology::rings::{ring_position, RingPosition};
//! use metaromatic::core::models::residue::ResidueKind;
//!
//! assert_eq!(ring_position(ResidueKind::Phenylalanine, "CZ"), Some(RingPosition::D));
//! ```

pub mod rings;
