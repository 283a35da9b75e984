use super::residue::ResidueKind;
use nalgebra::Point3;

/// A single atom of interest read from a coordinate file.
///
/// Only atoms that take part in Met-aromatic geometry are ever turned into records: the
/// CG/SD/CE triple of methionine and the six ring carbons of phenylalanine, tyrosine
/// and tryptophan.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// The residue kind the atom belongs to.
    pub kind: ResidueKind,
    /// The chain identifier (e.g., 'A').
    pub chain_id: char,
    /// The residue sequence number from the source file.
    pub residue_number: isize,
    /// The atom name (e.g., "SD", "CZ").
    pub name: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl AtomRecord {
    pub fn new(
        kind: ResidueKind,
        chain_id: char,
        residue_number: isize,
        name: &str,
        position: Point3<f64>,
    ) -> Self {
        Self {
            kind,
            chain_id,
            residue_number,
            name: name.to_string(),
            position,
        }
    }
}
