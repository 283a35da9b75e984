use crate::core::io::pdb::ExtractedAtoms;
use crate::core::models::atom::AtomRecord;
use crate::core::models::interaction::Midpoint;
use crate::core::models::residue::{AromaticResidue, ResidueKind};
use crate::core::utils::geometry::hexagon_edge_midpoints;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Groups atom records by residue sequence number, preserving file order within each
/// group.
pub(crate) fn group_by_residue(atoms: &[AtomRecord]) -> BTreeMap<isize, Vec<AtomRecord>> {
    let mut groups: BTreeMap<isize, Vec<AtomRecord>> = BTreeMap::new();
    for atom in atoms {
        groups
            .entry(atom.residue_number)
            .or_default()
            .push(atom.clone());
    }
    groups
}

/// Builds validated rings for every aromatic residue, ordered PHE, TYR, TRP and by
/// sequence number within each kind. Residues without a complete ring are dropped.
pub fn select_residues(atoms: &ExtractedAtoms) -> Vec<AromaticResidue> {
    let mut residues = Vec::new();
    for kind in ResidueKind::AROMATICS {
        for (residue_number, group) in group_by_residue(atoms.of_kind(kind)) {
            match AromaticResidue::from_atoms(kind, residue_number, &group) {
                Ok(residue) => residues.push(residue),
                Err(e) => warn!("Skipping incomplete aromatic ring: {}", e),
            }
        }
    }
    debug!(count = residues.len(), "Selected aromatic residues.");
    residues
}

/// Computes the six ring-edge midpoints of each residue.
pub fn run(residues: &[AromaticResidue]) -> Vec<Midpoint> {
    residues
        .iter()
        .flat_map(|residue| {
            hexagon_edge_midpoints(&residue.ring)
                .into_iter()
                .map(move |position| Midpoint {
                    kind: residue.kind,
                    residue_number: residue.residue_number,
                    position,
                })
        })
        .collect()
}
