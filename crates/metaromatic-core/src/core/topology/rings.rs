use crate::core::models::residue::ResidueKind;
use phf::{Map, Set, phf_map, phf_set};

static METHIONINE_ATOM_NAMES: Set<&'static str> = phf_set! { "CG", "SD", "CE" };

// Walking A..F visits the hexagon cyclically: CG-CD2-CE2-CZ-CE1-CD1.
static PHE_TYR_RING_POSITIONS: Map<&'static str, RingPosition> = phf_map! {
    "CG" => RingPosition::A,
    "CD2" => RingPosition::B,
    "CE2" => RingPosition::C,
    "CZ" => RingPosition::D,
    "CE1" => RingPosition::E,
    "CD1" => RingPosition::F,
};

// Benzene half of the indole: CD2-CE3-CZ3-CH2-CZ2-CE2.
static TRP_RING_POSITIONS: Map<&'static str, RingPosition> = phf_map! {
    "CD2" => RingPosition::A,
    "CE3" => RingPosition::B,
    "CZ3" => RingPosition::C,
    "CH2" => RingPosition::D,
    "CZ2" => RingPosition::E,
    "CE2" => RingPosition::F,
};

/// Canonical vertex label of a six-membered ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RingPosition {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl RingPosition {
    pub const ALL: [RingPosition; 6] = [
        RingPosition::A,
        RingPosition::B,
        RingPosition::C,
        RingPosition::D,
        RingPosition::E,
        RingPosition::F,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

fn ring_table(kind: ResidueKind) -> Option<&'static Map<&'static str, RingPosition>> {
    match kind {
        ResidueKind::Phenylalanine | ResidueKind::Tyrosine => Some(&PHE_TYR_RING_POSITIONS),
        ResidueKind::Tryptophan => Some(&TRP_RING_POSITIONS),
        ResidueKind::Methionine => None,
    }
}

/// Returns the ring position of `atom_name` in a residue of the given kind, or `None`
/// if the atom is not one of that kind's six ring carbons.
pub fn ring_position(kind: ResidueKind, atom_name: &str) -> Option<RingPosition> {
    ring_table(kind)?.get(atom_name.trim()).copied()
}

pub fn atom_name_at(kind: ResidueKind, position: RingPosition) -> Option<&'static str> {
    ring_table(kind)?
        .entries()
        .find(|(_, p)| **p == position)
        .map(|(name, _)| *name)
}

/// Whether an atom of this residue kind is used by Met-aromatic detection.
pub fn is_relevant_atom(kind: ResidueKind, atom_name: &str) -> bool {
    match kind {
        ResidueKind::Methionine => METHIONINE_ATOM_NAMES.contains(atom_name.trim()),
        _ => ring_position(kind, atom_name).is_some(),
    }
}
