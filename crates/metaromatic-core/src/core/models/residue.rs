use super::atom::AtomRecord;
use crate::core::topology::rings::{self, RingPosition};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ResidueKind {
    #[serde(rename = "MET")]
    Methionine, // Methionine (MET) - the lone-pair donor
    #[serde(rename = "PHE")]
    Phenylalanine, // Phenylalanine (PHE)
    #[serde(rename = "TYR")]
    Tyrosine, // Tyrosine (TYR)
    #[serde(rename = "TRP")]
    Tryptophan, // Tryptophan (TRP) - only the six-membered ring is used
}

impl ResidueKind {
    pub const AROMATICS: [ResidueKind; 3] = [
        ResidueKind::Phenylalanine,
        ResidueKind::Tyrosine,
        ResidueKind::Tryptophan,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ResidueKind::Methionine => "MET",
            ResidueKind::Phenylalanine => "PHE",
            ResidueKind::Tyrosine => "TYR",
            ResidueKind::Tryptophan => "TRP",
        }
    }
}

impl fmt::Display for ResidueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported residue kind: '{0}'")]
pub struct ParseResidueKindError(pub String);

impl FromStr for ResidueKind {
    type Err = ParseResidueKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MET" => Ok(ResidueKind::Methionine),
            "PHE" => Ok(ResidueKind::Phenylalanine),
            "TYR" => Ok(ResidueKind::Tyrosine),
            "TRP" => Ok(ResidueKind::Tryptophan),
            _ => Err(ParseResidueKindError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResidueError {
    #[error("{kind}{residue_number} has {found} relevant atoms, expected {expected}")]
    WrongAtomCount {
        kind: ResidueKind,
        residue_number: isize,
        found: usize,
        expected: usize,
    },
    #[error("{kind}{residue_number} is missing atom {atom}")]
    MissingAtom {
        kind: ResidueKind,
        residue_number: isize,
        atom: String,
    },
    #[error("{kind}{residue_number} contains unexpected atom '{atom}'")]
    UnexpectedAtom {
        kind: ResidueKind,
        residue_number: isize,
        atom: String,
    },
    #[error("{kind}{residue_number} contains atom '{atom}' more than once")]
    DuplicateAtom {
        kind: ResidueKind,
        residue_number: isize,
        atom: String,
    },
    #[error("Atom {atom} of residue {found_number} does not belong to {kind}{residue_number}")]
    ForeignAtom {
        kind: ResidueKind,
        residue_number: isize,
        found_number: isize,
        atom: String,
    },
}

fn check_membership(
    kind: ResidueKind,
    residue_number: isize,
    atoms: &[AtomRecord],
    expected: usize,
) -> Result<(), ResidueError> {
    if atoms.len() != expected {
        return Err(ResidueError::WrongAtomCount {
            kind,
            residue_number,
            found: atoms.len(),
            expected,
        });
    }
    if let Some(foreign) = atoms
        .iter()
        .find(|a| a.kind != kind || a.residue_number != residue_number)
    {
        return Err(ResidueError::ForeignAtom {
            kind,
            residue_number,
            found_number: foreign.residue_number,
            atom: foreign.name.clone(),
        });
    }
    Ok(())
}

/// A methionine side chain reduced to the three atoms that define the sulfur geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct MethionineResidue {
    pub residue_number: isize,
    pub chain_id: char,
    /// Gamma carbon (CG).
    pub cg: Point3<f64>,
    /// Delta sulfur (SD), the pivot of the lone-pair tetrahedron.
    pub sd: Point3<f64>,
    /// Epsilon carbon (CE).
    pub ce: Point3<f64>,
}

impl MethionineResidue {
    /// Builds a methionine group from exactly one CG, one SD and one CE record.
    ///
    /// # Errors
    ///
    /// Returns a [`ResidueError`] if the atom count is not three, if any atom belongs to a
    /// different residue, or if a side-chain atom is missing or repeated.
    pub fn from_atoms(residue_number: isize, atoms: &[AtomRecord]) -> Result<Self, ResidueError> {
        let kind = ResidueKind::Methionine;
        check_membership(kind, residue_number, atoms, 3)?;

        let mut slots: [Option<Point3<f64>>; 3] = [None; 3];
        for atom in atoms {
            let index = match atom.name.as_str() {
                "CG" => 0,
                "SD" => 1,
                "CE" => 2,
                other => {
                    return Err(ResidueError::UnexpectedAtom {
                        kind,
                        residue_number,
                        atom: other.to_string(),
                    });
                }
            };
            if slots[index].replace(atom.position).is_some() {
                return Err(ResidueError::DuplicateAtom {
                    kind,
                    residue_number,
                    atom: atom.name.clone(),
                });
            }
        }

        let take = |slot: Option<Point3<f64>>, name: &str| {
            slot.ok_or_else(|| ResidueError::MissingAtom {
                kind,
                residue_number,
                atom: name.to_string(),
            })
        };

        Ok(Self {
            residue_number,
            chain_id: atoms[0].chain_id,
            cg: take(slots[0], "CG")?,
            sd: take(slots[1], "SD")?,
            ce: take(slots[2], "CE")?,
        })
    }
}

/// The six-membered ring of an aromatic residue, ordered by ring position A through F.
#[derive(Debug, Clone, PartialEq)]
pub struct AromaticResidue {
    pub kind: ResidueKind,
    pub residue_number: isize,
    pub chain_id: char,
    pub ring: [Point3<f64>; 6],
}

impl AromaticResidue {
    /// Builds a ring from six records, relabelling each atom to its canonical ring
    /// position and ordering by that label.
    ///
    /// # Errors
    ///
    /// Returns a [`ResidueError`] unless every ring position is covered exactly once by
    /// atoms of this residue.
    pub fn from_atoms(
        kind: ResidueKind,
        residue_number: isize,
        atoms: &[AtomRecord],
    ) -> Result<Self, ResidueError> {
        check_membership(kind, residue_number, atoms, 6)?;

        let mut slots: [Option<Point3<f64>>; 6] = [None; 6];
        for atom in atoms {
            let position = rings::ring_position(kind, &atom.name).ok_or_else(|| {
                ResidueError::UnexpectedAtom {
                    kind,
                    residue_number,
                    atom: atom.name.clone(),
                }
            })?;
            if slots[position.index()].replace(atom.position).is_some() {
                return Err(ResidueError::DuplicateAtom {
                    kind,
                    residue_number,
                    atom: atom.name.clone(),
                });
            }
        }

        let mut ring = [Point3::origin(); 6];
        for position in RingPosition::ALL {
            ring[position.index()] =
                slots[position.index()].ok_or_else(|| ResidueError::MissingAtom {
                    kind,
                    residue_number,
                    atom: rings::atom_name_at(kind, position)
                        .unwrap_or("?")
                        .to_string(),
                })?;
        }

        Ok(Self {
            kind,
            residue_number,
            chain_id: atoms[0].chain_id,
            ring,
        })
    }

    pub fn label(&self) -> String {
        format!("{}{}", self.kind, self.residue_number)
    }
}
