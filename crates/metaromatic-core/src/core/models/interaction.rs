use super::residue::ResidueKind;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The midpoint of one edge of an aromatic ring.
#[derive(Debug, Clone, PartialEq)]
pub struct Midpoint {
    pub kind: ResidueKind,
    pub residue_number: isize,
    pub position: Point3<f64>,
}

/// The two reconstructed lone-pair directions of a methionine sulfur.
///
/// The directions are not guaranteed to be normalized; only their orientation is used.
#[derive(Debug, Clone, PartialEq)]
pub struct LonePair {
    pub residue_number: isize,
    pub sulfur: Point3<f64>,
    pub a: Vector3<f64>,
    pub g: Vector3<f64>,
}

/// An accepted sulfur-to-ring-edge contact.
///
/// Distance and angles are rounded to three decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub aromatic_residue: ResidueKind,
    pub aromatic_position: isize,
    pub methionine_position: isize,
    pub norm: f64,
    pub met_theta_angle: f64,
    pub met_phi_angle: f64,
}

impl Interaction {
    pub fn aromatic_label(&self) -> String {
        format!("{}{}", self.aromatic_residue, self.aromatic_position)
    }

    pub fn methionine_label(&self) -> String {
        format!("{}{}", ResidueKind::Methionine, self.methionine_position)
    }
}

/// A connected group of residues in the interaction graph, identified by node labels
/// such as `"TYR122"` or `"MET18"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bridge {
    nodes: BTreeSet<String>,
}

impl Bridge {
    pub fn new<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn nodes(&self) -> &BTreeSet<String> {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.nodes.contains(label)
    }
}

impl fmt::Display for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", node)?;
        }
        write!(f, "}}")
    }
}
