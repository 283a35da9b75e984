use super::midpoints::group_by_residue;
use crate::core::models::atom::AtomRecord;
use crate::core::models::interaction::LonePair;
use crate::core::models::residue::MethionineResidue;
use crate::engine::config::LonePairModel;
use nalgebra::{Matrix3, Point3, Vector3};
use std::f64::consts::SQRT_2;
use tracing::{debug, warn};

const EPSILON: f64 = 1e-9;
const ROTATION_ANGLE_DEGREES: f64 = 90.0;

/// Builds validated CG/SD/CE triples, ordered by sequence number. Residues without
/// exactly those three atoms are dropped.
pub fn select_residues(atoms: &[AtomRecord]) -> Vec<MethionineResidue> {
    let residues: Vec<MethionineResidue> = group_by_residue(atoms)
        .into_iter()
        .filter_map(
            |(residue_number, group)| match MethionineResidue::from_atoms(residue_number, &group) {
                Ok(residue) => Some(residue),
                Err(e) => {
                    warn!("Skipping incomplete methionine: {}", e);
                    None
                }
            },
        )
        .collect();
    debug!(count = residues.len(), "Selected methionine residues.");
    residues
}

/// Lone-pair directions from the bisector/normal construction.
///
/// With `u`, `v` the unit vectors from `origin` toward `vertex_a` and `vertex_b`, the
/// directions are `w ± √2·n̂`, where `w` is the unit anti-bisector and `n̂ = û × v̂`.
/// Returns `None` for collinear or coincident input.
pub fn cross_product(
    vertex_a: &Point3<f64>,
    origin: &Point3<f64>,
    vertex_b: &Point3<f64>,
) -> Option<(Vector3<f64>, Vector3<f64>)> {
    let u = (vertex_a - origin).try_normalize(EPSILON)?;
    let v = (vertex_b - origin).try_normalize(EPSILON)?;

    let w = (-0.5 * (u + v)).try_normalize(EPSILON)?;
    let normal = u.cross(&v).try_normalize(EPSILON)?;
    let reverse_normal = v.cross(&u).try_normalize(EPSILON)?;

    Some((w + SQRT_2 * normal, w + SQRT_2 * reverse_normal))
}

/// Lone-pair directions from a fixed 90° Rodrigues rotation.
///
/// The substituent vectors are flipped and rotated about their unit bisector; the
/// image of the second substituent is returned first so that labels line up with
/// [`cross_product`]. Returns `None` for degenerate input.
pub fn rotation(
    vertex_a: &Point3<f64>,
    origin: &Point3<f64>,
    vertex_b: &Point3<f64>,
) -> Option<(Vector3<f64>, Vector3<f64>)> {
    let u = -(vertex_a - origin);
    let v = -(vertex_b - origin);
    if u.norm() < EPSILON || v.norm() < EPSILON {
        return None;
    }

    let axis = (0.5 * (u + v)).try_normalize(EPSILON)?;
    let skew = axis.cross_matrix();
    let theta = ROTATION_ANGLE_DEGREES.to_radians();
    let rotation =
        Matrix3::identity() + skew * theta.sin() + skew * skew * (1.0 - theta.cos());

    Some((rotation * v, rotation * u))
}

pub fn interpolate(residue: &MethionineResidue, model: LonePairModel) -> Option<LonePair> {
    let (a, g) = match model {
        LonePairModel::CrossProduct => cross_product(&residue.cg, &residue.sd, &residue.ce),
        LonePairModel::Rotation => rotation(&residue.cg, &residue.sd, &residue.ce),
    }?;
    Some(LonePair {
        residue_number: residue.residue_number,
        sulfur: residue.sd,
        a,
        g,
    })
}

/// Reconstructs lone pairs for every methionine. Residues with degenerate sulfur
/// geometry are dropped.
pub fn run(residues: &[MethionineResidue], model: LonePairModel) -> Vec<LonePair> {
    residues
        .iter()
        .filter_map(|residue| {
            let lone_pair = interpolate(residue, model);
            if lone_pair.is_none() {
                warn!(
                    residue = residue.residue_number,
                    "Skipping methionine with degenerate CG-SD-CE geometry."
                );
            }
            lone_pair
        })
        .collect()
}
