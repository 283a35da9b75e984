use crate::core::models::interaction::{Interaction, LonePair, Midpoint};
use crate::core::models::residue::ResidueKind;
use crate::core::utils::geometry::{angle_degrees, round_to};
use crate::engine::config::DetectionConfig;
use itertools::Itertools;
use tracing::{debug, trace};

const OUTPUT_PRECISION: i32 = 3;

/// Angular acceptance contract: a pair qualifies when at least one lone-pair angle is
/// at or below the cutoff. Both bounds are inclusive. NaN angles (see
/// [`angle_degrees`]) never qualify.
pub fn is_within_angle(theta: f64, phi: f64, cutoff_angle: f64) -> bool {
    theta <= cutoff_angle || phi <= cutoff_angle
}

pub fn is_within_distance(norm: f64, cutoff_distance: f64) -> bool {
    norm <= cutoff_distance
}

/// Tests a single lone pair against a single ring midpoint. Thresholds are applied to
/// unrounded values; only the accepted record is rounded.
pub fn evaluate(
    lone_pair: &LonePair,
    midpoint: &Midpoint,
    config: &DetectionConfig,
) -> Option<Interaction> {
    let v = midpoint.position - lone_pair.sulfur;
    let norm = v.norm();
    if !is_within_distance(norm, config.cutoff_distance) {
        return None;
    }

    let theta = angle_degrees(&v, &lone_pair.a);
    let phi = angle_degrees(&v, &lone_pair.g);
    if !is_within_angle(theta, phi, config.cutoff_angle) {
        return None;
    }

    trace!(
        aromatic = %midpoint.kind,
        aromatic_position = midpoint.residue_number,
        methionine_position = lone_pair.residue_number,
        norm,
        theta,
        phi,
        "Accepted contact."
    );

    Some(Interaction {
        aromatic_residue: midpoint.kind,
        aromatic_position: midpoint.residue_number,
        methionine_position: lone_pair.residue_number,
        norm: round_to(norm, OUTPUT_PRECISION),
        met_theta_angle: round_to(theta, OUTPUT_PRECISION),
        met_phi_angle: round_to(phi, OUTPUT_PRECISION),
    })
}

/// Scans every (lone pair, midpoint) pair and keeps the accepted ones.
///
/// Output order follows the scan: methionines in input order, then midpoints in input
/// order. One aromatic residue can appear several times for the same methionine, once
/// per qualifying ring edge.
pub fn run(
    lone_pairs: &[LonePair],
    midpoints: &[Midpoint],
    config: &DetectionConfig,
) -> Vec<Interaction> {
    let interactions: Vec<Interaction> = lone_pairs
        .iter()
        .cartesian_product(midpoints.iter())
        .filter_map(|(lone_pair, midpoint)| evaluate(lone_pair, midpoint, config))
        .collect();

    debug!(
        pairs = lone_pairs.len() * midpoints.len(),
        accepted = interactions.len(),
        "Interaction scan complete."
    );
    interactions
}

/// Distinct (aromatic label, methionine label) pairs, in first-seen order.
pub fn residue_pairs(interactions: &[Interaction]) -> Vec<(String, String)> {
    interactions
        .iter()
        .map(|i| (i.aromatic_label(), i.methionine_label()))
        .unique()
        .collect()
}

/// Counts accepted contacts per aromatic kind. Kinds without contacts are included.
pub fn count_by_kind(interactions: &[Interaction]) -> Vec<(ResidueKind, usize)> {
    ResidueKind::AROMATICS
        .iter()
        .map(|&kind| {
            let count = interactions
                .iter()
                .filter(|i| i.aromatic_residue == kind)
                .count();
            (kind, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    fn lone_pair(number: isize) -> LonePair {
        LonePair {
            residue_number: number,
            sulfur: Point3::origin(),
            a: Vector3::x(),
            g: Vector3::y(),
        }
    }

    fn midpoint(kind: ResidueKind, number: isize, position: Point3<f64>) -> Midpoint {
        Midpoint {
            kind,
            residue_number: number,
            position,
        }
    }

    fn config(distance: f64, angle: f64) -> DetectionConfig {
        DetectionConfig {
            cutoff_distance: distance,
            cutoff_angle: angle,
            ..DetectionConfig::default()
        }
    }

    #[test]
    fn angle_contract_accepts_when_either_angle_is_within_cutoff() {
        assert!(is_within_angle(30.0, 150.0, 60.0));
        assert!(is_within_angle(150.0, 30.0, 60.0));
        assert!(!is_within_angle(61.0, 150.0, 60.0));
        assert!(!is_within_angle(f64::NAN, f64::NAN, 360.0));
    }

    #[test]
    fn angle_and_distance_bounds_are_inclusive() {
        assert!(is_within_angle(60.0, 180.0, 60.0));
        assert!(is_within_angle(180.0, 60.0, 60.0));
        assert!(is_within_distance(4.9, 4.9));
        assert!(!is_within_distance(4.900001, 4.9));
    }

    #[test]
    fn midpoint_on_the_sulfur_is_rejected() {
        let lp = lone_pair(18);
        let m = midpoint(ResidueKind::Phenylalanine, 5, lp.sulfur);
        assert!(evaluate(&lp, &m, &config(4.9, 360.0)).is_none());
    }

    #[test]
    fn accepts_contact_along_a_lone_pair() {
        let m = midpoint(ResidueKind::Tyrosine, 122, Point3::new(4.0, 0.0, 0.0));
        let interaction = evaluate(&lone_pair(18), &m, &config(4.9, 109.5)).unwrap();
        assert_eq!(interaction.aromatic_residue, ResidueKind::Tyrosine);
        assert_eq!(interaction.aromatic_position, 122);
        assert_eq!(interaction.methionine_position, 18);
        assert_eq!(interaction.norm, 4.0);
        assert_eq!(interaction.met_theta_angle, 0.0);
        assert_eq!(interaction.met_phi_angle, 90.0);
    }

    #[test]
    fn rejects_contact_beyond_distance_cutoff() {
        let m = midpoint(ResidueKind::Phenylalanine, 1, Point3::new(5.0, 0.0, 0.0));
        assert!(evaluate(&lone_pair(1), &m, &config(4.9, 109.5)).is_none());
    }

    #[test]
    fn rejects_contact_when_both_angles_exceed_cutoff() {
        // Opposite both lone pairs: theta = phi = 125.26 degrees.
        let m = midpoint(ResidueKind::Tryptophan, 2, Point3::new(-1.0, -1.0, 1.0));
        assert!(evaluate(&lone_pair(1), &m, &config(4.9, 109.5)).is_none());
        assert!(evaluate(&lone_pair(1), &m, &config(4.9, 126.0)).is_some());
    }

    #[test]
    fn output_values_are_rounded_to_three_places() {
        let m = midpoint(
            ResidueKind::Phenylalanine,
            3,
            Point3::new(1.23456, 2.34567, 0.0),
        );
        let interaction = evaluate(&lone_pair(1), &m, &config(4.9, 109.5)).unwrap();
        let expected_norm = (1.23456f64.powi(2) + 2.34567f64.powi(2)).sqrt();
        assert_eq!(interaction.norm, round_to(expected_norm, 3));
        assert_eq!(interaction.norm, (interaction.norm * 1000.0).round() / 1000.0);
        assert_eq!(
            interaction.met_theta_angle,
            (interaction.met_theta_angle * 1000.0).round() / 1000.0
        );
    }

    #[test]
    fn run_scans_lone_pairs_then_midpoints_in_order() {
        let lone_pairs = vec![lone_pair(5), lone_pair(9)];
        let midpoints = vec![
            midpoint(ResidueKind::Phenylalanine, 1, Point3::new(1.0, 0.0, 0.0)),
            midpoint(ResidueKind::Tyrosine, 2, Point3::new(0.0, 2.0, 0.0)),
            midpoint(ResidueKind::Tryptophan, 3, Point3::new(50.0, 0.0, 0.0)),
        ];
        let interactions = run(&lone_pairs, &midpoints, &config(4.9, 109.5));
        let keys: Vec<(isize, isize)> = interactions
            .iter()
            .map(|i| (i.methionine_position, i.aromatic_position))
            .collect();
        assert_eq!(keys, vec![(5, 1), (5, 2), (9, 1), (9, 2)]);
        assert!(interactions
            .iter()
            .all(|i| i.norm <= 4.9 && (i.met_theta_angle <= 109.5 || i.met_phi_angle <= 109.5)));
    }

    #[test]
    fn run_with_no_inputs_is_empty() {
        assert!(run(&[], &[], &DetectionConfig::default()).is_empty());
        let midpoints = vec![midpoint(ResidueKind::Tyrosine, 2, Point3::new(0.0, 2.0, 0.0))];
        assert!(run(&[], &midpoints, &DetectionConfig::default()).is_empty());
    }

    #[test]
    fn residue_pairs_and_counts_summarize_contacts() {
        let lone_pairs = vec![lone_pair(5)];
        let midpoints = vec![
            midpoint(ResidueKind::Tyrosine, 2, Point3::new(1.0, 0.0, 0.0)),
            midpoint(ResidueKind::Tyrosine, 2, Point3::new(0.0, 1.0, 0.0)),
        ];
        let interactions = run(&lone_pairs, &midpoints, &config(4.9, 109.5));
        assert_eq!(interactions.len(), 2);
        assert_eq!(
            residue_pairs(&interactions),
            vec![("TYR2".to_string(), "MET5".to_string())]
        );
        assert_eq!(
            count_by_kind(&interactions),
            vec![
                (ResidueKind::Phenylalanine, 0),
                (ResidueKind::Tyrosine, 2),
                (ResidueKind::Tryptophan, 0),
            ]
        );
    }
}
