use metaromatic::core::models::interaction::{Bridge, Interaction};
use metaromatic::core::models::residue::ResidueKind;
use std::fmt::Write;

const HEADER: [&str; 6] = ["ARO", "POS", "MET POS", "NORM", "MET-THETA", "MET-PHI"];

/// Formats interactions as a fixed-width text table.
pub fn format_interactions(interactions: &[Interaction]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5}{:>8}{:>10}{:>10}{:>12}{:>12}",
        HEADER[0], HEADER[1], HEADER[2], HEADER[3], HEADER[4], HEADER[5]
    );
    for i in interactions {
        let _ = writeln!(
            out,
            "{:<5}{:>8}{:>10}{:>10.3}{:>12.3}{:>12.3}",
            i.aromatic_residue.code(),
            i.aromatic_position,
            i.methionine_position,
            i.norm,
            i.met_theta_angle,
            i.met_phi_angle
        );
    }
    out
}

/// One-line breakdown of contacts per aromatic kind, e.g. `PHE: 6, TYR: 2, TRP: 0`.
pub fn format_kind_counts(counts: &[(ResidueKind, usize)]) -> String {
    counts
        .iter()
        .map(|(kind, count)| format!("{}: {}", kind, count))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_bridges(bridges: &[Bridge]) -> String {
    let mut out = String::new();
    for bridge in bridges {
        let _ = writeln!(out, "{}", bridge);
    }
    out
}
