//! Synthetic PDB content for workflow tests.

use crate::core::io::source::{SourceError, StructureSource};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

const PHE_RING: [&str; 6] = ["CG", "CD2", "CE2", "CZ", "CE1", "CD1"];

pub fn atom(name: &str, residue: &str, number: isize, p: [f64; 3]) -> String {
    format!(
        "ATOM      1  {:<4}{} A{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00",
        name, residue, number, p[0], p[1], p[2]
    )
}

/// A methionine whose lone pairs point along `facing` (the sign of x).
pub fn methionine(number: isize, sd: [f64; 3], facing: f64) -> Vec<String> {
    let offset = -0.5 * facing;
    vec![
        atom("CG", "MET", number, [sd[0] + offset, sd[1] + 0.5, sd[2]]),
        atom("SD", "MET", number, sd),
        atom("CE", "MET", number, [sd[0] + offset, sd[1] - 0.5, sd[2]]),
    ]
}

/// A regular hexagonal ring of radius 1.4 Å in the xy-plane.
pub fn phenylalanine(number: isize, center: [f64; 3]) -> Vec<String> {
    PHE_RING
        .iter()
        .enumerate()
        .map(|(k, name)| {
            let angle = (60.0 * k as f64).to_radians();
            atom(
                name,
                "PHE",
                number,
                [
                    center[0] + 1.4 * angle.cos(),
                    center[1] + 1.4 * angle.sin(),
                    center[2],
                ],
            )
        })
        .collect()
}

pub fn structure(parts: Vec<Vec<String>>) -> Vec<String> {
    let mut lines = vec!["HEADER    SYNTHETIC".to_string()];
    lines.extend(parts.into_iter().flatten());
    lines.push("END".to_string());
    lines
}

/// One methionine facing one ring: six contacts under default thresholds.
pub fn contact_pair() -> Vec<String> {
    structure(vec![
        methionine(18, [0.0, 0.0, 0.0], -1.0),
        phenylalanine(54, [-3.0, 0.0, 0.0]),
    ])
}

/// In-memory structure source that counts fetches. Unknown identifiers are not found.
#[derive(Default)]
pub struct FixtureSource {
    structures: BTreeMap<String, Vec<String>>,
    calls: AtomicUsize,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, code: &str, lines: Vec<String>) -> Self {
        self.structures.insert(code.to_string(), lines);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl StructureSource for FixtureSource {
    fn fetch(&self, code: &str) -> Result<Vec<String>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.structures
            .get(code)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(code.to_string()))
    }
}
