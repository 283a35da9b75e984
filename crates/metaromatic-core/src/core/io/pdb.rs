use crate::core::models::atom::AtomRecord;
use crate::core::models::residue::ResidueKind;
use crate::core::topology::rings;
use nalgebra::Point3;
use std::io::{self, BufRead};
use std::ops::Range;
use thiserror::Error;
use tracing::{debug, trace};

const ATOM_RECORD: &str = "ATOM";
const END_OF_MODEL: &str = "ENDMDL";
const REQUIRED_TOKENS: usize = 9;
// Tag, serial, atom name, residue name, chain, residue number and one coordinate field.
const MIN_TOKENS: usize = 7;
const RESIDUE_NUMBER_COLUMNS: Range<usize> = 22..26;
const COORDINATE_COLUMNS: [Range<usize>; 3] = [30..38, 38..46, 46..54];

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid residue sequence number (value: '{0}')")]
    InvalidResidueNumber(String),
    #[error("Invalid {axis} coordinate (value: '{value}')")]
    InvalidCoordinate { axis: char, value: String },
}

/// Atoms of interest from the first model of one chain, one list per residue kind,
/// each in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedAtoms {
    pub methionine: Vec<AtomRecord>,
    pub phenylalanine: Vec<AtomRecord>,
    pub tyrosine: Vec<AtomRecord>,
    pub tryptophan: Vec<AtomRecord>,
}

impl ExtractedAtoms {
    fn push(&mut self, atom: AtomRecord) {
        self.list_mut(atom.kind).push(atom);
    }

    fn list_mut(&mut self, kind: ResidueKind) -> &mut Vec<AtomRecord> {
        match kind {
            ResidueKind::Methionine => &mut self.methionine,
            ResidueKind::Phenylalanine => &mut self.phenylalanine,
            ResidueKind::Tyrosine => &mut self.tyrosine,
            ResidueKind::Tryptophan => &mut self.tryptophan,
        }
    }

    pub fn of_kind(&self, kind: ResidueKind) -> &[AtomRecord] {
        match kind {
            ResidueKind::Methionine => &self.methionine,
            ResidueKind::Phenylalanine => &self.phenylalanine,
            ResidueKind::Tyrosine => &self.tyrosine,
            ResidueKind::Tryptophan => &self.tryptophan,
        }
    }

    pub fn has_aromatics(&self) -> bool {
        ResidueKind::AROMATICS
            .iter()
            .any(|kind| !self.of_kind(*kind).is_empty())
    }

    pub fn total(&self) -> usize {
        self.methionine.len() + self.phenylalanine.len() + self.tyrosine.len() + self.tryptophan.len()
    }
}

/// Reads atom records for `chain_id` from a PDB-formatted stream, stopping at the first
/// end-of-model marker.
///
/// Lines are tokenized on whitespace: token 1 is the record tag, tokens 3-6 the atom
/// name, residue name, chain and residue number, and tokens 7-9 the coordinates. When
/// those numeric tokens do not parse, the residue number and coordinates are read from
/// the fixed PDB columns instead (resSeq 23-26, x/y/z 31-54).
///
/// # Errors
///
/// Returns [`PdbError::Io`] if reading fails, or [`PdbError::Parse`] if a record that
/// matches the residue/chain/atom tables is unreadable both ways.
pub fn extract_atoms(reader: impl BufRead, chain_id: char) -> Result<ExtractedAtoms, PdbError> {
    let mut extracted = ExtractedAtoms::default();
    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        if !scan_line(&line, line_num + 1, chain_id, &mut extracted)? {
            break;
        }
    }
    Ok(extracted)
}

/// Same as [`extract_atoms`], for lines already held in memory.
pub fn extract_atoms_from_lines<I, S>(lines: I, chain_id: char) -> Result<ExtractedAtoms, PdbError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extracted = ExtractedAtoms::default();
    for (line_num, line) in lines.into_iter().enumerate() {
        if !scan_line(line.as_ref(), line_num + 1, chain_id, &mut extracted)? {
            break;
        }
    }
    Ok(extracted)
}

// Returns `false` once the end of the first model has been reached.
fn scan_line(
    line: &str,
    line_num: usize,
    chain_id: char,
    extracted: &mut ExtractedAtoms,
) -> Result<bool, PdbError> {
    let tokens: Vec<&str> = line.split_whitespace().take(REQUIRED_TOKENS).collect();
    match tokens.first() {
        Some(&END_OF_MODEL) => {
            trace!(line = line_num, "Reached end of first model.");
            return Ok(false);
        }
        Some(&ATOM_RECORD) if tokens.len() >= MIN_TOKENS => {}
        _ => return Ok(true),
    }

    let Ok(kind) = tokens[3].parse::<ResidueKind>() else {
        return Ok(true);
    };
    if !matches_chain(tokens[4], chain_id) || !rings::is_relevant_atom(kind, tokens[2]) {
        return Ok(true);
    }

    let (residue_number, position) = match numbers_from_tokens(&tokens) {
        Some(fields) => fields,
        None => {
            debug!(
                line = line_num,
                atom = tokens[2],
                "Whitespace fields did not parse; reading fixed columns."
            );
            numbers_from_columns(line, line_num)?
        }
    };

    extracted.push(AtomRecord::new(
        kind,
        chain_id,
        residue_number,
        tokens[2],
        position,
    ));
    Ok(true)
}

fn numbers_from_tokens(tokens: &[&str]) -> Option<(isize, Point3<f64>)> {
    if tokens.len() < REQUIRED_TOKENS {
        return None;
    }
    let residue_number = tokens[5].parse().ok()?;
    let position = Point3::new(
        tokens[6].parse().ok()?,
        tokens[7].parse().ok()?,
        tokens[8].parse().ok()?,
    );
    Some((residue_number, position))
}

// Insertion codes glued to the residue number and coordinates of -100 or below leave
// no whitespace between fields; the fixed PDB columns still separate them.
fn numbers_from_columns(line: &str, line_num: usize) -> Result<(isize, Point3<f64>), PdbError> {
    let column = |range: Range<usize>| line.get(range).unwrap_or("").trim();

    let residue_field = column(RESIDUE_NUMBER_COLUMNS);
    let residue_number = residue_field.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidResidueNumber(residue_field.to_string()),
    })?;

    let mut coords = [0.0; 3];
    for ((axis, range), value) in ['x', 'y', 'z']
        .into_iter()
        .zip(COORDINATE_COLUMNS)
        .zip(coords.iter_mut())
    {
        let field = column(range);
        *value = field.parse().map_err(|_| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidCoordinate {
                axis,
                value: field.to_string(),
            },
        })?;
    }

    Ok((residue_number, Point3::from(coords)))
}

fn matches_chain(token: &str, chain_id: char) -> bool {
    let mut chars = token.chars();
    chars.next() == Some(chain_id) && chars.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TWO_MODEL_FILE: &str = "\
HEADER    TEST STRUCTURE
MODEL        1
ATOM      1  N   MET A   1      11.104  13.207   2.100  1.00  0.00           N
ATOM      5  CG  MET A   1      10.000  10.000  10.000  1.00  0.00           C
ATOM      6  SD  MET A   1      11.000  10.000  10.000  1.00  0.00           S
ATOM      7  CE  MET A   1      12.000  10.000  10.000  1.00  0.00           C
ATOM      8  CG  MET B   2      20.000  20.000  20.000  1.00  0.00           C
ATOM      9  CZ  PHE A   3       1.000   2.000   3.000  1.00  0.00           C
ATOM     10  CB  PHE A   3       1.000   2.000   3.000  1.00  0.00           C
ATOM     11  OH  TYR A   4       1.000   2.000   3.000  1.00  0.00           O
ATOM     12  CE1 TYR A   4       4.000   5.000   6.000  1.00  0.00           C
HETATM   13  SD  MET A   5       4.000   5.000   6.000  1.00  0.00           S
ATOM     14  CZ2 TRP A   6       7.000   8.000   9.000  1.00  0.00           C
ENDMDL
MODEL        2
ATOM     15  SD  MET A   1      99.000  99.000  99.000  1.00  0.00           S
ENDMDL
END
";

    #[test]
    fn extracts_relevant_atoms_from_first_model_only() {
        let atoms = extract_atoms(Cursor::new(TWO_MODEL_FILE), 'A').unwrap();
        let met_names: Vec<&str> = atoms.methionine.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(met_names, vec!["CG", "SD", "CE"]);
        assert!(atoms.methionine.iter().all(|a| a.position.x < 99.0));
        assert_eq!(atoms.phenylalanine.len(), 1);
        assert_eq!(atoms.phenylalanine[0].name, "CZ");
        assert_eq!(atoms.tyrosine.len(), 1);
        assert_eq!(atoms.tyrosine[0].position, Point3::new(4.0, 5.0, 6.0));
        assert_eq!(atoms.tryptophan.len(), 1);
        assert_eq!(atoms.total(), 6);
    }

    #[test]
    fn filters_by_chain() {
        let atoms = extract_atoms(Cursor::new(TWO_MODEL_FILE), 'B').unwrap();
        assert_eq!(atoms.methionine.len(), 1);
        assert_eq!(atoms.methionine[0].residue_number, 2);
        assert_eq!(atoms.methionine[0].chain_id, 'B');
        assert!(!atoms.has_aromatics());
    }

    #[test]
    fn ignores_hetatm_records() {
        let atoms = extract_atoms(Cursor::new(TWO_MODEL_FILE), 'A').unwrap();
        assert!(atoms.methionine.iter().all(|a| a.residue_number == 1));
    }

    #[test]
    fn in_memory_lines_match_stream_extraction() {
        let from_stream = extract_atoms(Cursor::new(TWO_MODEL_FILE), 'A').unwrap();
        let from_lines = extract_atoms_from_lines(TWO_MODEL_FILE.lines(), 'A').unwrap();
        assert_eq!(from_stream, from_lines);
    }

    #[test]
    fn unparsable_coordinate_on_relevant_atom_is_an_error() {
        let content =
            "ATOM      6  SD  MET A   1      11.000  abc     10.000  1.00  0.00           S\n";
        let err = extract_atoms(Cursor::new(content), 'A').unwrap_err();
        assert!(matches!(
            err,
            PdbError::Parse {
                line: 1,
                kind: PdbParseErrorKind::InvalidCoordinate { axis: 'y', .. }
            }
        ));
    }

    fn fixed_column_line(name: &str, residue: &str, number: &str, xyz: [f64; 3]) -> String {
        format!(
            "ATOM    500  {:<4}{} A{:<5}   {:>8.3}{:>8.3}{:>8.3}  1.00  0.00           C",
            name, residue, number, xyz[0], xyz[1], xyz[2]
        )
    }

    #[test]
    fn insertion_code_glued_to_residue_number_falls_back_to_columns() {
        let line = fixed_column_line("CZ", "PHE", "  52A", [-3.0, 0.5, 1.25]);
        assert!(line.contains(" A  52A "));
        let atoms = extract_atoms_from_lines([line.as_str()], 'A').unwrap();
        assert_eq!(atoms.phenylalanine.len(), 1);
        assert_eq!(atoms.phenylalanine[0].residue_number, 52);
        assert_eq!(atoms.phenylalanine[0].position, Point3::new(-3.0, 0.5, 1.25));
    }

    #[test]
    fn run_together_coordinates_fall_back_to_columns() {
        let line = fixed_column_line("SD", "MET", "  18 ", [-10.0, -100.123, -200.456]);
        assert!(line.contains("-10.000-100.123-200.456"));
        let atoms = extract_atoms_from_lines([line.as_str()], 'A').unwrap();
        assert_eq!(atoms.methionine.len(), 1);
        assert_eq!(atoms.methionine[0].residue_number, 18);
        assert_eq!(
            atoms.methionine[0].position,
            Point3::new(-10.0, -100.123, -200.456)
        );
    }

    #[test]
    fn unparsable_irrelevant_atom_is_skipped() {
        let content =
            "ATOM      1  CA  MET A   1      11.000  abc     10.000  1.00  0.00           C\n";
        let atoms = extract_atoms(Cursor::new(content), 'A').unwrap();
        assert_eq!(atoms.total(), 0);
    }

    #[test]
    fn short_lines_are_skipped() {
        let content = "ATOM\nATOM 1 SD MET A\n\n";
        let atoms = extract_atoms(Cursor::new(content), 'A').unwrap();
        assert_eq!(atoms.total(), 0);
    }

    #[test]
    fn chain_token_must_be_a_single_matching_character() {
        assert!(matches_chain("A", 'A'));
        assert!(!matches_chain("A1000", 'A'));
        assert!(!matches_chain("B", 'A'));
    }
}
