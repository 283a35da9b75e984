use crate::core::io::pdb::{self, ExtractedAtoms};
use crate::core::io::source::StructureSource;
use crate::core::models::interaction::{Bridge, Interaction};
use crate::engine::config::{DetectionConfig, validate_bridge_size};
use crate::engine::error::DetectionError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks::{bridges, interactions, lone_pairs, midpoints};
use std::io::BufRead;
use tracing::{info, instrument};

/// Runs the detection pipeline over a PDB-formatted stream.
///
/// # Errors
///
/// See [`run_lines`].
#[instrument(skip_all, name = "detect_workflow", fields(chain = %config.chain, model = %config.model))]
pub fn run(
    reader: impl BufRead,
    config: &DetectionConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<Interaction>, DetectionError> {
    config.validate()?;
    reporter.report(Progress::PhaseStart { name: "Extraction" });
    let extracted = pdb::extract_atoms(reader, config.chain)?;
    reporter.report(Progress::PhaseFinish);
    detect(&extracted, config, reporter)
}

/// Runs the detection pipeline over the lines of a structure file.
///
/// # Errors
///
/// - [`DetectionError::InvalidConfig`] if `config` fails validation; nothing is read.
/// - [`DetectionError::MalformedRecord`] if a relevant atom line is unreadable both by
///   whitespace fields and by fixed columns.
/// - [`DetectionError::NoTargetAtoms`] / [`DetectionError::NoCandidatePartners`] if the
///   chain has no usable methionine or aromatic residue.
/// - [`DetectionError::NoInteractions`] if no pair passes the cutoffs.
#[instrument(skip_all, name = "detect_workflow", fields(chain = %config.chain, model = %config.model))]
pub fn run_lines<I, S>(
    lines: I,
    config: &DetectionConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<Interaction>, DetectionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    config.validate()?;
    reporter.report(Progress::PhaseStart { name: "Extraction" });
    let extracted = pdb::extract_atoms_from_lines(lines, config.chain)?;
    reporter.report(Progress::PhaseFinish);
    detect(&extracted, config, reporter)
}

/// Fetches `code` from `source` and runs the pipeline on it. The configuration is
/// validated before the source is touched.
#[instrument(skip_all, name = "query", fields(code = %code))]
pub fn query(
    source: &dyn StructureSource,
    code: &str,
    config: &DetectionConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<Interaction>, DetectionError> {
    config.validate()?;
    reporter.report(Progress::PhaseStart { name: "Fetch" });
    let lines = source.fetch(code)?;
    reporter.report(Progress::PhaseFinish);
    run_lines(&lines, config, reporter)
}

/// Runs detection and reduces the interactions to bridges of exactly `size` residues.
///
/// An empty vector means interactions exist but none form a component of that size.
pub fn run_bridges<I, S>(
    lines: I,
    config: &DetectionConfig,
    size: usize,
    reporter: &ProgressReporter,
) -> Result<Vec<Bridge>, DetectionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    validate_bridge_size(size)?;
    let found = run_lines(lines, config, reporter)?;
    Ok(reduce_to_bridges(&found, size, reporter))
}

pub fn query_bridges(
    source: &dyn StructureSource,
    code: &str,
    config: &DetectionConfig,
    size: usize,
    reporter: &ProgressReporter,
) -> Result<Vec<Bridge>, DetectionError> {
    validate_bridge_size(size)?;
    let found = query(source, code, config, reporter)?;
    Ok(reduce_to_bridges(&found, size, reporter))
}

pub(crate) fn reduce_to_bridges(
    found: &[Interaction],
    size: usize,
    reporter: &ProgressReporter,
) -> Vec<Bridge> {
    reporter.report(Progress::PhaseStart { name: "Bridges" });
    let result = bridges::run(found, size);
    reporter.report(Progress::PhaseFinish);
    info!(size, bridges = result.len(), "Bridge reduction complete.");
    result
}

fn detect(
    extracted: &ExtractedAtoms,
    config: &DetectionConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<Interaction>, DetectionError> {
    let chain = config.chain;
    if extracted.methionine.is_empty() {
        return Err(DetectionError::NoTargetAtoms { chain });
    }
    if !extracted.has_aromatics() {
        return Err(DetectionError::NoCandidatePartners { chain });
    }

    // === Phase 1: Residue selection ===
    reporter.report(Progress::PhaseStart { name: "Residues" });
    let methionines = lone_pairs::select_residues(&extracted.methionine);
    let aromatics = midpoints::select_residues(extracted);
    reporter.report(Progress::PhaseFinish);
    if methionines.is_empty() {
        return Err(DetectionError::NoTargetAtoms { chain });
    }
    if aromatics.is_empty() {
        return Err(DetectionError::NoCandidatePartners { chain });
    }

    // === Phase 2: Geometry ===
    reporter.report(Progress::PhaseStart { name: "Geometry" });
    let lone_pairs = lone_pairs::run(&methionines, config.model);
    let ring_midpoints = midpoints::run(&aromatics);
    reporter.report(Progress::PhaseFinish);
    if lone_pairs.is_empty() {
        return Err(DetectionError::NoTargetAtoms { chain });
    }

    // === Phase 3: Interaction scan ===
    reporter.report(Progress::PhaseStart { name: "Interactions" });
    let found = interactions::run(&lone_pairs, &ring_midpoints, config);
    reporter.report(Progress::PhaseFinish);

    info!(
        methionines = lone_pairs.len(),
        aromatics = aromatics.len(),
        interactions = found.len(),
        "Detection complete."
    );

    if found.is_empty() {
        return Err(DetectionError::NoInteractions);
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::source::{RcsbSource, SourceError};
    use crate::core::models::residue::ResidueKind;
    use crate::engine::config::{ConfigError, LonePairModel};
    use crate::workflows::fixtures::{
        FixtureSource, contact_pair, methionine, phenylalanine, structure,
    };
    use std::io::Cursor;
    use std::sync::Mutex;

    fn silent() -> ProgressReporter<'static> {
        ProgressReporter::new()
    }

    #[test]
    fn detects_every_ring_edge_facing_the_lone_pairs() {
        let found = run_lines(&contact_pair(), &DetectionConfig::default(), &silent()).unwrap();
        assert_eq!(found.len(), 6);
        assert!(found.iter().all(|i| i.aromatic_residue == ResidueKind::Phenylalanine
            && i.aromatic_position == 54
            && i.methionine_position == 18));
        assert!(found.iter().all(|i| i.norm <= 4.9
            && (i.met_theta_angle <= 109.5 || i.met_phi_angle <= 109.5)));
    }

    #[test]
    fn both_models_find_the_same_contacts_on_symmetric_geometry() {
        let lines = contact_pair();
        let rotation = DetectionConfig {
            model: LonePairModel::Rotation,
            ..DetectionConfig::default()
        };
        let cp = run_lines(&lines, &DetectionConfig::default(), &silent()).unwrap();
        let rm = run_lines(&lines, &rotation, &silent()).unwrap();
        assert_eq!(cp.len(), rm.len());
        for (a, b) in cp.iter().zip(&rm) {
            assert_eq!(a.norm, b.norm);
            assert_eq!(a.aromatic_position, b.aromatic_position);
        }
    }

    #[test]
    fn stream_and_line_entry_points_agree() {
        let lines = contact_pair();
        let text = lines.join("\n");
        let from_stream = run(Cursor::new(text), &DetectionConfig::default(), &silent()).unwrap();
        let from_lines = run_lines(&lines, &DetectionConfig::default(), &silent()).unwrap();
        assert_eq!(from_stream, from_lines);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let lines = structure(vec![
            phenylalanine(3, [-3.0, 0.0, 0.0]),
            methionine(40, [-6.0, 0.0, 0.0], 1.0),
            methionine(18, [0.0, 0.0, 0.0], -1.0),
        ]);
        let config = DetectionConfig::default();
        let first = run_lines(&lines, &config, &silent()).unwrap();
        let second = run_lines(&lines, &config, &silent()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        // Methionines are scanned by sequence number, not file order.
        assert_eq!(first[0].methionine_position, 18);
        assert_eq!(first.last().unwrap().methionine_position, 40);
    }

    #[test]
    fn missing_methionine_is_no_target_atoms() {
        let lines = structure(vec![phenylalanine(3, [-3.0, 0.0, 0.0])]);
        let err = run_lines(&lines, &DetectionConfig::default(), &silent()).unwrap_err();
        assert!(matches!(err, DetectionError::NoTargetAtoms { chain: 'A' }));
        assert!(err.is_structural());
    }

    #[test]
    fn methionine_in_another_chain_is_no_target_atoms() {
        let config = DetectionConfig {
            chain: 'B',
            ..DetectionConfig::default()
        };
        let err = run_lines(&contact_pair(), &config, &silent()).unwrap_err();
        assert!(matches!(err, DetectionError::NoTargetAtoms { chain: 'B' }));
    }

    #[test]
    fn missing_aromatics_is_no_candidate_partners() {
        let lines = structure(vec![methionine(18, [0.0, 0.0, 0.0], -1.0)]);
        let err = run_lines(&lines, &DetectionConfig::default(), &silent()).unwrap_err();
        assert!(matches!(err, DetectionError::NoCandidatePartners { chain: 'A' }));
    }

    #[test]
    fn incomplete_residues_do_not_count_as_present() {
        let mut partial_met = methionine(18, [0.0, 0.0, 0.0], -1.0);
        partial_met.truncate(2);
        let lines = structure(vec![partial_met, phenylalanine(3, [-3.0, 0.0, 0.0])]);
        let err = run_lines(&lines, &DetectionConfig::default(), &silent()).unwrap_err();
        assert!(matches!(err, DetectionError::NoTargetAtoms { .. }));

        let mut partial_ring = phenylalanine(3, [-3.0, 0.0, 0.0]);
        partial_ring.pop();
        let lines = structure(vec![methionine(18, [0.0, 0.0, 0.0], -1.0), partial_ring]);
        let err = run_lines(&lines, &DetectionConfig::default(), &silent()).unwrap_err();
        assert!(matches!(err, DetectionError::NoCandidatePartners { .. }));
    }

    #[test]
    fn distant_ring_is_no_interactions_not_a_structural_failure() {
        let lines = structure(vec![
            methionine(18, [0.0, 0.0, 0.0], -1.0),
            phenylalanine(3, [-30.0, 0.0, 0.0]),
        ]);
        let err = run_lines(&lines, &DetectionConfig::default(), &silent()).unwrap_err();
        assert!(matches!(err, DetectionError::NoInteractions));
        assert!(!err.is_structural());
    }

    #[test]
    fn malformed_relevant_atom_is_reported() {
        let mut lines = contact_pair();
        lines.insert(
            1,
            "ATOM      1  SD  MET A  19       1.000  bad      0.000  1.00  0.00".to_string(),
        );
        let err = run_lines(&lines, &DetectionConfig::default(), &silent()).unwrap_err();
        assert!(matches!(err, DetectionError::MalformedRecord(_)));
        assert_eq!(err.code(), "malformed-record");
    }

    #[test]
    fn stream_and_line_entry_points_run_inside_the_workflow_span() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::PhaseStart { name: "Extraction" } = event {
                let span = tracing::Span::current();
                seen.lock().unwrap().push(span.metadata().map(|m| m.name()));
            }
        }));
        let text = contact_pair().join("\n");

        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            run(
                Cursor::new(text.as_bytes()),
                &DetectionConfig::default(),
                &reporter,
            )
            .unwrap();
            run_lines(&contact_pair(), &DetectionConfig::default(), &reporter).unwrap();
        });
        drop(reporter);

        assert_eq!(
            seen.into_inner().unwrap(),
            vec![Some("detect_workflow"), Some("detect_workflow")]
        );
    }

    #[test]
    fn column_aligned_records_without_separators_do_not_abort_the_query() {
        let mut lines = contact_pair();
        lines.insert(
            1,
            "ATOM    500  CZ  PHE A  52A     30.000  30.000  30.000  1.00  0.00".to_string(),
        );
        lines.insert(
            2,
            "ATOM    501  CZ  TYR A  60     -10.000-100.123-200.456  1.00  0.00".to_string(),
        );
        let interactions = run_lines(&lines, &DetectionConfig::default(), &silent()).unwrap();
        assert_eq!(interactions.len(), 6);
        assert!(interactions.iter().all(|i| i.aromatic_position == 54));
    }

    #[test]
    fn invalid_config_is_rejected_before_fetching() {
        let source = FixtureSource::new().with("1abc", contact_pair());
        let config = DetectionConfig {
            cutoff_distance: 0.0,
            ..DetectionConfig::default()
        };
        let err = query(&source, "1abc", &config, &silent()).unwrap_err();
        assert!(matches!(
            err,
            DetectionError::InvalidConfig(ConfigError::InvalidCutoffDistance(_))
        ));
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn source_errors_surface_as_source_unavailable() {
        let err = query(
            &FixtureSource::new(),
            "9zzz",
            &DetectionConfig::default(),
            &silent(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DetectionError::SourceUnavailable(SourceError::NotFound(_))
        ));
        assert_eq!(err.code(), "source-unavailable");
    }

    #[test]
    fn bridges_group_residues_sharing_a_ring() {
        let lines = structure(vec![
            methionine(18, [0.0, 0.0, 0.0], -1.0),
            phenylalanine(3, [-3.0, 0.0, 0.0]),
            methionine(40, [-6.0, 0.0, 0.0], 1.0),
        ]);
        let config = DetectionConfig::default();
        let found = run_bridges(&lines, &config, 3, &silent()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].to_string(), "{MET18, MET40, PHE3}");
        assert!(run_bridges(&lines, &config, 4, &silent()).unwrap().is_empty());
    }

    #[test]
    fn bridge_size_below_three_is_rejected() {
        let err = run_bridges(Vec::<String>::new(), &DetectionConfig::default(), 2, &silent())
            .unwrap_err();
        assert!(matches!(
            err,
            DetectionError::InvalidConfig(ConfigError::InvalidBridgeSize(2))
        ));
    }

    #[test]
    fn query_reports_phases_in_pipeline_order() {
        let source = FixtureSource::new().with("1abc", contact_pair());
        let phases = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::PhaseStart { name } = event {
                phases.lock().unwrap().push(name);
            }
        }));
        query_bridges(&source, "1abc", &DetectionConfig::default(), 3, &reporter).unwrap();
        drop(reporter);
        assert_eq!(
            phases.into_inner().unwrap(),
            vec!["Fetch", "Extraction", "Residues", "Geometry", "Interactions", "Bridges"]
        );
        assert_eq!(source.calls(), 1);
    }

    #[test]
    #[ignore = "requires network access"]
    fn rcsb_1rcy_yields_nine_interactions() {
        let found = query(
            &RcsbSource::new(),
            "1rcy",
            &DetectionConfig::default(),
            &silent(),
        )
        .unwrap();
        assert_eq!(found.len(), 9);
        assert!(found.iter().any(|i| {
            i.aromatic_residue == ResidueKind::Tyrosine
                && i.aromatic_position == 122
                && i.methionine_position == 18
                && (i.norm - 4.211).abs() < 1e-9
                && (i.met_theta_angle - 75.766).abs() < 1e-9
                && (i.met_phi_angle - 64.317).abs() < 1e-9
        }));
    }

    #[test]
    #[ignore = "requires network access"]
    fn rcsb_1rcy_has_no_four_residue_bridges_at_wide_cutoffs() {
        let config = DetectionConfig {
            cutoff_distance: 6.0,
            cutoff_angle: 360.0,
            ..DetectionConfig::default()
        };
        let found = query_bridges(&RcsbSource::new(), "1rcy", &config, 4, &silent()).unwrap();
        assert!(found.is_empty());
    }
}
