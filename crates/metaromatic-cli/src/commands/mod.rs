pub mod batch;
pub mod bridges;
pub mod query;

use crate::config::models::AppConfig;
use crate::utils::progress::CliProgressHandler;
use metaromatic::core::io::source::{
    LocalDirectorySource, RcsbSource, StructureSource, read_structure_file,
};
use metaromatic::core::models::interaction::{Bridge, Interaction};
use metaromatic::engine::config::validate_bridge_size;
use metaromatic::engine::error::DetectionError;
use metaromatic::engine::progress::ProgressReporter;
use metaromatic::workflows::detect;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a `CODE_OR_PATH` argument refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    File(PathBuf),
    Code(String),
}

impl Target {
    /// Existing files win; anything else is treated as a PDB code.
    pub fn resolve(arg: &str) -> Self {
        let path = Path::new(arg);
        if path.is_file() {
            Target::File(path.to_path_buf())
        } else {
            Target::Code(arg.trim().to_ascii_lowercase())
        }
    }

    pub fn label(&self) -> String {
        match self {
            Target::File(path) => path.display().to_string(),
            Target::Code(code) => code.clone(),
        }
    }
}

pub fn structure_source(config: &AppConfig) -> Box<dyn StructureSource> {
    match &config.structures_dir {
        Some(dir) => {
            info!("Reading structures from local directory {:?}", dir);
            Box::new(LocalDirectorySource::new(dir))
        }
        None => {
            info!("Fetching structures from RCSB.");
            Box::new(RcsbSource::new())
        }
    }
}

/// Runs detection on `target`. The configuration is validated before any file is read.
pub fn detect_target(
    target: &Target,
    config: &AppConfig,
    reporter: &ProgressReporter,
) -> std::result::Result<Vec<Interaction>, DetectionError> {
    match target {
        Target::File(path) => {
            config.detection.validate()?;
            let lines = read_structure_file(path)?;
            detect::run_lines(&lines, &config.detection, reporter)
        }
        Target::Code(code) => {
            let source = structure_source(config);
            detect::query(source.as_ref(), code, &config.detection, reporter)
        }
    }
}

/// Runs detection on `target` and reduces the result to bridges of `size` residues.
pub fn bridges_for_target(
    target: &Target,
    config: &AppConfig,
    size: usize,
    reporter: &ProgressReporter,
) -> std::result::Result<Vec<Bridge>, DetectionError> {
    match target {
        Target::File(path) => {
            config.detection.validate()?;
            validate_bridge_size(size)?;
            let lines = read_structure_file(path)?;
            detect::run_bridges(&lines, &config.detection, size, reporter)
        }
        Target::Code(code) => {
            let source = structure_source(config);
            detect::query_bridges(source.as_ref(), code, &config.detection, size, reporter)
        }
    }
}

pub fn progress_handler(quiet: bool) -> CliProgressHandler {
    if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    }
}
