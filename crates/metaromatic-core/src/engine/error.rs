use super::config::ConfigError;
use crate::core::io::pdb::PdbError;
use crate::core::io::sink::SinkError;
use crate::core::io::source::SourceError;
use thiserror::Error;

/// Every way a single detection query can end without interactions.
///
/// All variants except [`DetectionError::NoInteractions`] are structural failures;
/// `NoInteractions` is a valid empty result that callers should surface as such.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(ConfigError),

    #[error("Invalid lone pair model: {0}")]
    InvalidModel(String),

    #[error("Structure source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    #[error("Malformed structure file: {0}")]
    MalformedRecord(#[from] PdbError),

    #[error("No methionine atoms found in chain {chain}")]
    NoTargetAtoms { chain: char },

    #[error("No phenylalanine, tyrosine or tryptophan atoms found in chain {chain}")]
    NoCandidatePartners { chain: char },

    #[error("No Met-aromatic interactions found")]
    NoInteractions,
}

impl DetectionError {
    /// Stable machine-readable category, used when persisting batch failures.
    pub fn code(&self) -> &'static str {
        match self {
            DetectionError::InvalidConfig(_) => "invalid-config",
            DetectionError::InvalidModel(_) => "invalid-model",
            DetectionError::SourceUnavailable(_) => "source-unavailable",
            DetectionError::MalformedRecord(_) => "malformed-record",
            DetectionError::NoTargetAtoms { .. } => "no-target-atoms",
            DetectionError::NoCandidatePartners { .. } => "no-candidate-partners",
            DetectionError::NoInteractions => "no-interactions",
        }
    }

    pub fn is_structural(&self) -> bool {
        !matches!(self, DetectionError::NoInteractions)
    }
}

impl From<ConfigError> for DetectionError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::InvalidModel(name) => DetectionError::InvalidModel(name),
            other => DetectionError::InvalidConfig(other),
        }
    }
}

/// Failures that abort a whole batch run. Per-identifier failures never surface here;
/// they are recorded in the sink instead.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Invalid batch configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Failed to record batch summary: {0}")]
    Sink(#[from] SinkError),

    #[error("Failed to start the worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
