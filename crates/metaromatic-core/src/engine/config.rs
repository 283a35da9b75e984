use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_CHAIN: char = 'A';
pub const DEFAULT_CUTOFF_DISTANCE: f64 = 4.9;
pub const DEFAULT_CUTOFF_ANGLE: f64 = 109.5;
pub const DEFAULT_BRIDGE_SIZE: usize = 4;
pub const DEFAULT_WORKERS: usize = 5;
/// Hard ceiling on concurrent batch workers. Larger requests are clamped with a warning.
pub const MAX_WORKERS: usize = 15;
pub const MIN_BRIDGE_SIZE: usize = 3;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Cutoff distance must be positive (got {0})")]
    InvalidCutoffDistance(f64),
    #[error("Cutoff angle must be between 0 and 360 degrees (got {0})")]
    InvalidCutoffAngle(f64),
    #[error("Chain identifier must be a single alphanumeric character (got '{0}')")]
    InvalidChain(String),
    #[error("Invalid lone pair model '{0}'. Expected 'cp' (cross-product) or 'rm' (rotation).")]
    InvalidModel(String),
    #[error("Bridge size must be at least {MIN_BRIDGE_SIZE} (got {0})")]
    InvalidBridgeSize(usize),
    #[error("Worker count must be at least 1")]
    InvalidWorkerCount,
}

/// Method used to reconstruct the two sulfur lone-pair directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LonePairModel {
    /// Bisector plus scaled normal of the CG-SD-CE plane.
    #[default]
    #[serde(rename = "cp")]
    CrossProduct,
    /// Rodrigues rotation of the flipped substituent vectors about their bisector.
    #[serde(rename = "rm")]
    Rotation,
}

impl LonePairModel {
    pub fn code(&self) -> &'static str {
        match self {
            LonePairModel::CrossProduct => "cp",
            LonePairModel::Rotation => "rm",
        }
    }
}

impl fmt::Display for LonePairModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LonePairModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cp" | "cross-product" | "cross_product" => Ok(LonePairModel::CrossProduct),
            "rm" | "rotation" | "rotation-matrix" => Ok(LonePairModel::Rotation),
            _ => Err(ConfigError::InvalidModel(s.to_string())),
        }
    }
}

pub fn parse_chain(s: &str) -> Result<char, ConfigError> {
    let mut chars = s.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() => Ok(c),
        _ => Err(ConfigError::InvalidChain(s.to_string())),
    }
}

/// Thresholds and options for a single detection run.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    pub chain: char,
    pub cutoff_distance: f64,
    pub cutoff_angle: f64,
    pub model: LonePairModel,
}

impl DetectionConfig {
    /// Re-checks the invariants enforced by [`DetectionConfigBuilder::build`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.chain.is_ascii_alphanumeric() {
            return Err(ConfigError::InvalidChain(self.chain.to_string()));
        }
        if !(self.cutoff_distance > 0.0) || !self.cutoff_distance.is_finite() {
            return Err(ConfigError::InvalidCutoffDistance(self.cutoff_distance));
        }
        if !(0.0..=360.0).contains(&self.cutoff_angle) {
            return Err(ConfigError::InvalidCutoffAngle(self.cutoff_angle));
        }
        Ok(())
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            chain: DEFAULT_CHAIN,
            cutoff_distance: DEFAULT_CUTOFF_DISTANCE,
            cutoff_angle: DEFAULT_CUTOFF_ANGLE,
            model: LonePairModel::default(),
        }
    }
}

#[derive(Default)]
pub struct DetectionConfigBuilder {
    chain: Option<char>,
    cutoff_distance: Option<f64>,
    cutoff_angle: Option<f64>,
    model: Option<LonePairModel>,
}

impl DetectionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain(mut self, chain: char) -> Self {
        self.chain = Some(chain);
        self
    }
    pub fn cutoff_distance(mut self, distance: f64) -> Self {
        self.cutoff_distance = Some(distance);
        self
    }
    pub fn cutoff_angle(mut self, angle: f64) -> Self {
        self.cutoff_angle = Some(angle);
        self
    }
    pub fn model(mut self, model: LonePairModel) -> Self {
        self.model = Some(model);
        self
    }

    pub fn build(self) -> Result<DetectionConfig, ConfigError> {
        let defaults = DetectionConfig::default();
        let config = DetectionConfig {
            chain: self.chain.unwrap_or(defaults.chain),
            cutoff_distance: self.cutoff_distance.unwrap_or(defaults.cutoff_distance),
            cutoff_angle: self.cutoff_angle.unwrap_or(defaults.cutoff_angle),
            model: self.model.unwrap_or(defaults.model),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Options for the batch scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub detection: DetectionConfig,
    /// Requested pool size; clamped to [`MAX_WORKERS`] when the pool starts.
    pub workers: usize,
    /// When set, each successful record also carries bridges of this size.
    pub bridge_size: Option<usize>,
}

#[derive(Default)]
pub struct BatchConfigBuilder {
    detection: Option<DetectionConfig>,
    workers: Option<usize>,
    bridge_size: Option<usize>,
}

impl BatchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detection(mut self, detection: DetectionConfig) -> Self {
        self.detection = Some(detection);
        self
    }
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }
    pub fn bridge_size(mut self, size: Option<usize>) -> Self {
        self.bridge_size = size;
        self
    }

    pub fn build(self) -> Result<BatchConfig, ConfigError> {
        let detection = self.detection.unwrap_or_default();
        detection.validate()?;

        let workers = self.workers.unwrap_or(DEFAULT_WORKERS);
        if workers == 0 {
            return Err(ConfigError::InvalidWorkerCount);
        }
        if let Some(size) = self.bridge_size {
            validate_bridge_size(size)?;
        }

        Ok(BatchConfig {
            detection,
            workers,
            bridge_size: self.bridge_size,
        })
    }
}

pub fn validate_bridge_size(size: usize) -> Result<(), ConfigError> {
    if size < MIN_BRIDGE_SIZE {
        return Err(ConfigError::InvalidBridgeSize(size));
    }
    Ok(())
}
