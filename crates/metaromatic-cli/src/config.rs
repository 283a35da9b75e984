pub mod models;

use crate::cli::DetectionArgs;
use crate::error::{CliError, Result};
use metaromatic::engine::config as core_config;
use models::AppConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialDetectionConfig {
    chain: Option<String>,
    #[serde(rename = "cutoff-distance")]
    cutoff_distance: Option<f64>,
    #[serde(rename = "cutoff-angle")]
    cutoff_angle: Option<f64>,
    model: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialBatchConfig {
    workers: Option<usize>,
    #[serde(rename = "bridge-size")]
    bridge_size: Option<usize>,
}

/// The configuration file as written by the user: every field optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialAppConfig {
    detection: Option<PartialDetectionConfig>,
    batch: Option<PartialBatchConfig>,
    #[serde(rename = "structures-dir")]
    structures_dir: Option<PathBuf>,
}

impl PartialAppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads `path` if given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the final configuration. Precedence, highest first: `--set` values,
    /// dedicated CLI flags, the configuration file, library defaults.
    pub fn merge_with_cli(mut self, args: &DetectionArgs) -> Result<AppConfig> {
        let file_detection = self.detection.take().unwrap_or_default();
        let file_batch = self.batch.take().unwrap_or_default();

        let mut merged = PartialAppConfig {
            detection: Some(PartialDetectionConfig {
                chain: args.chain.clone().or(file_detection.chain),
                cutoff_distance: args.distance.or(file_detection.cutoff_distance),
                cutoff_angle: args.angle.or(file_detection.cutoff_angle),
                model: args.model.clone().or(file_detection.model),
            }),
            batch: Some(file_batch),
            structures_dir: args.structures_dir.clone().or(self.structures_dir),
        };
        merged.apply_set_values(&args.set_values)?;
        merged.build()
    }

    fn build(self) -> Result<AppConfig> {
        let detection = self.detection.unwrap_or_default();
        let batch = self.batch.unwrap_or_default();
        let config_err = |e: core_config::ConfigError| CliError::Config(e.to_string());

        let mut builder = core_config::DetectionConfigBuilder::new();
        if let Some(chain) = &detection.chain {
            builder = builder.chain(core_config::parse_chain(chain).map_err(config_err)?);
        }
        if let Some(distance) = detection.cutoff_distance {
            builder = builder.cutoff_distance(distance);
        }
        if let Some(angle) = detection.cutoff_angle {
            builder = builder.cutoff_angle(angle);
        }
        if let Some(model) = &detection.model {
            builder = builder.model(model.parse().map_err(config_err)?);
        }
        let detection = builder.build().map_err(config_err)?;

        if let Some(size) = batch.bridge_size {
            core_config::validate_bridge_size(size).map_err(config_err)?;
        }
        if batch.workers == Some(0) {
            return Err(config_err(core_config::ConfigError::InvalidWorkerCount));
        }

        Ok(AppConfig {
            detection,
            structures_dir: self.structures_dir,
            workers: batch.workers,
            bridge_size: batch.bridge_size,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let float = || {
                value_str.parse::<f64>().map_err(|_| {
                    CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
                })
            };
            let integer = || {
                value_str.parse::<usize>().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                })
            };

            match key {
                "detection.chain" => {
                    self.detection.get_or_insert_with(Default::default).chain =
                        Some(value_str.to_string());
                }
                "detection.cutoff-distance" => {
                    self.detection
                        .get_or_insert_with(Default::default)
                        .cutoff_distance = Some(float()?);
                }
                "detection.cutoff-angle" => {
                    self.detection
                        .get_or_insert_with(Default::default)
                        .cutoff_angle = Some(float()?);
                }
                "detection.model" => {
                    self.detection.get_or_insert_with(Default::default).model =
                        Some(value_str.to_string());
                }
                "batch.workers" => {
                    self.batch.get_or_insert_with(Default::default).workers = Some(integer()?);
                }
                "batch.bridge-size" => {
                    self.batch.get_or_insert_with(Default::default).bridge_size =
                        Some(integer()?);
                }
                "structures-dir" => {
                    self.structures_dir = Some(PathBuf::from(value_str));
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
