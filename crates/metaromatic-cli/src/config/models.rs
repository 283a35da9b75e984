use metaromatic::engine::config as core_config;
use std::path::PathBuf;

/// Fully resolved settings shared by all subcommands.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub detection: core_config::DetectionConfig,
    /// Local structure directory; `None` means download from RCSB.
    pub structures_dir: Option<PathBuf>,
    pub workers: Option<usize>,
    pub bridge_size: Option<usize>,
}
