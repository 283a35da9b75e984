use flate2::read::GzDecoder;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// RCSB PDB base URL for gzip-compressed PDB-format downloads.
pub const RCSB_BASE_URL: &str = "https://files.rcsb.org/download";

const USER_AGENT: &str = concat!("metaromatic/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Invalid structure identifier '{code}': {reason}")]
    InvalidCode { code: String, reason: &'static str },
    #[error("Structure '{0}' was not found")]
    NotFound(String),
    #[error("Network error while fetching '{code}': {message}")]
    Network { code: String, message: String },
    #[error("Failed to read '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Supplies the raw lines of a structure file for an identifier.
///
/// Implementations must be shareable across the batch scheduler's worker threads.
pub trait StructureSource: Send + Sync {
    /// Returns every line of the structure file identified by `code`.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the identifier is malformed, unknown to the source,
    /// or the underlying transfer fails.
    fn fetch(&self, code: &str) -> Result<Vec<String>, SourceError>;
}

/// Checks that `code` looks like a PDB identifier: four ASCII alphanumerics.
pub fn validate_pdb_code(code: &str) -> Result<(), SourceError> {
    if code.len() != 4 {
        return Err(SourceError::InvalidCode {
            code: code.to_string(),
            reason: "must be exactly 4 characters",
        });
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(SourceError::InvalidCode {
            code: code.to_string(),
            reason: "must contain only alphanumeric characters",
        });
    }
    Ok(())
}

pub fn is_gzip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// Collects the lines of a possibly gzip-compressed stream.
pub fn read_lines(reader: impl Read, gzip: bool) -> io::Result<Vec<String>> {
    if gzip {
        BufReader::new(GzDecoder::new(reader)).lines().collect()
    } else {
        BufReader::new(reader).lines().collect()
    }
}

/// Reads a structure file from disk, decompressing it when the extension is `.gz`.
pub fn read_structure_file(path: &Path) -> Result<Vec<String>, SourceError> {
    let io_err = |source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::open(path).map_err(io_err)?;
    read_lines(file, is_gzip_path(path)).map_err(io_err)
}

/// Resolves identifiers against files in a local directory.
///
/// For an identifier `1abc` the candidates are, in order: `1abc.pdb`, `1abc.pdb.gz`,
/// `1abc.ent`, `pdb1abc.ent`, `pdb1abc.ent.gz`.
#[derive(Debug, Clone)]
pub struct LocalDirectorySource {
    root: PathBuf,
}

impl LocalDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn candidates(&self, code: &str) -> impl Iterator<Item = PathBuf> + '_ {
        let code = code.to_ascii_lowercase();
        [
            format!("{code}.pdb"),
            format!("{code}.pdb.gz"),
            format!("{code}.ent"),
            format!("pdb{code}.ent"),
            format!("pdb{code}.ent.gz"),
        ]
        .into_iter()
        .map(move |name| self.root.join(name))
    }
}

impl StructureSource for LocalDirectorySource {
    fn fetch(&self, code: &str) -> Result<Vec<String>, SourceError> {
        let path = self
            .candidates(code)
            .find(|p| p.is_file())
            .ok_or_else(|| SourceError::NotFound(code.to_string()))?;
        debug!(code, path = %path.display(), "Reading structure from local directory.");
        read_structure_file(&path)
    }
}

/// Downloads structures from the RCSB Protein Data Bank.
pub struct RcsbSource {
    agent: ureq::Agent,
    base_url: String,
}

impl RcsbSource {
    pub fn new() -> Self {
        Self::with_base_url(RCSB_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_connect(Some(CONNECT_TIMEOUT))
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, code: &str) -> String {
        format!("{}/{}.pdb.gz", self.base_url, code.to_ascii_lowercase())
    }
}

impl Default for RcsbSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureSource for RcsbSource {
    fn fetch(&self, code: &str) -> Result<Vec<String>, SourceError> {
        validate_pdb_code(code)?;
        let url = self.url_for(code);
        debug!(code, %url, "Fetching structure.");

        let network_err = |message: String| SourceError::Network {
            code: code.to_string(),
            message,
        };

        let response = self
            .agent
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| network_err(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(SourceError::NotFound(code.to_string()));
        }
        if status >= 400 {
            return Err(network_err(format!("HTTP error {}: {}", status, url)));
        }

        read_lines(response.into_body().into_reader(), true)
            .map_err(|e| network_err(format!("Failed to read response: {}", e)))
    }
}
