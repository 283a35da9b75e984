use crate::error::{CliError, Result};
use std::collections::HashSet;
use std::path::Path;

/// Parses an identifier list: one code per line, `#` starts a comment, blank lines are
/// skipped. Codes are lower-cased and de-duplicated, keeping first occurrences.
pub fn parse_identifiers(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|code| !code.is_empty())
        .map(str::to_ascii_lowercase)
        .filter(|code| seen.insert(code.clone()))
        .collect()
}

pub fn read_identifiers(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    let identifiers = parse_identifiers(&content);
    if identifiers.is_empty() {
        return Err(CliError::Argument(format!(
            "No identifiers found in '{}'",
            path.display()
        )));
    }
    Ok(identifiers)
}
