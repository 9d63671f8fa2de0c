use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid fragment atom count '{0}' in molecule.fragments")]
    InvalidFragment(String),
    #[error("molecule.fragments must list at least one non-empty fragment")]
    Empty,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFragments {
    List(String),
    Counts(Vec<usize>),
}

#[derive(Debug, Deserialize)]
struct RawMoleculeSection {
    fragments: RawFragments,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    molecule: RawMoleculeSection,
}

/// Molecule layout shared by the generator and its inputs.
///
/// Only the per-fragment atom counts are consumed; the normal-mode parser needs
/// their sum to know how many displacement rows each mode block carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    fragments: Vec<usize>,
}

impl Settings {
    pub fn from_fragments(fragments: Vec<usize>) -> Result<Self, SettingsError> {
        if fragments.is_empty() || fragments.iter().sum::<usize>() == 0 {
            return Err(SettingsError::Empty);
        }
        Ok(Self { fragments })
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        debug!("Loading settings from file: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    /// Parses settings from TOML text. `origin` is only used in error messages.
    pub fn parse(content: &str, origin: &str) -> Result<Self, SettingsError> {
        let raw: RawSettings = toml::from_str(content).map_err(|e| SettingsError::Toml {
            path: origin.to_string(),
            source: e,
        })?;

        let fragments = match raw.molecule.fragments {
            RawFragments::Counts(counts) => counts,
            RawFragments::List(list) => list
                .split(',')
                .map(|token| {
                    let token = token.trim();
                    token
                        .parse::<usize>()
                        .map_err(|_| SettingsError::InvalidFragment(token.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?,
        };
        Self::from_fragments(fragments)
    }

    pub fn fragments(&self) -> &[usize] {
        &self.fragments
    }

    pub fn num_atoms(&self) -> usize {
        self.fragments.iter().sum()
    }
}
