use thiserror::Error;

use super::config::ConfigError;
use crate::core::distribution::DistributionError;
use crate::core::io::normal_modes::NormalModeParseError;
use crate::core::settings::SettingsError;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Failed to read normal modes: {source}")]
    Parse {
        #[from]
        source: NormalModeParseError,
    },

    #[error("Failed to load settings: {source}")]
    Settings {
        #[from]
        source: SettingsError,
    },

    #[error("Invalid distribution function: {source}")]
    Distribution {
        #[from]
        source: DistributionError,
    },

    #[error("Invalid generator configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid value for {name}: {value} (expected {expected})")]
    InvalidValue {
        name: String,
        value: String,
        expected: String,
    },

    #[error("Inconsistent values for {names:?} = {values:?}: {reason}")]
    InconsistentValue {
        names: Vec<String>,
        values: Vec<String>,
        reason: String,
    },
}

impl GenerationError {
    pub fn invalid_value(
        name: impl Into<String>,
        value: impl ToString,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            name: name.into(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    pub fn inconsistent_value<const N: usize>(
        names: [&str; N],
        values: [&dyn ToString; N],
        reason: impl Into<String>,
    ) -> Self {
        Self::InconsistentValue {
            names: names.iter().map(|n| n.to_string()).collect(),
            values: values.iter().map(|v| v.to_string()).collect(),
            reason: reason.into(),
        }
    }
}
