use crate::core::distribution::DistributionFunction;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("The linear and geometric default distributions are mutually exclusive")]
    ConflictingDefaults,
    #[error("Temperature must be a finite, non-negative number of kelvin, got {0}")]
    InvalidTemperature(f64),
}

/// Which sampling formula family a configuration is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ensemble {
    Temperature,
    Amplitude,
}

impl fmt::Display for Ensemble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => write!(f, "temperature"),
            Self::Amplitude => write!(f, "amplitude"),
        }
    }
}

/// Selects between corrected sampling and bit-for-bit reproduction of the
/// historical generator.
///
/// `Legacy` differs in three places:
/// - classical amplitude sampling silently uses the quantum amplitude variance;
/// - amplitude configs are indexed over the temperature config count;
/// - a run with exactly one temperature config is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompatMode {
    #[default]
    Corrected,
    Legacy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub linear: bool,
    pub geometric: bool,
    /// Fixed temperature in kelvin. Takes precedence over `linear`/`geometric`.
    pub temperature: Option<f64>,
    pub classical: bool,
    pub temp_distribution: Option<DistributionFunction>,
    pub a_distribution: Option<DistributionFunction>,
    pub compat: CompatMode,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            linear: false,
            geometric: false,
            temperature: None,
            classical: true,
            temp_distribution: None,
            a_distribution: None,
            compat: CompatMode::Corrected,
        }
    }
}

#[derive(Default)]
pub struct GeneratorConfigBuilder {
    linear: Option<bool>,
    geometric: Option<bool>,
    temperature: Option<f64>,
    classical: Option<bool>,
    temp_distribution: Option<DistributionFunction>,
    a_distribution: Option<DistributionFunction>,
    compat: Option<CompatMode>,
}

impl GeneratorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn linear(mut self, linear: bool) -> Self {
        self.linear = Some(linear);
        self
    }
    pub fn geometric(mut self, geometric: bool) -> Self {
        self.geometric = Some(geometric);
        self
    }
    pub fn temperature(mut self, kelvin: f64) -> Self {
        self.temperature = Some(kelvin);
        self
    }
    pub fn classical(mut self, classical: bool) -> Self {
        self.classical = Some(classical);
        self
    }
    pub fn temp_distribution(mut self, function: DistributionFunction) -> Self {
        self.temp_distribution = Some(function);
        self
    }
    pub fn a_distribution(mut self, function: DistributionFunction) -> Self {
        self.a_distribution = Some(function);
        self
    }
    pub fn compat(mut self, compat: CompatMode) -> Self {
        self.compat = Some(compat);
        self
    }

    pub fn build(self) -> Result<GeneratorConfig, ConfigError> {
        let linear = self.linear.unwrap_or(false);
        let geometric = self.geometric.unwrap_or(false);
        if linear && geometric {
            return Err(ConfigError::ConflictingDefaults);
        }
        if let Some(t) = self.temperature {
            if !t.is_finite() || t < 0.0 {
                return Err(ConfigError::InvalidTemperature(t));
            }
        }
        Ok(GeneratorConfig {
            linear,
            geometric,
            temperature: self.temperature,
            classical: self.classical.unwrap_or(true),
            temp_distribution: self.temp_distribution,
            a_distribution: self.a_distribution,
            compat: self.compat.unwrap_or_default(),
        })
    }
}
