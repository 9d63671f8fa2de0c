use crate::cli::GeneratorArgs;
use crate::error::{CliError, Result};
use nmsample::core::distribution::{DistributionError, DistributionFunction};
use nmsample::engine::config::{self as core_config, CompatMode};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum FileCompatMode {
    Corrected,
    Legacy,
}

impl From<FileCompatMode> for CompatMode {
    fn from(mode: FileCompatMode) -> Self {
        match mode {
            FileCompatMode::Corrected => CompatMode::Corrected,
            FileCompatMode::Legacy => CompatMode::Legacy,
        }
    }
}

/// Distribution function as written in a run config. Values are in atomic units.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", tag = "type", deny_unknown_fields)]
enum FileDistribution {
    Constant {
        value: f64,
    },
    Linear {
        slope: f64,
        intercept: f64,
    },
    /// A line through two `[x, y]` points.
    LinearPoints {
        start: [f64; 2],
        end: [f64; 2],
    },
    Geometric {
        first: f64,
        ratio: f64,
    },
    Piecewise {
        breakpoints: Vec<f64>,
        segments: Vec<FileDistribution>,
    },
}

impl TryFrom<FileDistribution> for DistributionFunction {
    type Error = DistributionError;

    fn try_from(file: FileDistribution) -> std::result::Result<Self, Self::Error> {
        match file {
            FileDistribution::Constant { value } => Ok(Self::constant(value)),
            FileDistribution::Linear { slope, intercept } => Ok(Self::linear(slope, intercept)),
            FileDistribution::LinearPoints { start, end } => {
                Self::linear_from_points(start[0], start[1], end[0], end[1])
            }
            FileDistribution::Geometric { first, ratio } => Ok(Self::geometric(first, ratio)),
            FileDistribution::Piecewise {
                breakpoints,
                segments,
            } => {
                let segments = segments
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Self::piecewise(segments, breakpoints)
            }
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct FileGeneratorConfig {
    linear: Option<bool>,
    geometric: Option<bool>,
    temperature: Option<f64>,
    classical: Option<bool>,
    compat: Option<FileCompatMode>,
    #[serde(rename = "num-configs")]
    num_configs: Option<usize>,
    seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    generator: Option<FileGeneratorConfig>,
    #[serde(rename = "temperature-distribution")]
    temperature_distribution: Option<FileDistribution>,
    #[serde(rename = "amplitude-distribution")]
    amplitude_distribution: Option<FileDistribution>,
}

/// Everything a run needs after file values and CLI overrides are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub generator: core_config::GeneratorConfig,
    pub num_configs: Option<usize>,
    pub seed: Option<u64>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the file named by `--config`, or starts from an empty config.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_cli(mut self, args: &GeneratorArgs, cli_seed: Option<u64>) -> Result<RunConfig> {
        self.apply_set_values(&args.set_values)?;

        let file = self.generator.take().unwrap_or_default();
        let mut builder = core_config::GeneratorConfigBuilder::new();

        if args.family.linear || args.family.geometric {
            builder = builder
                .linear(args.family.linear)
                .geometric(args.family.geometric);
        } else {
            builder = builder
                .linear(file.linear.unwrap_or(false))
                .geometric(file.geometric.unwrap_or(false));
        }

        if let Some(kelvin) = args.temperature.or(file.temperature) {
            builder = builder.temperature(kelvin);
        }

        let classical = if args.quantum {
            false
        } else {
            file.classical.unwrap_or(true)
        };
        builder = builder.classical(classical);

        let compat = if args.legacy {
            CompatMode::Legacy
        } else {
            file.compat.map(Into::into).unwrap_or_default()
        };
        builder = builder.compat(compat);

        if let Some(dist) = self.temperature_distribution {
            let function = DistributionFunction::try_from(dist).map_err(|e| {
                CliError::Config(format!("Invalid [temperature-distribution]: {}", e))
            })?;
            builder = builder.temp_distribution(function);
        }
        if let Some(dist) = self.amplitude_distribution {
            let function = DistributionFunction::try_from(dist).map_err(|e| {
                CliError::Config(format!("Invalid [amplitude-distribution]: {}", e))
            })?;
            builder = builder.a_distribution(function);
        }

        let generator = builder.build().map_err(|e| CliError::Config(e.to_string()))?;
        Ok(RunConfig {
            generator,
            num_configs: args.num_configs.or(file.num_configs),
            seed: cli_seed.or(file.seed),
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
            let generator = self.generator.get_or_insert_with(Default::default);

            match key {
                "generator.linear" => generator.linear = Some(parse_value(key, value_str)?),
                "generator.geometric" => generator.geometric = Some(parse_value(key, value_str)?),
                "generator.temperature" => {
                    generator.temperature = Some(parse_value(key, value_str)?)
                }
                "generator.classical" => generator.classical = Some(parse_value(key, value_str)?),
                "generator.num-configs" => {
                    generator.num_configs = Some(parse_value(key, value_str)?)
                }
                "generator.seed" => generator.seed = Some(parse_value(key, value_str)?),
                "generator.compat" => {
                    generator.compat = Some(match value_str {
                        "corrected" => FileCompatMode::Corrected,
                        "legacy" => FileCompatMode::Legacy,
                        _ => {
                            return Err(CliError::Config(format!(
                                "Invalid value for {}: '{}'. Expected 'corrected' or 'legacy'.",
                                key, value_str
                            )));
                        }
                    })
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

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid {} value for {}: {}",
            std::any::type_name::<T>(),
            key,
            value
        ))
    })
}
