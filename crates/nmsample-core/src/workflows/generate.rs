use crate::core::distribution::DistributionFunction;
use crate::core::io::normal_modes::{NormalMode, NormalModeFile};
use crate::core::models::molecule::Molecule;
use crate::core::settings::Settings;
use crate::core::units::UnitTable;
use crate::engine::config::{CompatMode, Ensemble, GeneratorConfig};
use crate::engine::error::GenerationError;
use crate::engine::gmatrix::SamplingContext;
use crate::engine::modes::{MassWeightedModes, NormalModeTable};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::sampler;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng, thread_rng};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Minimum rigid-body dimension `3N - modes` for a non-linear molecule.
const MIN_NULL_SPACE: usize = 5;

const DEFAULT_BREAKPOINTS: [f64; 4] = [0.05, 0.45, 0.75, 0.95];
const DEFAULT_DIVISORS: [f64; 5] = [100.0, 20.0, 10.0, 5.0, 2.0];

/// One generated geometry and the sampling parameter it was drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// Position in the run, temperature configs first.
    pub index: usize,
    pub ensemble: Ensemble,
    /// Temperature or amplitude in atomic units.
    pub parameter: f64,
    pub molecule: Molecule,
}

/// Planned sampling parameter of a single config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledConfig {
    pub ensemble: Ensemble,
    /// Normalized position `x` at which the distribution was evaluated.
    pub x: f64,
    pub parameter: f64,
}

pub struct NormalModesGenerator {
    table: NormalModeTable,
    config: GeneratorConfig,
    temp_distribution: Option<DistributionFunction>,
    a_distribution: Option<DistributionFunction>,
    units: UnitTable,
}

impl NormalModesGenerator {
    /// Reads `normal_modes_path` using the atom count from `settings` and
    /// prepares the generator.
    #[instrument(skip_all, name = "generator_setup")]
    pub fn new(
        settings: &Settings,
        normal_modes_path: &Path,
        config: GeneratorConfig,
    ) -> Result<Self, GenerationError> {
        let num_atoms = settings.num_atoms();
        let modes = NormalModeFile::read_from_path(normal_modes_path, num_atoms)?;
        Self::from_modes(modes, num_atoms, config, &UnitTable::ATOMIC)
    }

    pub fn from_modes(
        modes: Vec<NormalMode>,
        num_atoms: usize,
        config: GeneratorConfig,
        units: &UnitTable,
    ) -> Result<Self, GenerationError> {
        if config.linear && config.geometric {
            return Err(GenerationError::inconsistent_value(
                ["linear", "geometric"],
                [&config.linear, &config.geometric],
                "at most one default distribution family may be selected",
            ));
        }

        let table = NormalModeTable::new(modes, num_atoms, units)?;
        let (default_temp, default_a) = default_distributions(&config, &table, units)?;
        let temp_distribution = config.temp_distribution.clone().or(default_temp);
        let a_distribution = config.a_distribution.clone().or(default_a);

        match &temp_distribution {
            Some(f) => info!("Temperature distribution: {}", f.describe("temp")),
            None => info!("No temperature distribution; temperature sampling disabled."),
        }
        match &a_distribution {
            Some(f) => info!("Amplitude distribution: {}", f.describe("A")),
            None => info!("No amplitude distribution; amplitude sampling disabled."),
        }

        Ok(Self {
            table,
            config,
            temp_distribution,
            a_distribution,
            units: *units,
        })
    }

    pub fn table(&self) -> &NormalModeTable {
        &self.table
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn temp_distribution(&self) -> Option<&DistributionFunction> {
        self.temp_distribution.as_ref()
    }

    pub fn a_distribution(&self) -> Option<&DistributionFunction> {
        self.a_distribution.as_ref()
    }

    pub fn units(&self) -> &UnitTable {
        &self.units
    }

    /// Checks that the mode count fits the atom count: `3N - modes` must be at
    /// least 5 and no more than 6.
    pub fn validate_mode_count(&self) -> Result<(), GenerationError> {
        let num_atoms = self.table.num_atoms();
        let num_modes = self.table.len();
        let dof = 3 * num_atoms;

        if num_modes + MIN_NULL_SPACE > dof {
            return Err(GenerationError::invalid_value(
                "number of normal modes",
                num_modes,
                format!(
                    "at most {} for {} atoms (3N - modes >= {})",
                    dof.saturating_sub(MIN_NULL_SPACE),
                    num_atoms,
                    MIN_NULL_SPACE
                ),
            ));
        }
        let required = dof.saturating_sub(MIN_NULL_SPACE + 1);
        if num_modes < required {
            return Err(GenerationError::invalid_value(
                "number of normal modes",
                num_modes,
                format!("at least {} for {} atoms", required, num_atoms),
            ));
        }
        Ok(())
    }

    /// Splits `num_configs` between the ensembles and evaluates the sampling
    /// parameter of every config, temperature configs first.
    pub fn schedule(&self, num_configs: usize) -> Result<Vec<ScheduledConfig>, GenerationError> {
        let (num_temp, num_a) = match (&self.temp_distribution, &self.a_distribution) {
            (Some(_), None) => (num_configs, 0),
            (None, Some(_)) => (0, num_configs),
            (Some(_), Some(_)) => (num_configs - num_configs / 2, num_configs / 2),
            (None, None) => {
                return Err(GenerationError::inconsistent_value(
                    ["temp_distribution", "a_distribution"],
                    [&"None", &"None"],
                    "at least one distribution function is required",
                ));
            }
        };

        let legacy = self.config.compat == CompatMode::Legacy;
        if legacy && num_temp == 1 {
            return Err(GenerationError::invalid_value(
                "number of temperature configs",
                num_temp,
                "more than one in legacy mode",
            ));
        }

        let position = |k: usize, count: usize| -> f64 {
            if count > 1 {
                k as f64 / (count - 1) as f64
            } else {
                0.0
            }
        };

        let mut schedule = Vec::with_capacity(num_configs);
        if let Some(f) = &self.temp_distribution {
            for k in 0..num_temp {
                let x = position(k, num_temp);
                schedule.push(ScheduledConfig {
                    ensemble: Ensemble::Temperature,
                    x,
                    parameter: f.evaluate(x),
                });
            }
        }
        if let Some(f) = &self.a_distribution {
            for k in 0..num_a {
                let x = if legacy {
                    k as f64 / (num_temp as f64 - 1.0)
                } else {
                    position(k, num_a)
                };
                schedule.push(ScheduledConfig {
                    ensemble: Ensemble::Amplitude,
                    x,
                    parameter: f.evaluate(x),
                });
            }
        }

        if let Some(bad) = schedule
            .iter()
            .find(|s| !s.parameter.is_finite() || s.parameter < 0.0)
        {
            return Err(GenerationError::invalid_value(
                format!("{} parameter at x = {}", bad.ensemble, bad.x),
                bad.parameter,
                "a finite, non-negative value in atomic units",
            ));
        }

        Ok(schedule)
    }

    /// Prepares a lazy run of `num_configs` displaced copies of `molecule`.
    ///
    /// All validation happens here; nothing is sampled until the returned
    /// iterator is advanced. With `seed = None` a fresh seed is drawn and logged.
    #[instrument(skip(self, molecule), name = "generate_configurations")]
    pub fn generate_configurations(
        &self,
        molecule: &Molecule,
        num_configs: usize,
        seed: Option<u64>,
    ) -> Result<Configurations<'_>, GenerationError> {
        self.validate_mode_count()?;
        let schedule = self.schedule(num_configs)?;
        let modes = self.table.mass_weighted(molecule, &self.units)?;

        let seed = seed.unwrap_or_else(|| thread_rng().next_u64());
        info!(
            "Generating {} configurations with seed {}.",
            schedule.len(),
            seed
        );

        Ok(Configurations {
            generator: self,
            base: molecule.clone(),
            modes,
            schedule,
            cursor: 0,
            rng: StdRng::seed_from_u64(seed),
            seed,
            reporter: None,
        })
    }
}

fn default_distributions(
    config: &GeneratorConfig,
    table: &NormalModeTable,
    units: &UnitTable,
) -> Result<(Option<DistributionFunction>, Option<DistributionFunction>), GenerationError> {
    if let Some(kelvin) = config.temperature {
        return Ok((
            Some(DistributionFunction::constant(units.kelvin_to_au(kelvin))),
            None,
        ));
    }

    let max_freq = table.max_frequency();
    if config.linear {
        let temp = DistributionFunction::linear_from_points(0.0, 0.0, 1.0, max_freq)?;
        let amplitude = DistributionFunction::linear_from_points(0.0, 0.0, 1.0, 2.0)?;
        return Ok((Some(temp), Some(amplitude)));
    }
    if config.geometric {
        let min_freq = table.min_frequency();
        let ratio = 2.0 * max_freq / min_freq;
        if !ratio.is_finite() {
            return Err(GenerationError::invalid_value(
                "lowest normal mode frequency",
                min_freq,
                "a non-zero frequency for the geometric distribution",
            ));
        }
        return Ok((
            Some(DistributionFunction::geometric(min_freq, ratio)),
            Some(DistributionFunction::geometric(1.0, 2.0)),
        ));
    }

    let segments = DEFAULT_DIVISORS
        .iter()
        .map(|d| DistributionFunction::constant(max_freq / d))
        .collect();
    let temp = DistributionFunction::piecewise(segments, DEFAULT_BREAKPOINTS.to_vec())?;
    Ok((Some(temp), None))
}

/// Lazy, single-pass sequence of configurations. Owns its RNG, so two runs
/// with the same seed and inputs yield identical geometries.
pub struct Configurations<'a> {
    generator: &'a NormalModesGenerator,
    base: Molecule,
    modes: MassWeightedModes,
    schedule: Vec<ScheduledConfig>,
    cursor: usize,
    rng: StdRng,
    seed: u64,
    reporter: Option<&'a ProgressReporter<'a>>,
}

impl<'a> Configurations<'a> {
    pub fn with_reporter(mut self, reporter: &'a ProgressReporter<'a>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn schedule(&self) -> &[ScheduledConfig] {
        &self.schedule
    }

    fn report(&self, event: Progress) {
        if let Some(reporter) = self.reporter {
            reporter.report(event);
        }
    }

    fn sample(&mut self, planned: ScheduledConfig) -> Result<Molecule, GenerationError> {
        let config = &self.generator.config;
        let context = SamplingContext::build(
            planned.ensemble,
            planned.parameter,
            config.classical,
            config.compat,
            &self.modes,
            &self.generator.units,
        )?;
        sampler::sample_configuration(
            &self.base,
            context.g_matrix(),
            &self.generator.units,
            &mut self.rng,
        )
    }
}

impl Iterator for Configurations<'_> {
    type Item = Result<Configuration, GenerationError>;

    fn next(&mut self) -> Option<Self::Item> {
        let planned = *self.schedule.get(self.cursor)?;
        let index = self.cursor;
        if index == 0 {
            self.report(Progress::TaskStart {
                total_steps: self.schedule.len() as u64,
            });
        }
        self.cursor += 1;

        debug!(
            "Config {}: {} = {:.6e} (x = {:.4})",
            index, planned.ensemble, planned.parameter, planned.x
        );
        let result = self.sample(planned).map(|molecule| Configuration {
            index,
            ensemble: planned.ensemble,
            parameter: planned.parameter,
            molecule,
        });

        self.report(Progress::ConfigGenerated {
            ensemble: planned.ensemble,
            index,
            parameter: planned.parameter,
        });
        if self.cursor == self.schedule.len() {
            self.report(Progress::TaskFinish);
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.schedule.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Configurations<'_> {}
