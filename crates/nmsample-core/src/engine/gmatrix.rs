use super::config::{CompatMode, Ensemble};
use super::error::GenerationError;
use super::modes::MassWeightedModes;
use crate::core::units::UnitTable;
use nalgebra::DMatrix;
use tracing::{instrument, trace};

/// Modes below this wavenumber never contribute to sampling.
pub const LOW_FREQUENCY_CUTOFF_WAVENUMBERS: f64 = 10.0;

/// Parameters at or below this value (au) use the zero-point limit `0.5 / ω`.
pub const NEAR_ZERO: f64 = 1e-8;

/// Variance scalar `d` of a single mode with frequency `omega` (au).
pub fn mode_variance(
    ensemble: Ensemble,
    parameter: f64,
    classical: bool,
    compat: CompatMode,
    omega: f64,
) -> f64 {
    match ensemble {
        Ensemble::Temperature => {
            if classical {
                parameter / (omega * omega)
            } else if parameter > NEAR_ZERO {
                0.5 / ((omega / (2.0 * parameter)).tanh() * omega)
            } else {
                0.5 / omega
            }
        }
        Ensemble::Amplitude => {
            if classical && compat == CompatMode::Corrected {
                parameter / omega
            } else if parameter > NEAR_ZERO {
                0.5 / ((0.5 / parameter).tanh() * omega)
            } else {
                0.5 / omega
            }
        }
    }
}

/// Per-config sampling state: the variance of every mode and the resulting
/// `3N × 3N` G matrix, `G = Σ sqrt(d) u uᵀ`.
#[derive(Debug, Clone)]
pub struct SamplingContext {
    ensemble: Ensemble,
    parameter: f64,
    variances: Vec<Option<f64>>,
    g: DMatrix<f64>,
}

impl SamplingContext {
    #[instrument(skip(modes, units), level = "debug", name = "build_g_matrix")]
    pub fn build(
        ensemble: Ensemble,
        parameter: f64,
        classical: bool,
        compat: CompatMode,
        modes: &MassWeightedModes,
        units: &UnitTable,
    ) -> Result<Self, GenerationError> {
        if !parameter.is_finite() || parameter < 0.0 {
            return Err(GenerationError::invalid_value(
                format!("{} parameter", ensemble),
                parameter,
                "a finite, non-negative value in atomic units",
            ));
        }

        let cutoff = units.wavenumber_to_au(LOW_FREQUENCY_CUTOFF_WAVENUMBERS);
        let dim = modes.dim();
        let mut g = DMatrix::zeros(dim, dim);
        let mut variances = Vec::with_capacity(modes.len());

        for mode in modes.iter() {
            if mode.frequency < cutoff {
                variances.push(None);
                continue;
            }
            let d = mode_variance(ensemble, parameter, classical, compat, mode.frequency);
            g.ger(d.sqrt(), &mode.vector, &mode.vector, 1.0);
            variances.push(Some(d));
        }

        trace!(
            "G matrix built from {} of {} modes.",
            variances.iter().flatten().count(),
            variances.len()
        );

        Ok(Self {
            ensemble,
            parameter,
            variances,
            g,
        })
    }

    pub fn ensemble(&self) -> Ensemble {
        self.ensemble
    }

    pub fn parameter(&self) -> f64 {
        self.parameter
    }

    /// Variance per mode in sorted order; `None` for modes below the cutoff.
    pub fn variances(&self) -> &[Option<f64>] {
        &self.variances
    }

    pub fn active_modes(&self) -> usize {
        self.variances.iter().flatten().count()
    }

    pub fn g_matrix(&self) -> &DMatrix<f64> {
        &self.g
    }
}
