//! # Engine Module
//!
//! Numerical machinery that turns parsed normal modes into sampled geometries.
//!
//! ## Architecture
//!
//! - **Mode preprocessing** ([`modes`]) - Frequency sorting, unit conversion and
//!   per-run mass weighting with unit normalization
//! - **G matrix** ([`gmatrix`]) - Per-mode variances for the temperature and
//!   amplitude ensembles and the resulting covariance square root
//! - **Sampling** ([`sampler`]) - Correlated Gaussian displacement of a geometry
//! - **Configuration** ([`config`]) - Generator options, ensembles and compatibility mode
//! - **Progress Monitoring** ([`progress`]) - Optional progress callbacks
//! - **Error Handling** ([`error`]) - The generation error taxonomy

pub mod config;
pub mod error;
pub mod gmatrix;
pub mod modes;
pub mod progress;
pub mod sampler;
