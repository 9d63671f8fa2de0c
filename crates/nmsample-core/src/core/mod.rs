//! # Core Module
//!
//! Fundamental, stateless building blocks for normal-mode configuration sampling.
//!
//! ## Architecture
//!
//! - **Physical constants and elements** ([`units`]) - Immutable unit table and the
//!   atomic symbol / number / mass lookup
//! - **Distribution functions** ([`distribution`]) - Scalar functions over `[0, 1]`
//!   controlling how the sampling parameter varies across a run
//! - **Molecular representation** ([`models`]) - Atoms and molecules
//! - **Settings** ([`settings`]) - Fragment layout of the molecule
//! - **File I/O** ([`io`]) - Normal-mode data and XYZ geometries

pub mod distribution;
pub mod io;
pub mod models;
pub mod settings;
pub mod units;
