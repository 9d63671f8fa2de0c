//! # nmsample Core Library
//!
//! A library for generating perturbed molecular geometries ("configurations") from
//! vibrational normal-mode data, intended as training input for potential-energy
//! surface fits.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so that parsing, numerics and
//! orchestration stay separate and individually testable.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `NormalMode`),
//!   physical constants and the element table, distribution functions over the
//!   config index, and I/O for the normal-mode, XYZ and settings formats.
//!
//! - **[`engine`]: The Numerics.** Normal-mode preprocessing (sorting, unit
//!   conversion, mass weighting), construction of the G matrix for a given
//!   temperature or amplitude, and correlated Gaussian sampling of displaced
//!   geometries.
//!
//! - **[`workflows`]: The Public API.** The `NormalModesGenerator`, which ties the
//!   `engine` and `core` together and yields a lazy, seeded sequence of
//!   configurations.

pub mod core;
pub mod engine;
pub mod workflows;
