//! # Workflows Module
//!
//! Top-level entry points that tie parsing, preprocessing and sampling together.
//!
//! - **Generation Workflow** ([`generate`]) - Builds a [`generate::NormalModesGenerator`]
//!   from settings and a normal-mode file, chooses the distribution functions and
//!   yields a seeded, lazy sequence of displaced geometries.

pub mod generate;
