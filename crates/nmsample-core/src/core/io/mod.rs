//! Provides input/output functionality for the generator's file formats.
//!
//! The XYZ format carries base geometries in and sampled configurations out
//! through the [`traits::MolecularFile`] interface; normal-mode data has its own
//! block-structured reader because it is parameterized by the atom count.

pub mod normal_modes;
pub mod traits;
pub mod xyz;
