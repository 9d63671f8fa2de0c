//! # Core Models Module
//!
//! Data structures describing the molecule whose configurations are sampled.
//!
//! - [`atom`] - A single atom: element symbol, mass and Cartesian position
//! - [`molecule`] - An ordered collection of atoms with copy-and-set mutation
//!
//! ```ignore
//! use nmsample::core::models::{atom::Atom, molecule::Molecule};
//!
//! let mut molecule = Molecule::new();
//! molecule.add_atom(Atom::from_symbol("O", Point3::new(0.0, 0.0, 0.0))?);
//! let mut copy = molecule.clone();
//! copy.set_position(0, Point3::new(0.0, 0.0, 0.1));
//! ```

pub mod atom;
pub mod molecule;
