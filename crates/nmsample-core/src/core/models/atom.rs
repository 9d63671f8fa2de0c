use crate::core::units::{ElementError, symbol_to_mass};
use nalgebra::Point3;

/// An atom of the sampled molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The element symbol (e.g., "O", "Cl").
    pub symbol: String,
    /// The atomic mass in atomic mass units.
    pub mass: f64,
    /// The Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    pub fn new(symbol: &str, mass: f64, position: Point3<f64>) -> Self {
        Self {
            symbol: symbol.to_string(),
            mass,
            position,
        }
    }

    /// Creates an atom whose mass is taken from the element table.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::UnknownSymbol`] if the symbol is not a known element.
    pub fn from_symbol(symbol: &str, position: Point3<f64>) -> Result<Self, ElementError> {
        let mass = symbol_to_mass(symbol)?;
        Ok(Self::new(symbol, mass, position))
    }
}
