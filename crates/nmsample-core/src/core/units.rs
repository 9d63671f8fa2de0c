use phf::{Map, phf_map};
use thiserror::Error;

/// Physical constants used to move between spectroscopic, thermal and atomic units.
///
/// The table is immutable and injected by reference into every component that
/// needs a conversion, so tests can substitute their own values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitTable {
    /// Wavenumbers (cm⁻¹) per hartree.
    pub hartree_to_wavenumber: f64,
    /// Hartree per kelvin (Boltzmann constant in atomic units).
    pub kelvin_to_hartree: f64,
    /// Bohr radius in meters.
    pub bohr_meters: f64,
    /// Electron masses per atomic mass unit.
    pub amu_to_electron_mass: f64,
}

impl UnitTable {
    /// CODATA values.
    pub const ATOMIC: Self = Self {
        hartree_to_wavenumber: 219_474.631_370_2,
        kelvin_to_hartree: 3.166_811_563_455_6e-6,
        bohr_meters: 0.529_177_210_67e-10,
        amu_to_electron_mass: 1_822.888_486_192,
    };

    /// Converts a frequency in cm⁻¹ to atomic units.
    #[inline]
    pub fn wavenumber_to_au(&self, wavenumber: f64) -> f64 {
        wavenumber / self.hartree_to_wavenumber
    }

    /// Converts a temperature in kelvin to atomic units (hartree).
    #[inline]
    pub fn kelvin_to_au(&self, kelvin: f64) -> f64 {
        kelvin * self.kelvin_to_hartree
    }

    /// The Bohr radius in angstroms.
    #[inline]
    pub fn bohr_angstrom(&self) -> f64 {
        self.bohr_meters * 1.0e10
    }

    /// Square root of an atomic mass expressed in electron masses.
    #[inline]
    pub fn mass_scale(&self, mass_amu: f64) -> f64 {
        (mass_amu * self.amu_to_electron_mass).sqrt()
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        Self::ATOMIC
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ElementError {
    #[error("Unrecognized atomic symbol '{0}'")]
    UnknownSymbol(String),
    #[error("Atomic number {0} is outside the supported range 1-{max}", max = ATOMIC_SYMBOLS.len())]
    NumberOutOfRange(usize),
}

static ATOMIC_SYMBOLS: [&str; 36] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr",
];

static ATOMIC_MASSES: [f64; 36] = [
    1.008, 4.0026, 6.94, 9.0122, 10.81, 12.011, 14.007, 15.999, 18.998, 20.180, 22.990, 24.305,
    26.982, 28.085, 30.974, 32.06, 35.45, 39.948, 39.098, 40.078, 44.956, 47.867, 50.942, 51.996,
    54.938, 55.845, 58.933, 58.693, 63.546, 65.38, 69.723, 72.630, 74.922, 78.971, 79.904, 83.798,
];

static ATOMIC_NUMBERS: Map<&'static str, usize> = phf_map! {
    "H" => 1, "He" => 2, "Li" => 3, "Be" => 4, "B" => 5, "C" => 6, "N" => 7, "O" => 8,
    "F" => 9, "Ne" => 10, "Na" => 11, "Mg" => 12, "Al" => 13, "Si" => 14, "P" => 15,
    "S" => 16, "Cl" => 17, "Ar" => 18, "K" => 19, "Ca" => 20, "Sc" => 21, "Ti" => 22,
    "V" => 23, "Cr" => 24, "Mn" => 25, "Fe" => 26, "Co" => 27, "Ni" => 28, "Cu" => 29,
    "Zn" => 30, "Ga" => 31, "Ge" => 32, "As" => 33, "Se" => 34, "Br" => 35, "Kr" => 36,
};

fn canonical_symbol(symbol: &str) -> String {
    let mut chars = symbol.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Looks up the atomic number of a 1 or 2 letter symbol. Case-insensitive.
pub fn symbol_to_number(symbol: &str) -> Result<usize, ElementError> {
    ATOMIC_NUMBERS
        .get(canonical_symbol(symbol).as_str())
        .copied()
        .ok_or_else(|| ElementError::UnknownSymbol(symbol.to_string()))
}

pub fn number_to_symbol(number: usize) -> Result<&'static str, ElementError> {
    number
        .checked_sub(1)
        .and_then(|i| ATOMIC_SYMBOLS.get(i))
        .copied()
        .ok_or(ElementError::NumberOutOfRange(number))
}

/// Standard atomic mass (amu) of the element with the given symbol.
pub fn symbol_to_mass(symbol: &str) -> Result<f64, ElementError> {
    let number = symbol_to_number(symbol)?;
    Ok(ATOMIC_MASSES[number - 1])
}
