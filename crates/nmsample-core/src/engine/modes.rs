use super::error::GenerationError;
use crate::core::io::normal_modes::NormalMode;
use crate::core::models::molecule::Molecule;
use crate::core::units::UnitTable;
use nalgebra::DVector;
use tracing::{debug, warn};

/// Normal modes sorted by frequency, with frequencies in atomic units.
///
/// Built once per generator. The stored displacements are the raw parsed
/// vectors; mass weighting happens in [`NormalModeTable::mass_weighted`] so the
/// table itself is never modified by a generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalModeTable {
    modes: Vec<NormalMode>,
    num_atoms: usize,
    negative_count: usize,
}

impl NormalModeTable {
    pub fn new(
        mut modes: Vec<NormalMode>,
        num_atoms: usize,
        units: &UnitTable,
    ) -> Result<Self, GenerationError> {
        if modes.is_empty() {
            return Err(GenerationError::invalid_value(
                "number of normal modes",
                0,
                "at least one normal mode",
            ));
        }
        if let Some(bad) = modes.iter().find(|m| m.displacement.len() != num_atoms) {
            return Err(GenerationError::inconsistent_value(
                ["atoms in settings", "displacement rows in mode"],
                [&num_atoms, &bad.displacement.len()],
                "every normal mode must carry one displacement per atom",
            ));
        }

        modes.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));

        let negative_count = modes.iter().filter(|m| m.frequency < 0.0).count();
        match negative_count {
            0 => {}
            1 => warn!(
                "1 negative frequency in the normal modes; this is likely a transition state."
            ),
            n => warn!(
                "{} negative frequencies in the normal modes; proceed with caution.",
                n
            ),
        }

        for mode in &mut modes {
            mode.frequency = units.wavenumber_to_au(mode.frequency.abs());
        }
        debug!(
            "Prepared {} normal modes for {} atoms (frequency range {:.6e} to {:.6e} au).",
            modes.len(),
            num_atoms,
            modes[0].frequency,
            modes[modes.len() - 1].frequency
        );

        Ok(Self {
            modes,
            num_atoms,
            negative_count,
        })
    }

    pub fn modes(&self) -> &[NormalMode] {
        &self.modes
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn num_atoms(&self) -> usize {
        self.num_atoms
    }

    pub fn negative_frequency_count(&self) -> usize {
        self.negative_count
    }

    pub fn frequencies(&self) -> impl Iterator<Item = f64> + '_ {
        self.modes.iter().map(|m| m.frequency)
    }

    /// Frequency (au) of the first mode in sorted order.
    pub fn min_frequency(&self) -> f64 {
        self.modes[0].frequency
    }

    /// Frequency (au) of the last mode in sorted order.
    ///
    /// Sorting uses the signed wavenumbers, so an imaginary mode larger in
    /// magnitude than every real mode does not end up here.
    pub fn max_frequency(&self) -> f64 {
        self.modes[self.modes.len() - 1].frequency
    }

    /// Scales every displacement by `sqrt(mass)` (electron masses) of its atom
    /// and normalizes each pooled `3N` vector to unit length.
    pub fn mass_weighted(
        &self,
        molecule: &Molecule,
        units: &UnitTable,
    ) -> Result<MassWeightedModes, GenerationError> {
        if molecule.num_atoms() != self.num_atoms {
            return Err(GenerationError::inconsistent_value(
                ["atoms in normal modes", "atoms in geometry"],
                [&self.num_atoms, &molecule.num_atoms()],
                "the geometry must match the normal-mode data atom for atom",
            ));
        }

        let scales: Vec<f64> = molecule.masses().map(|m| units.mass_scale(m)).collect();
        let dim = 3 * self.num_atoms;

        let modes = self
            .modes
            .iter()
            .enumerate()
            .map(|(index, mode)| {
                let vector = DVector::from_iterator(
                    dim,
                    mode.displacement
                        .iter()
                        .zip(&scales)
                        .flat_map(|(d, &s)| [d.x * s, d.y * s, d.z * s]),
                );
                let norm = vector.norm();
                if norm == 0.0 || !norm.is_finite() {
                    return Err(GenerationError::invalid_value(
                        format!("displacement norm of normal mode {}", index),
                        norm,
                        "a non-zero, finite vector",
                    ));
                }
                Ok(WeightedMode {
                    frequency: mode.frequency,
                    reduced_mass: mode.reduced_mass,
                    vector: vector / norm,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MassWeightedModes { modes, dim })
    }
}

/// A preprocessed mode: frequency in au and a unit-length, mass-weighted `3N` vector.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedMode {
    pub frequency: f64,
    pub reduced_mass: f64,
    pub vector: DVector<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MassWeightedModes {
    modes: Vec<WeightedMode>,
    dim: usize,
}

impl MassWeightedModes {
    pub fn iter(&self) -> std::slice::Iter<'_, WeightedMode> {
        self.modes.iter()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Length of each mode vector, `3 × atoms`.
    pub fn dim(&self) -> usize {
        self.dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::{Point3, Vector3};

    fn mode(frequency: f64, displacement: Vec<Vector3<f64>>) -> NormalMode {
        NormalMode {
            frequency,
            reduced_mass: 1.0,
            displacement,
        }
    }

    fn water() -> Molecule {
        Molecule::from_atoms(vec![
            Atom::from_symbol("O", Point3::new(0.0, 0.0, 0.1173)).unwrap(),
            Atom::from_symbol("H", Point3::new(0.0, 0.7572, -0.4692)).unwrap(),
            Atom::from_symbol("H", Point3::new(0.0, -0.7572, -0.4692)).unwrap(),
        ])
    }

    fn water_modes() -> Vec<NormalMode> {
        vec![
            mode(
                3756.0,
                vec![
                    Vector3::new(0.0, 0.07, 0.0),
                    Vector3::new(0.0, -0.55, -0.43),
                    Vector3::new(0.0, -0.55, 0.43),
                ],
            ),
            mode(
                1595.0,
                vec![
                    Vector3::new(0.0, 0.0, -0.07),
                    Vector3::new(0.0, -0.43, 0.55),
                    Vector3::new(0.0, 0.43, 0.55),
                ],
            ),
            mode(
                3657.0,
                vec![
                    Vector3::new(0.0, 0.0, 0.05),
                    Vector3::new(0.0, 0.58, -0.40),
                    Vector3::new(0.0, -0.58, -0.40),
                ],
            ),
        ]
    }

    #[test]
    fn modes_are_sorted_and_converted_to_atomic_units() {
        let units = UnitTable::ATOMIC;
        let table = NormalModeTable::new(water_modes(), 3, &units).unwrap();
        let freqs: Vec<f64> = table.frequencies().collect();
        assert!(freqs.windows(2).all(|w| w[0] <= w[1]));
        assert!((freqs[0] - 1595.0 / units.hartree_to_wavenumber).abs() < 1e-15);
        assert!((table.max_frequency() - 3756.0 / units.hartree_to_wavenumber).abs() < 1e-15);
        assert_eq!(table.min_frequency(), freqs[0]);
        assert_eq!(table.negative_frequency_count(), 0);
    }

    #[test]
    fn negative_frequencies_are_counted_and_made_positive() {
        let mut modes = water_modes();
        modes[1].frequency = -400.0;
        let table = NormalModeTable::new(modes, 3, &UnitTable::ATOMIC).unwrap();
        assert_eq!(table.negative_frequency_count(), 1);
        assert!(table.frequencies().all(|f| f >= 0.0));
        // Sorted by signed value: the imaginary mode comes first.
        assert!((table.min_frequency() - UnitTable::ATOMIC.wavenumber_to_au(400.0)).abs() < 1e-15);
    }

    #[test]
    fn equal_frequencies_keep_file_order() {
        let mut modes = water_modes();
        modes[0].frequency = 1595.0;
        modes[0].reduced_mass = 7.0;
        let table = NormalModeTable::new(modes, 3, &UnitTable::ATOMIC).unwrap();
        assert_eq!(table.modes()[0].reduced_mass, 7.0);
    }

    #[test]
    fn empty_mode_list_is_invalid() {
        let result = NormalModeTable::new(Vec::new(), 3, &UnitTable::ATOMIC);
        assert!(matches!(result, Err(GenerationError::InvalidValue { .. })));
    }

    #[test]
    fn wrong_displacement_count_is_inconsistent() {
        let result = NormalModeTable::new(water_modes(), 2, &UnitTable::ATOMIC);
        assert!(matches!(result, Err(GenerationError::InconsistentValue { .. })));
    }

    #[test]
    fn mass_weighted_vectors_have_unit_norm() {
        let units = UnitTable::ATOMIC;
        let table = NormalModeTable::new(water_modes(), 3, &units).unwrap();
        let weighted = table.mass_weighted(&water(), &units).unwrap();
        assert_eq!(weighted.len(), 3);
        assert_eq!(weighted.dim(), 9);
        for m in weighted.iter() {
            assert!((m.vector.norm_squared() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn mass_weighting_scales_by_sqrt_mass() {
        let units = UnitTable::ATOMIC;
        let modes = vec![mode(
            1000.0,
            vec![Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)],
        )];
        let molecule = Molecule::from_atoms(vec![
            Atom::from_symbol("H", Point3::origin()).unwrap(),
            Atom::from_symbol("O", Point3::new(1.0, 0.0, 0.0)).unwrap(),
        ]);
        let table = NormalModeTable::new(modes, 2, &units).unwrap();
        let weighted = table.mass_weighted(&molecule, &units).unwrap();
        let v = &weighted.iter().next().unwrap().vector;
        let expected_ratio = (15.999f64 / 1.008).sqrt();
        assert!((v[3] / v[0] - expected_ratio).abs() < 1e-12);
    }

    #[test]
    fn mass_weighting_does_not_modify_the_table() {
        let units = UnitTable::ATOMIC;
        let table = NormalModeTable::new(water_modes(), 3, &units).unwrap();
        let before = table.clone();
        let first = table.mass_weighted(&water(), &units).unwrap();
        let second = table.mass_weighted(&water(), &units).unwrap();
        assert_eq!(table, before);
        assert_eq!(first, second);
    }

    #[test]
    fn zero_displacement_is_invalid() {
        let units = UnitTable::ATOMIC;
        let mut modes = water_modes();
        modes[2].displacement = vec![Vector3::zeros(); 3];
        let table = NormalModeTable::new(modes, 3, &units).unwrap();
        let result = table.mass_weighted(&water(), &units);
        assert!(matches!(result, Err(GenerationError::InvalidValue { .. })));
    }

    #[test]
    fn geometry_atom_mismatch_is_inconsistent() {
        let units = UnitTable::ATOMIC;
        let table = NormalModeTable::new(water_modes(), 3, &units).unwrap();
        let mut molecule = water();
        molecule.add_atom(Atom::from_symbol("H", Point3::origin()).unwrap());
        let result = table.mass_weighted(&molecule, &units);
        assert!(matches!(result, Err(GenerationError::InconsistentValue { .. })));
    }
}
