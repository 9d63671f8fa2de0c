use super::error::GenerationError;
use crate::core::models::molecule::Molecule;
use crate::core::units::UnitTable;
use nalgebra::{DMatrix, DVector, Point3, Vector3};
use rand::Rng;
use rand_distr::StandardNormal;

pub fn draw_standard_normals(dim: usize, rng: &mut impl Rng) -> DVector<f64> {
    DVector::from_iterator(dim, (0..dim).map(|_| rng.sample::<f64, _>(StandardNormal)))
}

/// Applies the mass-weighted displacement `G · z` to a copy of `base`.
///
/// Coordinates are moved into bohr, displaced, and converted back to angstroms.
pub fn displace(
    base: &Molecule,
    g: &DMatrix<f64>,
    z: &DVector<f64>,
    units: &UnitTable,
) -> Result<Molecule, GenerationError> {
    let dim = 3 * base.num_atoms();
    if g.nrows() != dim || g.ncols() != dim || z.len() != dim {
        return Err(GenerationError::inconsistent_value(
            ["3 x atoms", "G rows", "G columns", "normal variates"],
            [&dim, &g.nrows(), &g.ncols(), &z.len()],
            "the G matrix and the variate vector must match the geometry",
        ));
    }

    let displacement = g * z;
    let bohr = units.bohr_angstrom();
    let mut displaced = base.clone();

    for (i, atom) in base.atoms().iter().enumerate() {
        let scale = units.mass_scale(atom.mass);
        let offset = Vector3::new(
            displacement[3 * i],
            displacement[3 * i + 1],
            displacement[3 * i + 2],
        ) / scale;
        let position = Point3::from((atom.position.coords / bohr + offset) * bohr);
        displaced.set_position(i, position);
    }

    Ok(displaced)
}

/// Draws one displaced geometry from the distribution described by `g`.
pub fn sample_configuration(
    base: &Molecule,
    g: &DMatrix<f64>,
    units: &UnitTable,
    rng: &mut impl Rng,
) -> Result<Molecule, GenerationError> {
    let z = draw_standard_normals(3 * base.num_atoms(), rng);
    displace(base, g, &z, units)
}
