use super::atom::Atom;
use nalgebra::Point3;

/// An ordered collection of atoms.
///
/// Atom order is significant: the `i`-th atom corresponds to the `i`-th
/// displacement row of every normal mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_atoms(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.atoms.len() - 1
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    /// Moves the atom at `index` to `position`.
    ///
    /// # Return
    ///
    /// Returns `Some(())` if the atom exists, otherwise `None`.
    pub fn set_position(&mut self, index: usize, position: Point3<f64>) -> Option<()> {
        self.atoms.get_mut(index).map(|atom| atom.position = position)
    }

    pub fn positions(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.atoms.iter().map(|atom| &atom.position)
    }

    pub fn masses(&self) -> impl Iterator<Item = f64> + '_ {
        self.atoms.iter().map(|atom| atom.mass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Molecule {
        Molecule::from_atoms(vec![
            Atom::new("O", 15.999, Point3::new(0.0, 0.0, 0.1173)),
            Atom::new("H", 1.008, Point3::new(0.0, 0.7572, -0.4692)),
            Atom::new("H", 1.008, Point3::new(0.0, -0.7572, -0.4692)),
        ])
    }

    #[test]
    fn accessors_report_atoms_in_order() {
        let molecule = water();
        assert_eq!(molecule.num_atoms(), 3);
        assert!(!molecule.is_empty());
        assert_eq!(molecule.atom(0).unwrap().symbol, "O");
        assert_eq!(molecule.masses().collect::<Vec<_>>(), vec![15.999, 1.008, 1.008]);
        assert!(molecule.atom(3).is_none());
    }

    #[test]
    fn set_position_on_copy_leaves_original_untouched() {
        let original = water();
        let mut copy = original.clone();
        assert_eq!(copy.set_position(1, Point3::new(1.0, 1.0, 1.0)), Some(()));
        assert_eq!(copy.atom(1).unwrap().position, Point3::new(1.0, 1.0, 1.0));
        assert_eq!(
            original.atom(1).unwrap().position,
            Point3::new(0.0, 0.7572, -0.4692)
        );
    }

    #[test]
    fn set_position_out_of_range_returns_none() {
        let mut molecule = water();
        assert_eq!(molecule.set_position(10, Point3::origin()), None);
    }

    #[test]
    fn add_atom_returns_index() {
        let mut molecule = Molecule::new();
        assert!(molecule.is_empty());
        assert_eq!(molecule.add_atom(Atom::new("C", 12.011, Point3::origin())), 0);
        assert_eq!(molecule.add_atom(Atom::new("O", 15.999, Point3::origin())), 1);
        assert_eq!(molecule.positions().count(), 2);
    }
}
