use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::molecule::Molecule;
use crate::core::units::ElementError;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct XyzMetadata {
    pub comment: String,
}

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("Unknown element on line {line}: {source}")]
    UnknownElement {
        line: usize,
        #[source]
        source: ElementError,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
}

#[derive(Debug, Error)]
pub enum XyzParseErrorKind {
    #[error("Invalid atom count '{0}'")]
    InvalidAtomCount(String),
    #[error("Invalid {axis} coordinate '{value}'")]
    InvalidCoordinate { axis: char, value: String },
    #[error("Atom line must contain a symbol and three coordinates")]
    MissingField,
    #[error("Unexpected end of file, expected {expected} atom line(s) but found {found}")]
    UnexpectedEof { expected: usize, found: usize },
}

pub struct XyzFile;

impl MolecularFile for XyzFile {
    type Metadata = XyzMetadata;
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Molecule, Self::Metadata), Self::Error> {
        let mut lines = reader.lines();

        let count_line = lines.next().transpose()?.ok_or_else(|| {
            XyzError::Inconsistency("empty XYZ input, expected an atom count".into())
        })?;
        let count_str = count_line.trim();
        let num_atoms: usize = count_str.parse().map_err(|_| XyzError::Parse {
            line: 1,
            kind: XyzParseErrorKind::InvalidAtomCount(count_str.into()),
        })?;

        let comment = lines.next().transpose()?.unwrap_or_default();

        let mut molecule = Molecule::new();
        for atom_index in 0..num_atoms {
            let line_num = atom_index + 3;
            let line = lines.next().transpose()?.ok_or(XyzError::Parse {
                line: line_num,
                kind: XyzParseErrorKind::UnexpectedEof {
                    expected: num_atoms,
                    found: atom_index,
                },
            })?;

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                return Err(XyzError::Parse {
                    line: line_num,
                    kind: XyzParseErrorKind::MissingField,
                });
            }

            let mut coords = [0.0; 3];
            for (axis_index, (axis, token)) in ['x', 'y', 'z'].iter().zip(&parts[1..4]).enumerate() {
                coords[axis_index] = token.parse().map_err(|_| XyzError::Parse {
                    line: line_num,
                    kind: XyzParseErrorKind::InvalidCoordinate {
                        axis: *axis,
                        value: (*token).into(),
                    },
                })?;
            }

            let atom = Atom::from_symbol(parts[0], Point3::new(coords[0], coords[1], coords[2]))
                .map_err(|source| XyzError::UnknownElement {
                    line: line_num,
                    source,
                })?;
            molecule.add_atom(atom);
        }

        Ok((molecule, XyzMetadata { comment }))
    }

    fn write_to(
        molecule: &Molecule,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        if metadata.comment.contains('\n') {
            return Err(XyzError::Inconsistency(
                "XYZ comment must be a single line".into(),
            ));
        }
        writeln!(writer, "{}", molecule.num_atoms())?;
        writeln!(writer, "{}", metadata.comment)?;
        for atom in molecule.atoms() {
            writeln!(
                writer,
                "{:<2} {:>18.10} {:>18.10} {:>18.10}",
                atom.symbol, atom.position.x, atom.position.y, atom.position.z
            )?;
        }
        Ok(())
    }
}
