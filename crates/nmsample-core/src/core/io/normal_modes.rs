use nalgebra::Vector3;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const HEADER_PATTERN: &str = "EOF or normal mode: x";
const FREQUENCY_PATTERN: &str = "frequency = x";
const REDUCED_MASS_PATTERN: &str = "reduced mass = x";
const OFFSET_PATTERN: &str = "x y z";

/// One vibrational normal mode as read from a normal-modes file.
///
/// Frequencies are in cm⁻¹ as parsed and may be negative (imaginary modes).
/// `displacement[a]` is the (x, y, z) offset of atom `a`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalMode {
    pub frequency: f64,
    pub reduced_mass: f64,
    pub displacement: Vec<Vector3<f64>>,
}

#[derive(Debug, Error)]
pub enum NormalModeParseError {
    #[error("I/O error reading '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(
        "Line format error in '{}' on line {line_number}: '{line}' does not match the expected format '{expected}'",
        .path.display()
    )]
    Format {
        path: PathBuf,
        line_number: usize,
        line: String,
        expected: &'static str,
    },
    #[error("Parsing error in '{}': {message}", .path.display())]
    Parsing { path: PathBuf, message: String },
}

struct LineCursor<'a, R: BufRead> {
    reader: &'a mut R,
    path: &'a Path,
    line_number: usize,
    buffer: String,
}

impl<'a, R: BufRead> LineCursor<'a, R> {
    fn new(reader: &'a mut R, path: &'a Path) -> Self {
        Self {
            reader,
            path,
            line_number: 0,
            buffer: String::new(),
        }
    }

    /// Returns the next line without its terminator, or `None` at end of input.
    fn next_line(&mut self) -> Result<Option<&str>, NormalModeParseError> {
        self.buffer.clear();
        let read = self
            .reader
            .read_line(&mut self.buffer)
            .map_err(|source| NormalModeParseError::Io {
                path: self.path.to_path_buf(),
                source,
            })?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        Ok(Some(self.buffer.trim_end_matches(['\n', '\r'])))
    }

    fn require_line(&mut self, expected: &str) -> Result<&str, NormalModeParseError> {
        let path = self.path;
        self.next_line()?
            .ok_or_else(|| NormalModeParseError::Parsing {
                path: path.to_path_buf(),
                message: format!("Unexpected EOF, expected line of format '{}'", expected),
            })
    }

    fn format_error(&self, line: &str, expected: &'static str) -> NormalModeParseError {
        NormalModeParseError::Format {
            path: self.path.to_path_buf(),
            line_number: self.line_number,
            line: line.to_string(),
            expected,
        }
    }

    fn parse_float(&self, token: &str, field: &str) -> Result<f64, NormalModeParseError> {
        token.parse().map_err(|_| NormalModeParseError::Parsing {
            path: self.path.to_path_buf(),
            message: format!(
                "cannot parse '{}' into a {} float (line {})",
                token, field, self.line_number
            ),
        })
    }
}

/// Reader for block-structured normal-mode files.
///
/// Each block looks like
///
/// ```text
/// normal mode: 1
/// frequency = 1594.12
/// reduced mass = 1.0825
/// 0.0000 0.0000 -0.0690
/// 0.0000 -0.4290 0.5480
/// 0.0000 0.4290 0.5480
///
/// ```
///
/// with exactly one displacement line per atom and a blank line closing the block.
pub struct NormalModeFile;

impl NormalModeFile {
    pub fn read_from_path(
        path: impl AsRef<Path>,
        num_atoms: usize,
    ) -> Result<Vec<NormalMode>, NormalModeParseError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| NormalModeParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::read_from(&mut BufReader::new(file), path, num_atoms)
    }

    /// Parses every block from `reader`. `path` labels error messages.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed line, non-numeric value, missing block
    /// terminator or premature end of input. No partial result is returned.
    pub fn read_from(
        reader: &mut impl BufRead,
        path: &Path,
        num_atoms: usize,
    ) -> Result<Vec<NormalMode>, NormalModeParseError> {
        info!("Parsing normal modes input file {:?}", path);

        let mut cursor = LineCursor::new(reader, path);
        let mut modes = Vec::new();

        loop {
            let Some(header) = cursor.next_line()? else {
                break;
            };
            if !header.starts_with("normal mode:") || header.split_whitespace().count() != 3 {
                let header = header.to_string();
                return Err(cursor.format_error(&header, HEADER_PATTERN));
            }

            let frequency = {
                let line = cursor.require_line(FREQUENCY_PATTERN)?.to_string();
                let tokens: Vec<&str> = line.split_whitespace().collect();
                if !line.starts_with("frequency = ") || tokens.len() != 3 {
                    return Err(cursor.format_error(&line, FREQUENCY_PATTERN));
                }
                cursor.parse_float(tokens[2], "frequency")?
            };

            let reduced_mass = {
                let line = cursor.require_line(REDUCED_MASS_PATTERN)?.to_string();
                let tokens: Vec<&str> = line.split_whitespace().collect();
                if !line.starts_with("reduced mass = ") || tokens.len() != 4 {
                    return Err(cursor.format_error(&line, REDUCED_MASS_PATTERN));
                }
                cursor.parse_float(tokens[3], "reduced mass")?
            };

            let mut displacement = Vec::with_capacity(num_atoms);
            for _ in 0..num_atoms {
                let line = cursor.require_line(OFFSET_PATTERN)?.to_string();
                let tokens: Vec<&str> = line.split_whitespace().collect();
                if tokens.len() != 3 {
                    return Err(cursor.format_error(&line, OFFSET_PATTERN));
                }
                let mut offset = Vector3::zeros();
                for (axis, token) in tokens.iter().enumerate() {
                    offset[axis] = cursor.parse_float(token, "offset")?;
                }
                displacement.push(offset);
            }

            let terminator_ok = matches!(cursor.next_line()?, Some(line) if line.trim().is_empty());
            if !terminator_ok {
                return Err(NormalModeParseError::Parsing {
                    path: path.to_path_buf(),
                    message: format!("expected blank line (line {})", cursor.line_number),
                });
            }

            modes.push(NormalMode {
                frequency,
                reduced_mass,
                displacement,
            });
        }

        info!("Completed parsing normal modes input file ({} modes).", modes.len());
        Ok(modes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    const TWO_ATOM_MODES: &str = "\
normal mode: 1
frequency = 1500.5
reduced mass = 1.25
0.1 0.0 0.0
-0.1 0.0 0.0

normal mode: 2
frequency = -320.0
reduced mass = 2.5
0.0 0.3 0.0
0.0 -0.3 0.0

";

    fn parse(content: &str, num_atoms: usize) -> Result<Vec<NormalMode>, NormalModeParseError> {
        NormalModeFile::read_from(
            &mut Cursor::new(content.to_string()),
            Path::new("modes.dat"),
            num_atoms,
        )
    }

    #[test]
    fn parses_blocks_in_file_order() {
        let modes = parse(TWO_ATOM_MODES, 2).unwrap();
        assert_eq!(modes.len(), 2);
        assert_eq!(modes[0].frequency, 1500.5);
        assert_eq!(modes[0].reduced_mass, 1.25);
        assert_eq!(modes[0].displacement[1], Vector3::new(-0.1, 0.0, 0.0));
        assert_eq!(modes[1].frequency, -320.0);
        assert_eq!(modes[1].displacement[0], Vector3::new(0.0, 0.3, 0.0));
    }

    #[test]
    fn empty_input_yields_no_modes() {
        assert!(parse("", 3).unwrap().is_empty());
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let content = TWO_ATOM_MODES.replace('\n', "\r\n");
        assert_eq!(parse(&content, 2).unwrap().len(), 2);
    }

    #[test]
    fn header_without_colon_is_a_format_error_with_line_text() {
        let content = TWO_ATOM_MODES.replacen("normal mode: 1", "normal mode 1", 1);
        let err = parse(&content, 2).unwrap_err();
        match &err {
            NormalModeParseError::Format {
                line,
                line_number,
                expected,
                ..
            } => {
                assert_eq!(line, "normal mode 1");
                assert_eq!(*line_number, 1);
                assert_eq!(*expected, "EOF or normal mode: x");
            }
            other => panic!("expected format error, got {other:?}"),
        }
        let message = err.to_string();
        assert!(message.contains("modes.dat"));
        assert!(message.contains("'normal mode 1'"));
    }

    #[test]
    fn malformed_frequency_line_is_a_format_error() {
        let content = TWO_ATOM_MODES.replacen("frequency = 1500.5", "freq = 1500.5", 1);
        assert!(matches!(
            parse(&content, 2),
            Err(NormalModeParseError::Format {
                line_number: 2,
                expected: "frequency = x",
                ..
            })
        ));
    }

    #[test]
    fn malformed_reduced_mass_line_is_a_format_error() {
        let content = TWO_ATOM_MODES.replacen("reduced mass = 1.25", "reduced mass = 1.25 amu", 1);
        assert!(matches!(
            parse(&content, 2),
            Err(NormalModeParseError::Format {
                line_number: 3,
                expected: "reduced mass = x",
                ..
            })
        ));
    }

    #[test]
    fn non_numeric_frequency_is_a_parsing_error() {
        let content = TWO_ATOM_MODES.replacen("1500.5", "fast", 1);
        let err = parse(&content, 2).unwrap_err();
        assert!(matches!(&err, NormalModeParseError::Parsing { message, .. } if message.contains("'fast'")));
    }

    #[test]
    fn non_numeric_offset_is_a_parsing_error() {
        let content = TWO_ATOM_MODES.replacen("-0.1 0.0 0.0", "-0.1 zero 0.0", 1);
        assert!(matches!(
            parse(&content, 2),
            Err(NormalModeParseError::Parsing { .. })
        ));
    }

    #[test]
    fn offset_line_with_wrong_token_count_is_a_format_error() {
        let content = TWO_ATOM_MODES.replacen("0.1 0.0 0.0", "0.1 0.0", 1);
        assert!(matches!(
            parse(&content, 2),
            Err(NormalModeParseError::Format {
                line_number: 4,
                expected: "x y z",
                ..
            })
        ));
    }

    #[test]
    fn premature_eof_inside_block_is_a_parsing_error() {
        let content = "normal mode: 1\nfrequency = 100.0\n";
        let err = parse(content, 2).unwrap_err();
        assert!(matches!(&err, NormalModeParseError::Parsing { message, .. } if message.contains("reduced mass = x")));
    }

    #[test]
    fn too_few_atom_lines_is_detected() {
        let err = parse(TWO_ATOM_MODES, 3).unwrap_err();
        assert!(matches!(err, NormalModeParseError::Format { .. }));
    }

    #[test]
    fn missing_terminator_at_eof_is_a_parsing_error() {
        let content = TWO_ATOM_MODES.trim_end().to_string() + "\n";
        let err = parse(&content, 2).unwrap_err();
        assert!(matches!(&err, NormalModeParseError::Parsing { message, .. } if message.contains("expected blank line")));
    }

    #[test]
    fn non_blank_terminator_is_a_parsing_error() {
        let content = TWO_ATOM_MODES.replacen("-0.1 0.0 0.0\n\n", "-0.1 0.0 0.0\nnormal mode: 2\n", 1);
        assert!(matches!(
            parse(&content, 2),
            Err(NormalModeParseError::Parsing { .. })
        ));
    }

    #[test]
    fn read_from_path_reports_missing_file() {
        let dir = tempdir().unwrap();
        let result = NormalModeFile::read_from_path(dir.path().join("missing.dat"), 2);
        assert!(matches!(result, Err(NormalModeParseError::Io { .. })));
    }

    #[test]
    fn read_from_path_parses_file_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("modes.dat");
        fs::write(&path, TWO_ATOM_MODES).unwrap();
        let modes = NormalModeFile::read_from_path(&path, 2).unwrap();
        assert_eq!(modes.len(), 2);
    }
}
