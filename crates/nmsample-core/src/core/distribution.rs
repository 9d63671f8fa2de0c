use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DistributionError {
    #[error("Cannot build a linear function from two points sharing x = {0}")]
    DegeneratePoints(f64),
    #[error("A piecewise function with {breakpoints} breakpoint(s) needs {expected} segment(s), got {segments}", expected = .breakpoints + 1)]
    SegmentCountMismatch { segments: usize, breakpoints: usize },
    #[error("Piecewise breakpoints must be strictly increasing and inside (0, 1), got {0:?}")]
    InvalidBreakpoints(Vec<f64>),
}

/// A scalar function over the normalized config index `x ∈ [0, 1]`.
///
/// The first config of a run is generated with `evaluate(0.0)` and the last with
/// `evaluate(1.0)`. Values are sampling parameters (temperature or amplitude) in
/// atomic units.
#[derive(Debug, Clone, PartialEq)]
pub enum DistributionFunction {
    /// Returns `value` regardless of `x`.
    Constant { value: f64 },
    /// `slope * x + intercept`.
    Linear { slope: f64, intercept: f64 },
    /// `first * ratio^x`.
    Geometric { first: f64, ratio: f64 },
    /// Built only through [`DistributionFunction::piecewise`].
    Piecewise(PiecewiseFunction),
}

/// `[0, 1]` split at `breakpoints`; each segment re-maps `x` onto its own
/// `[0, 1]` before delegating.
///
/// Always holds exactly one more segment than breakpoints, with the breakpoints
/// strictly increasing inside `(0, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseFunction {
    segments: Vec<DistributionFunction>,
    breakpoints: Vec<f64>,
}

impl PiecewiseFunction {
    pub fn segments(&self) -> &[DistributionFunction] {
        &self.segments
    }

    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    fn bounds(&self, index: usize) -> (f64, f64) {
        let lower = if index == 0 { 0.0 } else { self.breakpoints[index - 1] };
        let upper = self.breakpoints.get(index).copied().unwrap_or(1.0);
        (lower, upper)
    }

    fn evaluate(&self, x: f64) -> f64 {
        let index = self.breakpoints.partition_point(|&b| b <= x);
        let (lower, upper) = self.bounds(index);
        self.segments[index].evaluate((x - lower) / (upper - lower))
    }
}

impl DistributionFunction {
    pub fn constant(value: f64) -> Self {
        Self::Constant { value }
    }

    pub fn linear(slope: f64, intercept: f64) -> Self {
        Self::Linear { slope, intercept }
    }

    /// Builds the line through `(x1, y1)` and `(x2, y2)`.
    pub fn linear_from_points(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, DistributionError> {
        if x1 == x2 {
            return Err(DistributionError::DegeneratePoints(x1));
        }
        let slope = (y2 - y1) / (x2 - x1);
        Ok(Self::Linear {
            slope,
            intercept: y1 - slope * x1,
        })
    }

    pub fn geometric(first: f64, ratio: f64) -> Self {
        Self::Geometric { first, ratio }
    }

    /// Builds a piecewise function. `segments.len()` must be `breakpoints.len() + 1`
    /// and the breakpoints strictly increasing inside the open interval `(0, 1)`.
    pub fn piecewise(
        segments: Vec<DistributionFunction>,
        breakpoints: Vec<f64>,
    ) -> Result<Self, DistributionError> {
        if segments.len() != breakpoints.len() + 1 {
            return Err(DistributionError::SegmentCountMismatch {
                segments: segments.len(),
                breakpoints: breakpoints.len(),
            });
        }
        let in_range = breakpoints.iter().all(|&b| b > 0.0 && b < 1.0);
        let increasing = breakpoints.windows(2).all(|w| w[0] < w[1]);
        if !in_range || !increasing {
            return Err(DistributionError::InvalidBreakpoints(breakpoints));
        }
        Ok(Self::Piecewise(PiecewiseFunction {
            segments,
            breakpoints,
        }))
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            Self::Constant { value } => *value,
            Self::Linear { slope, intercept } => slope * x + intercept,
            Self::Geometric { first, ratio } => first * ratio.powf(x),
            Self::Piecewise(piecewise) => piecewise.evaluate(x),
        }
    }

    /// Renders the function as `dependent = <expression>` for log output.
    pub fn describe(&self, dependent: &str) -> String {
        format!("{} = {}", dependent, self)
    }
}

impl fmt::Display for DistributionFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant { value } => write!(f, "{}", value),
            Self::Linear { slope, intercept } => write!(f, "{} * x + {}", slope, intercept),
            Self::Geometric { first, ratio } => write!(f, "{} * {}^x", first, ratio),
            Self::Piecewise(piecewise) => {
                for (i, segment) in piecewise.segments.iter().enumerate() {
                    let (lower, upper) = piecewise.bounds(i);
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "({}) for x in [{}, {})", segment, lower, upper)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_ignores_x() {
        let f = DistributionFunction::constant(3.5);
        assert_eq!(f.evaluate(0.0), 3.5);
        assert_eq!(f.evaluate(0.7), 3.5);
        assert_eq!(f.evaluate(1.0), 3.5);
    }

    #[test]
    fn linear_from_points_passes_through_both_points() {
        let f = DistributionFunction::linear_from_points(0.0, 0.0, 1.0, 2.0).unwrap();
        assert!((f.evaluate(0.0) - 0.0).abs() < 1e-12);
        assert!((f.evaluate(0.5) - 1.0).abs() < 1e-12);
        assert!((f.evaluate(1.0) - 2.0).abs() < 1e-12);

        let g = DistributionFunction::linear_from_points(2.0, 5.0, 4.0, 1.0).unwrap();
        assert!((g.evaluate(2.0) - 5.0).abs() < 1e-12);
        assert!((g.evaluate(4.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn linear_from_points_rejects_vertical_line() {
        let result = DistributionFunction::linear_from_points(0.5, 0.0, 0.5, 1.0);
        assert_eq!(result, Err(DistributionError::DegeneratePoints(0.5)));
    }

    #[test]
    fn geometric_grows_by_ratio_over_unit_interval() {
        let f = DistributionFunction::geometric(1.0, 2.0);
        assert!((f.evaluate(0.0) - 1.0).abs() < 1e-12);
        assert!((f.evaluate(0.5) - 2f64.sqrt()).abs() < 1e-12);
        assert!((f.evaluate(1.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn piecewise_selects_segment_and_renormalizes() {
        let f = DistributionFunction::piecewise(
            vec![
                DistributionFunction::constant(1.0),
                DistributionFunction::linear(10.0, 0.0),
                DistributionFunction::constant(3.0),
            ],
            vec![0.25, 0.75],
        )
        .unwrap();

        assert_eq!(f.evaluate(0.0), 1.0);
        assert_eq!(f.evaluate(0.2), 1.0);
        assert!((f.evaluate(0.25) - 0.0).abs() < 1e-12);
        assert!((f.evaluate(0.5) - 5.0).abs() < 1e-12);
        assert_eq!(f.evaluate(0.75), 3.0);
        assert_eq!(f.evaluate(1.0), 3.0);
    }

    #[test]
    fn piecewise_validates_shape() {
        let mismatch = DistributionFunction::piecewise(
            vec![DistributionFunction::constant(1.0)],
            vec![0.5],
        );
        assert_eq!(
            mismatch,
            Err(DistributionError::SegmentCountMismatch {
                segments: 1,
                breakpoints: 1
            })
        );

        let unordered = DistributionFunction::piecewise(
            vec![
                DistributionFunction::constant(1.0),
                DistributionFunction::constant(2.0),
                DistributionFunction::constant(3.0),
            ],
            vec![0.6, 0.4],
        );
        assert!(matches!(
            unordered,
            Err(DistributionError::InvalidBreakpoints(_))
        ));

        let out_of_range = DistributionFunction::piecewise(
            vec![
                DistributionFunction::constant(1.0),
                DistributionFunction::constant(2.0),
            ],
            vec![1.0],
        );
        assert!(matches!(
            out_of_range,
            Err(DistributionError::InvalidBreakpoints(_))
        ));
    }

    #[test]
    fn empty_piecewise_is_rejected_and_never_evaluated() {
        let empty = DistributionFunction::piecewise(Vec::new(), Vec::new());
        assert_eq!(
            empty,
            Err(DistributionError::SegmentCountMismatch {
                segments: 0,
                breakpoints: 0
            })
        );

        let single =
            DistributionFunction::piecewise(vec![DistributionFunction::constant(4.0)], Vec::new())
                .unwrap();
        let DistributionFunction::Piecewise(inner) = &single else {
            panic!("expected a piecewise function");
        };
        assert_eq!(inner.segments().len(), inner.breakpoints().len() + 1);
        for x in [0.0, 0.5, 1.0] {
            assert_eq!(single.evaluate(x), 4.0);
        }
    }

    #[test]
    fn nested_piecewise_evaluates_on_local_domain() {
        let inner = DistributionFunction::piecewise(
            vec![
                DistributionFunction::constant(1.0),
                DistributionFunction::constant(2.0),
            ],
            vec![0.5],
        )
        .unwrap();
        let outer = DistributionFunction::piecewise(
            vec![inner, DistributionFunction::constant(9.0)],
            vec![0.5],
        )
        .unwrap();

        assert_eq!(outer.evaluate(0.1), 1.0);
        assert_eq!(outer.evaluate(0.3), 2.0);
        assert_eq!(outer.evaluate(0.9), 9.0);
    }

    #[test]
    fn describe_renders_expression() {
        assert_eq!(DistributionFunction::constant(2.0).describe("temp"), "temp = 2");
        assert_eq!(
            DistributionFunction::linear(0.5, 1.0).describe("A"),
            "A = 0.5 * x + 1"
        );
        let piecewise = DistributionFunction::piecewise(
            vec![
                DistributionFunction::constant(1.0),
                DistributionFunction::constant(2.0),
            ],
            vec![0.5],
        )
        .unwrap();
        assert_eq!(
            piecewise.to_string(),
            "(1) for x in [0, 0.5); (2) for x in [0.5, 1)"
        );
    }
}
