// ============================================================================
// Average Flow
// Flow rate derived from two totalization snapshots and the time between them
// ============================================================================

use crate::numeric::{BigFloat, NumericError};
use std::fmt;

/// Failure of [`average_flow`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlowError {
    /// Accumulator or argument failure
    Numeric(NumericError),
    /// Totals moved but no time elapsed
    ZeroElapsed {
        /// Total delta over the zero-length window
        delta: f32,
    },
}

impl FlowError {
    /// Error kind in the numeric taxonomy.
    pub fn kind(&self) -> NumericError {
        match self {
            FlowError::Numeric(e) => *e,
            FlowError::ZeroElapsed { .. } => NumericError::MathError,
        }
    }

    /// Rate to report when the caller still needs a number: infinity with
    /// the sign of the delta for a zero-length window.
    pub fn best_effort_rate(&self) -> Option<f32> {
        match self {
            FlowError::Numeric(_) => None,
            FlowError::ZeroElapsed { delta } => Some(f32::INFINITY.copysign(*delta)),
        }
    }
}

impl From<NumericError> for FlowError {
    fn from(e: NumericError) -> Self {
        FlowError::Numeric(e)
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::Numeric(e) => write!(f, "{}", e),
            FlowError::ZeroElapsed { delta } => {
                write!(f, "division by zero: total moved by {} in zero time", delta)
            }
        }
    }
}

impl std::error::Error for FlowError {}

/// Average flow rate between two totals.
///
/// The rate is `(end - start) / elapsed` in total units per caller time unit.
/// A zero-length window with no movement yields a rate of zero.
///
/// # Errors
/// - `Numeric(RangeError)` if `threshold` is zero or not finite
/// - `Numeric(InvalidValue)` if `elapsed` is not finite, or from the difference
/// - `ZeroElapsed` if `elapsed` is zero but the totals differ
///
/// # Example
/// ```
/// use flow_totalizer::domain::average_flow;
/// use flow_totalizer::numeric::BigFloat;
///
/// let start = BigFloat::from_parts(10, 0.0);
/// let end = BigFloat::from_parts(10, 600.0);
/// assert_eq!(average_flow(&start, &end, 1000.0, 60.0).unwrap(), 10.0);
/// ```
pub fn average_flow(
    total_at_start: &BigFloat,
    total_at_end: &BigFloat,
    threshold: f32,
    elapsed: f32,
) -> Result<f32, FlowError> {
    if !threshold.is_finite() || threshold == 0.0 {
        return Err(NumericError::RangeError.into());
    }
    if !elapsed.is_finite() {
        return Err(NumericError::InvalidValue.into());
    }

    let delta = total_at_end
        .difference(total_at_start, threshold)?
        .to_f32(threshold);

    if elapsed != 0.0 {
        Ok(delta / elapsed)
    } else if delta == 0.0 {
        Ok(0.0)
    } else {
        Err(FlowError::ZeroElapsed { delta })
    }
}
