// ============================================================================
// Numeric Errors
// Error types for accumulator arithmetic operations
// ============================================================================

use std::fmt;

/// Errors that can occur during accumulator arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// An operand or threshold is NaN, infinite, or otherwise unusable
    InvalidValue,
    /// The result is not finite, or a division by zero was requested
    MathError,
    /// The unit counter would exceed u32::MAX
    RangeError,
    /// Unrecognized totalization mode code
    ModeError,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::InvalidValue => {
                write!(f, "invalid value: operand is not a finite number")
            }
            NumericError::MathError => write!(f, "math error: result is not finite"),
            NumericError::RangeError => {
                write!(f, "range error: unit counter exceeded u32::MAX")
            }
            NumericError::ModeError => write!(f, "unrecognized totalization mode"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;
