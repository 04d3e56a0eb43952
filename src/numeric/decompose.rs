// ============================================================================
// Decomposer
// Integer/fraction splitting for single and double precision floats
// ============================================================================

use super::errors::{NumericError, NumericResult};

/// Default tolerance used when comparing accumulator remainders.
pub const DEFAULT_TOLERANCE: f32 = 1e-4;

/// Split a float into its integer magnitude and signed fractional part.
///
/// For finite `x` the result is `(floor(|x|), x - sign(x) * floor(|x|))`:
/// the integer part never carries the sign, the fraction always does.
///
/// Magnitudes above `u32::MAX` saturate the integer part. Infinite input is
/// propagated as `(u32::MAX, x)`; callers that care exclude it beforehand.
///
/// # Errors
/// Returns `InvalidValue` if `x` is NaN.
///
/// # Example
/// ```
/// use flow_totalizer::numeric::split_f32;
///
/// let (int_part, frac_part) = split_f32(-12.25).unwrap();
/// assert_eq!(int_part, 12);
/// assert_eq!(frac_part, -0.25);
/// ```
#[inline]
pub fn split_f32(x: f32) -> NumericResult<(u32, f32)> {
    if x.is_nan() {
        return Err(NumericError::InvalidValue);
    }
    if x.is_infinite() {
        return Ok((u32::MAX, x));
    }
    Ok((x.abs().trunc() as u32, x.fract()))
}

/// Double precision variant of [`split_f32`].
///
/// # Errors
/// Returns `InvalidValue` if `x` is NaN.
#[inline]
pub fn split_f64(x: f64) -> NumericResult<(u64, f64)> {
    if x.is_nan() {
        return Err(NumericError::InvalidValue);
    }
    if x.is_infinite() {
        return Ok((u64::MAX, x));
    }
    Ok((x.abs().trunc() as u64, x.fract()))
}

/// Absolute-difference comparison of two floats.
#[inline]
pub fn equal_with_tolerance(x: f32, y: f32, tolerance: f32) -> bool {
    (x - y).abs() <= tolerance
}
