// ============================================================================
// BigFloat Accumulator
// Sign-magnitude, mixed-radix accumulator that never loses its sub-unit digits
// ============================================================================

use super::decompose::{equal_with_tolerance, DEFAULT_TOLERANCE};
use super::errors::{NumericError, NumericResult};
use rust_decimal::Decimal;
use std::ops::Neg;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Precision-preserving accumulator.
///
/// Stores a value as `sign(remainder) * (units * threshold + |remainder|)`.
/// The unsigned `units` counter grows with the total while the bounded
/// `remainder` keeps full single-precision resolution, so a small increment
/// is never swallowed by a large total.
///
/// The threshold is not stored: every operation that normalizes takes it as
/// an argument and callers must use the same threshold for the lifetime of
/// an accumulator.
///
/// # Invariants
/// - After every successful operation `|remainder| < threshold`.
/// - The sign of the whole value lives in the sign bit of `remainder`, also
///   when `remainder` is zero. `units` is magnitude only.
///
/// # Example
/// ```
/// use flow_totalizer::numeric::BigFloat;
///
/// let mut total = BigFloat::ZERO;
/// total.add_scalar(999.5, 1000.0).unwrap();
/// total.add_scalar(0.7, 1000.0).unwrap();
/// assert_eq!(total.units(), 1);
/// assert!((total.remainder() - 0.2).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BigFloat {
    units: u32,
    remainder: f32,
}

impl BigFloat {
    /// Zero value
    pub const ZERO: Self = Self {
        units: 0,
        remainder: 0.0,
    };

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from raw parts.
    ///
    /// The parts are taken as-is; pass a remainder already below the
    /// threshold you will operate with.
    #[inline]
    pub const fn from_parts(units: u32, remainder: f32) -> Self {
        Self { units, remainder }
    }

    /// Reset to zero.
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::ZERO;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of whole thresholds accumulated.
    #[inline]
    pub const fn units(&self) -> u32 {
        self.units
    }

    /// Signed sub-threshold amount. Its sign is the sign of the value.
    #[inline]
    pub const fn remainder(&self) -> f32 {
        self.remainder
    }

    /// Sign bit of the value, including a negative zero remainder.
    #[inline]
    pub fn is_sign_negative(&self) -> bool {
        self.remainder.is_sign_negative()
    }

    /// Check if value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.units == 0 && self.remainder == 0.0
    }

    /// Check if value is strictly greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        !self.is_sign_negative() && !self.is_zero()
    }

    /// Check if value is strictly less than zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.is_sign_negative() && !self.is_zero()
    }

    /// Units equal and remainders within [`DEFAULT_TOLERANCE`].
    #[inline]
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.approx_eq_with_tolerance(other, DEFAULT_TOLERANCE)
    }

    /// Units equal and remainders within `tolerance`.
    #[inline]
    pub fn approx_eq_with_tolerance(&self, other: &Self, tolerance: f32) -> bool {
        self.units == other.units && equal_with_tolerance(self.remainder, other.remainder, tolerance)
    }

    // ========================================================================
    // Arithmetic Operations
    // ========================================================================

    /// Add a signed increment, carrying into or borrowing from `units`.
    ///
    /// # Errors
    /// - `InvalidValue` if `delta` is not finite or `threshold` is not a
    ///   finite positive number
    /// - `MathError` if the intermediate remainder is not finite
    /// - `RangeError` if the carry would overflow `units`
    ///
    /// The accumulator is left untouched on every error.
    pub fn add_scalar(&mut self, delta: f32, threshold: f32) -> NumericResult<()> {
        check_threshold(threshold)?;
        if !delta.is_finite() {
            return Err(NumericError::InvalidValue);
        }

        let was_negative = self.is_sign_negative();
        let mut units = self.units;
        let mut remainder = self.remainder + delta;
        if !remainder.is_finite() {
            return Err(NumericError::MathError);
        }

        if remainder == 0.0 {
            // Exact cancellation: whatever units remain keep the old sign
            remainder = with_sign(0.0, was_negative && units > 0);
        } else if remainder.is_sign_negative() != was_negative && units > 0 {
            (units, remainder) = borrow(units, remainder, was_negative, threshold);
        }

        let negative = remainder.is_sign_negative();
        let (units, magnitude) = carry(units, f64::from(remainder.abs()), threshold)?;

        self.units = units;
        self.remainder = with_sign(magnitude, negative && (units > 0 || magnitude > 0.0));
        Ok(())
    }

    /// Compute `self + rhs`.
    ///
    /// # Errors
    /// Same as [`add_scalar`](Self::add_scalar). `RangeError` is also returned
    /// when the summed unit counters overflow.
    pub fn sum(&self, rhs: &Self, threshold: f32) -> NumericResult<Self> {
        check_threshold(threshold)?;

        let (mut result, addend) = if self.is_sign_negative() == rhs.is_sign_negative() {
            let units = self
                .units
                .checked_add(rhs.units)
                .ok_or(NumericError::RangeError)?;
            (Self::from_parts(units, self.remainder), rhs.remainder)
        } else {
            // Walk from the larger unit count back toward zero; the borrow
            // logic in add_scalar handles crossing it.
            let (larger, smaller) = if self.units >= rhs.units {
                (self, rhs)
            } else {
                (rhs, self)
            };
            (
                Self::from_parts(larger.units - smaller.units, larger.remainder),
                smaller.remainder,
            )
        };

        result.add_scalar(addend, threshold)?;
        Ok(result)
    }

    /// Compute `self - rhs`.
    ///
    /// # Errors
    /// Same as [`sum`](Self::sum).
    #[inline]
    pub fn difference(&self, rhs: &Self, threshold: f32) -> NumericResult<Self> {
        self.sum(&-*rhs, threshold)
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Lossy conversion to a double.
    #[inline]
    pub fn to_f64(&self, threshold: f32) -> f64 {
        let magnitude =
            f64::from(self.units) * f64::from(threshold) + f64::from(self.remainder.abs());
        if self.is_sign_negative() {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Lossy conversion to a float.
    ///
    /// Loses resolution once the magnitude outgrows the f32 mantissa; that
    /// is the point of keeping the accumulator split.
    #[inline]
    pub fn to_f32(&self, threshold: f32) -> f32 {
        self.to_f64(threshold) as f32
    }

    /// Exact decimal readout of the stored binary value.
    ///
    /// # Errors
    /// - `InvalidValue` if the threshold or remainder is not finite
    /// - `RangeError` if the magnitude does not fit a `Decimal`
    pub fn to_decimal(&self, threshold: f32) -> NumericResult<Decimal> {
        let threshold = Decimal::from_f32_retain(threshold).ok_or(NumericError::InvalidValue)?;
        let remainder =
            Decimal::from_f32_retain(self.remainder.abs()).ok_or(NumericError::InvalidValue)?;

        let magnitude = Decimal::from(self.units)
            .checked_mul(threshold)
            .and_then(|m| m.checked_add(remainder))
            .ok_or(NumericError::RangeError)?;

        Ok(if self.is_negative() {
            -magnitude
        } else {
            magnitude
        })
    }
}

// ============================================================================
// Normalization Helpers
// ============================================================================

#[inline]
pub(super) fn check_threshold(threshold: f32) -> NumericResult<()> {
    if threshold.is_finite() && threshold > 0.0 {
        Ok(())
    } else {
        Err(NumericError::InvalidValue)
    }
}

#[inline]
pub(super) fn with_sign(magnitude: f32, negative: bool) -> f32 {
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Borrow whole thresholds from `units` until the remainder is back on the
/// side of zero it started on, or `units` is exhausted.
fn borrow(units: u32, remainder: f32, was_negative: bool, threshold: f32) -> (u32, f32) {
    let overshoot = f64::from(remainder.abs());
    let t = f64::from(threshold);
    let needed = (overshoot / t).ceil();

    if needed <= f64::from(units) {
        let magnitude = (needed * t - overshoot) as f32;
        (units - needed as u32, with_sign(magnitude, was_negative))
    } else {
        // Not enough units: the value crossed zero
        let magnitude = (overshoot - f64::from(units) * t) as f32;
        (0, with_sign(magnitude, !was_negative))
    }
}

/// Add a whole number of carried thresholds to `units`.
#[inline]
pub(super) fn add_units(units: u32, carried: f64) -> NumericResult<u32> {
    if carried <= 0.0 {
        return Ok(units);
    }
    let total = f64::from(units) + carried;
    if total > f64::from(u32::MAX) {
        Err(NumericError::RangeError)
    } else {
        Ok(total as u32)
    }
}

/// Move every whole threshold contained in `magnitude` into `units`.
///
/// `magnitude` must be non-negative; the returned rest is in `[0, t)`.
pub(super) fn fold(units: u32, magnitude: f64, t: f64) -> NumericResult<(u32, f64)> {
    if magnitude < t {
        return Ok((units, magnitude));
    }

    let mut carried = (magnitude / t).floor();
    let mut rest = magnitude - carried * t;
    if rest < 0.0 {
        carried -= 1.0;
        rest += t;
    } else if rest >= t {
        carried += 1.0;
        rest -= t;
    }

    Ok((add_units(units, carried)?, rest))
}

/// [`fold`] followed by narrowing the rest to f32, keeping it below the
/// threshold after rounding.
pub(super) fn carry(units: u32, magnitude: f64, threshold: f32) -> NumericResult<(u32, f32)> {
    let (units, rest) = fold(units, magnitude, f64::from(threshold))?;

    let narrowed = rest as f32;
    if narrowed >= threshold {
        return Ok((add_units(units, 1.0)?, 0.0));
    }
    Ok((units, narrowed))
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl Neg for BigFloat {
    type Output = Self;

    /// Flips the sign bit of the remainder; `units` is unsigned.
    #[inline]
    fn neg(self) -> Self::Output {
        Self::from_parts(self.units, -self.remainder)
    }
}

// ============================================================================
// Tests
// ============================================================================
