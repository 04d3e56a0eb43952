// ============================================================================
// Affine Transform
// acc = acc * angular + linear without flattening the accumulator to a float
// ============================================================================

use super::big_float::{carry, check_threshold, fold, with_sign, BigFloat};
use super::decompose::split_f64;
use super::errors::{NumericError, NumericResult};

/// Remainder written into a saturated accumulator.
///
/// Deliberately outside any sensible threshold so alarm consumers can spot it.
pub const DEFAULT_SATURATION_REMAINDER: f32 = 999_999.99;

impl BigFloat {
    /// Compute `self * angular + linear` in place.
    ///
    /// Saturates to [`DEFAULT_SATURATION_REMAINDER`] on overflow; see
    /// [`affine_transform_saturating`](Self::affine_transform_saturating).
    #[inline]
    pub fn affine_transform(&mut self, angular: f32, linear: f32, threshold: f32) -> NumericResult<()> {
        self.affine_transform_saturating(angular, linear, threshold, DEFAULT_SATURATION_REMAINDER)
    }

    /// Compute `self * angular + linear` in place.
    ///
    /// The multiplication is done schoolbook style on the integer and
    /// fractional parts of both the accumulator and `angular`, folding whole
    /// thresholds into `units` after every partial product so no
    /// intermediate grows beyond what a double holds exactly.
    ///
    /// # Errors
    /// - `InvalidValue` if `angular`, `linear` or `threshold` is unusable; the
    ///   accumulator is untouched
    /// - `RangeError` if `units` would exceed `u32::MAX`; the accumulator is
    ///   set to `units = u32::MAX`, `|remainder| = saturation_remainder`
    ///   with the sign of the product
    pub fn affine_transform_saturating(
        &mut self,
        angular: f32,
        linear: f32,
        threshold: f32,
        saturation_remainder: f32,
    ) -> NumericResult<()> {
        check_threshold(threshold)?;
        if !angular.is_finite() || !linear.is_finite() {
            return Err(NumericError::InvalidValue);
        }

        let negative = self.is_sign_negative() ^ angular.is_sign_negative();
        let result = self
            .magnitude_product(angular.abs(), threshold)
            .and_then(|(units, magnitude)| {
                let mut product = BigFloat::from_parts(units, with_sign(magnitude, negative));
                product.add_scalar(linear, threshold)?;
                Ok(product)
            });

        match result {
            Ok(product) => {
                *self = product;
                Ok(())
            }
            Err(NumericError::RangeError) => {
                tracing::warn!(
                    units = self.units(),
                    angular,
                    linear,
                    "accumulator saturated during affine transform"
                );
                *self = BigFloat::from_parts(u32::MAX, with_sign(saturation_remainder, negative));
                Err(NumericError::RangeError)
            }
            Err(e) => Err(e),
        }
    }

    /// Copy `src` scaled by `factor` into `self`.
    ///
    /// On `InvalidValue` `self` keeps its previous value; on `RangeError` it
    /// receives the saturated result.
    pub fn scale_from(&mut self, src: &BigFloat, factor: f32, threshold: f32) -> NumericResult<()> {
        let mut scaled = *src;
        let result = scaled.affine_transform(factor, 0.0, threshold);
        if !matches!(result, Err(NumericError::InvalidValue)) {
            *self = scaled;
        }
        result
    }

    /// `|self| * factor` as `(units, remainder magnitude)`, `factor >= 0`.
    fn magnitude_product(&self, factor: f32, threshold: f32) -> NumericResult<(u32, f32)> {
        let t = f64::from(threshold);
        let (factor_int, factor_frac) = split_f64(f64::from(factor))?;

        // units * factor: the integer product is exact in u64, the
        // fractional product spills a sub-unit part into the remainder
        let (spilled_units, spilled_frac) = split_f64(f64::from(self.units()) * factor_frac)?;
        let units = u64::from(self.units())
            .checked_mul(factor_int)
            .and_then(|u| u.checked_add(spilled_units))
            .and_then(|u| u32::try_from(u).ok())
            .ok_or(NumericError::RangeError)?;

        // |remainder| * factor, folded after every partial product
        let (rem_int, rem_frac) = split_f64(f64::from(self.remainder().abs()))?;
        let rem_int = rem_int as f64;
        let factor_int = factor_int as f64;
        let partials = [
            rem_int * factor_int,
            rem_int * factor_frac,
            rem_frac * factor_int,
            rem_frac * factor_frac,
            spilled_frac * t,
        ];

        let mut units = units;
        let mut running = 0.0f64;
        for partial in partials {
            (units, running) = fold(units, running + partial, t)?;
        }

        carry(units, running, threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::equal_with_tolerance;

    const T: f32 = 1000.0;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            equal_with_tolerance(actual, expected, 1e-3),
            "{} != {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_identity_transform() {
        let mut x = BigFloat::from_parts(4_000_000, 123.456);
        let before = x;
        x.affine_transform(1.0, 0.0, T).unwrap();
        assert_eq!(x, before);
    }

    #[test]
    fn test_fractional_factor() {
        // 2500 * 1.5 = 3750
        let mut x = BigFloat::from_parts(2, 500.0);
        x.affine_transform(1.5, 0.0, T).unwrap();
        assert_eq!(x.units(), 3);
        assert_close(x.remainder(), 750.0);
    }

    #[test]
    fn test_fractional_units_spill_into_remainder() {
        // 3000 * 0.5 = 1500
        let mut x = BigFloat::from_parts(3, 0.0);
        x.affine_transform(0.5, 0.0, T).unwrap();
        assert_eq!(x.units(), 1);
        assert_close(x.remainder(), 500.0);
    }

    #[test]
    fn test_halving_keeps_sub_unit_digits() {
        let mut x = BigFloat::from_parts(4_000_000, 123.456);
        x.affine_transform(0.5, 0.0, T).unwrap();
        assert_eq!(x.units(), 2_000_000);
        assert_close(x.remainder(), 61.728);
    }

    #[test]
    fn test_offset() {
        // 1000.25 * 2 - 0.5 = 2000
        let mut x = BigFloat::from_parts(1, 0.25);
        x.affine_transform(2.0, -0.5, T).unwrap();
        assert_eq!(x.units(), 2);
        assert_eq!(x.remainder(), 0.0);
    }

    #[test]
    fn test_negative_factor_flips_sign() {
        let mut x = BigFloat::from_parts(1, 250.0);
        x.affine_transform(-2.0, 0.0, T).unwrap();
        assert_eq!(x.units(), 2);
        assert_close(x.remainder(), -500.0);

        x.affine_transform(-1.0, 0.0, T).unwrap();
        assert_close(x.to_f32(T), 2500.0);
    }

    #[test]
    fn test_zero_factor() {
        let mut x = BigFloat::from_parts(12, -3.5);
        x.affine_transform(0.0, 7.0, T).unwrap();
        assert_eq!(x.units(), 0);
        assert_close(x.remainder(), 7.0);
    }

    #[test]
    fn test_invalid_operands_do_not_mutate() {
        let mut x = BigFloat::from_parts(2, 1.0);
        assert_eq!(x.affine_transform(f32::NAN, 0.0, T), Err(NumericError::InvalidValue));
        assert_eq!(x.affine_transform(1.0, f32::INFINITY, T), Err(NumericError::InvalidValue));
        assert_eq!(x.affine_transform(1.0, 0.0, 0.0), Err(NumericError::InvalidValue));
        assert_eq!(x, BigFloat::from_parts(2, 1.0));
    }

    #[test]
    fn test_overflow_saturates() {
        let mut x = BigFloat::from_parts(3_000_000_000, 0.0);
        assert_eq!(x.affine_transform(2.0, 0.0, T), Err(NumericError::RangeError));
        assert_eq!(x.units(), 0xFFFF_FFFF);
        assert_eq!(x.remainder().abs(), DEFAULT_SATURATION_REMAINDER);
        assert!(!x.is_sign_negative());
    }

    #[test]
    fn test_overflow_saturates_with_product_sign() {
        let mut x = BigFloat::from_parts(3_000_000_000, -1.0);
        assert_eq!(x.affine_transform(2.0, 0.0, T), Err(NumericError::RangeError));
        assert_eq!(x.remainder(), -DEFAULT_SATURATION_REMAINDER);

        let mut y = BigFloat::from_parts(u32::MAX, 0.0);
        assert_eq!(
            y.affine_transform_saturating(-1.5, 0.0, T, 9_999.0),
            Err(NumericError::RangeError)
        );
        assert_eq!(y.units(), u32::MAX);
        assert_eq!(y.remainder(), -9_999.0);
    }

    #[test]
    fn test_offset_overflow_saturates() {
        // The product fits, the offset carries the counter over
        let mut x = BigFloat::from_parts(u32::MAX, 999.0);
        assert_eq!(x.affine_transform(1.0, 0.0, T), Ok(()));
        assert_eq!(x.affine_transform(1.0, 5.0, T), Err(NumericError::RangeError));
        assert_eq!(x.units(), u32::MAX);
        assert_eq!(x.remainder(), DEFAULT_SATURATION_REMAINDER);
    }

    #[test]
    fn test_scale_from() {
        let src = BigFloat::from_parts(10, 0.0);
        let mut dst = BigFloat::ZERO;
        dst.scale_from(&src, 0.25, T).unwrap();
        assert_eq!(dst.units(), 2);
        assert_close(dst.remainder(), 500.0);
        assert_eq!(src, BigFloat::from_parts(10, 0.0));

        let before = dst;
        assert_eq!(dst.scale_from(&src, f32::NAN, T), Err(NumericError::InvalidValue));
        assert_eq!(dst, before);
    }
}
