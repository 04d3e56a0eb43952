// ============================================================================
// Directional Totalization
// Net totals derived from the two directional sub-totals of a bidirectional meter
// ============================================================================

use crate::numeric::{BigFloat, NumericError, NumericResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical flow direction through a bidirectional sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FlowDirection {
    /// Forward flow, A to B
    AToB,
    /// Reverse flow, B to A
    BToA,
}

/// How a net total is derived from the directional sub-totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum TotalizationMode {
    /// Forward sub-total only
    AOnly = 0,
    /// Reverse sub-total only
    BOnly = 1,
    /// Forward minus reverse
    AMinusB = 2,
    /// Reverse minus forward
    BMinusA = 3,
}

impl TryFrom<u8> for TotalizationMode {
    type Error = NumericError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(TotalizationMode::AOnly),
            1 => Ok(TotalizationMode::BOnly),
            2 => Ok(TotalizationMode::AMinusB),
            3 => Ok(TotalizationMode::BMinusA),
            _ => Err(NumericError::ModeError),
        }
    }
}

/// Derive a net total from the A->B and B->A sub-totals.
///
/// # Errors
/// Propagates the errors of [`BigFloat::difference`] for the two
/// subtracting modes.
///
/// # Example
/// ```
/// use flow_totalizer::domain::{combine_directional, TotalizationMode};
/// use flow_totalizer::numeric::BigFloat;
///
/// let a_to_b = BigFloat::from_parts(5, 0.0);
/// let b_to_a = BigFloat::from_parts(2, 0.0);
/// let net = combine_directional(&a_to_b, &b_to_a, TotalizationMode::BMinusA, 1000.0).unwrap();
/// assert_eq!(net.to_f32(1000.0), -3000.0);
/// ```
pub fn combine_directional(
    total_a_to_b: &BigFloat,
    total_b_to_a: &BigFloat,
    mode: TotalizationMode,
    threshold: f32,
) -> NumericResult<BigFloat> {
    match mode {
        TotalizationMode::AOnly => Ok(*total_a_to_b),
        TotalizationMode::BOnly => Ok(*total_b_to_a),
        TotalizationMode::AMinusB => total_a_to_b.difference(total_b_to_a, threshold),
        TotalizationMode::BMinusA => total_b_to_a.difference(total_a_to_b, threshold),
    }
}

/// [`combine_directional`] for a raw mode code as stored in device settings.
///
/// # Errors
/// Returns `ModeError` for codes outside `0..=3`.
pub fn combine_directional_code(
    total_a_to_b: &BigFloat,
    total_b_to_a: &BigFloat,
    mode_code: u8,
    threshold: f32,
) -> NumericResult<BigFloat> {
    let mode = TotalizationMode::try_from(mode_code)?;
    combine_directional(total_a_to_b, total_b_to_a, mode, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: f32 = 1000.0;

    fn totals() -> (BigFloat, BigFloat) {
        (BigFloat::from_parts(5, 0.0), BigFloat::from_parts(2, 0.0))
    }

    #[test]
    fn test_single_direction_modes_copy() {
        let (a, b) = (BigFloat::from_parts(5, 12.5), BigFloat::from_parts(2, 0.75));
        assert_eq!(combine_directional(&a, &b, TotalizationMode::AOnly, T).unwrap(), a);
        assert_eq!(combine_directional(&a, &b, TotalizationMode::BOnly, T).unwrap(), b);
    }

    #[test]
    fn test_a_minus_b() {
        let (a, b) = totals();
        let net = combine_directional(&a, &b, TotalizationMode::AMinusB, T).unwrap();
        assert_eq!(net.units(), 3);
        assert_eq!(net.remainder(), 0.0);
        assert_eq!(net.to_f32(T), 3000.0);
    }

    #[test]
    fn test_b_minus_a() {
        let (a, b) = totals();
        let net = combine_directional(&a, &b, TotalizationMode::BMinusA, T).unwrap();
        assert_eq!(net.units(), 3);
        assert!(net.is_negative());
        assert_eq!(net.to_f32(T), -3000.0);
    }

    #[test]
    fn test_mode_codes() {
        let (a, b) = totals();
        for code in 0u8..=3 {
            let mode = TotalizationMode::try_from(code).unwrap();
            assert_eq!(mode as u8, code);
            assert_eq!(
                combine_directional_code(&a, &b, code, T),
                combine_directional(&a, &b, mode, T)
            );
        }
        assert_eq!(TotalizationMode::try_from(4), Err(NumericError::ModeError));
        assert_eq!(
            combine_directional_code(&a, &b, 0xFF, T),
            Err(NumericError::ModeError)
        );
    }

    #[test]
    fn test_invalid_threshold() {
        let (a, b) = totals();
        assert_eq!(
            combine_directional(&a, &b, TotalizationMode::AMinusB, 0.0),
            Err(NumericError::InvalidValue)
        );
    }
}
