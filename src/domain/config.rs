// ============================================================================
// Accumulator Configuration
// Threshold, saturation sentinel and comparison tolerance for a totalizer
// ============================================================================

use crate::numeric::{DEFAULT_SATURATION_REMAINDER, DEFAULT_TOLERANCE};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Complete Accumulator Configuration
// ============================================================================

/// Parameters shared by every operation on one logical accumulator.
///
/// The threshold must not change once the accumulator holds a value: units
/// counted against one threshold mean nothing against another.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AccumulatorConfig {
    /// Magnitude at which the remainder rolls over into the unit counter
    pub threshold: f32,

    /// Remainder magnitude written on unit counter saturation
    pub saturation_remainder: f32,

    /// Remainder tolerance for approximate equality
    pub tolerance: f32,
}

impl AccumulatorConfig {
    /// Create a new configuration with the given rollover threshold
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            saturation_remainder: DEFAULT_SATURATION_REMAINDER,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Builder method: Set the saturation sentinel
    pub fn with_saturation_remainder(mut self, sentinel: f32) -> Self {
        self.saturation_remainder = sentinel;
        self
    }

    /// Builder method: Set the equality tolerance
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err("Threshold must be a finite positive number".to_string());
        }

        if !self.saturation_remainder.is_finite() || self.saturation_remainder < 0.0 {
            return Err("Saturation remainder must be finite and non-negative".to_string());
        }

        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err("Tolerance must be finite and non-negative".to_string());
        }

        Ok(())
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl AccumulatorConfig {
    /// Custody-transfer style totalizer
    /// - Rolls over every 1 000 000 engineering units
    /// - Saturation sentinel 999 999.99
    pub fn custody_transfer() -> Self {
        Self::new(1_000_000.0)
    }

    /// Small line meter
    /// - Rolls over every 1 000 engineering units
    pub fn small_line() -> Self {
        Self::new(1_000.0)
    }
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self::custody_transfer()
    }
}
