// ============================================================================
// Bidirectional Totalizer
// Two directional sub-totals fed by a direction-sensing flow sensor
// ============================================================================

use super::config::AccumulatorConfig;
use super::flow::{average_flow, FlowError};
use super::totalization::{combine_directional, FlowDirection, TotalizationMode};
use crate::interfaces::{EventHandler, TotalizerEvent};
use crate::numeric::{BigFloat, NumericError, NumericResult};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Totalizer shared between tasks; access is serialized by the mutex.
pub type SharedTotalizer = Arc<Mutex<BidirectionalTotalizer>>;

/// Point-in-time copy of both sub-totals.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TotalizerSnapshot {
    /// A->B sub-total
    pub forward: BigFloat,
    /// B->A sub-total
    pub reverse: BigFloat,
    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,
}

impl TotalizerSnapshot {
    /// Net total of this snapshot under `mode`.
    pub fn net(&self, mode: TotalizationMode, threshold: f32) -> NumericResult<BigFloat> {
        combine_directional(&self.forward, &self.reverse, mode, threshold)
    }

    /// Average flow per second between this snapshot and a later one.
    pub fn average_flow_to(
        &self,
        later: &TotalizerSnapshot,
        mode: TotalizationMode,
        threshold: f32,
    ) -> Result<f32, FlowError> {
        let start = self.net(mode, threshold)?;
        let end = later.net(mode, threshold)?;
        let elapsed = (later.taken_at - self.taken_at).num_milliseconds() as f32 / 1000.0;
        average_flow(&start, &end, threshold, elapsed)
    }
}

/// Totalizer for a bidirectional meter.
///
/// Forward flow accumulates into the A->B sub-total and reverse flow, as a
/// magnitude, into the B->A sub-total. Net totals are derived on demand with
/// a [`TotalizationMode`].
///
/// # Example
/// ```
/// use flow_totalizer::prelude::*;
/// use std::sync::Arc;
///
/// let mut totalizer =
///     BidirectionalTotalizer::new(AccumulatorConfig::small_line(), Arc::new(NoOpEventHandler))
///         .unwrap();
/// totalizer.record(1500.0).unwrap();
/// totalizer.record(-250.0).unwrap();
/// assert_eq!(totalizer.net_f32(TotalizationMode::AMinusB).unwrap(), 1250.0);
/// ```
pub struct BidirectionalTotalizer {
    config: AccumulatorConfig,
    forward: BigFloat,
    reverse: BigFloat,
    event_handler: Arc<dyn EventHandler>,
}

impl BidirectionalTotalizer {
    /// Create a zeroed totalizer.
    pub fn new(
        config: AccumulatorConfig,
        event_handler: Arc<dyn EventHandler>,
    ) -> Result<Self, String> {
        config.validate()?;
        Ok(Self {
            config,
            forward: BigFloat::ZERO,
            reverse: BigFloat::ZERO,
            event_handler,
        })
    }

    pub fn config(&self) -> &AccumulatorConfig {
        &self.config
    }

    /// A->B sub-total
    pub fn forward(&self) -> BigFloat {
        self.forward
    }

    /// B->A sub-total
    pub fn reverse(&self) -> BigFloat {
        self.reverse
    }

    pub fn total(&self, direction: FlowDirection) -> BigFloat {
        match direction {
            FlowDirection::AToB => self.forward,
            FlowDirection::BToA => self.reverse,
        }
    }

    fn total_mut(&mut self, direction: FlowDirection) -> &mut BigFloat {
        match direction {
            FlowDirection::AToB => &mut self.forward,
            FlowDirection::BToA => &mut self.reverse,
        }
    }

    /// Record a signed flow increment; the sign picks the direction.
    ///
    /// # Errors
    /// `InvalidValue` for a non-finite increment, `RangeError` if the
    /// sub-total is full. Rejected increments are reported to the event
    /// handler and leave the sub-totals unchanged.
    pub fn record(&mut self, delta: f32) -> NumericResult<()> {
        let direction = if delta.is_sign_negative() {
            FlowDirection::BToA
        } else {
            FlowDirection::AToB
        };
        if delta == 0.0 {
            return Ok(());
        }
        self.record_directional(direction, delta.abs())
    }

    /// Record an increment of `amount` (as a magnitude) in `direction`.
    pub fn record_directional(&mut self, direction: FlowDirection, amount: f32) -> NumericResult<()> {
        let threshold = self.config.threshold;
        let amount = amount.abs();

        let total = self.total_mut(direction);
        let units_before = total.units();
        let result = total.add_scalar(amount, threshold);
        let units_after = total.units();

        match result {
            Ok(()) => {
                if units_after > units_before {
                    self.event_handler.on_event(TotalizerEvent::UnitRollover {
                        direction,
                        units: units_after,
                        timestamp: Utc::now(),
                    });
                }
                Ok(())
            }
            Err(e) => {
                self.event_handler
                    .on_event(TotalizerEvent::rejected(direction, amount, e));
                Err(e)
            }
        }
    }

    /// Rescale both sub-totals by a meter-factor correction.
    ///
    /// # Errors
    /// `InvalidValue` (nothing changed) if `factor` is negative or not
    /// finite; `RangeError` if a sub-total saturated, which is also reported
    /// to the event handler.
    pub fn rescale(&mut self, factor: f32) -> NumericResult<()> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(NumericError::InvalidValue);
        }

        let AccumulatorConfig {
            threshold,
            saturation_remainder,
            ..
        } = self.config;

        let mut outcome = Ok(());
        for direction in [FlowDirection::AToB, FlowDirection::BToA] {
            let result = self.total_mut(direction).affine_transform_saturating(
                factor,
                0.0,
                threshold,
                saturation_remainder,
            );
            if let Err(e) = result {
                if e == NumericError::RangeError {
                    self.event_handler.on_event(TotalizerEvent::Saturated {
                        direction,
                        timestamp: Utc::now(),
                    });
                }
                outcome = Err(e);
            }
        }
        outcome
    }

    /// Net total under `mode`.
    pub fn net(&self, mode: TotalizationMode) -> NumericResult<BigFloat> {
        combine_directional(&self.forward, &self.reverse, mode, self.config.threshold)
    }

    /// Net total under `mode` as a (lossy) float.
    pub fn net_f32(&self, mode: TotalizationMode) -> NumericResult<f32> {
        Ok(self.net(mode)?.to_f32(self.config.threshold))
    }

    pub fn snapshot(&self, taken_at: DateTime<Utc>) -> TotalizerSnapshot {
        TotalizerSnapshot {
            forward: self.forward,
            reverse: self.reverse,
            taken_at,
        }
    }

    /// Both sub-totals agree with `snapshot` within the configured tolerance.
    pub fn matches_snapshot(&self, snapshot: &TotalizerSnapshot) -> bool {
        let tolerance = self.config.tolerance;
        self.forward
            .approx_eq_with_tolerance(&snapshot.forward, tolerance)
            && self
                .reverse
                .approx_eq_with_tolerance(&snapshot.reverse, tolerance)
    }

    /// Clear both sub-totals.
    pub fn reset(&mut self) {
        self.forward.clear();
        self.reverse.clear();
        self.event_handler.on_event(TotalizerEvent::Reset {
            timestamp: Utc::now(),
        });
    }

    pub fn into_shared(self) -> SharedTotalizer {
        Arc::new(Mutex::new(self))
    }
}
