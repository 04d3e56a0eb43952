// ============================================================================
// Event Handler Interface
// Defines the contract for handling totalizer events
// ============================================================================

use crate::domain::FlowDirection;
use crate::numeric::NumericError;
use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by a totalizer
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TotalizerEvent {
    /// A directional sub-total rolled over into a new unit
    UnitRollover {
        direction: FlowDirection,
        units: u32,
        timestamp: DateTime<Utc>,
    },

    /// An increment could not be applied; the sub-total is unchanged
    IncrementRejected {
        direction: FlowDirection,
        delta: f32,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// A sub-total saturated while being rescaled
    Saturated {
        direction: FlowDirection,
        timestamp: DateTime<Utc>,
    },

    /// Both sub-totals were cleared
    Reset { timestamp: DateTime<Utc> },
}

impl TotalizerEvent {
    pub(crate) fn rejected(direction: FlowDirection, delta: f32, error: NumericError) -> Self {
        TotalizerEvent::IncrementRejected {
            direction,
            delta,
            reason: error.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Event handler trait for processing totalizer events
/// Implementations can handle logging, alarms, notifications, etc.
pub trait EventHandler: Send + Sync {
    /// Handle a totalizer event
    fn on_event(&self, event: TotalizerEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<TotalizerEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: TotalizerEvent) {
        // Do nothing
    }
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: TotalizerEvent) {
        match &event {
            TotalizerEvent::IncrementRejected {
                direction,
                delta,
                reason,
                ..
            } => {
                tracing::warn!(?direction, delta, %reason, "Totalizer increment rejected");
            }
            TotalizerEvent::Saturated { direction, .. } => {
                tracing::warn!(?direction, "Totalizer sub-total saturated");
            }
            _ => tracing::debug!("Totalizer event: {:?}", event),
        }
    }
}
