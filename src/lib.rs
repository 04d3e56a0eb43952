// ============================================================================
// Flow Totalizer Library
// Precision-preserving totalization for flow metering instruments
// ============================================================================

//! # Flow Totalizer
//!
//! Accumulates flow totals for months or years in single precision without
//! ever losing a significant digit of the increments.
//!
//! ## Features
//!
//! - **BigFloat accumulator**: unsigned unit counter plus signed sub-unit
//!   remainder, with carry/borrow addition and a precision-preserving
//!   affine transform
//! - **Directional totalization**: four net-total modes over the A->B and
//!   B->A sub-totals of a bidirectional meter
//! - **Average flow** between two totals with an explicit divide-by-zero signal
//! - **Event hooks** for rollover, rejection and saturation
//!
//! ## Example
//!
//! ```rust
//! use flow_totalizer::prelude::*;
//! use std::sync::Arc;
//!
//! let mut totalizer = BidirectionalTotalizer::new(
//!     AccumulatorConfig::custody_transfer(),
//!     Arc::new(NoOpEventHandler),
//! )
//! .unwrap();
//!
//! // Forward flow
//! totalizer.record(2_500_000.0).unwrap();
//! // Reverse flow
//! totalizer.record(-0.125).unwrap();
//!
//! let net = totalizer.net(TotalizationMode::AMinusB).unwrap();
//! assert_eq!(net.units(), 2);
//! assert_eq!(net.remainder(), 499_999.875);
//! ```

pub mod domain;
pub mod interfaces;
pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        average_flow, combine_directional, AccumulatorConfig, BidirectionalTotalizer,
        FlowDirection, FlowError, SharedTotalizer, TotalizationMode, TotalizerSnapshot,
    };
    pub use crate::interfaces::{
        EventHandler, LoggingEventHandler, NoOpEventHandler, TotalizerEvent,
    };
    pub use crate::numeric::{BigFloat, NumericError, NumericResult};
}
