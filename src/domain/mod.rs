// ============================================================================
// Domain Models Module
// Totalization operations built on the accumulator core
// ============================================================================

pub mod config;
pub mod flow;
pub mod totalization;
pub mod totalizer;

pub use config::AccumulatorConfig;
pub use flow::{average_flow, FlowError};
pub use totalization::{
    combine_directional, combine_directional_code, FlowDirection, TotalizationMode,
};
pub use totalizer::{BidirectionalTotalizer, SharedTotalizer, TotalizerSnapshot};
