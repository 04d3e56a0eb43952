// ============================================================================
// Numeric Module
// Precision-preserving accumulator arithmetic for flow totalization
// ============================================================================
//
// This module provides:
// - BigFloat: sign-magnitude accumulator split into u32 units + f32 remainder
// - split_f32/split_f64: integer/fraction decomposition
// - NumericError: Error types for accumulator operations
//
// Design principles:
// - The threshold is an argument, never state
// - All arithmetic returns Result (no panics)
// - Operations fail without mutating, except the saturating affine transform
// - No allocation, no locking

mod affine;
mod big_float;
mod decompose;
mod errors;

pub use affine::DEFAULT_SATURATION_REMAINDER;
pub use big_float::BigFloat;
pub use decompose::{equal_with_tolerance, split_f32, split_f64, DEFAULT_TOLERANCE};
pub use errors::{NumericError, NumericResult};
