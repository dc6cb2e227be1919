// ============================================================================
// Numeric Module
// Arbitrary-precision decimal arithmetic used as ground truth
// ============================================================================
//
// This module provides:
// - ExactDecimal: sign-magnitude decimal (BigInt mantissa × 10^-scale)
// - NumericError: Error types for parsing and arithmetic
//
// Design principles:
// - No floating-point operations on the exact side
// - Parsing and binary expansion never round
// - Arithmetic rounds to an explicit working precision (half-even)
// - All fallible operations return Result (no panics)

mod errors;
mod exact_decimal;

pub use errors::{NumericError, NumericResult};
pub use exact_decimal::{ExactDecimal, MAX_EXPONENT};
