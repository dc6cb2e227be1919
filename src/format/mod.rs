// ============================================================================
// Format Module
// Fixed-width IEEE 754 binary formats the simulator runs in
//
// This module contains:
// - BinaryFormat: trait over a rounding binary format
// - f32 / f64 implementations (binary32, binary64)
// - FixedPrecisionValue: format-tagged accumulator value for reporting
// ============================================================================

mod ieee;
mod traits;
mod value;

pub use traits::BinaryFormat;
pub use value::FixedPrecisionValue;
