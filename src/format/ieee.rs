// ============================================================================
// IEEE 754 Formats
// binary32 / binary64 implementations of BinaryFormat
// ============================================================================

use super::traits::BinaryFormat;
use super::value::FixedPrecisionValue;
use crate::domain::Precision;
use crate::numeric::{ExactDecimal, NumericError, NumericResult};

/// binary32: 24-bit significand, round-to-nearest-even.
impl BinaryFormat for f32 {
    const PRECISION: Precision = Precision::Single32;
    const SIGNIFICAND_BITS: u32 = f32::MANTISSA_DIGITS;

    fn from_exact(value: &ExactDecimal) -> NumericResult<Self> {
        // Parsed straight from the decimal digits; no detour through f64
        value
            .to_scientific_literal()
            .parse::<f32>()
            .map_err(|_| NumericError::InvalidInput)
    }

    #[inline]
    fn accumulate(self, increment: Self) -> Self {
        self + increment
    }

    #[inline]
    fn is_finite_value(self) -> bool {
        self.is_finite()
    }

    #[inline]
    fn to_fixed(self) -> FixedPrecisionValue {
        FixedPrecisionValue::from_f32(self)
    }
}

/// binary64: 53-bit significand, round-to-nearest-even.
impl BinaryFormat for f64 {
    const PRECISION: Precision = Precision::Double64;
    const SIGNIFICAND_BITS: u32 = f64::MANTISSA_DIGITS;

    fn from_exact(value: &ExactDecimal) -> NumericResult<Self> {
        value
            .to_scientific_literal()
            .parse::<f64>()
            .map_err(|_| NumericError::InvalidInput)
    }

    #[inline]
    fn accumulate(self, increment: Self) -> Self {
        self + increment
    }

    #[inline]
    fn is_finite_value(self) -> bool {
        self.is_finite()
    }

    #[inline]
    fn to_fixed(self) -> FixedPrecisionValue {
        FixedPrecisionValue::from_f64(self)
    }
}
