// ============================================================================
// Binary Format Trait
// Abstract interface over fixed-width IEEE 754 binary formats
// ============================================================================

use super::value::FixedPrecisionValue;
use crate::domain::Precision;
use crate::numeric::{ExactDecimal, NumericResult};

/// A fixed-width binary floating-point format the simulator can run in.
///
/// Implementations round every result to the format's representable value
/// set using IEEE 754 round-to-nearest-even.
///
/// # Thread Safety
/// Implementations are plain `Copy` scalars, so accumulation buffers can be
/// handed to worker threads freely.
pub trait BinaryFormat: Copy + Send + Sync + 'static {
    /// Precision class this format implements.
    const PRECISION: Precision;

    /// Significand width in bits, including the implicit leading bit.
    const SIGNIFICAND_BITS: u32;

    /// Correctly rounded conversion from an exact decimal.
    ///
    /// Out-of-range magnitudes become infinity (or zero), as the format
    /// defines; this is not an error.
    fn from_exact(value: &ExactDecimal) -> NumericResult<Self>;

    /// One accumulation step: `self + increment`, rounded to the format.
    fn accumulate(self, increment: Self) -> Self;

    /// Whether the value is neither infinite nor NaN.
    fn is_finite_value(self) -> bool;

    /// Tag the raw value with its precision for reporting.
    fn to_fixed(self) -> FixedPrecisionValue;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NumericError;

    // Coarse format for testing the contract: integers only, saturating at 100
    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Centi(u8);

    impl BinaryFormat for Centi {
        const PRECISION: Precision = Precision::Single32;
        const SIGNIFICAND_BITS: u32 = 7;

        fn from_exact(value: &ExactDecimal) -> NumericResult<Self> {
            let parsed: f64 = value
                .to_scientific_literal()
                .parse()
                .map_err(|_| NumericError::InvalidInput)?;
            Ok(Centi(parsed.round().clamp(0.0, 100.0) as u8))
        }

        fn accumulate(self, increment: Self) -> Self {
            Centi(self.0.saturating_add(increment.0).min(100))
        }

        fn is_finite_value(self) -> bool {
            self.0 < 100
        }

        fn to_fixed(self) -> FixedPrecisionValue {
            FixedPrecisionValue::from_f32(self.0 as f32)
        }
    }

    fn run<F: BinaryFormat>(start: F, step: F, times: usize) -> F {
        (0..times).fold(start, |acc, _| acc.accumulate(step))
    }

    #[test]
    fn test_generic_accumulation_through_trait() {
        let start = Centi::from_exact(&"90.4".parse().unwrap()).unwrap();
        let step = Centi::from_exact(&"3".parse().unwrap()).unwrap();
        assert_eq!(start, Centi(90));
        assert_eq!(run(start, step, 2), Centi(96));
        assert!(!run(start, step, 5).is_finite_value());
    }
}
