// ============================================================================
// Fixed-Precision Value
// A binary floating-point value tagged with its format
// ============================================================================

use crate::domain::Precision;
use crate::numeric::{ExactDecimal, NumericResult};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The simulator's accumulator value, stored as raw IEEE 754 bits.
///
/// Equality is bit identity, so two runs agree only if every rounding
/// decision agreed. Single-precision values occupy the low 32 bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixedPrecisionValue {
    precision: Precision,
    bits: u64,
}

impl FixedPrecisionValue {
    /// Wrap a binary32 value.
    #[inline]
    pub fn from_f32(value: f32) -> Self {
        Self {
            precision: Precision::Single32,
            bits: value.to_bits() as u64,
        }
    }

    /// Wrap a binary64 value.
    #[inline]
    pub fn from_f64(value: f64) -> Self {
        Self {
            precision: Precision::Double64,
            bits: value.to_bits(),
        }
    }

    #[inline]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Raw IEEE 754 bit pattern.
    #[inline]
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// The value as binary32, if it is one.
    pub fn as_f32(&self) -> Option<f32> {
        match self.precision {
            Precision::Single32 => Some(f32::from_bits(self.bits as u32)),
            Precision::Double64 => None,
        }
    }

    /// Widen to binary64. Lossless for both formats.
    pub fn to_f64(&self) -> f64 {
        match self.precision {
            Precision::Single32 => f32::from_bits(self.bits as u32) as f64,
            Precision::Double64 => f64::from_bits(self.bits),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.to_f64().is_finite()
    }

    pub fn is_infinite(&self) -> bool {
        self.to_f64().is_infinite()
    }

    pub fn is_nan(&self) -> bool {
        self.to_f64().is_nan()
    }

    /// Exact decimal expansion of the stored binary value.
    ///
    /// This is the full expansion, not a display-rounded string: binary32
    /// `0.01` expands to `0.00999999977648258209228515625`.
    ///
    /// # Errors
    /// Returns `NonFinite` for infinities and NaN.
    pub fn to_exact(&self) -> NumericResult<ExactDecimal> {
        ExactDecimal::from_binary64(self.to_f64())
    }

    /// Exact value rounded to `places` fractional digits.
    ///
    /// Non-finite values render as `inf`, `-inf` or `NaN`.
    pub fn format_fixed(&self, places: u32) -> String {
        self.render(places, ExactDecimal::format_fixed)
    }

    /// Like `format_fixed`, with thousands separators.
    pub fn format_grouped(&self, places: u32) -> String {
        self.render(places, ExactDecimal::format_grouped)
    }

    fn render(&self, places: u32, format: fn(&ExactDecimal, u32) -> String) -> String {
        match self.to_exact() {
            Ok(exact) => format(&exact, places),
            Err(_) if self.is_nan() => "NaN".to_string(),
            Err(_) if self.to_f64() > 0.0 => "inf".to_string(),
            Err(_) => "-inf".to_string(),
        }
    }
}

impl fmt::Debug for FixedPrecisionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FixedPrecisionValue<{}>({}, bits={:#x})",
            self.precision.type_name(),
            self,
            self.bits
        )
    }
}

impl fmt::Display for FixedPrecisionValue {
    /// Shortest text that reads back to the same value in its own width.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.precision {
            Precision::Single32 => write!(f, "{}", f32::from_bits(self.bits as u32)),
            Precision::Double64 => write!(f, "{}", f64::from_bits(self.bits)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NumericError;

    #[test]
    fn test_single_round_trip() {
        let value = FixedPrecisionValue::from_f32(0.01);
        assert_eq!(value.precision(), Precision::Single32);
        assert_eq!(value.as_f32(), Some(0.01f32));
        assert_eq!(value.to_string(), "0.01");
        assert_eq!(value.bits(), 0.01f32.to_bits() as u64);
    }

    #[test]
    fn test_fixed_place_rendering() {
        let value = FixedPrecisionValue::from_f32(1.0e7);
        assert_eq!(value.format_fixed(15), "10000000.000000000000000");
        assert_eq!(value.format_grouped(15), "10,000,000.000000000000000");

        // Shows the stored binary value, not the shortest round-trip text
        let value = FixedPrecisionValue::from_f32(0.01);
        assert_eq!(value.format_fixed(15), "0.009999999776483");

        assert_eq!(FixedPrecisionValue::from_f64(f64::INFINITY).format_fixed(3), "inf");
        assert_eq!(
            FixedPrecisionValue::from_f32(f32::NEG_INFINITY).format_grouped(3),
            "-inf"
        );
        assert_eq!(FixedPrecisionValue::from_f64(f64::NAN).format_fixed(3), "NaN");
    }

    #[test]
    fn test_exact_expansion_is_not_display_rounded() {
        let value = FixedPrecisionValue::from_f32(0.01);
        assert_eq!(
            value.to_exact().unwrap().to_string(),
            "0.00999999977648258209228515625"
        );

        let value = FixedPrecisionValue::from_f64(0.01);
        assert_ne!(value.to_exact().unwrap(), "0.01".parse().unwrap());
    }

    #[test]
    fn test_special_values() {
        let inf = FixedPrecisionValue::from_f32(f32::INFINITY);
        assert!(inf.is_infinite());
        assert!(!inf.is_finite());
        assert_eq!(inf.to_exact(), Err(NumericError::NonFinite));

        let nan = FixedPrecisionValue::from_f64(f64::NAN);
        assert!(nan.is_nan());
        assert_eq!(nan.as_f32(), None);
    }

    #[test]
    fn test_bit_identity_equality() {
        assert_eq!(
            FixedPrecisionValue::from_f64(1.0),
            FixedPrecisionValue::from_f64(1.0)
        );
        // Same numeric value, different formats
        assert_ne!(
            FixedPrecisionValue::from_f32(1.0),
            FixedPrecisionValue::from_f64(1.0)
        );
        assert_ne!(
            FixedPrecisionValue::from_f64(0.0),
            FixedPrecisionValue::from_f64(-0.0)
        );
    }
}
