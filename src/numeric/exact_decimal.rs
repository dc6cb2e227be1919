// ============================================================================
// Exact Decimal
// Arbitrary-precision decimal arithmetic with explicit working precision
// ============================================================================

use super::errors::{NumericError, NumericResult};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};
use std::cmp::Ordering;
use std::fmt;

/// Largest accepted decimal exponent magnitude when parsing.
///
/// Wide enough to cover every finite IEEE 754 double (down to the smallest
/// subnormal, ~4.9e-324) with room to spare.
pub const MAX_EXPONENT: i64 = 4096;

/// Arbitrary-precision decimal number.
///
/// Stores `mantissa × 10^-scale` with an unbounded integer mantissa.
/// Values are kept normalized (no trailing zeros in the mantissa, zero is
/// `0 × 10^0`), so structural equality is numeric equality.
///
/// Parsing and conversion from binary floating point are exact. Arithmetic
/// takes an explicit working precision (significant digits) and rounds the
/// result half-to-even.
///
/// # Example
/// ```
/// use accumulation_drift::numeric::ExactDecimal;
///
/// let base: ExactDecimal = "10000000.0".parse().unwrap();
/// let step: ExactDecimal = "0.01".parse().unwrap();
/// let sum = base.add_rounded(&step, 50);
/// assert_eq!(sum.to_string(), "10000000.01");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ExactDecimal {
    mantissa: BigInt,
    scale: i64,
}

// ============================================================================
// Digit Helpers
// ============================================================================

fn pow10(n: u64) -> BigUint {
    BigUint::from(10u32).pow(n as u32)
}

fn digit_count(value: &BigUint) -> u64 {
    value.to_str_radix(10).len() as u64
}

/// Drop `count` trailing decimal digits, rounding half-to-even.
///
/// `sticky` marks a non-zero remainder already discarded below `value`.
fn shed_digits(value: &BigUint, count: u64, sticky: bool) -> BigUint {
    if count == 0 {
        return value.clone();
    }
    let divisor = pow10(count);
    let quotient = value / &divisor;
    let remainder = value % &divisor;
    let twice = remainder << 1usize;

    let round_up = match twice.cmp(&divisor) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => sticky || !(&quotient & &BigUint::one()).is_zero(),
    };

    if round_up {
        quotient + BigUint::one()
    } else {
        quotient
    }
}

impl ExactDecimal {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Zero.
    pub fn zero() -> Self {
        Self {
            mantissa: BigInt::zero(),
            scale: 0,
        }
    }

    /// Create `mantissa × 10^-scale`, like `rust_decimal::Decimal::new`.
    ///
    /// ```
    /// use accumulation_drift::numeric::ExactDecimal;
    ///
    /// assert_eq!(ExactDecimal::new(1, 2).to_string(), "0.01");
    /// ```
    pub fn new(mantissa: i64, scale: i64) -> Self {
        Self::from_parts(mantissa < 0, BigUint::from(mantissa.unsigned_abs()), scale)
    }

    /// Build from sign, magnitude and scale, normalizing the result.
    fn from_parts(negative: bool, magnitude: BigUint, scale: i64) -> Self {
        if magnitude.is_zero() {
            return Self::zero();
        }

        let ten = BigUint::from(10u32);
        let mut magnitude = magnitude;
        let mut scale = scale;
        while (&magnitude % &ten).is_zero() {
            magnitude /= &ten;
            scale -= 1;
        }

        let sign = if negative { Sign::Minus } else { Sign::Plus };
        Self {
            mantissa: BigInt::from_biguint(sign, magnitude),
            scale,
        }
    }

    /// Round a raw (sign, magnitude, scale) triple to `precision` significant digits.
    fn rounded_parts(
        negative: bool,
        magnitude: BigUint,
        scale: i64,
        precision: u32,
        sticky: bool,
    ) -> Self {
        let digits = digit_count(&magnitude);
        if digits <= precision as u64 {
            return Self::from_parts(negative, magnitude, scale);
        }
        let excess = digits - precision as u64;
        let kept = shed_digits(&magnitude, excess, sticky);
        Self::from_parts(negative, kept, scale - excess as i64)
    }

    /// Exact decimal expansion of a finite IEEE 754 double.
    ///
    /// Every finite binary value is `m × 2^e`, which is a terminating decimal;
    /// no digits are lost. Single-precision values widen to `f64` losslessly.
    ///
    /// # Errors
    /// Returns `NonFinite` for infinities and NaN.
    pub fn from_binary64(value: f64) -> NumericResult<Self> {
        if !value.is_finite() {
            return Err(NumericError::NonFinite);
        }

        let bits = value.to_bits();
        let negative = bits >> 63 == 1;
        let exponent_bits = ((bits >> 52) & 0x7ff) as i64;
        let fraction = bits & ((1u64 << 52) - 1);

        let (significand, exponent) = if exponent_bits == 0 {
            (fraction, -1074)
        } else {
            (fraction | (1u64 << 52), exponent_bits - 1075)
        };

        if significand == 0 {
            return Ok(Self::zero());
        }

        let significand = BigUint::from(significand);
        if exponent >= 0 {
            Ok(Self::from_parts(negative, significand << exponent as usize, 0))
        } else {
            // m × 2^-k == m × 5^k × 10^-k
            let k = (-exponent) as u32;
            Ok(Self::from_parts(
                negative,
                significand * BigUint::from(5u32).pow(k),
                k as i64,
            ))
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Check if value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// Check if value is strictly negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.mantissa.sign() == Sign::Minus
    }

    /// Check if value is strictly positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.mantissa.sign() == Sign::Plus
    }

    /// Number of significant digits held by the mantissa.
    pub fn significant_digits(&self) -> u64 {
        digit_count(self.mantissa.magnitude())
    }

    /// Absolute value (exact).
    pub fn abs(&self) -> Self {
        Self {
            mantissa: BigInt::from_biguint(
                if self.is_zero() { Sign::NoSign } else { Sign::Plus },
                self.mantissa.magnitude().clone(),
            ),
            scale: self.scale,
        }
    }

    /// Negation (exact).
    pub fn negated(&self) -> Self {
        Self {
            mantissa: -self.mantissa.clone(),
            scale: self.scale,
        }
    }

    /// Nearest binary64 value, for plotting. Overflows to infinity.
    pub fn to_f64(&self) -> f64 {
        self.to_scientific_literal().parse().unwrap_or(f64::NAN)
    }

    /// Round to `precision` significant digits, half-to-even.
    pub fn round_to_precision(&self, precision: u32) -> Self {
        Self::rounded_parts(
            self.is_negative(),
            self.mantissa.magnitude().clone(),
            self.scale,
            precision,
            false,
        )
    }

    // ========================================================================
    // Arithmetic Operations
    // ========================================================================

    /// Bring both mantissas to a common scale.
    fn aligned(&self, rhs: &Self) -> (BigInt, BigInt, i64) {
        match self.scale.cmp(&rhs.scale) {
            Ordering::Equal => (self.mantissa.clone(), rhs.mantissa.clone(), self.scale),
            Ordering::Greater => {
                let factor = BigInt::from(pow10((self.scale - rhs.scale) as u64));
                (self.mantissa.clone(), &rhs.mantissa * factor, self.scale)
            },
            Ordering::Less => {
                let factor = BigInt::from(pow10((rhs.scale - self.scale) as u64));
                (&self.mantissa * factor, rhs.mantissa.clone(), rhs.scale)
            },
        }
    }

    fn from_signed(value: BigInt, scale: i64, precision: u32) -> Self {
        Self::rounded_parts(
            value.sign() == Sign::Minus,
            value.magnitude().clone(),
            scale,
            precision,
            false,
        )
    }

    /// Sum rounded to `precision` significant digits.
    pub fn add_rounded(&self, rhs: &Self, precision: u32) -> Self {
        let (a, b, scale) = self.aligned(rhs);
        Self::from_signed(a + b, scale, precision)
    }

    /// Difference rounded to `precision` significant digits.
    pub fn sub_rounded(&self, rhs: &Self, precision: u32) -> Self {
        let (a, b, scale) = self.aligned(rhs);
        Self::from_signed(a - b, scale, precision)
    }

    /// Product rounded to `precision` significant digits.
    pub fn mul_rounded(&self, rhs: &Self, precision: u32) -> Self {
        Self::from_signed(
            &self.mantissa * &rhs.mantissa,
            self.scale + rhs.scale,
            precision,
        )
    }

    /// Quotient rounded to `precision` significant digits.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `rhs` is zero.
    pub fn div_rounded(&self, rhs: &Self, precision: u32) -> NumericResult<Self> {
        if rhs.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(Self::zero());
        }

        let numerator = self.mantissa.magnitude();
        let denominator = rhs.mantissa.magnitude();

        // Shift so the integer quotient carries at least precision + 1 digits
        let shift = (precision as i64 + 2 + digit_count(denominator) as i64
            - digit_count(numerator) as i64)
            .max(0) as u64;
        let scaled = numerator * pow10(shift);
        let quotient = &scaled / denominator;
        let remainder = &scaled % denominator;

        Ok(Self::rounded_parts(
            self.is_negative() != rhs.is_negative(),
            quotient,
            self.scale - rhs.scale + shift as i64,
            precision,
            !remainder.is_zero(),
        ))
    }

    // ========================================================================
    // Formatting
    // ========================================================================

    /// Literal of the form `<mantissa>e<exponent>`, readable by float parsers.
    pub(crate) fn to_scientific_literal(&self) -> String {
        format!("{}e{}", self.mantissa, -self.scale)
    }

    /// Render with exactly `places` fractional digits (half-to-even).
    ///
    /// ```
    /// use accumulation_drift::numeric::ExactDecimal;
    ///
    /// let x: ExactDecimal = "10001000".parse().unwrap();
    /// assert_eq!(x.format_fixed(3), "10001000.000");
    /// ```
    pub fn format_fixed(&self, places: u32) -> String {
        let places_i = places as i64;
        let (magnitude, scale) = if self.scale > places_i {
            let excess = (self.scale - places_i) as u64;
            (shed_digits(self.mantissa.magnitude(), excess, false), places_i)
        } else {
            (self.mantissa.magnitude().clone(), self.scale)
        };

        // Rescale to exactly `places` fractional digits
        let magnitude = if scale < places_i {
            magnitude * pow10((places_i - scale) as u64)
        } else {
            magnitude
        };

        let negative = self.is_negative() && !magnitude.is_zero();
        let digits = magnitude.to_str_radix(10);
        let places = places as usize;
        let body = if places == 0 {
            digits
        } else if digits.len() > places {
            let (int_part, frac_part) = digits.split_at(digits.len() - places);
            format!("{}.{}", int_part, frac_part)
        } else {
            format!("0.{:0>width$}", digits, width = places)
        };

        if negative {
            format!("-{}", body)
        } else {
            body
        }
    }

    /// `format_fixed` with the integer digits grouped in thousands.
    ///
    /// ```
    /// use accumulation_drift::numeric::ExactDecimal;
    ///
    /// let x: ExactDecimal = "10001000".parse().unwrap();
    /// assert_eq!(x.format_grouped(2), "10,001,000.00");
    /// ```
    pub fn format_grouped(&self, places: u32) -> String {
        let fixed = self.format_fixed(places);
        let (sign, unsigned) = match fixed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", fixed.as_str()),
        };
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (unsigned, None),
        };

        let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3);
        grouped.push_str(sign);
        for (index, digit) in int_part.chars().enumerate() {
            if index > 0 && (int_part.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }
        if let Some(frac_part) = frac_part {
            grouped.push('.');
            grouped.push_str(frac_part);
        }
        grouped
    }

    /// Render in scientific notation with `places` digits after the point.
    ///
    /// ```
    /// use accumulation_drift::numeric::ExactDecimal;
    ///
    /// let x: ExactDecimal = "1000".parse().unwrap();
    /// assert_eq!(x.format_scientific(3), "1.000e3");
    /// ```
    pub fn format_scientific(&self, places: u32) -> String {
        if self.is_zero() {
            return if places == 0 {
                "0e0".to_string()
            } else {
                format!("0.{}e0", "0".repeat(places as usize))
            };
        }

        let rounded = self.round_to_precision(places + 1);
        let digits = rounded.mantissa.magnitude().to_str_radix(10);
        let exponent = digits.len() as i64 - 1 - rounded.scale;
        let (lead, tail) = digits.split_at(1);
        let sign = if rounded.is_negative() { "-" } else { "" };

        if places == 0 {
            format!("{}{}e{}", sign, lead, exponent)
        } else {
            format!(
                "{}{}.{:0<width$}e{}",
                sign,
                lead,
                tail,
                exponent,
                width = places as usize
            )
        }
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl Default for ExactDecimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialOrd for ExactDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExactDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.aligned(other);
        a.cmp(&b)
    }
}

impl From<u64> for ExactDecimal {
    fn from(value: u64) -> Self {
        Self::from_parts(false, BigUint::from(value), 0)
    }
}

impl From<i64> for ExactDecimal {
    fn from(value: i64) -> Self {
        Self::from_parts(value < 0, BigUint::from(value.unsigned_abs()), 0)
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Debug for ExactDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExactDecimal({}, mantissa={}, scale={})",
            self, self.mantissa, self.scale
        )
    }
}

impl fmt::Display for ExactDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.magnitude().to_str_radix(10);
        let sign = if self.is_negative() { "-" } else { "" };

        if self.scale <= 0 {
            write!(f, "{}{}{}", sign, digits, "0".repeat((-self.scale) as usize))
        } else if digits.len() as i64 > self.scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - self.scale as usize);
            write!(f, "{}{}.{}", sign, int_part, frac_part)
        } else {
            write!(
                f,
                "{}0.{:0>width$}",
                sign,
                digits,
                width = self.scale as usize
            )
        }
    }
}

// ============================================================================
// Conversion from rust_decimal (for API boundaries)
// ============================================================================

impl From<rust_decimal::Decimal> for ExactDecimal {
    /// Lossless: a `Decimal` is a 96-bit integer over a power of ten.
    fn from(d: rust_decimal::Decimal) -> Self {
        let mantissa = d.mantissa();
        Self::from_parts(
            mantissa < 0,
            BigUint::from(mantissa.unsigned_abs()),
            d.scale() as i64,
        )
    }
}

// ============================================================================
// String Parsing
// ============================================================================

fn all_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}

fn parse_exponent(text: &str) -> NumericResult<i64> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !all_digits(digits) {
        return Err(NumericError::InvalidInput);
    }
    let exponent: i64 = text
        .parse()
        .map_err(|_| NumericError::ExponentOutOfRange)?;
    if exponent.unsigned_abs() > MAX_EXPONENT as u64 {
        return Err(NumericError::ExponentOutOfRange);
    }
    Ok(exponent)
}

impl std::str::FromStr for ExactDecimal {
    type Err = NumericError;

    /// Parse a decimal string without any rounding.
    ///
    /// # Examples
    /// - "10000000.0" -> 10000000
    /// - "-0.01" -> -0.01
    /// - "1.5e-3" -> 0.0015
    /// - "inf", "nan", "1/3", "" -> InvalidInput
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NumericError::InvalidInput);
        }

        let (negative, body) = if let Some(rest) = s.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = s.strip_prefix('+') {
            (false, rest)
        } else {
            (false, s)
        };

        // Split off exponent
        let (coefficient, exponent) = match body.find(['e', 'E']) {
            Some(pos) => (&body[..pos], parse_exponent(&body[pos + 1..])?),
            None => (body, 0),
        };

        // Split on decimal point
        let (int_str, frac_str) = match coefficient.find('.') {
            Some(pos) => (&coefficient[..pos], &coefficient[pos + 1..]),
            None => (coefficient, ""),
        };

        if int_str.is_empty() && frac_str.is_empty() {
            return Err(NumericError::InvalidInput);
        }
        if !all_digits(int_str) || !all_digits(frac_str) {
            return Err(NumericError::InvalidInput);
        }

        let digits = format!("{}{}", int_str, frac_str);
        let magnitude =
            BigUint::parse_bytes(digits.as_bytes(), 10).ok_or(NumericError::InvalidInput)?;

        Ok(Self::from_parts(
            negative,
            magnitude,
            frac_str.len() as i64 - exponent,
        ))
    }
}

// ============================================================================
// Serialization
// ============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for ExactDecimal {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ExactDecimal {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
