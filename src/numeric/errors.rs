// ============================================================================
// Numeric Errors
// Error types for exact decimal arithmetic
// ============================================================================

use std::fmt;

/// Errors that can occur while parsing or operating on exact decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// Input string is not a real number
    InvalidInput,
    /// Decimal exponent outside the supported range
    ExponentOutOfRange,
    /// Attempted division by zero
    DivisionByZero,
    /// Binary value is infinite or NaN and has no decimal expansion
    NonFinite,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::InvalidInput => write!(f, "invalid input: not a real number"),
            NumericError::ExponentOutOfRange => {
                write!(f, "exponent out of range: magnitude exceeds supported limit")
            },
            NumericError::DivisionByZero => write!(f, "division by zero"),
            NumericError::NonFinite => {
                write!(f, "non-finite value: infinity or NaN has no decimal expansion")
            },
        }
    }
}

impl std::error::Error for NumericError {}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            NumericError::InvalidInput.to_string(),
            "invalid input: not a real number"
        );
        assert_eq!(NumericError::DivisionByZero.to_string(), "division by zero");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(NumericError::NonFinite, NumericError::NonFinite);
        assert_ne!(NumericError::InvalidInput, NumericError::ExponentOutOfRange);
    }
}
