// ============================================================================
// Simulation Result
// Error samples, magnitudes and the final report of one run
// ============================================================================

use super::config::Precision;
use crate::format::FixedPrecisionValue;
use crate::numeric::ExactDecimal;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Error Magnitude
// ============================================================================

/// Size of a deviation from the exact value.
///
/// Once the accumulator leaves the format's finite range the deviation is no
/// longer a number; those outcomes are carried as-is instead of aborting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ErrorMagnitude {
    /// Non-negative exact decimal
    Finite(ExactDecimal),
    /// Accumulator overflowed to infinity
    Infinite,
    /// Accumulator became NaN
    Undefined,
}

impl ErrorMagnitude {
    pub fn zero() -> Self {
        ErrorMagnitude::Finite(ExactDecimal::zero())
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, ErrorMagnitude::Finite(_))
    }

    /// True only for a finite zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, ErrorMagnitude::Finite(value) if value.is_zero())
    }

    pub fn as_finite(&self) -> Option<&ExactDecimal> {
        match self {
            ErrorMagnitude::Finite(value) => Some(value),
            _ => None,
        }
    }

    /// Nearest `f64`, for plotting.
    pub fn to_f64(&self) -> f64 {
        match self {
            ErrorMagnitude::Finite(value) => value.to_f64(),
            ErrorMagnitude::Infinite => f64::INFINITY,
            ErrorMagnitude::Undefined => f64::NAN,
        }
    }
}

impl fmt::Display for ErrorMagnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMagnitude::Finite(value) => write!(f, "{}", value),
            ErrorMagnitude::Infinite => write!(f, "inf"),
            ErrorMagnitude::Undefined => write!(f, "NaN"),
        }
    }
}

// ============================================================================
// Error Sample
// ============================================================================

/// Absolute error after one addition
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ErrorSample {
    /// 1-based addition count
    pub step: u64,
    /// |accumulator - exact partial sum|
    pub absolute_error: ErrorMagnitude,
}

// ============================================================================
// Simulation Result
// ============================================================================

/// Outcome of one accumulation run
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationResult {
    /// Format the accumulation ran in
    pub precision: Precision,

    /// Number of additions performed
    pub iterations: u64,

    /// base + iterations * increment, in exact decimal
    pub expected: ExactDecimal,

    /// Final accumulator value
    pub actual: FixedPrecisionValue,

    /// |actual - expected|
    pub absolute_error: ErrorMagnitude,

    /// absolute_error / |expected| * 100, or 0 when expected is 0
    pub relative_error_percent: ErrorMagnitude,

    /// One sample per addition, in step order
    pub trajectory: Vec<ErrorSample>,

    /// First step at which the accumulator was infinite or NaN
    pub first_overflow_step: Option<u64>,
}

impl SimulationResult {
    /// Whether `relative_error_percent` is a real ratio.
    ///
    /// When the exact result is zero the ratio is undefined and the reported
    /// percentage is 0 by convention.
    pub fn is_relative_error_defined(&self) -> bool {
        !self.expected.is_zero()
    }

    /// Whether the accumulator left the format's finite range.
    pub fn overflowed(&self) -> bool {
        self.first_overflow_step.is_some()
    }

    /// Sample with the largest finite error (earliest on ties).
    pub fn peak_error(&self) -> Option<&ErrorSample> {
        let mut peak: Option<(&ErrorSample, &ExactDecimal)> = None;
        for sample in &self.trajectory {
            if let Some(error) = sample.absolute_error.as_finite() {
                if peak.map_or(true, |(_, best)| error > best) {
                    peak = Some((sample, error));
                }
            }
        }
        peak.map(|(sample, _)| sample)
    }

    /// (step, error) pairs for plotting.
    pub fn plot_series(&self) -> Vec<(u64, f64)> {
        self.trajectory
            .iter()
            .map(|sample| (sample.step, sample.absolute_error.to_f64()))
            .collect()
    }
}
