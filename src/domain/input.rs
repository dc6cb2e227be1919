// ============================================================================
// Simulation Input
// Validated parameters of one accumulation run
// ============================================================================

use super::config::{Precision, SimulationConfig};
use super::error::{AnalysisResult, SimulationError};
use crate::numeric::ExactDecimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters of one run, checked before any arithmetic happens.
///
/// Construction is the validation step: a `SimulationInput` always holds two
/// real numbers and at least one iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationInput {
    base: ExactDecimal,
    increment: ExactDecimal,
    iterations: u64,
    precision: Precision,
}

fn parse_field(field: &'static str, text: &str) -> AnalysisResult<ExactDecimal> {
    text.parse()
        .map_err(|reason| SimulationError::InvalidNumberFormat {
            field,
            input: text.to_string(),
            reason,
        })
}

impl SimulationInput {
    /// Validate decimal-string inputs.
    ///
    /// # Errors
    /// - `InvalidNumberFormat` if `base` or `increment` does not parse
    /// - `InvalidIterationCount` if `iterations < 1`
    pub fn new(
        base: &str,
        increment: &str,
        iterations: i64,
        precision: Precision,
    ) -> AnalysisResult<Self> {
        let base = parse_field("base", base)?;
        let increment = parse_field("increment", increment)?;
        let iterations = u64::try_from(iterations)
            .ok()
            .filter(|&n| n >= 1)
            .ok_or(SimulationError::InvalidIterationCount {
                requested: iterations,
                limit: None,
            })?;

        Ok(Self {
            base,
            increment,
            iterations,
            precision,
        })
    }

    /// Validate inputs with a textual precision label ("single" | "double").
    pub fn parse(
        base: &str,
        increment: &str,
        iterations: i64,
        precision: &str,
    ) -> AnalysisResult<Self> {
        let input = Self::new(base, increment, iterations, Precision::Single32)?;
        Ok(Self {
            precision: precision.parse()?,
            ..input
        })
    }

    /// Build from already-exact values.
    pub fn from_exact(
        base: ExactDecimal,
        increment: ExactDecimal,
        iterations: u64,
        precision: Precision,
    ) -> AnalysisResult<Self> {
        if iterations == 0 {
            return Err(SimulationError::InvalidIterationCount {
                requested: 0,
                limit: None,
            });
        }
        Ok(Self {
            base,
            increment,
            iterations,
            precision,
        })
    }

    /// The classic drift demonstration: 1e7 + 0.01, one hundred thousand
    /// times, in single precision. 0.01 is below half an ulp of 1e7 in
    /// binary32, so every addition is lost.
    pub fn single_precision_drift() -> Self {
        Self {
            base: ExactDecimal::new(10_000_000, 0),
            increment: ExactDecimal::new(1, 2),
            iterations: 100_000,
            precision: Precision::Single32,
        }
    }

    /// Check the run against the configured cap and `MAX_TRAJECTORY_STEPS`.
    pub fn check_limits(&self, config: &SimulationConfig) -> AnalysisResult<()> {
        let limit = config.iteration_limit();
        if self.iterations > limit {
            return Err(SimulationError::InvalidIterationCount {
                requested: i64::try_from(self.iterations).unwrap_or(i64::MAX),
                limit: Some(limit),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn base(&self) -> &ExactDecimal {
        &self.base
    }

    #[inline]
    pub fn increment(&self) -> &ExactDecimal {
        &self.increment
    }

    #[inline]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    #[inline]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Same run in another format.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }
}
