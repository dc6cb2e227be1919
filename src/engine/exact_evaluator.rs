// ============================================================================
// Exact Evaluator
// Ground-truth partial sums in arbitrary-precision decimal
// ============================================================================

use crate::domain::{AnalysisResult, ErrorMagnitude, SimulationError, MIN_WORKING_PRECISION};
use crate::format::FixedPrecisionValue;
use crate::numeric::ExactDecimal;

/// Decimal arithmetic at a fixed, explicit working precision.
///
/// The precision lives on the instance rather than in any global context,
/// so two evaluators with different settings can coexist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactEvaluator {
    working_precision: u32,
}

impl ExactEvaluator {
    /// Create an evaluator carrying `working_precision` significant digits.
    ///
    /// # Errors
    /// Returns `InvalidWorkingPrecision` below 50 digits.
    pub fn new(working_precision: u32) -> AnalysisResult<Self> {
        if working_precision < MIN_WORKING_PRECISION {
            return Err(SimulationError::InvalidWorkingPrecision {
                requested: working_precision,
                minimum: MIN_WORKING_PRECISION,
            });
        }
        Ok(Self { working_precision })
    }

    #[inline]
    pub fn working_precision(&self) -> u32 {
        self.working_precision
    }

    /// `base + at_step * increment` from decimal strings.
    ///
    /// # Errors
    /// Returns `InvalidNumberFormat` if either string is not a real number.
    pub fn evaluate_exact(
        &self,
        base: &str,
        increment: &str,
        at_step: u64,
    ) -> AnalysisResult<ExactDecimal> {
        let parse = |field: &'static str, text: &str| {
            text.parse::<ExactDecimal>()
                .map_err(|reason| SimulationError::InvalidNumberFormat {
                    field,
                    input: text.to_string(),
                    reason,
                })
        };
        let base = parse("base", base)?;
        let increment = parse("increment", increment)?;
        Ok(self.partial_sum(&base, &increment, at_step))
    }

    /// `base + at_step * increment`, derived from scratch for this step.
    pub fn partial_sum(
        &self,
        base: &ExactDecimal,
        increment: &ExactDecimal,
        at_step: u64,
    ) -> ExactDecimal {
        let scaled = ExactDecimal::from(at_step).mul_rounded(increment, self.working_precision);
        base.add_rounded(&scaled, self.working_precision)
    }

    /// `|running - expected|`, using the exact binary value of `running`.
    pub fn deviation(&self, running: FixedPrecisionValue, expected: &ExactDecimal) -> ErrorMagnitude {
        match running.to_exact() {
            Ok(actual) => {
                ErrorMagnitude::Finite(actual.sub_rounded(expected, self.working_precision).abs())
            },
            Err(_) if running.is_infinite() => ErrorMagnitude::Infinite,
            Err(_) => ErrorMagnitude::Undefined,
        }
    }

    /// `absolute / |expected| * 100`, or 0 when `expected` is zero.
    pub fn relative_percent(
        &self,
        absolute: &ErrorMagnitude,
        expected: &ExactDecimal,
    ) -> AnalysisResult<ErrorMagnitude> {
        if expected.is_zero() {
            return Ok(ErrorMagnitude::zero());
        }

        match absolute {
            ErrorMagnitude::Finite(error) => {
                let ratio = error.div_rounded(&expected.abs(), self.working_precision)?;
                Ok(ErrorMagnitude::Finite(ratio.mul_rounded(
                    &ExactDecimal::from(100u64),
                    self.working_precision,
                )))
            },
            other => Ok(other.clone()),
        }
    }
}
