// ============================================================================
// Finite-Precision Simulator
// Repeated addition in a fixed-width binary format
// ============================================================================

use crate::domain::{AnalysisResult, Precision, SimulationError};
use crate::format::{BinaryFormat, FixedPrecisionValue};
use crate::numeric::ExactDecimal;

/// Accumulator history of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accumulation {
    /// Format the additions were rounded to
    pub precision: Precision,

    /// Accumulator after the last addition
    pub final_value: FixedPrecisionValue,

    /// Accumulator after each addition; index 0 is step 1
    pub running_values: Vec<FixedPrecisionValue>,

    /// First step whose accumulator was infinite or NaN
    pub first_overflow_step: Option<u64>,
}

impl Accumulation {
    /// Accumulator value after `step` additions (1-based).
    pub fn value_at(&self, step: u64) -> Option<FixedPrecisionValue> {
        let index = usize::try_from(step.checked_sub(1)?).ok()?;
        self.running_values.get(index).copied()
    }
}

/// Runs the accumulation loop in binary32 or binary64
#[derive(Debug, Default, Clone, Copy)]
pub struct FinitePrecisionSimulator;

impl FinitePrecisionSimulator {
    pub fn new() -> Self {
        Self
    }

    /// Accumulate `increment` into `base`, `iterations` times, in `precision`.
    ///
    /// Both operands are first rounded into the format. Overflow is not
    /// special-cased: infinities and NaN propagate through the remaining steps.
    ///
    /// # Errors
    /// `InvalidIterationCount` if the history for `iterations` steps cannot
    /// be allocated.
    pub fn simulate(
        &self,
        base: &ExactDecimal,
        increment: &ExactDecimal,
        iterations: u64,
        precision: Precision,
    ) -> AnalysisResult<Accumulation> {
        match precision {
            Precision::Single32 => self.simulate_in::<f32>(base, increment, iterations),
            Precision::Double64 => self.simulate_in::<f64>(base, increment, iterations),
        }
    }

    /// Same loop, for a statically chosen format.
    pub fn simulate_in<F: BinaryFormat>(
        &self,
        base: &ExactDecimal,
        increment: &ExactDecimal,
        iterations: u64,
    ) -> AnalysisResult<Accumulation> {
        let mut running_values = history_buffer(iterations)?;
        let mut accumulator = F::from_exact(base)?;
        let addend = F::from_exact(increment)?;

        let mut first_overflow_step = None;

        for step in 1..=iterations {
            accumulator = accumulator.accumulate(addend);
            if first_overflow_step.is_none() && !accumulator.is_finite_value() {
                first_overflow_step = Some(step);
            }
            running_values.push(accumulator.to_fixed());
        }

        Ok(Accumulation {
            precision: F::PRECISION,
            final_value: accumulator.to_fixed(),
            running_values,
            first_overflow_step,
        })
    }
}

fn history_buffer(iterations: u64) -> AnalysisResult<Vec<FixedPrecisionValue>> {
    let rejected = || SimulationError::InvalidIterationCount {
        requested: i64::try_from(iterations).unwrap_or(i64::MAX),
        limit: None,
    };

    let capacity = usize::try_from(iterations).map_err(|_| rejected())?;
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(capacity).map_err(|_| rejected())?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> ExactDecimal {
        text.parse().unwrap()
    }

    #[test]
    fn test_single_precision_absorbs_small_increment() {
        let run = FinitePrecisionSimulator::new()
            .simulate(&dec("10000000.0"), &dec("0.01"), 1000, Precision::Single32)
            .unwrap();

        assert_eq!(run.precision, Precision::Single32);
        assert_eq!(run.running_values.len(), 1000);
        assert_eq!(run.final_value, FixedPrecisionValue::from_f32(1.0e7));
        assert!(run
            .running_values
            .iter()
            .all(|v| *v == FixedPrecisionValue::from_f32(1.0e7)));
        assert_eq!(run.first_overflow_step, None);
    }

    #[test]
    fn test_records_every_step_in_order() {
        let run = FinitePrecisionSimulator::new()
            .simulate(&dec("1"), &dec("1"), 5, Precision::Double64)
            .unwrap();

        let values: Vec<f64> = run.running_values.iter().map(|v| v.to_f64()).collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(run.value_at(1), Some(FixedPrecisionValue::from_f64(2.0)));
        assert_eq!(run.value_at(0), None);
        assert_eq!(run.value_at(6), None);
    }

    #[test]
    fn test_matches_native_loop() {
        let run = FinitePrecisionSimulator::new()
            .simulate_in::<f64>(&dec("0"), &dec("0.1"), 10)
            .unwrap();

        let mut native = 0.0f64;
        for _ in 0..10 {
            native += 0.1;
        }
        assert_eq!(run.final_value, FixedPrecisionValue::from_f64(native));
        assert_ne!(run.final_value.to_f64(), 1.0);
    }

    #[test]
    fn test_unallocatable_history_is_an_error() {
        let result = FinitePrecisionSimulator::new().simulate(
            &dec("1"),
            &dec("1"),
            u64::MAX,
            Precision::Single32,
        );
        assert!(matches!(
            result,
            Err(SimulationError::InvalidIterationCount {
                requested: i64::MAX,
                limit: None
            })
        ));
    }

    #[test]
    fn test_overflow_propagates() {
        let run = FinitePrecisionSimulator::new()
            .simulate(&dec("3e38"), &dec("1e38"), 3, Precision::Single32)
            .unwrap();

        assert_eq!(run.first_overflow_step, Some(1));
        assert!(run.running_values.iter().all(|v| v.is_infinite()));
        assert!(run.final_value.is_infinite());
    }

    #[test]
    fn test_base_outside_range_is_infinite_from_the_start() {
        let run = FinitePrecisionSimulator::new()
            .simulate(&dec("1e39"), &dec("-1e39"), 2, Precision::Single32)
            .unwrap();

        assert_eq!(run.first_overflow_step, Some(1));
        assert!(run.final_value.is_nan());

        let run = FinitePrecisionSimulator::new()
            .simulate(&dec("1e39"), &dec("-1e39"), 2, Precision::Double64)
            .unwrap();
        assert_eq!(run.first_overflow_step, None);
        assert_eq!(run.final_value.to_f64(), -1.0e39);
    }
}
