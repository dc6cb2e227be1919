// ============================================================================
// Error Reporter
// Per-step and final error between the simulator and the exact evaluator
// ============================================================================

use super::exact_evaluator::ExactEvaluator;
use super::simulator::Accumulation;
use crate::domain::{
    AnalysisResult, ErrorSample, SimulationError, SimulationInput, SimulationResult,
    TrajectoryMode,
};
use crate::format::FixedPrecisionValue;
use crate::numeric::ExactDecimal;

/// Turns an accumulator history into a `SimulationResult`.
///
/// Stateless: every sample re-derives its exact reference from the step
/// index alone, never from the previous sample.
#[derive(Debug, Clone, Copy)]
pub struct ErrorReporter {
    evaluator: ExactEvaluator,
    mode: TrajectoryMode,
}

impl ErrorReporter {
    pub fn new(evaluator: ExactEvaluator, mode: TrajectoryMode) -> Self {
        Self { evaluator, mode }
    }

    #[inline]
    pub fn evaluator(&self) -> &ExactEvaluator {
        &self.evaluator
    }

    #[inline]
    pub fn mode(&self) -> TrajectoryMode {
        self.mode
    }

    /// Build the trajectory and the final summary.
    pub fn report(
        &self,
        input: &SimulationInput,
        accumulation: &Accumulation,
    ) -> AnalysisResult<SimulationResult> {
        let base = input.base();
        let increment = input.increment();
        let values = &accumulation.running_values;

        let trajectory = match self.mode {
            TrajectoryMode::Sequential => self.samples(base, increment, 1, values),
            TrajectoryMode::Parallel { workers } => {
                self.parallel_samples(base, increment, values, workers)?
            },
        };

        let expected = self
            .evaluator
            .partial_sum(base, increment, input.iterations());
        let actual = accumulation.final_value;
        let absolute_error = self.evaluator.deviation(actual, &expected);
        let relative_error_percent = self
            .evaluator
            .relative_percent(&absolute_error, &expected)?;

        Ok(SimulationResult {
            precision: accumulation.precision,
            iterations: input.iterations(),
            expected,
            actual,
            absolute_error,
            relative_error_percent,
            trajectory,
            first_overflow_step: accumulation.first_overflow_step,
        })
    }

    /// Samples for a contiguous run of steps starting at `first_step`.
    fn samples(
        &self,
        base: &ExactDecimal,
        increment: &ExactDecimal,
        first_step: u64,
        values: &[FixedPrecisionValue],
    ) -> Vec<ErrorSample> {
        values
            .iter()
            .zip(first_step..)
            .map(|(&value, step)| {
                let expected = self.evaluator.partial_sum(base, increment, step);
                ErrorSample {
                    step,
                    absolute_error: self.evaluator.deviation(value, &expected),
                }
            })
            .collect()
    }

    /// Split the steps into one contiguous chunk per worker and concatenate
    /// the chunk results in step order.
    fn parallel_samples(
        &self,
        base: &ExactDecimal,
        increment: &ExactDecimal,
        values: &[FixedPrecisionValue],
        workers: usize,
    ) -> AnalysisResult<Vec<ErrorSample>> {
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let chunk_len = values.len().div_ceil(workers.max(1));
        tracing::debug!(
            steps = values.len(),
            workers,
            chunk_len,
            "computing trajectory in parallel"
        );

        crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = values
                .chunks(chunk_len)
                .enumerate()
                .map(|(index, chunk)| {
                    let first_step = (index * chunk_len) as u64 + 1;
                    scope.spawn(move |_| self.samples(base, increment, first_step, chunk))
                })
                .collect();

            let mut trajectory = Vec::with_capacity(values.len());
            for handle in handles {
                let chunk = handle
                    .join()
                    .map_err(|_| SimulationError::TrajectoryWorkerFailed)?;
                trajectory.extend(chunk);
            }
            Ok::<_, SimulationError>(trajectory)
        })
        .map_err(|_| SimulationError::TrajectoryWorkerFailed)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorMagnitude, Precision};
    use crate::engine::simulator::FinitePrecisionSimulator;

    fn run(input: &SimulationInput, mode: TrajectoryMode) -> SimulationResult {
        let accumulation = FinitePrecisionSimulator::new()
            .simulate(
                input.base(),
                input.increment(),
                input.iterations(),
                input.precision(),
            )
            .unwrap();
        ErrorReporter::new(ExactEvaluator::new(50).unwrap(), mode)
            .report(input, &accumulation)
            .unwrap()
    }

    #[test]
    fn test_trajectory_shape() {
        let input = SimulationInput::new("10000000", "0.01", 50, Precision::Single32).unwrap();
        let result = run(&input, TrajectoryMode::Sequential);

        assert_eq!(result.trajectory.len(), 50);
        for (index, sample) in result.trajectory.iter().enumerate() {
            assert_eq!(sample.step, index as u64 + 1);
        }
        // Each lost addition adds exactly 0.01 of error
        assert_eq!(
            result.trajectory[9].absolute_error,
            ErrorMagnitude::Finite("0.1".parse().unwrap())
        );
        assert_eq!(
            result.absolute_error,
            ErrorMagnitude::Finite("0.5".parse().unwrap())
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let input = SimulationInput::new("1", "0.1", 103, Precision::Single32).unwrap();
        let sequential = run(&input, TrajectoryMode::Sequential);

        for workers in [1, 2, 4, 7, 200] {
            let parallel = run(&input, TrajectoryMode::Parallel { workers });
            assert_eq!(parallel, sequential, "workers = {}", workers);
        }
    }

    #[test]
    fn test_final_summary_matches_last_sample() {
        let input = SimulationInput::new("0", "0.1", 10, Precision::Double64).unwrap();
        let result = run(&input, TrajectoryMode::Sequential);

        assert_eq!(result.expected, "1".parse().unwrap());
        assert_eq!(
            result.trajectory.last().map(|s| &s.absolute_error),
            Some(&result.absolute_error)
        );
        assert!(!result.absolute_error.is_zero());
    }
}
