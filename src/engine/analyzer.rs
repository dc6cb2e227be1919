// ============================================================================
// Accumulation Analyzer
// Validates a run, drives the simulator and reporter, emits events
// ============================================================================

use super::error_reporter::ErrorReporter;
use super::exact_evaluator::ExactEvaluator;
use super::simulator::FinitePrecisionSimulator;
use crate::domain::{AnalysisResult, SimulationConfig, SimulationInput, SimulationResult};
use crate::interfaces::{RunId, SimulationEvent, SimulationObserver};
use chrono::Utc;
use std::sync::Arc;

/// Entry point for simulation runs.
///
/// Holds no per-run state: every call re-derives all values from its
/// inputs, so identical inputs always produce identical results.
pub struct AccumulationAnalyzer {
    /// Settings shared by every run
    config: SimulationConfig,

    /// Binary-format accumulation loop
    simulator: FinitePrecisionSimulator,

    /// Exact comparison and summary
    reporter: ErrorReporter,

    /// Lifecycle event sink
    observer: Arc<dyn SimulationObserver>,
}

impl AccumulationAnalyzer {
    /// Create an analyzer from a configuration.
    ///
    /// # Errors
    /// Returns the configuration's validation error, if any.
    pub fn new(
        config: SimulationConfig,
        observer: Arc<dyn SimulationObserver>,
    ) -> AnalysisResult<Self> {
        config.validate()?;
        let evaluator = ExactEvaluator::new(config.working_precision)?;
        let reporter = ErrorReporter::new(evaluator, config.trajectory_mode);

        Ok(Self {
            config,
            simulator: FinitePrecisionSimulator::new(),
            reporter,
            observer,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &ExactEvaluator {
        self.reporter.evaluator()
    }

    /// Run from raw caller inputs.
    ///
    /// `precision` is `"single"` or `"double"` (see `Precision::from_str`).
    /// All inputs are validated before any arithmetic; on failure nothing
    /// is computed and the observer sees a `SimulationRejected` event.
    pub fn run_simulation(
        &self,
        base: &str,
        increment: &str,
        iterations: i64,
        precision: &str,
    ) -> AnalysisResult<SimulationResult> {
        let run_id = RunId::new();
        let input = SimulationInput::parse(base, increment, iterations, precision)
            .and_then(|input| input.check_limits(&self.config).map(|()| input));

        match input {
            Ok(input) => self.execute(run_id, &input),
            Err(err) => {
                self.reject(run_id, err.to_string());
                Err(err)
            },
        }
    }

    /// Run a pre-validated input.
    pub fn run(&self, input: &SimulationInput) -> AnalysisResult<SimulationResult> {
        let run_id = RunId::new();
        if let Err(err) = input.check_limits(&self.config) {
            self.reject(run_id, err.to_string());
            return Err(err);
        }
        self.execute(run_id, input)
    }

    fn execute(&self, run_id: RunId, input: &SimulationInput) -> AnalysisResult<SimulationResult> {
        self.observer.on_event(SimulationEvent::SimulationStarted {
            run_id,
            precision: input.precision(),
            iterations: input.iterations(),
            timestamp: Utc::now(),
        });
        tracing::debug!(
            %run_id,
            precision = input.precision().label(),
            iterations = input.iterations(),
            "running accumulation"
        );

        let outcome = self
            .simulator
            .simulate(
                input.base(),
                input.increment(),
                input.iterations(),
                input.precision(),
            )
            .and_then(|accumulation| {
                if let Some(step) = accumulation.first_overflow_step {
                    if let Some(value) = accumulation.value_at(step) {
                        self.observer.on_event(SimulationEvent::FormatOverflow {
                            run_id,
                            step,
                            value,
                            timestamp: Utc::now(),
                        });
                    }
                }
                self.reporter.report(input, &accumulation)
            });

        match outcome {
            Ok(result) => {
                tracing::debug!(
                    %run_id,
                    absolute_error = %result.absolute_error,
                    "accumulation finished"
                );
                self.observer.on_event(SimulationEvent::SimulationCompleted {
                    run_id,
                    absolute_error: result.absolute_error.clone(),
                    relative_error_percent: result.relative_error_percent.clone(),
                    timestamp: Utc::now(),
                });
                Ok(result)
            },
            Err(err) => {
                self.reject(run_id, err.to_string());
                Err(err)
            },
        }
    }

    fn reject(&self, run_id: RunId, reason: String) {
        self.observer.on_event(SimulationEvent::SimulationRejected {
            run_id,
            reason,
            timestamp: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorMagnitude, Precision, SimulationError, MAX_TRAJECTORY_STEPS};
    use crate::interfaces::{NoOpObserver, RecordingObserver};

    fn analyzer_with(observer: Arc<RecordingObserver>) -> AccumulationAnalyzer {
        AccumulationAnalyzer::new(SimulationConfig::interactive(), observer).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = AccumulationAnalyzer::new(
            SimulationConfig::new().with_working_precision(10),
            Arc::new(NoOpObserver),
        );
        assert!(matches!(
            result,
            Err(SimulationError::InvalidWorkingPrecision { .. })
        ));
    }

    #[test]
    fn test_events_for_successful_run() {
        let observer = Arc::new(RecordingObserver::new());
        let analyzer = analyzer_with(observer.clone());

        let result = analyzer.run_simulation("1.0", "1.0", 10, "double").unwrap();
        assert!(result.absolute_error.is_zero());

        let events = observer.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            SimulationEvent::SimulationStarted {
                precision: Precision::Double64,
                iterations: 10,
                ..
            }
        ));
        assert!(matches!(events[1], SimulationEvent::SimulationCompleted { .. }));
        assert_eq!(events[0].run_id(), events[1].run_id());
    }

    #[test]
    fn test_rejected_run_reports_no_partial_result() {
        let observer = Arc::new(RecordingObserver::new());
        let analyzer = analyzer_with(observer.clone());

        let err = analyzer.run_simulation("1", "1", 0, "single").unwrap_err();
        assert!(matches!(err, SimulationError::InvalidIterationCount { .. }));

        let err = analyzer
            .run_simulation("1", "1", 5_000_000, "single")
            .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidIterationCount {
                limit: Some(1_000_000),
                ..
            }
        ));

        let events = observer.events();
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .all(|e| matches!(e, SimulationEvent::SimulationRejected { .. })));
    }

    #[test]
    fn test_oversized_run_rejected_before_start() {
        let observer = Arc::new(RecordingObserver::new());
        let analyzer =
            AccumulationAnalyzer::new(SimulationConfig::new(), observer.clone()).unwrap();

        let err = analyzer
            .run_simulation("1", "1", i64::MAX, "single")
            .unwrap_err();
        assert_eq!(
            err,
            SimulationError::InvalidIterationCount {
                requested: i64::MAX,
                limit: Some(MAX_TRAJECTORY_STEPS),
            }
        );

        let events = observer.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SimulationEvent::SimulationRejected { .. }));
    }

    #[test]
    fn test_overflow_event() {
        let observer = Arc::new(RecordingObserver::new());
        let analyzer = analyzer_with(observer.clone());

        let result = analyzer.run_simulation("1e308", "1e308", 3, "double").unwrap();
        assert_eq!(result.first_overflow_step, Some(1));
        assert_eq!(result.absolute_error, ErrorMagnitude::Infinite);

        let overflow: Vec<_> = observer
            .events()
            .into_iter()
            .filter(|e| matches!(e, SimulationEvent::FormatOverflow { .. }))
            .collect();
        assert_eq!(overflow.len(), 1);
        match &overflow[0] {
            SimulationEvent::FormatOverflow { step, value, .. } => {
                assert_eq!(*step, 1);
                assert!(value.is_infinite());
            },
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_run_prevalidated_input() {
        let analyzer =
            AccumulationAnalyzer::new(SimulationConfig::new(), Arc::new(NoOpObserver)).unwrap();
        let input = SimulationInput::new("0.5", "0.25", 8, Precision::Single32).unwrap();
        let result = analyzer.run(&input).unwrap();

        assert_eq!(result.expected, "2.5".parse().unwrap());
        assert!(result.absolute_error.is_zero());
        assert_eq!(analyzer.evaluator().working_precision(), 50);
    }
}
