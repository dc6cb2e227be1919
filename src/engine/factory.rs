// ============================================================================
// Analyzer Factory
// Creates accumulation analyzers with validated configuration
// ============================================================================

use crate::domain::{AnalysisResult, SimulationConfig, TrajectoryMode};
use crate::engine::AccumulationAnalyzer;
use crate::interfaces::SimulationObserver;
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates an analyzer from configuration
///
/// # Arguments
/// * `config` - Simulation configuration
/// * `observer` - Sink for run lifecycle events
///
/// # Example
/// ```
/// use accumulation_drift::prelude::*;
/// use accumulation_drift::engine::factory::create_from_config;
/// use std::sync::Arc;
///
/// let analyzer = create_from_config(SimulationConfig::interactive(), Arc::new(NoOpObserver)).unwrap();
/// let result = analyzer.run_simulation("1.0", "1.0", 10, "double").unwrap();
/// assert!(result.absolute_error.is_zero());
/// ```
pub fn create_from_config(
    config: SimulationConfig,
    observer: Arc<dyn SimulationObserver>,
) -> AnalysisResult<AccumulationAnalyzer> {
    AccumulationAnalyzer::new(config, observer)
}

// ============================================================================
// Builder Pattern
// ============================================================================

/// Builder for creating analyzers with fluent API
///
/// # Example
/// ```
/// use accumulation_drift::prelude::*;
/// use accumulation_drift::engine::factory::AnalyzerBuilder;
/// use std::sync::Arc;
///
/// let analyzer = AnalyzerBuilder::new()
///     .working_precision(60)
///     .parallel_trajectory(4)
///     .max_iterations(10_000)
///     .build(Arc::new(LoggingObserver))
///     .unwrap();
/// assert_eq!(analyzer.evaluator().working_precision(), 60);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnalyzerBuilder {
    config: SimulationConfig,
}

impl AnalyzerBuilder {
    /// Start from the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Significant digits for the exact evaluator
    pub fn working_precision(mut self, digits: u32) -> Self {
        self.config.working_precision = digits;
        self
    }

    /// Compute the trajectory on the calling thread (default)
    pub fn sequential_trajectory(mut self) -> Self {
        self.config.trajectory_mode = TrajectoryMode::Sequential;
        self
    }

    /// Compute the trajectory on `workers` scoped threads
    pub fn parallel_trajectory(mut self, workers: usize) -> Self {
        self.config.trajectory_mode = TrajectoryMode::Parallel { workers };
        self
    }

    /// Cap iterations per run
    pub fn max_iterations(mut self, limit: u64) -> Self {
        self.config.max_iterations = Some(limit);
        self
    }

    // ========================================================================
    // Preset Configurations
    // ========================================================================

    /// Apply interactive configuration
    pub fn interactive() -> Self {
        Self {
            config: SimulationConfig::interactive(),
        }
    }

    /// Apply high-precision configuration
    pub fn high_precision() -> Self {
        Self {
            config: SimulationConfig::high_precision(),
        }
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the analyzer
    pub fn build(self, observer: Arc<dyn SimulationObserver>) -> AnalysisResult<AccumulationAnalyzer> {
        create_from_config(self.config, observer)
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SimulationError;
    use crate::interfaces::NoOpObserver;

    #[test]
    fn test_create_from_config() {
        let analyzer =
            create_from_config(SimulationConfig::high_precision(), Arc::new(NoOpObserver)).unwrap();
        assert_eq!(analyzer.config().working_precision, 100);
    }

    #[test]
    fn test_builder_pattern() {
        let builder = AnalyzerBuilder::new()
            .parallel_trajectory(3)
            .max_iterations(42)
            .sequential_trajectory();

        assert_eq!(builder.get_config().trajectory_mode, TrajectoryMode::Sequential);
        assert_eq!(builder.get_config().max_iterations, Some(42));

        let analyzer = builder.build(Arc::new(NoOpObserver)).unwrap();
        assert_eq!(analyzer.config().max_iterations, Some(42));
    }

    #[test]
    fn test_builder_validates() {
        let result = AnalyzerBuilder::new()
            .parallel_trajectory(0)
            .build(Arc::new(NoOpObserver));
        assert!(matches!(result, Err(SimulationError::InvalidConfiguration(_))));

        let result = AnalyzerBuilder::new()
            .working_precision(20)
            .build(Arc::new(NoOpObserver));
        assert!(matches!(
            result,
            Err(SimulationError::InvalidWorkingPrecision { .. })
        ));
    }

    #[test]
    fn test_preset_builders() {
        let interactive = AnalyzerBuilder::interactive()
            .build(Arc::new(NoOpObserver))
            .unwrap();
        assert_eq!(interactive.config().max_iterations, Some(1_000_000));

        let precise = AnalyzerBuilder::high_precision()
            .build(Arc::new(NoOpObserver))
            .unwrap();
        assert_eq!(precise.evaluator().working_precision(), 100);
    }
}
