// ============================================================================
// Engine Module
// Contains the simulator, the exact evaluator and the error reporter
// ============================================================================

mod analyzer;
mod error_reporter;
mod exact_evaluator;
mod simulator;

pub mod factory;

pub use analyzer::AccumulationAnalyzer;
pub use error_reporter::ErrorReporter;
pub use exact_evaluator::ExactEvaluator;
pub use factory::{create_from_config, AnalyzerBuilder};
pub use simulator::{Accumulation, FinitePrecisionSimulator};
