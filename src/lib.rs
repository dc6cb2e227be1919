// ============================================================================
// Accumulation Drift Library
// Measures rounding error of repeated addition in binary32 and binary64
// ============================================================================

//! # Accumulation Drift
//!
//! Adds a fixed increment to a base value many times in a fixed-width binary
//! floating-point format and compares every intermediate result against an
//! exact decimal reference.
//!
//! ## Features
//!
//! - **Exact reference** computed with at least 50 significant decimal digits
//! - **Binary32 and binary64** accumulation with native round-to-nearest-even
//! - **Per-step error trajectory**, optionally computed on scoped worker threads
//! - **Overflow propagation**: infinities and NaN are reported, not fatal
//! - **Lifecycle events** for logging or recording runs
//!
//! ## Example
//!
//! ```rust
//! use accumulation_drift::prelude::*;
//! use std::sync::Arc;
//!
//! let analyzer = AccumulationAnalyzer::new(
//!     SimulationConfig::interactive(),
//!     Arc::new(NoOpObserver),
//! )
//! .unwrap();
//!
//! // 0.01 is absorbed by 1e7 in single precision
//! let result = analyzer
//!     .run_simulation("10000000.0", "0.01", 100_000, "single")
//!     .unwrap();
//!
//! println!("Expected: {}", result.expected.format_fixed(15));
//! println!("Actual:   {}", result.actual);
//! println!("Error:    {}", result.absolute_error);
//! assert!(!result.absolute_error.is_zero());
//! ```

pub mod domain;
pub mod engine;
pub mod format;
pub mod interfaces;
pub mod numeric;

use domain::{AnalysisResult, SimulationConfig, SimulationResult};
use engine::AccumulationAnalyzer;
use interfaces::NoOpObserver;
use std::sync::Arc;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        AnalysisResult, ErrorMagnitude, ErrorSample, Precision, SimulationConfig,
        SimulationError, SimulationInput, SimulationResult, TrajectoryMode,
    };
    pub use crate::engine::{
        create_from_config, AccumulationAnalyzer, AnalyzerBuilder, ExactEvaluator,
        FinitePrecisionSimulator,
    };
    pub use crate::format::{BinaryFormat, FixedPrecisionValue};
    pub use crate::interfaces::{
        LoggingObserver, NoOpObserver, RecordingObserver, SimulationEvent, SimulationObserver,
    };
    pub use crate::numeric::ExactDecimal;
    pub use crate::run_simulation;
}

/// Run one simulation with the default configuration and no observer.
///
/// `precision` is `"single"` or `"double"`.
///
/// ```
/// let result = accumulation_drift::run_simulation("1.0", "1.0", 10, "double").unwrap();
/// assert!(result.absolute_error.is_zero());
/// assert_eq!(result.trajectory.len(), 10);
/// ```
pub fn run_simulation(
    base: &str,
    increment: &str,
    iterations: i64,
    precision: &str,
) -> AnalysisResult<SimulationResult> {
    AccumulationAnalyzer::new(SimulationConfig::default(), Arc::new(NoOpObserver))?
        .run_simulation(base, increment, iterations, precision)
}
