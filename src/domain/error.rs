// ============================================================================
// Simulation Errors
// Validation and execution failures surfaced to the caller
// ============================================================================

use crate::numeric::NumericError;
use std::fmt;

/// Errors returned by a simulation run.
///
/// Every input-validation variant is raised before any computation starts,
/// so a failed run never exposes partial state. Accumulator overflow is not
/// an error: it propagates as a special value in the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// `base` or `increment` is not a real number
    InvalidNumberFormat {
        field: &'static str,
        input: String,
        reason: NumericError,
    },

    /// Iteration count is not a positive integer, or exceeds the configured cap
    InvalidIterationCount {
        requested: i64,
        limit: Option<u64>,
    },

    /// Precision label is neither single nor double
    InvalidPrecision { label: String },

    /// Evaluator working precision below the required minimum
    InvalidWorkingPrecision { requested: u32, minimum: u32 },

    /// Configuration parameter out of range
    InvalidConfiguration(String),

    /// A parallel trajectory worker panicked
    TrajectoryWorkerFailed,

    /// Arithmetic failure inside the exact evaluator
    Numeric(NumericError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidNumberFormat {
                field,
                input,
                reason,
            } => write!(f, "invalid number for {}: {:?} ({})", field, input, reason),
            SimulationError::InvalidIterationCount {
                requested,
                limit: Some(limit),
            } => write!(
                f,
                "invalid iteration count {}: must be between 1 and {}",
                requested, limit
            ),
            SimulationError::InvalidIterationCount {
                requested,
                limit: None,
            } => write!(
                f,
                "invalid iteration count {}: must be a positive integer",
                requested
            ),
            SimulationError::InvalidPrecision { label } => write!(
                f,
                "invalid precision {:?}: expected \"single\" or \"double\"",
                label
            ),
            SimulationError::InvalidWorkingPrecision { requested, minimum } => write!(
                f,
                "working precision of {} digits is below the minimum of {}",
                requested, minimum
            ),
            SimulationError::InvalidConfiguration(message) => {
                write!(f, "invalid configuration: {}", message)
            },
            SimulationError::TrajectoryWorkerFailed => {
                write!(f, "trajectory worker thread panicked")
            },
            SimulationError::Numeric(err) => write!(f, "numeric error: {}", err),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::InvalidNumberFormat { reason, .. } => Some(reason),
            SimulationError::Numeric(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NumericError> for SimulationError {
    fn from(err: NumericError) -> Self {
        SimulationError::Numeric(err)
    }
}

/// Result type alias for simulation operations
pub type AnalysisResult<T> = Result<T, SimulationError>;
