// ============================================================================
// Domain Models Module
// Inputs, configuration, results and errors of a simulation run
// ============================================================================

pub mod config;
pub mod error;
pub mod input;
pub mod result;

pub use config::{
    Precision, SimulationConfig, TrajectoryMode, MAX_TRAJECTORY_STEPS, MIN_WORKING_PRECISION,
};
pub use error::{AnalysisResult, SimulationError};
pub use input::SimulationInput;
pub use result::{ErrorMagnitude, ErrorSample, SimulationResult};
