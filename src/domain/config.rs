// ============================================================================
// Simulation Configuration
// Precision selection and evaluator/reporter settings
// ============================================================================

use super::error::{AnalysisResult, SimulationError};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum significant digits for the exact evaluator.
pub const MIN_WORKING_PRECISION: u32 = 50;

/// Upper bound on additions per run, whatever the configured cap.
///
/// Every step keeps a running value and an exact error sample in memory.
pub const MAX_TRAJECTORY_STEPS: u64 = 1 << 26;

// ============================================================================
// Precision
// ============================================================================

/// Binary floating-point format the accumulation runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Precision {
    /// IEEE 754 binary32
    /// - Significand: 24 bits (~7.2 decimal digits)
    /// - Largest finite: ~3.4e38
    Single32,

    /// IEEE 754 binary64
    /// - Significand: 53 bits (~15.9 decimal digits)
    /// - Largest finite: ~1.8e308
    Double64,
}

impl Precision {
    /// Significand width in bits, including the implicit bit.
    pub fn significand_bits(self) -> u32 {
        match self {
            Precision::Single32 => 24,
            Precision::Double64 => 53,
        }
    }

    /// Short label accepted by `FromStr`.
    pub fn label(self) -> &'static str {
        match self {
            Precision::Single32 => "single",
            Precision::Double64 => "double",
        }
    }

    /// Name of the binary type, for plot titles.
    pub fn type_name(self) -> &'static str {
        match self {
            Precision::Single32 => "float32",
            Precision::Double64 => "float64",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::Single32 => write!(f, "Single (32-bit)"),
            Precision::Double64 => write!(f, "Double (64-bit)"),
        }
    }
}

impl FromStr for Precision {
    type Err = SimulationError;

    /// Accepts "single"/"f32"/"32" and "double"/"f64"/"64" (any case),
    /// as well as the `Display` labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "f32" | "float32" | "32" | "single (32-bit)" => Ok(Precision::Single32),
            "double" | "f64" | "float64" | "64" | "double (64-bit)" => Ok(Precision::Double64),
            _ => Err(SimulationError::InvalidPrecision {
                label: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// Trajectory Mode
// ============================================================================

/// How per-step error samples are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrajectoryMode {
    /// One pass on the calling thread
    Sequential,

    /// Contiguous step ranges on scoped worker threads
    /// Output is identical to `Sequential`
    Parallel {
        /// Number of worker threads (>= 1)
        workers: usize,
    },
}

// ============================================================================
// Complete Simulation Configuration
// ============================================================================

/// Settings shared by every run of an analyzer
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Significant digits used by the exact evaluator (>= 50)
    pub working_precision: u32,

    /// Per-step error computation strategy
    pub trajectory_mode: TrajectoryMode,

    /// Optional: cap on iterations per run (bounds trajectory memory)
    /// None means no cap
    pub max_iterations: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationConfig {
    /// Create a configuration with the minimum working precision,
    /// sequential trajectory and no iteration cap
    pub fn new() -> Self {
        Self {
            working_precision: MIN_WORKING_PRECISION,
            trajectory_mode: TrajectoryMode::Sequential,
            max_iterations: None,
        }
    }

    /// Builder method: Set evaluator working precision
    pub fn with_working_precision(mut self, digits: u32) -> Self {
        self.working_precision = digits;
        self
    }

    /// Builder method: Set trajectory mode
    pub fn with_trajectory_mode(mut self, mode: TrajectoryMode) -> Self {
        self.trajectory_mode = mode;
        self
    }

    /// Builder method: Cap iterations per run
    pub fn with_max_iterations(mut self, limit: u64) -> Self {
        self.max_iterations = Some(limit);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.working_precision < MIN_WORKING_PRECISION {
            return Err(SimulationError::InvalidWorkingPrecision {
                requested: self.working_precision,
                minimum: MIN_WORKING_PRECISION,
            });
        }

        if let TrajectoryMode::Parallel { workers } = self.trajectory_mode {
            if workers == 0 {
                return Err(SimulationError::InvalidConfiguration(
                    "parallel trajectory needs at least one worker".to_string(),
                ));
            }
        }

        match self.max_iterations {
            Some(0) => {
                return Err(SimulationError::InvalidConfiguration(
                    "iteration cap must be positive".to_string(),
                ));
            },
            Some(limit) if limit > MAX_TRAJECTORY_STEPS => {
                return Err(SimulationError::InvalidConfiguration(format!(
                    "iteration cap {} exceeds the trajectory limit of {}",
                    limit, MAX_TRAJECTORY_STEPS
                )));
            },
            _ => {},
        }

        Ok(())
    }

    /// Largest iteration count a run may request.
    pub fn iteration_limit(&self) -> u64 {
        self.max_iterations
            .map_or(MAX_TRAJECTORY_STEPS, |limit| limit.min(MAX_TRAJECTORY_STEPS))
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl SimulationConfig {
    /// Interactive use
    /// - Minimum working precision
    /// - At most one million additions per run
    pub fn interactive() -> Self {
        Self::new().with_max_iterations(1_000_000)
    }

    /// Reference-grade ground truth
    /// - 100 significant digits
    pub fn high_precision() -> Self {
        Self::new().with_working_precision(100)
    }

    /// Parallel trajectory over `workers` threads
    pub fn parallel(workers: usize) -> Self {
        Self::new().with_trajectory_mode(TrajectoryMode::Parallel { workers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = SimulationConfig::new();
        assert_eq!(config.working_precision, 50);
        assert_eq!(config.trajectory_mode, TrajectoryMode::Sequential);
        assert_eq!(config.max_iterations, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SimulationConfig::high_precision()
            .with_max_iterations(500)
            .with_trajectory_mode(TrajectoryMode::Parallel { workers: 4 });

        assert_eq!(config.working_precision, 100);
        assert_eq!(config.max_iterations, Some(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let config = SimulationConfig::new().with_working_precision(28);
        assert_eq!(
            config.validate(),
            Err(SimulationError::InvalidWorkingPrecision {
                requested: 28,
                minimum: 50
            })
        );

        assert!(SimulationConfig::parallel(0).validate().is_err());
        assert!(SimulationConfig::new()
            .with_max_iterations(0)
            .validate()
            .is_err());
        assert!(matches!(
            SimulationConfig::new()
                .with_max_iterations(MAX_TRAJECTORY_STEPS + 1)
                .validate(),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_iteration_limit() {
        assert_eq!(SimulationConfig::new().iteration_limit(), MAX_TRAJECTORY_STEPS);
        assert_eq!(SimulationConfig::interactive().iteration_limit(), 1_000_000);
    }

    #[test]
    fn test_preset_configs() {
        assert_eq!(SimulationConfig::interactive().max_iterations, Some(1_000_000));
        assert!(matches!(
            SimulationConfig::parallel(2).trajectory_mode,
            TrajectoryMode::Parallel { workers: 2 }
        ));
    }

    #[test]
    fn test_precision_parsing() {
        assert_eq!("single".parse::<Precision>().unwrap(), Precision::Single32);
        assert_eq!(" Double ".parse::<Precision>().unwrap(), Precision::Double64);
        assert_eq!("f32".parse::<Precision>().unwrap(), Precision::Single32);
        assert_eq!("64".parse::<Precision>().unwrap(), Precision::Double64);
        assert_eq!(
            Precision::Single32.to_string().parse::<Precision>().unwrap(),
            Precision::Single32
        );
        assert_eq!(
            "half".parse::<Precision>(),
            Err(SimulationError::InvalidPrecision {
                label: "half".to_string()
            })
        );
    }

    #[test]
    fn test_precision_metadata() {
        assert_eq!(Precision::Single32.significand_bits(), 24);
        assert_eq!(Precision::Double64.significand_bits(), 53);
        assert_eq!(Precision::Double64.label(), "double");
        assert_eq!(Precision::Single32.type_name(), "float32");
    }
}
