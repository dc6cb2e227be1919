// ============================================================================
// Interfaces Module
// Contains trait definitions and contracts for external collaborators
// ============================================================================

mod observer;

pub use observer::{
    LoggingObserver, NoOpObserver, RecordingObserver, RunId, SimulationEvent, SimulationObserver,
};
