// ============================================================================
// Simulation Observer Interface
// Defines the contract for receiving run lifecycle events
// ============================================================================

use crate::domain::{ErrorMagnitude, Precision};
use crate::format::FixedPrecisionValue;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::fmt;
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Correlates the events of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Events emitted by the analyzer
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SimulationEvent {
    /// Inputs validated, accumulation about to run
    SimulationStarted {
        run_id: RunId,
        precision: Precision,
        iterations: u64,
        timestamp: DateTime<Utc>,
    },

    /// Inputs or configuration rejected; nothing was computed
    SimulationRejected {
        run_id: RunId,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// Accumulator left the finite range (reported once per run)
    FormatOverflow {
        run_id: RunId,
        step: u64,
        value: FixedPrecisionValue,
        timestamp: DateTime<Utc>,
    },

    /// Result assembled
    SimulationCompleted {
        run_id: RunId,
        absolute_error: ErrorMagnitude,
        relative_error_percent: ErrorMagnitude,
        timestamp: DateTime<Utc>,
    },
}

impl SimulationEvent {
    pub fn run_id(&self) -> RunId {
        match self {
            SimulationEvent::SimulationStarted { run_id, .. }
            | SimulationEvent::SimulationRejected { run_id, .. }
            | SimulationEvent::FormatOverflow { run_id, .. }
            | SimulationEvent::SimulationCompleted { run_id, .. } => *run_id,
        }
    }
}

/// Observer trait for run lifecycle events
/// Implementations can handle logging, progress display, metrics, etc.
pub trait SimulationObserver: Send + Sync {
    /// Handle a simulation event
    fn on_event(&self, event: SimulationEvent);
}

/// No-op observer
pub struct NoOpObserver;

impl SimulationObserver for NoOpObserver {
    fn on_event(&self, _event: SimulationEvent) {}
}

/// Logging observer
pub struct LoggingObserver;

impl SimulationObserver for LoggingObserver {
    fn on_event(&self, event: SimulationEvent) {
        match &event {
            SimulationEvent::FormatOverflow { run_id, step, value, .. } => {
                tracing::warn!(%run_id, step, %value, "accumulator left the finite range");
            },
            SimulationEvent::SimulationRejected { run_id, reason, .. } => {
                tracing::warn!(%run_id, %reason, "simulation rejected");
            },
            _ => tracing::debug!("Simulation event: {:?}", event),
        }
    }
}

/// Keeps every event in memory, in arrival order
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<SimulationEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events
    pub fn events(&self) -> Vec<SimulationEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl SimulationObserver for RecordingObserver {
    fn on_event(&self, event: SimulationEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(run_id: RunId) -> SimulationEvent {
        SimulationEvent::SimulationStarted {
            run_id,
            precision: Precision::Single32,
            iterations: 10,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_noop_observer() {
        NoOpObserver.on_event(started(RunId::new()));
        // Should not panic
    }

    #[test]
    fn test_logging_observer() {
        let run_id = RunId::new();
        LoggingObserver.on_event(started(run_id));
        LoggingObserver.on_event(SimulationEvent::FormatOverflow {
            run_id,
            step: 3,
            value: FixedPrecisionValue::from_f32(f32::INFINITY),
            timestamp: Utc::now(),
        });
    }

    #[test]
    fn test_recording_observer_keeps_order() {
        let observer = RecordingObserver::new();
        let first = RunId::new();
        let second = RunId::new();
        observer.on_event(started(first));
        observer.on_event(started(second));
        assert_eq!(observer.len(), 2);

        let ids: Vec<RunId> = observer.events().iter().map(|e| e.run_id()).collect();
        assert_eq!(ids, vec![first, second]);

        observer.clear();
        assert!(observer.is_empty());
    }

    #[test]
    fn test_run_ids_are_unique() {
        assert_ne!(RunId::new(), RunId::default());
    }
}
