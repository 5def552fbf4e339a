//! Structured events emitted by the monitor loop.
//!
//! Subscribers receive them on an unbounded channel attached with
//! [`crate::Monitor::with_event_sender`]. Sending never blocks the loop and
//! a dropped receiver is ignored.

use std::fmt;

use crate::alert::Alert;
use crate::state::CheckpointTime;

/// Which fetch of a cycle failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    Checkpoint,
    BlockHeights,
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchTarget::Checkpoint => write!(f, "checkpoint"),
            FetchTarget::BlockHeights => write!(f, "block heights"),
        }
    }
}

/// Summary of a single monitor cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub cycle: u64,
    /// Every alert raised, in emission order
    pub alerts: Vec<Alert>,
    /// Alerts the sink failed to deliver
    pub undelivered: Vec<Alert>,
}

impl CycleReport {
    pub fn new(cycle: u64) -> Self {
        Self {
            cycle,
            ..Default::default()
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.alerts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    CycleStarted { cycle: u64 },
    FetchFailed { target: FetchTarget, error: String },
    CheckpointAdvanced { previous: CheckpointTime, current: CheckpointTime },
    AlertRaised(Alert),
    AlertDeliveryFailed { alert: Alert, error: String },
    CycleCompleted(CycleReport),
    Stopped { cycles: u64 },
}
