//! Comparison of fresh observations against the previous cycle.
//!
//! These functions hold the alerting rules and mutate [`MonitorState`]; they
//! do no I/O so the monitor loop and tests can drive them directly.

use crate::alert::Alert;
use crate::constants::MAX_HEIGHT_DRIFT;
use crate::error::FetchError;
use crate::state::{CheckpointSnapshot, CheckpointTime, HeightSnapshot, MonitorState};

/// Result of comparing a checkpoint fetch against the stored one
#[derive(Debug, Clone, PartialEq)]
pub enum CheckpointCheck {
    /// First successful fetch; stored as the baseline
    Baseline(CheckpointTime),
    /// A different checkpoint than last cycle
    Advanced {
        previous: CheckpointTime,
        current: CheckpointTime,
    },
    /// Same checkpoint as last cycle
    Unchanged(CheckpointTime),
    /// Fetch failed; stored value kept
    Unavailable(FetchError),
}

impl CheckpointCheck {
    pub fn alert(&self) -> Option<Alert> {
        match self {
            CheckpointCheck::Baseline(_) | CheckpointCheck::Advanced { .. } => None,
            CheckpointCheck::Unchanged(_) => Some(Alert::CheckpointStalled),
            CheckpointCheck::Unavailable(_) => Some(Alert::CheckpointFetchFailed),
        }
    }
}

/// Result of comparing a height fetch against the stored heights
#[derive(Debug, Clone, PartialEq)]
pub enum HeightCheck {
    /// Both heights read; `alerts` lists every sub-check that fired
    Observed {
        previous: Option<HeightSnapshot>,
        current: HeightSnapshot,
        alerts: Vec<Alert>,
    },
    /// Fetch failed; stored heights kept and no sub-check evaluated
    Unavailable(FetchError),
}

impl HeightCheck {
    pub fn alerts(&self) -> Vec<Alert> {
        match self {
            HeightCheck::Observed { alerts, .. } => alerts.clone(),
            HeightCheck::Unavailable(_) => vec![Alert::HeightFetchFailed],
        }
    }
}

pub fn evaluate_checkpoint(
    state: &mut MonitorState,
    fetched: Result<CheckpointSnapshot, FetchError>,
) -> CheckpointCheck {
    let current = match fetched {
        Ok(snapshot) => snapshot.last_checkpoint_time,
        Err(e) => return CheckpointCheck::Unavailable(e),
    };

    match state.last_checkpoint_time.take() {
        None => {
            state.last_checkpoint_time = Some(current.clone());
            CheckpointCheck::Baseline(current)
        }
        Some(previous) if previous == current => {
            state.last_checkpoint_time = Some(previous);
            CheckpointCheck::Unchanged(current)
        }
        Some(previous) => {
            state.last_checkpoint_time = Some(current.clone());
            CheckpointCheck::Advanced { previous, current }
        }
    }
}

pub fn evaluate_heights(
    state: &mut MonitorState,
    fetched: Result<HeightSnapshot, FetchError>,
) -> HeightCheck {
    let current = match fetched {
        Ok(snapshot) => snapshot,
        Err(e) => return HeightCheck::Unavailable(e),
    };

    let mut alerts = Vec::new();

    if let Some(last) = state.last_primary_height {
        if current.primary_height <= last {
            alerts.push(Alert::BorHeightStalled);
        }
    }

    if let Some(last) = state.last_secondary_height {
        if current.secondary_height <= last {
            alerts.push(Alert::HeimdallHeightStalled);
        }
    }

    if current.primary_height.abs_diff(current.secondary_height) > MAX_HEIGHT_DRIFT {
        alerts.push(Alert::HeightsOutOfSync);
    }

    let previous = match (state.last_primary_height, state.last_secondary_height) {
        (Some(primary), Some(secondary)) => Some(HeightSnapshot::new(primary, secondary)),
        _ => None,
    };

    // Refreshed whether or not any sub-check fired
    state.last_primary_height = Some(current.primary_height);
    state.last_secondary_height = Some(current.secondary_height);

    HeightCheck::Observed {
        previous,
        current,
        alerts,
    }
}
