//! Observations carried between monitor cycles.

use serde_json::Value;
use std::fmt;

/// Timestamp of the validator's latest checkpoint as reported by the RPC.
///
/// The format is left to the endpoint, so the raw JSON value is kept and
/// only ever compared for equality.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointTime(Value);

impl CheckpointTime {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for CheckpointTime {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for CheckpointTime {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

impl fmt::Display for CheckpointTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other),
        }
    }
}

/// Checkpoint metadata fetched for the configured validator
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointSnapshot {
    pub last_checkpoint_time: CheckpointTime,
}

impl CheckpointSnapshot {
    pub fn new(last_checkpoint_time: impl Into<CheckpointTime>) -> Self {
        Self {
            last_checkpoint_time: last_checkpoint_time.into(),
        }
    }
}

/// Bor (primary) and Heimdall (secondary) heights read in the same cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightSnapshot {
    pub primary_height: u64,
    pub secondary_height: u64,
}

impl HeightSnapshot {
    pub fn new(primary_height: u64, secondary_height: u64) -> Self {
        Self {
            primary_height,
            secondary_height,
        }
    }
}

/// Values seen by the previous successful fetch of each kind.
///
/// A field stays `None` until the first successful fetch that sets it and is
/// never cleared afterwards. Failed fetches leave it untouched. Outside the
/// crate the fields are read-only; seeding only ever sets values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorState {
    pub(crate) last_checkpoint_time: Option<CheckpointTime>,
    pub(crate) last_primary_height: Option<u64>,
    pub(crate) last_secondary_height: Option<u64>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the stored checkpoint time, e.g. when resuming a previous run
    pub fn with_checkpoint_time(mut self, time: impl Into<CheckpointTime>) -> Self {
        self.last_checkpoint_time = Some(time.into());
        self
    }

    /// Seed the stored Bor and Heimdall heights
    pub fn with_heights(mut self, heights: HeightSnapshot) -> Self {
        self.last_primary_height = Some(heights.primary_height);
        self.last_secondary_height = Some(heights.secondary_height);
        self
    }

    pub fn last_checkpoint_time(&self) -> Option<&CheckpointTime> {
        self.last_checkpoint_time.as_ref()
    }

    pub fn last_primary_height(&self) -> Option<u64> {
        self.last_primary_height
    }

    pub fn last_secondary_height(&self) -> Option<u64> {
        self.last_secondary_height
    }
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_unset<T: fmt::Display>(value: &Option<T>) -> String {
            value
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "unset".to_string())
        }

        write!(
            f,
            "last checkpoint: {}, bor height: {}, heimdall height: {}",
            or_unset(&self.last_checkpoint_time),
            or_unset(&self.last_primary_height),
            or_unset(&self.last_secondary_height),
        )
    }
}
