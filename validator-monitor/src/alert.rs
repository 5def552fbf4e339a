//! Alert kinds raised by the monitor and the sink they are delivered through.

use async_trait::async_trait;
use std::fmt;

use crate::error::AlertError;

/// A fault condition detected during a monitor cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alert {
    CheckpointFetchFailed,
    CheckpointStalled,
    HeightFetchFailed,
    BorHeightStalled,
    HeimdallHeightStalled,
    HeightsOutOfSync,
}

impl Alert {
    /// Text sent to the operator
    pub fn message(&self) -> &'static str {
        match self {
            Alert::CheckpointFetchFailed => "Failed to fetch checkpoint data.",
            Alert::CheckpointStalled => "No new checkpoint signed or proposed by the validator.",
            Alert::HeightFetchFailed => "Failed to fetch block heights.",
            Alert::BorHeightStalled => "Bor block height is not increasing.",
            Alert::HeimdallHeightStalled => "Heimdall block height is not increasing.",
            Alert::HeightsOutOfSync => "Bor and Heimdall heights are out of sync.",
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Destination for alert messages.
///
/// Delivery is best-effort: the monitor logs a returned error and moves on.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send(&self, message: &str) -> Result<(), AlertError>;
}
