use async_trait::async_trait;

use crate::error::FetchError;
use crate::state::{CheckpointSnapshot, HeightSnapshot};

/// Provides the latest checkpoint signed or proposed by a validator
#[async_trait]
pub trait CheckpointSource: Send + Sync {
    async fn latest_checkpoint(&self, validator_address: &str) -> Result<CheckpointSnapshot, FetchError>;
}

/// Provides the current Bor and Heimdall heights.
///
/// Both heights must be read for the snapshot to succeed.
#[async_trait]
pub trait BlockHeightSource: Send + Sync {
    async fn block_heights(&self) -> Result<HeightSnapshot, FetchError>;
}
