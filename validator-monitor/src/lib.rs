//! Polygon Validator Monitor
//!
//! Watches a validator's checkpoints on Heimdall together with the Bor and
//! Heimdall block heights, and alerts an operator over Telegram when:
//! - no new checkpoint was signed or proposed since the previous poll
//! - either chain's height stops increasing
//! - the two heights drift apart by more than one block
//! - any of the above cannot be fetched

pub mod alert;
pub mod config;
pub mod constants;
pub mod cycle;
pub mod error;
pub mod events;
pub mod logging;
pub mod monitor;
pub mod rpc_client;
pub mod sources;
pub mod state;
pub mod telegram;

pub use alert::{Alert, AlertSink};
pub use config::Config;
pub use error::{AlertError, FetchError};
pub use events::{CycleReport, FetchTarget, MonitorEvent};
pub use monitor::{Monitor, MonitorSettings};
pub use rpc_client::RpcClient;
pub use sources::{BlockHeightSource, CheckpointSource};
pub use state::{CheckpointSnapshot, CheckpointTime, HeightSnapshot, MonitorState};
pub use telegram::TelegramSink;
