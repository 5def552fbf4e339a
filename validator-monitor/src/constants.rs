//! Defaults shared by the monitor, its config and its HTTP clients.

/// Seconds between two monitor cycles
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Per-request timeout for RPC and notification calls in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Largest allowed difference between the Bor and Heimdall heights
pub const MAX_HEIGHT_DRIFT: u64 = 1;

/// Base URL of the Telegram Bot API
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Checkpoint field returned by the `/checkpoints` endpoint
pub const CHECKPOINT_TIME_FIELD: &str = "lastCheckpointTime";

pub const CHECKPOINTS_PATH: &str = "/checkpoints";
pub const BOR_HEIGHT_PATH: &str = "/bor_block_height";
pub const HEIMDALL_HEIGHT_PATH: &str = "/heimdall_block_height";

/// File name used when logs are written to a directory
pub const LOG_FILE_NAME: &str = "monitor.log";
