#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use validator_monitor::{
    AlertError, AlertSink, BlockHeightSource, CheckpointSnapshot, CheckpointSource, FetchError,
    HeightSnapshot, Monitor, MonitorSettings,
};

pub const VALIDATOR: &str = "0x1111111111111111111111111111111111111111";

/// Replays queued checkpoint responses; fails once the queue is empty
#[derive(Default)]
pub struct ScriptedCheckpoints {
    responses: Mutex<VecDeque<Result<CheckpointSnapshot, FetchError>>>,
    requested_for: Mutex<Vec<String>>,
}

impl ScriptedCheckpoints {
    pub fn push(&self, response: Result<CheckpointSnapshot, FetchError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn push_time(&self, time: &str) {
        self.push(Ok(CheckpointSnapshot::new(time)));
    }

    pub fn push_failure(&self) {
        self.push(Err(FetchError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        }));
    }

    pub fn requested_for(&self) -> Vec<String> {
        self.requested_for.lock().unwrap().clone()
    }
}

#[async_trait]
impl CheckpointSource for ScriptedCheckpoints {
    async fn latest_checkpoint(&self, validator_address: &str) -> Result<CheckpointSnapshot, FetchError> {
        self.requested_for.lock().unwrap().push(validator_address.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport("script exhausted".to_string())))
    }
}

/// Replays queued height responses; fails once the queue is empty
#[derive(Default)]
pub struct ScriptedHeights {
    responses: Mutex<VecDeque<Result<HeightSnapshot, FetchError>>>,
}

impl ScriptedHeights {
    pub fn push(&self, response: Result<HeightSnapshot, FetchError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn push_heights(&self, bor: u64, heimdall: u64) {
        self.push(Ok(HeightSnapshot::new(bor, heimdall)));
    }

    pub fn push_failure(&self) {
        self.push(Err(FetchError::Timeout("operation timed out".to_string())));
    }
}

#[async_trait]
impl BlockHeightSource for ScriptedHeights {
    async fn block_heights(&self) -> Result<HeightSnapshot, FetchError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport("script exhausted".to_string())))
    }
}

/// Records every message it is asked to send
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
    failing: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.messages.lock().unwrap().clear();
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn send(&self, message: &str) -> Result<(), AlertError> {
        self.messages.lock().unwrap().push(message.to_string());
        if self.failing {
            return Err(AlertError::Status {
                status: 429,
                body: "Too Many Requests".to_string(),
            });
        }
        Ok(())
    }
}

pub struct Harness {
    pub checkpoints: Arc<ScriptedCheckpoints>,
    pub heights: Arc<ScriptedHeights>,
    pub sink: Arc<RecordingSink>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_sink(RecordingSink::default())
    }

    pub fn with_sink(sink: RecordingSink) -> Self {
        Self {
            checkpoints: Arc::new(ScriptedCheckpoints::default()),
            heights: Arc::new(ScriptedHeights::default()),
            sink: Arc::new(sink),
        }
    }

    pub fn monitor(&self) -> Monitor {
        self.monitor_with_interval(Duration::from_secs(60))
    }

    pub fn monitor_with_interval(&self, poll_interval: Duration) -> Monitor {
        Monitor::new(
            MonitorSettings::new(VALIDATOR).with_poll_interval(poll_interval),
            self.checkpoints.clone(),
            self.heights.clone(),
            self.sink.clone(),
        )
    }
}
