//! The poll-compare-alert loop.
//!
//! Each cycle runs strictly in order: checkpoint fetch, checkpoint alerts,
//! height fetch, height alerts. Fetch and delivery failures are recovered
//! inside the cycle; nothing here ends the loop except the shutdown signal.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::MissedTickBehavior;

use crate::alert::{Alert, AlertSink};
use crate::config::Config;
use crate::constants::DEFAULT_POLL_INTERVAL_SECS;
use crate::cycle::{evaluate_checkpoint, evaluate_heights, CheckpointCheck, HeightCheck};
use crate::error::FetchError;
use crate::events::{CycleReport, FetchTarget, MonitorEvent};
use crate::rpc_client::RpcClient;
use crate::sources::{BlockHeightSource, CheckpointSource};
use crate::state::MonitorState;
use crate::telegram::TelegramSink;

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub validator_address: String,
    pub poll_interval: Duration,
}

impl MonitorSettings {
    pub fn new(validator_address: &str) -> Self {
        Self {
            validator_address: validator_address.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.validator_address).with_poll_interval(config.poll_interval())
    }
}

pub struct Monitor {
    settings: MonitorSettings,
    checkpoints: Arc<dyn CheckpointSource>,
    heights: Arc<dyn BlockHeightSource>,
    sink: Arc<dyn AlertSink>,
    state: MonitorState,
    cycles: u64,
    event_tx: Option<mpsc::UnboundedSender<MonitorEvent>>,
}

impl Monitor {
    pub fn new(
        settings: MonitorSettings,
        checkpoints: Arc<dyn CheckpointSource>,
        heights: Arc<dyn BlockHeightSource>,
        sink: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            settings,
            checkpoints,
            heights,
            sink,
            state: MonitorState::new(),
            cycles: 0,
            event_tx: None,
        }
    }

    /// Build a monitor that reads from the configured RPC endpoint and
    /// alerts through Telegram
    pub fn from_config(config: &Config) -> Result<Self> {
        let rpc = Arc::new(RpcClient::from_config(config)?);
        let sink = Arc::new(TelegramSink::from_config(config)?);
        Ok(Self::new(MonitorSettings::from_config(config), rpc.clone(), rpc, sink))
    }

    /// Resume from previously observed values instead of an empty state
    pub fn with_state(mut self, state: MonitorState) -> Self {
        self.state = state;
        self
    }

    pub fn with_event_sender(mut self, event_tx: mpsc::UnboundedSender<MonitorEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Number of cycles run so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run cycles every poll interval until shutdown is signalled.
    ///
    /// The first cycle starts immediately. A closed shutdown channel counts
    /// as a shutdown signal.
    pub async fn run(&mut self, mut shutdown_rx: broadcast::Receiver<()>) {
        log::info!(
            "Monitoring validator {} every {:?}",
            self.settings.validator_address,
            self.settings.poll_interval
        );

        let mut interval = tokio::time::interval(self.settings.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = shutdown_rx.recv() => {
                    log::info!("Monitor shutting down after {} cycles", self.cycles);
                    break;
                }
                _ = interval.tick() => {
                    let report = self.run_cycle().await;
                    if report.is_healthy() {
                        log::debug!("Cycle {} healthy", report.cycle);
                    }
                }
            }
        }

        self.emit(MonitorEvent::Stopped { cycles: self.cycles });
    }

    /// Run a single poll-compare-alert cycle
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.cycles += 1;
        let mut report = CycleReport::new(self.cycles);
        log::debug!("Starting monitor cycle {}", report.cycle);
        self.emit(MonitorEvent::CycleStarted { cycle: report.cycle });

        let fetched = self
            .checkpoints
            .latest_checkpoint(&self.settings.validator_address)
            .await;
        let check = evaluate_checkpoint(&mut self.state, fetched);
        match &check {
            CheckpointCheck::Baseline(time) => {
                log::info!("Initial checkpoint time: {}", time);
            }
            CheckpointCheck::Advanced { previous, current } => {
                log::info!("New checkpoint: {} -> {}", previous, current);
                self.emit(MonitorEvent::CheckpointAdvanced {
                    previous: previous.clone(),
                    current: current.clone(),
                });
            }
            CheckpointCheck::Unchanged(time) => {
                log::debug!("Checkpoint unchanged since last cycle: {}", time);
            }
            CheckpointCheck::Unavailable(e) => self.fetch_failed(FetchTarget::Checkpoint, e),
        }
        if let Some(alert) = check.alert() {
            self.raise(alert, &mut report).await;
        }

        let fetched = self.heights.block_heights().await;
        let check = evaluate_heights(&mut self.state, fetched);
        match &check {
            HeightCheck::Observed { current, .. } => {
                log::info!(
                    "Bor height: {}, Heimdall height: {}",
                    current.primary_height,
                    current.secondary_height
                );
            }
            HeightCheck::Unavailable(e) => self.fetch_failed(FetchTarget::BlockHeights, e),
        }
        for alert in check.alerts() {
            self.raise(alert, &mut report).await;
        }

        self.emit(MonitorEvent::CycleCompleted(report.clone()));
        report
    }

    fn fetch_failed(&self, target: FetchTarget, error: &FetchError) {
        log::warn!("Error fetching {}: {}", target, error);
        self.emit(MonitorEvent::FetchFailed {
            target,
            error: error.to_string(),
        });
    }

    async fn raise(&self, alert: Alert, report: &mut CycleReport) {
        log::warn!("⚠️ {}", alert);
        self.emit(MonitorEvent::AlertRaised(alert));

        if let Err(e) = self.sink.send(alert.message()).await {
            log::error!("Failed to send alert: {}", e);
            self.emit(MonitorEvent::AlertDeliveryFailed {
                alert,
                error: e.to_string(),
            });
            report.undelivered.push(alert);
        }

        report.alerts.push(alert);
    }

    fn emit(&self, event: MonitorEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event);
        }
    }
}
