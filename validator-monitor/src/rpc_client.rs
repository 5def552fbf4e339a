//! HTTP client for the validator's monitoring API.
//!
//! Serves both the checkpoint and the block height lookups from a single
//! endpoint base.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::Config;
use crate::constants::{BOR_HEIGHT_PATH, CHECKPOINTS_PATH, CHECKPOINT_TIME_FIELD, HEIMDALL_HEIGHT_PATH};
use crate::error::FetchError;
use crate::sources::{BlockHeightSource, CheckpointSource};
use crate::state::{CheckpointSnapshot, HeightSnapshot};

pub struct RpcClient {
    client: Client,
    endpoint: String,
}

impl RpcClient {
    /// Create a client whose requests each time out after `timeout`
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build RPC HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.rpc_endpoint, config.request_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.endpoint, path);
        log::debug!("GET {}", url);

        let res = self.client.get(&url).query(query).send().await?;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(res.json::<Value>().await?)
    }

    async fn get_height(&self, path: &str) -> Result<u64, FetchError> {
        let value = self.get_json(path, &[]).await?;
        parse_height(&value)
    }
}

#[async_trait]
impl CheckpointSource for RpcClient {
    async fn latest_checkpoint(&self, validator_address: &str) -> Result<CheckpointSnapshot, FetchError> {
        let data = self
            .get_json(CHECKPOINTS_PATH, &[("validator", validator_address)])
            .await?;

        match data.get(CHECKPOINT_TIME_FIELD) {
            None | Some(Value::Null) => Err(FetchError::MissingField(CHECKPOINT_TIME_FIELD)),
            Some(time) => Ok(CheckpointSnapshot::new(time.clone())),
        }
    }
}

#[async_trait]
impl BlockHeightSource for RpcClient {
    async fn block_heights(&self) -> Result<HeightSnapshot, FetchError> {
        let bor_height = self.get_height(BOR_HEIGHT_PATH).await?;
        let heimdall_height = self.get_height(HEIMDALL_HEIGHT_PATH).await?;
        Ok(HeightSnapshot::new(bor_height, heimdall_height))
    }
}

/// Heights come back as a bare JSON integer; some proxies quote it.
fn parse_height(value: &Value) -> Result<u64, FetchError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| FetchError::Decode(format!("height is not a non-negative integer: {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|e| FetchError::Decode(format!("invalid height '{}': {}", s, e))),
        other => Err(FetchError::Decode(format!("unexpected height value: {}", other))),
    }
}
