//! JSON-RPC client for Ethereum nodes.
//!
//! Deliberately minimal: one attempt per call, no caching, no backoff. Every
//! report run re-reads fresh state, and a failed read aborts the run. The
//! only resilience carried is a request timeout so a hung node turns into a
//! loud error instead of a hung process.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::{hex, Address, Bytes, U256};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::chain::errors::ChainError;
use crate::chain::transport::Transport;

/// HTTP JSON-RPC client bound to a single node endpoint.
pub struct RpcClient {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, ChainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ChainError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    async fn request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!(method, id, "RPC request");

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChainError::Timeout(e.to_string())
                } else {
                    ChainError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChainError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChainError::Decode(e.to_string()))?;

        if let Some(error) = payload.get("error") {
            return Err(ChainError::from_rpc_error(error));
        }

        payload
            .get("result")
            .cloned()
            .ok_or(ChainError::MissingResult)
    }

    /// `eth_chainId` — used as a connectivity probe before reading state.
    pub async fn chain_id(&self) -> Result<U256, ChainError> {
        let result = self.request("eth_chainId", json!([])).await?;
        parse_quantity(&result)
    }
}

#[async_trait]
impl Transport for RpcClient {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError> {
        let params = json!([{ "to": to, "data": data }, "latest"]);
        let result = self.request("eth_call", params).await?;
        let raw = result
            .as_str()
            .ok_or_else(|| ChainError::Decode("eth_call result is not a string".to_string()))?;
        let bytes =
            hex::decode(raw).map_err(|e| ChainError::Decode(format!("invalid hex: {e}")))?;
        Ok(Bytes::from(bytes))
    }
}

fn parse_quantity(value: &serde_json::Value) -> Result<U256, ChainError> {
    let raw = value
        .as_str()
        .ok_or_else(|| ChainError::Decode("quantity is not a string".to_string()))?;
    let trimmed = raw.trim_start_matches("0x");
    U256::from_str_radix(trimmed, 16)
        .map_err(|e| ChainError::Decode(format!("invalid quantity {raw}: {e}")))
}
