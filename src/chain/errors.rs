//! Error types for the on-chain read layer.

use thiserror::Error;

use crate::chain::abi;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("execution reverted: {0}")]
    Revert(String),

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("RPC response missing result field")]
    MissingResult,
}

impl ChainError {
    /// Map a JSON-RPC error object into a typed error.
    ///
    /// Reverting `eth_call`s surface as an error object; when the node
    /// attaches the `Error(string)` payload in `data`, the reason string is
    /// decoded so operators see the contract's own message.
    pub fn from_rpc_error(error: &serde_json::Value) -> Self {
        let code = error.get("code").and_then(|v| v.as_i64()).unwrap_or(0);
        let message = error
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown RPC error")
            .to_string();

        if let Some(data) = error.get("data").and_then(|v| v.as_str()) {
            if let Ok(bytes) = alloy_primitives::hex::decode(data) {
                if let Some(reason) = abi::decode_revert_reason(&bytes) {
                    return Self::Revert(reason);
                }
            }
        }

        if message.to_lowercase().contains("revert") {
            return Self::Revert(message);
        }

        Self::Rpc { code, message }
    }
}
