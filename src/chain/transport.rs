//! The read seam between the monitor and a chain.
//!
//! Production uses the JSON-RPC client; tests substitute an in-memory chain
//! serving canned contract state through the same trait.

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;

use crate::chain::errors::ChainError;

/// Read-only contract call transport (`eth_call` semantics).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError>;
}
