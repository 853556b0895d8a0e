//! Configuration management.
//!
//! Loads settings from environment variables and .env file.

use alloy_primitives::Address;

/// Production deployment of the ETH-C Maker strategy.
const DEFAULT_STRATEGY: &str = "0x1aa390681036bfB47f407F26583c50ff8740A7d6";

/// Maker Dai delegate used for spot price and liquidation ratio lookups.
const DEFAULT_PRICE_DELEGATE: &str = "0xf728c1645739b1d4367A94232d7473016Df908E7";

/// Application configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Settings {
    // Chain access
    pub eth_rpc_url: String,
    pub rpc_timeout_secs: u64,

    // Monitored strategies
    pub strategy_addresses: Vec<String>,
    pub price_delegate_address: String,
    pub tend_gas_credit: u64,

    // Telegram delivery (optional; both or neither)
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,

    // Logging
    pub log_level: String,
    pub log_json: bool,
}

impl Settings {
    /// Load settings from environment variables (and .env file).
    pub fn from_env() -> Self {
        // Try to load .env file (ignore if not found).
        let _ = dotenvy::dotenv();

        Self {
            eth_rpc_url: env_str("ETH_RPC_URL", ""),
            rpc_timeout_secs: env_u64("RPC_TIMEOUT_SECS", 30),

            strategy_addresses: env_csv_default("STRATEGY_ADDRESSES", DEFAULT_STRATEGY),
            price_delegate_address: env_str("PRICE_DELEGATE_ADDRESS", DEFAULT_PRICE_DELEGATE),
            tend_gas_credit: env_u64("TEND_GAS_CREDIT", 1),

            telegram_bot_token: env_str("TELEGRAM_BOT_TOKEN", ""),
            telegram_chat_id: env_str("TELEGRAM_CHAT_ID", ""),

            log_level: env_str("LOG_LEVEL", "info"),
            log_json: env_bool("LOG_JSON", false),
        }
    }

    /// Validate configuration for critical requirements.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.eth_rpc_url.is_empty() {
            errors.push("ETH_RPC_URL is required".to_string());
        }

        if self.strategy_addresses.is_empty() {
            errors.push("STRATEGY_ADDRESSES must list at least one strategy".to_string());
        }
        for raw in &self.strategy_addresses {
            if raw.parse::<Address>().is_err() {
                errors.push(format!("Invalid strategy address: {raw}"));
            }
        }
        if self.price_delegate_address.parse::<Address>().is_err() {
            errors.push(format!(
                "Invalid price delegate address: {}",
                self.price_delegate_address
            ));
        }

        if self.telegram_bot_token.is_empty() != self.telegram_chat_id.is_empty() {
            errors.push(
                "TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID must be set together".to_string(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn strategies(&self) -> Result<Vec<Address>, String> {
        self.strategy_addresses
            .iter()
            .map(|raw| {
                raw.parse::<Address>()
                    .map_err(|_| format!("Invalid strategy address: {raw}"))
            })
            .collect()
    }

    pub fn price_delegate(&self) -> Result<Address, String> {
        self.price_delegate_address
            .parse::<Address>()
            .map_err(|_| {
                format!(
                    "Invalid price delegate address: {}",
                    self.price_delegate_address
                )
            })
    }

    pub fn telegram_enabled(&self) -> bool {
        !self.telegram_bot_token.is_empty() && !self.telegram_chat_id.is_empty()
    }
}

// =============================================================================
// Environment helpers
// =============================================================================

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_csv_default(key: &str, default: &str) -> Vec<String> {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
