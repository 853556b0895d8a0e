//! Maker CDP Strategy Monitor
//!
//! Operator-invoked diagnostic tool for Maker-style CDP yield strategies.
//! For each configured strategy address it reads a fixed set of on-chain
//! view values over JSON-RPC, renders a health report, prints it, and
//! optionally delivers it to a Telegram chat.
//!
//! Failures are loud: any failed read or send aborts the run with a nonzero
//! exit. There is no retry, no caching and no background work.

use alloy_primitives::U256;
use tracing::{error, info};

use maker_cdp_monitor::chain::rpc::RpcClient;
use maker_cdp_monitor::config::Settings;
use maker_cdp_monitor::monitor::reader::MonitorReader;
use maker_cdp_monitor::monitor::report::render_report;
use maker_cdp_monitor::notify::telegram::TelegramNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration.
    let settings = Settings::from_env();

    // Initialize logging.
    init_logging(&settings);

    info!("=== Maker CDP Strategy Monitor ===");

    // Validate settings.
    if let Err(errors) = settings.validate() {
        for e in &errors {
            error!(error = %e, "Configuration error");
        }
        anyhow::bail!("Configuration validation failed");
    }

    let strategies = settings.strategies().map_err(anyhow::Error::msg)?;
    let price_delegate = settings.price_delegate().map_err(anyhow::Error::msg)?;

    // Connect and probe the node.
    let rpc = RpcClient::new(&settings.eth_rpc_url, settings.rpc_timeout_secs)?;
    let chain_id = rpc.chain_id().await?;
    info!(chain_id = %chain_id, strategies = strategies.len(), "Connected to node");

    let notifier = if settings.telegram_enabled() {
        info!(chat_id = %settings.telegram_chat_id, "Telegram delivery enabled");
        Some(TelegramNotifier::new(
            &settings.telegram_bot_token,
            &settings.telegram_chat_id,
            settings.rpc_timeout_secs,
        )?)
    } else {
        None
    };

    let reader = MonitorReader::new(
        &rpc,
        price_delegate,
        U256::from(settings.tend_gas_credit),
    );

    for strategy in strategies {
        let snapshot = reader.snapshot(strategy).await?;
        let lines = render_report(&snapshot);

        for line in &lines {
            println!("{line}");
        }

        if let Some(notifier) = &notifier {
            notifier.send_code_block(&lines.join("\n")).await?;
        }
    }

    Ok(())
}

fn init_logging(settings: &Settings) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    if settings.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}
