//! Assembles a full strategy snapshot from a fixed sequence of view calls.

use alloy_primitives::{Address, U256};
use chrono::Utc;
use tracing::debug;

use crate::chain::contracts::{Erc20Reader, PriceDelegateReader, StrategyReader, YVaultReader};
use crate::chain::errors::ChainError;
use crate::chain::transport::Transport;
use crate::monitor::views::{InvestmentView, MarketView, StrategySnapshot, StrategyView};

/// One-shot chain reader.
///
/// No retries and no caching: every snapshot re-reads fresh state, and any
/// failed call propagates and aborts the report. Calls are issued one at a
/// time in a fixed order.
pub struct MonitorReader<'a> {
    transport: &'a dyn Transport,
    price_delegate: Address,
    tend_gas_credit: U256,
}

impl<'a> MonitorReader<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        price_delegate: Address,
        tend_gas_credit: U256,
    ) -> Self {
        Self {
            transport,
            price_delegate,
            tend_gas_credit,
        }
    }

    pub async fn snapshot(&self, address: Address) -> Result<StrategySnapshot, ChainError> {
        let strategy = StrategyReader::new(self.transport, address);

        // Resolve the strategy's declared dependencies first.
        let want = Erc20Reader::new(self.transport, strategy.want().await?);
        let yvault = YVaultReader::new(self.transport, strategy.y_vault().await?);
        let delegate = PriceDelegateReader::new(self.transport, self.price_delegate);

        debug!(
            strategy = %address,
            want = %want.address,
            yvault = %yvault.address,
            "Resolved strategy dependencies"
        );

        let ilk = strategy.ilk().await?;

        let view = StrategyView {
            address,
            name: strategy.name().await?,
            cdp_id: strategy.cdp_id().await?,
            ilk,
            want_symbol: want.symbol().await?,
            want_decimals: want.decimals().await?,
            target_ratio: strategy.collateralization_ratio().await?,
            rebalance_tolerance: strategy.rebalance_tolerance().await?,
            current_ratio: strategy.current_maker_vault_ratio().await?,
            debt: strategy.balance_of_debt().await?,
            collateral: strategy.balance_of_maker_vault().await?,
            needs_rebalance: strategy.tend_trigger(self.tend_gas_credit).await?,
        };

        let market = MarketView {
            spot_price: delegate.spot_price(ilk).await?,
            liquidation_ratio: delegate.liquidation_ratio(ilk).await?,
        };

        let investment = InvestmentView {
            shares: yvault.balance_of(address).await?,
            price_per_share: yvault.price_per_share().await?,
        };

        Ok(StrategySnapshot {
            strategy: view,
            market,
            investment,
            fetched_at: Utc::now(),
        })
    }
}
