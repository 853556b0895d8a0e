//! Read snapshots of on-chain state.
//!
//! None of these entities are owned or mutated by the monitor: they are
//! transient reflections of contract state, fetched fresh for each report
//! and discarded afterwards.

use alloy_primitives::{Address, B256, U256};
use chrono::{DateTime, Utc};

/// 1e18, the fixed-point base of every ratio and price except the
/// liquidation ratio.
pub fn wad() -> U256 {
    U256::from(10u64).pow(U256::from(18u64))
}

/// 1e27, the fixed-point base of the liquidation ratio.
pub fn ray() -> U256 {
    U256::from(10u64).pow(U256::from(27u64))
}

/// Snapshot of the strategy contract itself.
#[derive(Debug, Clone)]
pub struct StrategyView {
    pub address: Address,
    pub name: String,
    pub cdp_id: U256,
    pub ilk: B256,
    pub want_symbol: String,
    pub want_decimals: u8,
    /// Target collateralization ratio, 1e18 scale.
    pub target_ratio: U256,
    /// Allowed drift around the target before a rebalance is due, 1e18 scale.
    pub rebalance_tolerance: U256,
    /// Live collateralization ratio of the CDP, 1e18 scale.
    pub current_ratio: U256,
    /// Outstanding Dai debt, 1e18 scale.
    pub debt: U256,
    /// Collateral locked in the Maker vault, in want units, 1e18 scale.
    pub collateral: U256,
    /// The contract's own rebalance trigger.
    pub needs_rebalance: bool,
}

/// Market parameters for the strategy's collateral type.
#[derive(Debug, Clone)]
pub struct MarketView {
    /// Want spot price in Dai, 1e18 scale.
    pub spot_price: U256,
    /// Minimum collateralization before liquidation, 1e27 scale.
    pub liquidation_ratio: U256,
}

/// The strategy's position in the yield vault.
#[derive(Debug, Clone)]
pub struct InvestmentView {
    pub shares: U256,
    /// Dai value of one share, 1e18 scale.
    pub price_per_share: U256,
}

impl InvestmentView {
    /// Dai value of the held shares.
    pub fn value(&self) -> U256 {
        self.shares * self.price_per_share / wad()
    }
}

/// Whether the investment currently covers the debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfitOrLoss {
    Profit(U256),
    Loss(U256),
}

/// One full read of a strategy and its dependencies.
#[derive(Debug, Clone)]
pub struct StrategySnapshot {
    pub strategy: StrategyView,
    pub market: MarketView,
    pub investment: InvestmentView,
    pub fetched_at: DateTime<Utc>,
}

impl StrategySnapshot {
    /// Investment value against debt. The report merely displays this
    /// divergence; nothing enforces it.
    pub fn profit_or_loss(&self) -> ProfitOrLoss {
        let value = self.investment.value();
        if value >= self.strategy.debt {
            ProfitOrLoss::Profit(value - self.strategy.debt)
        } else {
            ProfitOrLoss::Loss(self.strategy.debt - value)
        }
    }
}
