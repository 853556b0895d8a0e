//! Pure report rendering over a strategy snapshot.

use alloy_primitives::U256;

use crate::monitor::views::{ProfitOrLoss, StrategySnapshot};

/// Closing line when the contract's rebalance trigger fires.
pub const REBALANCE_NEEDED: &str =
    "Strategy is outside the tolerance band and should be rebalanced. Call tend()!";

/// Closing line otherwise.
pub const ALL_CLEAR: &str = "Everything looks OK";

/// Render a 1eN fixed-point value with two decimal digits, rounding half-up
/// on the truncated digit. `scale` must be at least 2 (it is 18 everywhere
/// except the 1e27 liquidation ratio).
pub fn format_fixed(value: U256, scale: u32) -> String {
    let divisor = U256::from(10u64).pow(U256::from(scale - 2));
    let hundredths = (value + divisor / U256::from(2u64)) / divisor;
    let whole = hundredths / U256::from(100u64);
    let frac: u64 = (hundredths % U256::from(100u64)).to::<u64>();
    format!("{whole}.{frac:02}")
}

/// The ordered display lines of a health report, matching the operator
/// script's output format.
pub fn render_report(snapshot: &StrategySnapshot) -> Vec<String> {
    let s = &snapshot.strategy;
    let m = &snapshot.market;
    let inv = &snapshot.investment;

    let mut lines = Vec::with_capacity(9);

    lines.push(format!(
        "{} deployed at {} is using CDP {}",
        s.name, s.address, s.cdp_id
    ));
    lines.push(format!(
        "Balance of CDP is {} {} and we owe {} Dai",
        format_fixed(s.collateral, 18),
        s.want_symbol,
        format_fixed(s.debt, 18)
    ));
    lines.push(format!(
        "{} shares in yVault worth {} Dai",
        format_fixed(inv.shares, 18),
        format_fixed(inv.value(), 18)
    ));
    lines.push(match snapshot.profit_or_loss() {
        ProfitOrLoss::Profit(p) => format!("Current profit is {} Dai", format_fixed(p, 18)),
        ProfitOrLoss::Loss(l) => format!("Current loss is {} Dai", format_fixed(l, 18)),
    });
    lines.push(format!(
        "Current {} spot price is {}",
        s.want_symbol,
        format_fixed(m.spot_price, 18)
    ));
    lines.push(format!(
        "Target collateralization ratio is {}",
        format_fixed(s.target_ratio, 18)
    ));
    lines.push(format!(
        "Current CDP ratio is {}",
        format_fixed(s.current_ratio, 18)
    ));
    // Liquidation ratio is the one 1e27-scaled field in the system.
    lines.push(format!(
        "Liquidation ratio is {}",
        format_fixed(m.liquidation_ratio, 27)
    ));
    lines.push(
        if s.needs_rebalance {
            REBALANCE_NEEDED
        } else {
            ALL_CLEAR
        }
        .to_string(),
    );

    lines
}

/// Markdown rendering of the same snapshot, for chat delivery. Carries the
/// rebalance tolerance band, which the plain report folds into the trigger.
pub fn render_markdown(snapshot: &StrategySnapshot) -> String {
    let s = &snapshot.strategy;
    let m = &snapshot.market;
    let inv = &snapshot.investment;

    let pnl = match snapshot.profit_or_loss() {
        ProfitOrLoss::Profit(p) => format!("+{} Dai", format_fixed(p, 18)),
        ProfitOrLoss::Loss(l) => format!("-{} Dai", format_fixed(l, 18)),
    };

    let mut out = String::new();
    out.push_str(&format!("## {}\n\n", s.name));
    out.push_str("| Metric | Value |\n| --- | --- |\n");
    out.push_str(&format!("| Address | {} |\n", s.address));
    out.push_str(&format!("| CDP | {} |\n", s.cdp_id));
    out.push_str(&format!(
        "| Collateral | {} {} |\n",
        format_fixed(s.collateral, 18),
        s.want_symbol
    ));
    out.push_str(&format!("| Debt | {} Dai |\n", format_fixed(s.debt, 18)));
    out.push_str(&format!(
        "| yVault shares | {} |\n",
        format_fixed(inv.shares, 18)
    ));
    out.push_str(&format!(
        "| Invested value | {} Dai |\n",
        format_fixed(inv.value(), 18)
    ));
    out.push_str(&format!("| Profit/Loss | {pnl} |\n"));
    out.push_str(&format!(
        "| {} spot price | {} Dai |\n",
        s.want_symbol,
        format_fixed(m.spot_price, 18)
    ));
    out.push_str(&format!(
        "| Target ratio | {} |\n",
        format_fixed(s.target_ratio, 18)
    ));
    out.push_str(&format!(
        "| Rebalance tolerance | {} |\n",
        format_fixed(s.rebalance_tolerance, 18)
    ));
    out.push_str(&format!(
        "| Current ratio | {} |\n",
        format_fixed(s.current_ratio, 18)
    ));
    out.push_str(&format!(
        "| Liquidation ratio | {} |\n",
        format_fixed(m.liquidation_ratio, 27)
    ));
    out.push_str(&format!(
        "| Rebalance needed | {} |\n",
        if s.needs_rebalance { "yes" } else { "no" }
    ));
    out
}
