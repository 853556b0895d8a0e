//! Shared scenario fixtures: named actors and a programmable in-memory
//! chain answering `eth_call`s from canned contract state.
//!
//! The simulated chain decodes real calldata and encodes real return data,
//! so every scenario exercises the production ABI codec and reader paths.
//! It never recomputes protocol math: tests set the post-condition state
//! their own model predicts, then assert the pipeline observes it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;

use maker_cdp_monitor::chain::abi;
use maker_cdp_monitor::chain::errors::ChainError;
use maker_cdp_monitor::chain::transport::Transport;
use maker_cdp_monitor::monitor::views::{ray, wad};

// =============================================================================
// Well-known fixture addresses
// =============================================================================

pub const WANT_TOKEN: Address = Address::repeat_byte(0x11);
pub const DAI_TOKEN: Address = Address::repeat_byte(0x12);
pub const YVAULT: Address = Address::repeat_byte(0x21);
pub const PRICE_DELEGATE: Address = Address::repeat_byte(0x31);
pub const STRATEGY: Address = Address::repeat_byte(0x41);

/// "ETH-C" left-aligned in a bytes32, Maker's ilk encoding.
pub fn ilk_eth_c() -> B256 {
    let mut raw = [0u8; 32];
    raw[..5].copy_from_slice(b"ETH-C");
    B256::new(raw)
}

// =============================================================================
// Actors
// =============================================================================

/// The fixed role set every scenario gets.
#[derive(Debug, Clone, Copy)]
pub struct Actors {
    pub gov: Address,
    pub strategist: Address,
    pub management: Address,
    pub guardian: Address,
    pub keeper: Address,
    pub user: Address,
    pub token_whale: Address,
    pub dai_whale: Address,
}

pub fn actors() -> Actors {
    Actors {
        gov: Address::repeat_byte(0xA0),
        strategist: Address::repeat_byte(0xA1),
        management: Address::repeat_byte(0xA2),
        guardian: Address::repeat_byte(0xA3),
        keeper: Address::repeat_byte(0xA4),
        user: Address::repeat_byte(0xA5),
        token_whale: Address::repeat_byte(0xB0),
        dai_whale: Address::repeat_byte(0xB1),
    }
}

// =============================================================================
// Canned contract state
// =============================================================================

#[derive(Debug, Clone)]
pub struct TokenState {
    pub symbol: String,
    pub decimals: u8,
    pub balances: HashMap<Address, U256>,
}

#[derive(Debug, Clone)]
pub struct VaultState {
    pub balances: HashMap<Address, U256>,
    pub price_per_share: U256,
}

#[derive(Debug, Clone)]
pub struct DelegateState {
    pub ilk: B256,
    pub spot_price: U256,
    pub liquidation_ratio: U256,
}

#[derive(Debug, Clone)]
pub struct StrategyState {
    pub name: String,
    pub cdp_id: U256,
    pub ilk: B256,
    pub want: Address,
    pub y_vault: Address,
    pub target_ratio: U256,
    pub rebalance_tolerance: U256,
    pub current_ratio: U256,
    pub debt: U256,
    pub collateral: U256,
    pub tend_trigger: bool,
}

#[derive(Default)]
struct Inner {
    tokens: HashMap<Address, TokenState>,
    vaults: HashMap<Address, VaultState>,
    delegates: HashMap<Address, DelegateState>,
    strategies: HashMap<Address, StrategyState>,
    reverts: HashMap<Address, String>,
}

/// In-memory chain implementing the production transport seam.
pub struct SimChain {
    inner: Mutex<Inner>,
}

impl SimChain {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn register_token(&self, address: Address, symbol: &str, decimals: u8) {
        self.inner.lock().unwrap().tokens.insert(
            address,
            TokenState {
                symbol: symbol.to_string(),
                decimals,
                balances: HashMap::new(),
            },
        );
    }

    /// Credit a balance out of nowhere, the fixture analog of impersonating
    /// a whale holder.
    pub fn fund_token(&self, token: Address, owner: Address, amount: U256) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(state) = inner.tokens.get_mut(&token) {
            *state.balances.entry(owner).or_insert(U256::ZERO) += amount;
        }
    }

    pub fn register_vault(&self, address: Address, price_per_share: U256) {
        self.inner.lock().unwrap().vaults.insert(
            address,
            VaultState {
                balances: HashMap::new(),
                price_per_share,
            },
        );
    }

    pub fn set_vault_shares(&self, vault: Address, owner: Address, shares: U256) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(state) = inner.vaults.get_mut(&vault) {
            state.balances.insert(owner, shares);
        }
    }

    pub fn set_price_per_share(&self, vault: Address, price_per_share: U256) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(state) = inner.vaults.get_mut(&vault) {
            state.price_per_share = price_per_share;
        }
    }

    pub fn register_delegate(&self, address: Address, state: DelegateState) {
        self.inner.lock().unwrap().delegates.insert(address, state);
    }

    pub fn set_spot_price(&self, delegate: Address, spot_price: U256) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(state) = inner.delegates.get_mut(&delegate) {
            state.spot_price = spot_price;
        }
    }

    pub fn register_strategy(&self, address: Address, state: StrategyState) {
        self.inner.lock().unwrap().strategies.insert(address, state);
    }

    /// Mutate the canned strategy state between reads.
    pub fn update_strategy<F>(&self, address: Address, update: F)
    where
        F: FnOnce(&mut StrategyState),
    {
        let mut inner = self.inner.lock().unwrap();
        if let Some(state) = inner.strategies.get_mut(&address) {
            update(state);
        }
    }

    pub fn strategy_state(&self, address: Address) -> StrategyState {
        self.inner.lock().unwrap().strategies[&address].clone()
    }

    /// Force every call to this address to revert with the given reason.
    pub fn force_revert(&self, address: Address, reason: &str) {
        self.inner
            .lock()
            .unwrap()
            .reverts
            .insert(address, reason.to_string());
    }

    fn dispatch(&self, to: Address, data: &[u8]) -> Result<Bytes, ChainError> {
        let inner = self.inner.lock().unwrap();

        if let Some(reason) = inner.reverts.get(&to) {
            return Err(ChainError::Revert(reason.clone()));
        }

        let sel: [u8; 4] = data
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| ChainError::Decode("calldata shorter than a selector".to_string()))?;

        if let Some(s) = inner.strategies.get(&to) {
            return dispatch_strategy(s, sel, data);
        }
        if let Some(t) = inner.tokens.get(&to) {
            return dispatch_token(t, sel, data);
        }
        if let Some(v) = inner.vaults.get(&to) {
            return dispatch_vault(v, sel, data);
        }
        if let Some(d) = inner.delegates.get(&to) {
            return dispatch_delegate(d, sel, data);
        }

        // Calls to an address with no code return empty data, like a node.
        Ok(Bytes::new())
    }
}

#[async_trait]
impl Transport for SimChain {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainError> {
        self.dispatch(to, &data)
    }
}

// =============================================================================
// Per-contract dispatch
// =============================================================================

fn uint_ret(value: U256) -> Result<Bytes, ChainError> {
    Ok(Bytes::from(abi::word_from_uint(value).to_vec()))
}

fn address_ret(value: Address) -> Result<Bytes, ChainError> {
    Ok(Bytes::from(abi::word_from_address(value).to_vec()))
}

fn bool_ret(value: bool) -> Result<Bytes, ChainError> {
    uint_ret(if value { U256::from(1u64) } else { U256::ZERO })
}

fn bytes32_ret(value: B256) -> Result<Bytes, ChainError> {
    Ok(Bytes::from(value.to_vec()))
}

fn string_ret(value: &str) -> Result<Bytes, ChainError> {
    Ok(abi::encode_string(value))
}

fn arg_word(data: &[u8]) -> Result<[u8; 32], ChainError> {
    data.get(4..36)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| ChainError::Decode("missing argument word".to_string()))
}

fn dispatch_strategy(
    s: &StrategyState,
    sel: [u8; 4],
    data: &[u8],
) -> Result<Bytes, ChainError> {
    if sel == abi::selector("name()") {
        string_ret(&s.name)
    } else if sel == abi::selector("cdpId()") {
        uint_ret(s.cdp_id)
    } else if sel == abi::selector("ilk()") {
        bytes32_ret(s.ilk)
    } else if sel == abi::selector("want()") {
        address_ret(s.want)
    } else if sel == abi::selector("yVault()") {
        address_ret(s.y_vault)
    } else if sel == abi::selector("balanceOfDebt()") {
        uint_ret(s.debt)
    } else if sel == abi::selector("balanceOfMakerVault()") {
        uint_ret(s.collateral)
    } else if sel == abi::selector("collateralizationRatio()") {
        uint_ret(s.target_ratio)
    } else if sel == abi::selector("rebalanceTolerance()") {
        uint_ret(s.rebalance_tolerance)
    } else if sel == abi::selector("getCurrentMakerVaultRatio()") {
        uint_ret(s.current_ratio)
    } else if sel == abi::selector("tendTrigger(uint256)") {
        arg_word(data)?;
        bool_ret(s.tend_trigger)
    } else {
        Err(ChainError::Revert("unknown function".to_string()))
    }
}

fn dispatch_token(t: &TokenState, sel: [u8; 4], data: &[u8]) -> Result<Bytes, ChainError> {
    if sel == abi::selector("symbol()") {
        string_ret(&t.symbol)
    } else if sel == abi::selector("decimals()") {
        uint_ret(U256::from(t.decimals))
    } else if sel == abi::selector("balanceOf(address)") {
        let owner = Address::from_slice(&arg_word(data)?[12..]);
        uint_ret(t.balances.get(&owner).copied().unwrap_or(U256::ZERO))
    } else {
        Err(ChainError::Revert("unknown function".to_string()))
    }
}

fn dispatch_vault(v: &VaultState, sel: [u8; 4], data: &[u8]) -> Result<Bytes, ChainError> {
    if sel == abi::selector("balanceOf(address)") {
        let owner = Address::from_slice(&arg_word(data)?[12..]);
        uint_ret(v.balances.get(&owner).copied().unwrap_or(U256::ZERO))
    } else if sel == abi::selector("pricePerShare()") {
        uint_ret(v.price_per_share)
    } else {
        Err(ChainError::Revert("unknown function".to_string()))
    }
}

fn dispatch_delegate(
    d: &DelegateState,
    sel: [u8; 4],
    data: &[u8],
) -> Result<Bytes, ChainError> {
    let queried = B256::new(arg_word(data)?);
    if queried != d.ilk {
        return Err(ChainError::Revert("unrecognized-ilk".to_string()));
    }
    if sel == abi::selector("getSpotPrice(bytes32)") {
        uint_ret(d.spot_price)
    } else if sel == abi::selector("getLiquidationRatio(bytes32)") {
        uint_ret(d.liquidation_ratio)
    } else {
        Err(ChainError::Revert("unknown function".to_string()))
    }
}

// =============================================================================
// Fixture graph
// =============================================================================

/// A fully wired scenario environment. Built fresh per test.
pub struct Fixture {
    pub chain: SimChain,
    pub actors: Actors,
    pub strategy: Address,
    pub yvault: Address,
    pub want: Address,
    pub price_delegate: Address,
}

/// Dependency-ordered construction: actors, tokens with whale balances,
/// auxiliary contracts, then a freshly "deployed" strategy wired to its
/// vault.
pub fn deploy_fixture() -> Fixture {
    let chain = SimChain::new();
    let actors = actors();

    // Want token (WETH-like), whale-funded.
    chain.register_token(WANT_TOKEN, "WETH", 18);
    chain.fund_token(WANT_TOKEN, actors.token_whale, U256::from(10_000u64) * wad());

    // Dai, whale-funded.
    chain.register_token(DAI_TOKEN, "DAI", 18);
    chain.fund_token(DAI_TOKEN, actors.dai_whale, U256::from(50_000_000u64) * wad());

    // Yield vault at 1.0 price per share.
    chain.register_vault(YVAULT, wad());

    // Price delegate: 2000 Dai spot, 170% liquidation ratio (1e27 scale).
    chain.register_delegate(
        PRICE_DELEGATE,
        DelegateState {
            ilk: ilk_eth_c(),
            spot_price: U256::from(2000u64) * wad(),
            liquidation_ratio: ray() * U256::from(17u64) / U256::from(10u64),
        },
    );

    // Fresh strategy: 250% target, 0.15 tolerance, nothing deposited yet.
    chain.register_strategy(
        STRATEGY,
        StrategyState {
            name: "StrategyMakerV2WETH".to_string(),
            cdp_id: U256::from(3151u64),
            ilk: ilk_eth_c(),
            want: WANT_TOKEN,
            y_vault: YVAULT,
            target_ratio: wad() * U256::from(25u64) / U256::from(10u64),
            rebalance_tolerance: wad() * U256::from(15u64) / U256::from(100u64),
            current_ratio: U256::ZERO,
            debt: U256::ZERO,
            collateral: U256::ZERO,
            tend_trigger: false,
        },
    );

    Fixture {
        chain,
        actors,
        strategy: STRATEGY,
        yvault: YVAULT,
        want: WANT_TOKEN,
        price_delegate: PRICE_DELEGATE,
    }
}

impl Fixture {
    /// Write the post-harvest state the strategy's rules predict for a
    /// collateral deposit: debt = collateral * spot / target ratio, all of
    /// it parked in the vault at the current share price.
    pub fn apply_harvest(&self, collateral: U256) {
        let delegate = {
            let inner = self.chain.inner.lock().unwrap();
            inner.delegates[&self.price_delegate].clone()
        };
        let state = self.chain.strategy_state(self.strategy);

        let debt = collateral * delegate.spot_price / state.target_ratio;
        let price_per_share = {
            let inner = self.chain.inner.lock().unwrap();
            inner.vaults[&self.yvault].price_per_share
        };
        let shares = debt * wad() / price_per_share;

        self.chain.update_strategy(self.strategy, |s| {
            s.collateral = collateral;
            s.debt = debt;
            s.current_ratio = s.target_ratio;
        });
        self.chain.set_vault_shares(self.yvault, self.strategy, shares);
    }
}
