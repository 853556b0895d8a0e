//! Typed read-only bindings for the external contracts the monitor touches.
//!
//! The contracts themselves live on-chain; these wrappers only encode the
//! view calls and decode the returns. One struct per external interface,
//! one method per view.

use alloy_primitives::{Address, B256, U256};

use crate::chain::abi;
use crate::chain::errors::ChainError;
use crate::chain::transport::Transport;

/// Maker CDP yield strategy.
pub struct StrategyReader<'a> {
    transport: &'a dyn Transport,
    pub address: Address,
}

impl<'a> StrategyReader<'a> {
    pub fn new(transport: &'a dyn Transport, address: Address) -> Self {
        Self { transport, address }
    }

    pub async fn name(&self) -> Result<String, ChainError> {
        let ret = self
            .transport
            .call(self.address, abi::encode_call0("name()"))
            .await?;
        abi::decode_string(&ret)
    }

    pub async fn cdp_id(&self) -> Result<U256, ChainError> {
        let ret = self
            .transport
            .call(self.address, abi::encode_call0("cdpId()"))
            .await?;
        abi::decode_uint(&ret)
    }

    pub async fn ilk(&self) -> Result<B256, ChainError> {
        let ret = self
            .transport
            .call(self.address, abi::encode_call0("ilk()"))
            .await?;
        abi::decode_bytes32(&ret)
    }

    pub async fn want(&self) -> Result<Address, ChainError> {
        let ret = self
            .transport
            .call(self.address, abi::encode_call0("want()"))
            .await?;
        abi::decode_address(&ret)
    }

    pub async fn y_vault(&self) -> Result<Address, ChainError> {
        let ret = self
            .transport
            .call(self.address, abi::encode_call0("yVault()"))
            .await?;
        abi::decode_address(&ret)
    }

    pub async fn balance_of_debt(&self) -> Result<U256, ChainError> {
        let ret = self
            .transport
            .call(self.address, abi::encode_call0("balanceOfDebt()"))
            .await?;
        abi::decode_uint(&ret)
    }

    pub async fn balance_of_maker_vault(&self) -> Result<U256, ChainError> {
        let ret = self
            .transport
            .call(self.address, abi::encode_call0("balanceOfMakerVault()"))
            .await?;
        abi::decode_uint(&ret)
    }

    pub async fn collateralization_ratio(&self) -> Result<U256, ChainError> {
        let ret = self
            .transport
            .call(self.address, abi::encode_call0("collateralizationRatio()"))
            .await?;
        abi::decode_uint(&ret)
    }

    pub async fn rebalance_tolerance(&self) -> Result<U256, ChainError> {
        let ret = self
            .transport
            .call(self.address, abi::encode_call0("rebalanceTolerance()"))
            .await?;
        abi::decode_uint(&ret)
    }

    pub async fn current_maker_vault_ratio(&self) -> Result<U256, ChainError> {
        let ret = self
            .transport
            .call(self.address, abi::encode_call0("getCurrentMakerVaultRatio()"))
            .await?;
        abi::decode_uint(&ret)
    }

    /// `tendTrigger(uint256)` — the gas-credit argument's semantics belong to
    /// the contract; it is forwarded verbatim.
    pub async fn tend_trigger(&self, gas_credit: U256) -> Result<bool, ChainError> {
        let ret = self
            .transport
            .call(
                self.address,
                abi::encode_call("tendTrigger(uint256)", &[abi::word_from_uint(gas_credit)]),
            )
            .await?;
        abi::decode_bool(&ret)
    }
}

/// Yield vault holding the strategy's minted Dai.
pub struct YVaultReader<'a> {
    transport: &'a dyn Transport,
    pub address: Address,
}

impl<'a> YVaultReader<'a> {
    pub fn new(transport: &'a dyn Transport, address: Address) -> Self {
        Self { transport, address }
    }

    pub async fn balance_of(&self, owner: Address) -> Result<U256, ChainError> {
        let ret = self
            .transport
            .call(
                self.address,
                abi::encode_call("balanceOf(address)", &[abi::word_from_address(owner)]),
            )
            .await?;
        abi::decode_uint(&ret)
    }

    pub async fn price_per_share(&self) -> Result<U256, ChainError> {
        let ret = self
            .transport
            .call(self.address, abi::encode_call0("pricePerShare()"))
            .await?;
        abi::decode_uint(&ret)
    }
}

/// Maker price delegate keyed by ilk.
///
/// `getLiquidationRatio` answers at 1e27 fixed-point precision (RAY);
/// everything else in the system is 1e18 (WAD).
pub struct PriceDelegateReader<'a> {
    transport: &'a dyn Transport,
    pub address: Address,
}

impl<'a> PriceDelegateReader<'a> {
    pub fn new(transport: &'a dyn Transport, address: Address) -> Self {
        Self { transport, address }
    }

    pub async fn spot_price(&self, ilk: B256) -> Result<U256, ChainError> {
        let ret = self
            .transport
            .call(
                self.address,
                abi::encode_call("getSpotPrice(bytes32)", &[ilk]),
            )
            .await?;
        abi::decode_uint(&ret)
    }

    pub async fn liquidation_ratio(&self, ilk: B256) -> Result<U256, ChainError> {
        let ret = self
            .transport
            .call(
                self.address,
                abi::encode_call("getLiquidationRatio(bytes32)", &[ilk]),
            )
            .await?;
        abi::decode_uint(&ret)
    }
}

/// ERC-20 metadata for the strategy's want token.
pub struct Erc20Reader<'a> {
    transport: &'a dyn Transport,
    pub address: Address,
}

impl<'a> Erc20Reader<'a> {
    pub fn new(transport: &'a dyn Transport, address: Address) -> Self {
        Self { transport, address }
    }

    pub async fn symbol(&self) -> Result<String, ChainError> {
        let ret = self
            .transport
            .call(self.address, abi::encode_call0("symbol()"))
            .await?;
        abi::decode_string(&ret)
    }

    pub async fn decimals(&self) -> Result<u8, ChainError> {
        let ret = self
            .transport
            .call(self.address, abi::encode_call0("decimals()"))
            .await?;
        abi::decode_uint(&ret)?
            .try_into()
            .map_err(|_| ChainError::Decode("decimals out of range".to_string()))
    }
}
