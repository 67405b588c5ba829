pub mod cache;
pub mod config;
pub mod helpers;
pub mod oracle;
pub mod positions;
pub mod storage;
pub mod strategy;
pub mod utils;
pub mod validation;
pub mod views;

pub use common_errors::*;
pub use common_proxies::*;
pub use common_structs::*;
pub use config::{ConfigError, MarketConfig, ProtocolConfig};
pub use oracle::PriceFeeds;
pub use strategy::AdapterContext;

use std::collections::BTreeSet;

use common_tokens::TokenLedger;
use liquidity_layer::ReserveLedger;
use num_bigint::BigUint;
use storage::{AssetConfigs, PositionTracker};

/// The lending pool: reserves, positions and the operations that move value
/// between them.
///
/// All state is owned here and every operation runs to completion before the
/// next one starts. `swap_ongoing` is set while a swap adapter holds control;
/// every entry point refuses to run while it is set. Only adapters listed in
/// `swap_adapters` may take part in a swap.
pub struct Controller<O = PriceFeeds, T = TokenLedger> {
    pub(crate) reserves: ReserveLedger,
    pub(crate) positions: PositionTracker,
    pub(crate) asset_configs: AssetConfigs,
    pub(crate) swap_adapters: BTreeSet<Address>,
    pub(crate) tokens: T,
    pub(crate) oracle: O,
    pub(crate) timestamp: u64,
    pub(crate) swap_ongoing: bool,
}

impl Controller {
    /// A controller with in-memory prices and token balances.
    pub fn new(timestamp: u64) -> Self {
        Controller::with_collaborators(PriceFeeds::new(), TokenLedger::new(), timestamp)
    }
}

impl<O, T> Controller<O, T>
where
    O: PriceOracle,
    T: AssetTransfer + Clone,
{
    pub fn with_collaborators(oracle: O, tokens: T, timestamp: u64) -> Self {
        Controller {
            reserves: ReserveLedger::new(),
            positions: PositionTracker::default(),
            asset_configs: AssetConfigs::default(),
            swap_adapters: BTreeSet::new(),
            tokens,
            oracle,
            timestamp,
            swap_ongoing: false,
        }
    }

    /// Current time in milliseconds, used by every accrual.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn tokens(&self) -> &T {
        &self.tokens
    }

    pub fn tokens_mut(&mut self) -> &mut T {
        &mut self.tokens
    }

    pub fn reserves(&self) -> &ReserveLedger {
        &self.reserves
    }

    pub fn asset_configs(&self) -> &AssetConfigs {
        &self.asset_configs
    }

    pub fn is_swap_adapter(&self, address: &Address) -> bool {
        self.swap_adapters.contains(address)
    }

    pub fn is_swap_ongoing(&self) -> bool {
        self.swap_ongoing
    }

    /// Accrues interest on every listed market up to the current timestamp.
    ///
    /// # Returns
    /// - The refreshed indexes, in the order of `assets`.
    pub fn update_markets(&mut self, assets: &[AssetId]) -> LendingResult<Vec<MarketIndex>> {
        self.reentrancy_guard()?;

        let mut indexes = Vec::with_capacity(assets.len());
        for asset in assets {
            indexes.push(self.reserves.accrue(asset, self.timestamp)?);
        }
        Ok(indexes)
    }
}

impl<O, T> ControllerProxy for Controller<O, T>
where
    O: PriceOracle,
    T: AssetTransfer + Clone,
{
    fn supply(&mut self, caller: &Address, asset: &AssetId, amount: &BigUint) -> LendingResult<()> {
        Controller::supply(self, caller, asset, amount)
    }

    fn withdraw(
        &mut self,
        caller: &Address,
        asset: &AssetId,
        amount: &BigUint,
    ) -> LendingResult<BigUint> {
        Controller::withdraw(self, caller, asset, amount)
    }

    fn swap_liquidity(
        &mut self,
        caller: &Address,
        adapter: &mut dyn SwapAdapter,
        source_asset: &AssetId,
        destination_asset: &AssetId,
        amount: &BigUint,
        params: &[u8],
    ) -> LendingResult<SwapReceipt> {
        Controller::swap_liquidity(
            self,
            caller,
            adapter,
            source_asset,
            destination_asset,
            amount,
            params,
        )
    }

    fn collateral_balance(&self, asset: &AssetId, account: &Address) -> LendingResult<BigUint> {
        Controller::collateral_balance(self, asset, account)
    }
}
