use std::collections::BTreeMap;

use common_errors::{LendingError, LendingResult};
use common_rates::{InterestRateStrategy, PiecewiseRateModel};
use common_structs::{AssetId, MarketParams};
use tracing::debug;

pub mod cache;
pub mod liquidity;
pub mod storage;
pub mod utils;
pub mod view;

pub use cache::Cache;
pub use storage::MarketState;

/// One reserve: its persisted state, its market parameters and the strategy
/// that reports its borrow rate.
pub struct LiquidityPool {
    pub(crate) state: MarketState,
    pub(crate) params: MarketParams,
    pub(crate) strategy: Box<dyn InterestRateStrategy>,
}

impl LiquidityPool {
    /// Initializes an empty reserve with both indexes at `RAY`.
    pub fn new(
        params: MarketParams,
        strategy: Box<dyn InterestRateStrategy>,
        timestamp: u64,
    ) -> Self {
        LiquidityPool {
            state: MarketState::new(&params, timestamp),
            params,
            strategy,
        }
    }

    /// Reserve driven by the three slope curve of its own parameters.
    pub fn with_rate_model(params: MarketParams, timestamp: u64) -> Self {
        let strategy = Box::new(PiecewiseRateModel::new(params.clone()));
        Self::new(params, strategy, timestamp)
    }

    pub fn state(&self) -> &MarketState {
        &self.state
    }

    pub fn params(&self) -> &MarketParams {
        &self.params
    }

    pub fn strategy(&self) -> &dyn InterestRateStrategy {
        self.strategy.as_ref()
    }
}

/// Exclusive owner of every reserve, keyed by asset.
#[derive(Default)]
pub struct ReserveLedger {
    pools: BTreeMap<AssetId, LiquidityPool>,
}

impl ReserveLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_market(&mut self, pool: LiquidityPool) -> LendingResult<()> {
        let asset = pool.params.asset_id.clone();
        if self.pools.contains_key(&asset) {
            return Err(LendingError::AssetAlreadySupported);
        }
        pool.params.validate()?;
        self.pools.insert(asset, pool);
        Ok(())
    }

    pub fn contains(&self, asset: &AssetId) -> bool {
        self.pools.contains_key(asset)
    }

    pub fn assets(&self) -> impl Iterator<Item = &AssetId> {
        self.pools.keys()
    }

    pub fn pool(&self, asset: &AssetId) -> LendingResult<&LiquidityPool> {
        self.pools.get(asset).ok_or(LendingError::AssetNotSupported)
    }

    pub(crate) fn pool_mut(&mut self, asset: &AssetId) -> LendingResult<&mut LiquidityPool> {
        self.pools
            .get_mut(asset)
            .ok_or(LendingError::AssetNotSupported)
    }

    pub fn market_state(&self, asset: &AssetId) -> LendingResult<&MarketState> {
        Ok(&self.pool(asset)?.state)
    }

    /// Overwrites the state of a reserve with one taken earlier through
    /// [`ReserveLedger::market_state`].
    pub fn restore(&mut self, asset: &AssetId, state: MarketState) -> LendingResult<()> {
        self.pool_mut(asset)?.state = state;
        debug!(%asset, "reserve state restored");
        Ok(())
    }

    pub fn set_active(&mut self, asset: &AssetId, is_active: bool) -> LendingResult<()> {
        let state = &mut self.pool_mut(asset)?.state;
        state.is_active = is_active;
        common_events::update_reserve_status_event(asset, state.is_active, state.is_frozen);
        Ok(())
    }

    pub fn set_frozen(&mut self, asset: &AssetId, is_frozen: bool) -> LendingResult<()> {
        let state = &mut self.pool_mut(asset)?.state;
        state.is_frozen = is_frozen;
        common_events::update_reserve_status_event(asset, state.is_active, state.is_frozen);
        Ok(())
    }
}
