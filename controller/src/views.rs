use common_errors::LendingResult;
use common_math::Decimal;
use common_proxies::{AssetTransfer, PriceOracle};
use common_structs::{AccountPosition, Address, AssetId, HealthFactor, MarketIndex};
use num_bigint::BigUint;
use num_traits::Zero;

use crate::{cache::Cache, Controller};

impl<O, T> Controller<O, T>
where
    O: PriceOracle,
    T: AssetTransfer + Clone,
{
    /// Retrieves the supply balance of `account` in `asset`.
    /// Pure read at the reserve's stored index; no accrual is simulated.
    ///
    /// # Arguments
    /// - `asset`: Asset of the position.
    /// - `account`: Owner of the position.
    ///
    /// # Returns
    /// - Balance in raw asset units, zero when no position exists.
    ///
    /// # Errors
    /// - `ReentrantCall` while a swap holds control.
    /// - `AssetNotSupported` for an unknown asset.
    pub fn collateral_balance(&self, asset: &AssetId, account: &Address) -> LendingResult<BigUint> {
        self.reentrancy_guard()?;
        let pool = self.reserves.pool(asset)?;

        Ok(match self.positions.get(asset, account) {
            Some(position) => pool.original_supply(&position.scaled_amount_ray).into_raw(),
            None => BigUint::zero(),
        })
    }

    /// Retrieves the outstanding debt of `account` in `asset`, at the stored
    /// borrow index.
    ///
    /// # Errors
    /// - `ReentrantCall` while a swap holds control.
    /// - `AssetNotSupported` for an unknown asset.
    pub fn debt_balance(&self, asset: &AssetId, account: &Address) -> LendingResult<BigUint> {
        self.reentrancy_guard()?;
        let pool = self.reserves.pool(asset)?;

        Ok(match self.positions.get(asset, account) {
            Some(position) => pool.original_borrow(&position.scaled_debt_ray).into_raw(),
            None => BigUint::zero(),
        })
    }

    /// Computes the current health factor of an account.
    /// Balances are projected to the controller's clock and valued at the
    /// oracle's current prices.
    ///
    /// # Returns
    /// - `HealthFactor::Infinite` without debt, the WAD ratio otherwise.
    pub fn health_factor(&self, account: &Address) -> LendingResult<HealthFactor> {
        self.reentrancy_guard()?;
        let mut cache = Cache::new();
        self.compute_account_health_factor(account, &mut cache)
    }

    pub fn is_collateral_enabled(&self, asset: &AssetId, account: &Address) -> LendingResult<bool> {
        self.reentrancy_guard()?;
        Ok(self.positions.is_collateral_enabled(asset, account))
    }

    /// Total WAD value of the collateral enabled supply of an account.
    pub fn total_collateral_value(&self, account: &Address) -> LendingResult<Decimal> {
        self.reentrancy_guard()?;
        let mut cache = Cache::new();
        Ok(self
            .calculate_collateral_values(account, &mut cache)?
            .total_collateral)
    }

    /// Total WAD value of the debt of an account.
    pub fn total_borrow_value(&self, account: &Address) -> LendingResult<Decimal> {
        self.reentrancy_guard()?;
        let mut cache = Cache::new();
        self.calculate_total_borrow(account, &mut cache)
    }

    /// Stored position of `account` in `asset`, if any.
    pub fn position(
        &self,
        asset: &AssetId,
        account: &Address,
    ) -> LendingResult<Option<AccountPosition>> {
        self.reentrancy_guard()?;
        Ok(self.positions.get(asset, account).cloned())
    }

    /// Capital utilisation of a market (RAY).
    pub fn utilization(&self, asset: &AssetId) -> LendingResult<Decimal> {
        Ok(self.reserves.pool(asset)?.get_capital_utilisation())
    }

    /// Per-millisecond borrow rate of a market (RAY).
    pub fn borrow_rate(&self, asset: &AssetId) -> LendingResult<Decimal> {
        Ok(self.reserves.pool(asset)?.get_borrow_rate())
    }

    /// Per-millisecond deposit rate of a market (RAY).
    pub fn deposit_rate(&self, asset: &AssetId) -> LendingResult<Decimal> {
        Ok(self.reserves.pool(asset)?.get_deposit_rate())
    }

    /// Indexes the market would have if it were accrued now.
    pub fn market_index(&self, asset: &AssetId) -> LendingResult<MarketIndex> {
        Ok(self.reserves.pool(asset)?.get_indexes_at(self.timestamp))
    }

    /// Liquidity available to withdraw or borrow, in asset decimals.
    pub fn reserves_of(&self, asset: &AssetId) -> LendingResult<Decimal> {
        Ok(self.reserves.pool(asset)?.get_reserves().clone())
    }

    /// Accrued protocol revenue, in asset decimals.
    pub fn protocol_revenue(&self, asset: &AssetId) -> LendingResult<Decimal> {
        Ok(self.reserves.pool(asset)?.get_protocol_revenue())
    }
}
