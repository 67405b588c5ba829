use common_errors::{LendingError, LendingResult};
use common_proxies::{AssetTransfer, PriceOracle};
use common_structs::{Address, AssetId, PositionAction};
use num_bigint::BigUint;

use crate::{cache::Cache, helpers::math::token_value_wad, Controller};

impl<O, T> Controller<O, T>
where
    O: PriceOracle,
    T: AssetTransfer + Clone,
{
    /// Borrows `amount` of `asset` against the caller's collateral.
    ///
    /// The loan-to-value weighted collateral must cover the existing debt
    /// plus the new loan, all valued at current prices.
    ///
    /// # Errors
    /// - `AssetNotBorrowable` when the asset is not enabled for loans.
    /// - `InsufficientCollateral` when the LTV check fails.
    /// - `ReserveInactive`, `ReserveFrozen`, `InsufficientLiquidity` from the reserve.
    pub fn borrow(
        &mut self,
        caller: &Address,
        asset: &AssetId,
        amount: &BigUint,
    ) -> LendingResult<()> {
        self.reentrancy_guard()?;
        self.validate_payment(asset, amount)?;
        if !self.asset_configs.get(asset)?.can_borrow() {
            return Err(LendingError::AssetNotBorrowable);
        }

        let mut cache = Cache::new();
        self.validate_borrow_collateral(caller, asset, amount, &mut cache)?;

        let mut position = self.positions.get_or_new(asset, caller);
        let borrowed = self
            .reserves
            .borrow(asset, &mut position, amount, self.timestamp)?;
        self.tokens
            .transfer(asset, &Address::reserve(asset), caller, amount)?;

        self.update_position(position, &borrowed, PositionAction::Borrow, Some(caller));
        Ok(())
    }

    fn validate_borrow_collateral(
        &self,
        caller: &Address,
        asset: &AssetId,
        amount: &BigUint,
        cache: &mut Cache,
    ) -> LendingResult<()> {
        let collateral = self.calculate_collateral_values(caller, cache)?;
        let borrowed = self.calculate_total_borrow(caller, cache)?;

        let decimals = self.reserves.pool(asset)?.params().asset_decimals;
        let price = cache.get_cached_price(&self.oracle, asset)?;
        let new_borrow = token_value_wad(
            &common_math::to_decimal(amount.clone(), decimals),
            &price,
        );

        if collateral.ltv_collateral < borrowed + new_borrow {
            return Err(LendingError::InsufficientCollateral);
        }
        Ok(())
    }
}
