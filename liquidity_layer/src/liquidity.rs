use common_errors::{LendingError, LendingResult};
use common_math::Decimal;
use common_structs::{AccountPosition, AssetId, MarketIndex};
use num_bigint::BigUint;

use crate::{
    cache::Cache,
    utils::{
        determine_gross_withdrawal_amounts, determine_repayment_details, emit_market_update,
        global_sync,
    },
    ReserveLedger,
};

/// Balance affecting operations of the reserve ledger.
///
/// Every operation accrues the reserve to `now` first and works on scaled
/// amounts derived from the freshly accrued indexes. Validation failures
/// return before anything is committed, so a failed call leaves both the
/// reserve and the position untouched.
impl ReserveLedger {
    /// Accrues interest on `asset` up to `now`. Calling it again with the same
    /// `now` returns the same indexes.
    pub fn accrue(&mut self, asset: &AssetId, now: u64) -> LendingResult<MarketIndex> {
        let mut cache = Cache::new(self.pool_mut(asset)?, now);

        global_sync(&mut cache);
        emit_market_update(&cache);

        let index = cache.market_index();
        cache.commit();
        Ok(index)
    }

    /// Removes `amount` (raw units) from a supply position and from the
    /// reserve's liquidity. Returns the real amount debited.
    pub fn debit(
        &mut self,
        asset: &AssetId,
        position: &mut AccountPosition,
        amount: &BigUint,
        now: u64,
    ) -> LendingResult<Decimal> {
        let mut cache = Cache::new(self.pool_mut(asset)?, now);
        if !cache.is_active {
            return Err(LendingError::ReserveInactive);
        }

        global_sync(&mut cache);

        let requested = cache.get_decimal_value(amount);
        let current_supply = cache.original_supply(&position.scaled_amount_ray);
        if requested > current_supply {
            return Err(LendingError::InsufficientBalance);
        }

        let (scaled_amount, amount) =
            determine_gross_withdrawal_amounts(&cache, &position.scaled_amount_ray, &requested);

        if !cache.has_reserves(&amount) {
            return Err(LendingError::InsufficientLiquidity);
        }

        cache.supplied = cache.supplied.saturating_sub(&scaled_amount);
        cache.reserves -= &amount;
        position.scaled_amount_ray -= &scaled_amount;

        emit_market_update(&cache);
        cache.commit();
        Ok(amount)
    }

    /// Adds `amount` (raw units) to a supply position and to the reserve's
    /// liquidity. Returns the real amount credited.
    pub fn credit(
        &mut self,
        asset: &AssetId,
        position: &mut AccountPosition,
        amount: &BigUint,
        now: u64,
    ) -> LendingResult<Decimal> {
        let mut cache = Cache::new(self.pool_mut(asset)?, now);
        if !cache.is_active {
            return Err(LendingError::ReserveInactive);
        }
        if cache.is_frozen {
            return Err(LendingError::ReserveFrozen);
        }

        global_sync(&mut cache);

        let amount = cache.get_decimal_value(amount);
        let scaled_amount = cache.scaled_supply(&amount);

        position.scaled_amount_ray += &scaled_amount;
        cache.supplied += &scaled_amount;
        cache.reserves += &amount;

        emit_market_update(&cache);
        cache.commit();
        Ok(amount)
    }

    /// Lends `amount` out of the reserve and records the debt on `position`.
    pub fn borrow(
        &mut self,
        asset: &AssetId,
        position: &mut AccountPosition,
        amount: &BigUint,
        now: u64,
    ) -> LendingResult<Decimal> {
        let mut cache = Cache::new(self.pool_mut(asset)?, now);
        if !cache.is_active {
            return Err(LendingError::ReserveInactive);
        }
        if cache.is_frozen {
            return Err(LendingError::ReserveFrozen);
        }

        global_sync(&mut cache);

        let amount = cache.get_decimal_value(amount);
        if !cache.has_reserves(&amount) {
            return Err(LendingError::InsufficientLiquidity);
        }

        let scaled_amount = cache.scaled_borrow(&amount);
        position.scaled_debt_ray += &scaled_amount;
        cache.borrowed += &scaled_amount;
        cache.reserves -= &amount;

        emit_market_update(&cache);
        cache.commit();
        Ok(amount)
    }

    /// Applies a payment of `amount` against the debt on `position`.
    /// Returns `(repaid, over_paid)`; the caller refunds `over_paid`.
    pub fn repay(
        &mut self,
        asset: &AssetId,
        position: &mut AccountPosition,
        amount: &BigUint,
        now: u64,
    ) -> LendingResult<(Decimal, Decimal)> {
        let mut cache = Cache::new(self.pool_mut(asset)?, now);
        if !cache.is_active {
            return Err(LendingError::ReserveInactive);
        }
        if !position.has_debt() {
            return Err(LendingError::NoDebtToRepay);
        }

        global_sync(&mut cache);

        let payment = cache.get_decimal_value(amount);
        let (scaled_amount, over_paid) =
            determine_repayment_details(&cache, &position.scaled_debt_ray, &payment);
        let repaid = payment - &over_paid;

        position.scaled_debt_ray -= &scaled_amount;
        cache.borrowed = cache.borrowed.saturating_sub(&scaled_amount);
        cache.reserves += &repaid;

        emit_market_update(&cache);
        cache.commit();
        Ok((repaid, over_paid))
    }
}
