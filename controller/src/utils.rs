use common_constants::MIN_HEALTH_FACTOR_WAD;
use common_errors::{LendingError, LendingResult};
use common_math::{to_decimal_wad, wad_zero, Decimal};
use common_proxies::{AssetTransfer, PriceOracle, RiskParameters};
use common_structs::{AccountPosition, Address, HealthFactor, PositionAction};
use num_bigint::BigUint;

use crate::{
    cache::Cache,
    helpers::math::{compute_health_factor, token_value_wad, weighted_value},
    Controller,
};

/// Collateral side of an account, all values WAD based.
#[derive(Clone, Debug, PartialEq)]
pub struct CollateralValues {
    /// Sum of value times liquidation threshold.
    pub weighted_collateral: Decimal,
    pub total_collateral: Decimal,
    /// Sum of value times loan to value.
    pub ltv_collateral: Decimal,
}

impl<O, T> Controller<O, T>
where
    O: PriceOracle,
    T: AssetTransfer + Clone,
{
    /// Real supply of a position, with its reserve projected to now.
    pub(crate) fn supply_amount(&self, position: &AccountPosition) -> LendingResult<Decimal> {
        let pool = self.reserves.pool(&position.asset_id)?;
        Ok(pool.supply_balance_at(&position.scaled_amount_ray, self.timestamp))
    }

    /// Real debt of a position, with its reserve projected to now.
    pub(crate) fn debt_amount(&self, position: &AccountPosition) -> LendingResult<Decimal> {
        let pool = self.reserves.pool(&position.asset_id)?;
        Ok(pool.debt_balance_at(&position.scaled_debt_ray, self.timestamp))
    }

    /// Values the collateral enabled supply positions of `account`.
    pub(crate) fn calculate_collateral_values(
        &self,
        account: &Address,
        cache: &mut Cache,
    ) -> LendingResult<CollateralValues> {
        let mut weighted_collateral = wad_zero();
        let mut total_collateral = wad_zero();
        let mut ltv_collateral = wad_zero();

        for position in self.positions.account_positions(account) {
            if !position.usage_as_collateral || !position.has_supply() {
                continue;
            }
            let price = cache.get_cached_price(&self.oracle, &position.asset_id)?;
            let amount = self.supply_amount(position)?;
            let value = token_value_wad(&amount, &price);

            weighted_collateral += weighted_value(
                &value,
                &self.asset_configs.liquidation_threshold(&position.asset_id)?,
            );
            ltv_collateral +=
                weighted_value(&value, &self.asset_configs.loan_to_value(&position.asset_id)?);
            total_collateral += &value;
        }

        Ok(CollateralValues {
            weighted_collateral,
            total_collateral,
            ltv_collateral,
        })
    }

    /// Total WAD value of the debt of `account`.
    pub(crate) fn calculate_total_borrow(
        &self,
        account: &Address,
        cache: &mut Cache,
    ) -> LendingResult<Decimal> {
        let mut total = wad_zero();
        for position in self.positions.account_positions(account) {
            if !position.has_debt() {
                continue;
            }
            let price = cache.get_cached_price(&self.oracle, &position.asset_id)?;
            let amount = self.debt_amount(position)?;
            total += token_value_wad(&amount, &price);
        }
        Ok(total)
    }

    pub(crate) fn compute_account_health_factor(
        &self,
        account: &Address,
        cache: &mut Cache,
    ) -> LendingResult<HealthFactor> {
        if !self.positions.has_debt(account) {
            return Ok(HealthFactor::Infinite);
        }

        let collateral = self.calculate_collateral_values(account, cache)?;
        let borrowed = self.calculate_total_borrow(account, cache)?;

        Ok(compute_health_factor(
            &collateral.weighted_collateral,
            &borrowed,
        ))
    }

    /// Fails with `HealthFactorBelowThreshold` when `account` has debt and its
    /// health factor is under 1.0. Returns the health factor otherwise.
    pub(crate) fn validate_is_healthy(
        &self,
        account: &Address,
        cache: &mut Cache,
    ) -> LendingResult<HealthFactor> {
        let health_factor = self.compute_account_health_factor(account, cache)?;

        let min_health_factor = to_decimal_wad(BigUint::from(MIN_HEALTH_FACTOR_WAD));
        if !health_factor.is_at_least(&min_health_factor) {
            return Err(LendingError::HealthFactorBelowThreshold);
        }

        Ok(health_factor)
    }

    /// Stores `position` and emits its update.
    pub(crate) fn update_position(
        &mut self,
        position: AccountPosition,
        amount: &Decimal,
        action: PositionAction,
        caller: Option<&Address>,
    ) {
        common_events::update_position_event(amount, &position, action, caller);
        self.positions.store(position);
    }

    /// Clears the collateral flag of a position left without supply.
    pub(crate) fn reconcile_collateral_flag(&mut self, position: &AccountPosition) {
        if self
            .positions
            .auto_reconcile_flag(&position.asset_id, &position.account)
        {
            if let Some(updated) = self.positions.get(&position.asset_id, &position.account) {
                common_events::update_position_event(
                    &Decimal::zero(0),
                    updated,
                    PositionAction::CollateralToggle,
                    None,
                );
            }
        }
    }
}
