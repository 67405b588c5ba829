use common_errors::{LendingError, LendingResult};
use common_proxies::{AssetTransfer, PriceOracle};
use common_structs::{Address, AssetId, PositionAction};
use num_bigint::BigUint;

use crate::Controller;

impl<O, T> Controller<O, T>
where
    O: PriceOracle,
    T: AssetTransfer + Clone,
{
    /// Deposits `amount` of `asset` from `caller` into its reserve.
    ///
    /// The first deposit into a collateralizable asset enables the position's
    /// collateral flag; later deposits keep whatever the user chose.
    ///
    /// # Errors
    /// - `ReentrantCall`, `AssetNotSupported`, `AmountMustBeGreaterThanZero`.
    /// - `ReserveInactive` / `ReserveFrozen` from the reserve.
    /// - `InsufficientFunds` when `caller` does not hold `amount`.
    pub fn supply(
        &mut self,
        caller: &Address,
        asset: &AssetId,
        amount: &BigUint,
    ) -> LendingResult<()> {
        self.reentrancy_guard()?;
        self.validate_payment(asset, amount)?;
        let can_supply = self.asset_configs.get(asset)?.can_supply();

        if self.tokens.balance_of(asset, caller) < *amount {
            return Err(LendingError::InsufficientFunds);
        }

        let mut position = self.positions.get_or_new(asset, caller);
        let is_first_deposit = !position.has_supply();

        let credited = self
            .reserves
            .credit(asset, &mut position, amount, self.timestamp)?;
        self.tokens
            .transfer(asset, caller, &Address::reserve(asset), amount)?;

        if is_first_deposit && can_supply {
            position.usage_as_collateral = true;
        }

        self.update_position(position, &credited, PositionAction::Supply, Some(caller));
        Ok(())
    }
}
