use common_errors::{LendingError, LendingResult};
use common_proxies::{AssetTransfer, PriceOracle};
use common_structs::{Address, AssetId, PositionAction};
use num_bigint::BigUint;
use num_traits::Zero;

use crate::Controller;

impl<O, T> Controller<O, T>
where
    O: PriceOracle,
    T: AssetTransfer + Clone,
{
    /// Repays debt in `asset` on behalf of `caller`.
    ///
    /// Any amount above the outstanding debt is refunded; the refunded
    /// amount is returned.
    pub fn repay(
        &mut self,
        caller: &Address,
        asset: &AssetId,
        amount: &BigUint,
    ) -> LendingResult<BigUint> {
        self.reentrancy_guard()?;
        self.validate_payment(asset, amount)?;

        let mut position = self
            .positions
            .get(asset, caller)
            .cloned()
            .ok_or(LendingError::NoDebtToRepay)?;

        if self.tokens.balance_of(asset, caller) < *amount {
            return Err(LendingError::InsufficientFunds);
        }

        let (repaid, over_paid) = self
            .reserves
            .repay(asset, &mut position, amount, self.timestamp)?;

        let reserve = Address::reserve(asset);
        self.tokens.transfer(asset, caller, &reserve, amount)?;
        let over_paid = over_paid.into_raw();
        if !over_paid.is_zero() {
            self.tokens.transfer(asset, &reserve, caller, &over_paid)?;
        }

        self.update_position(position, &repaid, PositionAction::Repay, Some(caller));
        Ok(over_paid)
    }
}
