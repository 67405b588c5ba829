use common_errors::{LendingError, LendingResult};
use common_proxies::{AssetTransfer, PriceOracle};
use common_structs::{Address, AssetId, PositionAction};
use num_bigint::BigUint;
use tracing::debug;

use crate::{cache::Cache, Controller};

impl<O, T> Controller<O, T>
where
    O: PriceOracle,
    T: AssetTransfer + Clone,
{
    /// Withdraws `amount` of `asset` back to `caller`.
    ///
    /// Returns the amount sent. The collateral flag is cleared when the
    /// position is emptied, and the account must stay healthy afterwards.
    pub fn withdraw(
        &mut self,
        caller: &Address,
        asset: &AssetId,
        amount: &BigUint,
    ) -> LendingResult<BigUint> {
        self.reentrancy_guard()?;
        self.validate_payment(asset, amount)?;

        let checkpoint = self.checkpoint(&[asset], caller)?;
        match self.process_withdrawal(caller, asset, amount) {
            Ok(withdrawn) => Ok(withdrawn),
            Err(err) => {
                debug!(%asset, error = %err, "withdraw rolled back");
                self.rollback(checkpoint)?;
                Err(err)
            },
        }
    }

    fn process_withdrawal(
        &mut self,
        caller: &Address,
        asset: &AssetId,
        amount: &BigUint,
    ) -> LendingResult<BigUint> {
        let mut position = self
            .positions
            .get(asset, caller)
            .cloned()
            .ok_or(LendingError::InsufficientBalance)?;

        let withdrawn = self
            .reserves
            .debit(asset, &mut position, amount, self.timestamp)?;
        let snapshot = position.clone();
        self.update_position(position, &withdrawn, PositionAction::Withdraw, Some(caller));
        self.reconcile_collateral_flag(&snapshot);

        let mut cache = Cache::new();
        self.validate_is_healthy(caller, &mut cache)?;

        let withdrawn = withdrawn.into_raw();
        self.tokens
            .transfer(asset, &Address::reserve(asset), caller, &withdrawn)?;

        Ok(withdrawn)
    }
}
