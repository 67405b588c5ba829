use std::collections::BTreeMap;

use common_errors::{LendingError, LendingResult};
use common_proxies::AssetTransfer;
use common_structs::{Address, AssetId};
use num_bigint::BigUint;
use num_traits::Zero;

/// In-memory fungible balances keyed by `(asset, holder)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenLedger {
    balances: BTreeMap<(AssetId, Address), BigUint>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self, asset: &AssetId, to: &Address, amount: &BigUint) {
        if amount.is_zero() {
            return;
        }
        *self
            .balances
            .entry((asset.clone(), *to))
            .or_insert_with(BigUint::zero) += amount;
    }

    pub fn burn(&mut self, asset: &AssetId, from: &Address, amount: &BigUint) -> LendingResult<()> {
        self.take(asset, from, amount)
    }

    pub fn total_supply(&self, asset: &AssetId) -> BigUint {
        self.balances
            .iter()
            .filter(|((id, _), _)| id == asset)
            .map(|(_, balance)| balance)
            .sum()
    }

    fn take(&mut self, asset: &AssetId, from: &Address, amount: &BigUint) -> LendingResult<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let key = (asset.clone(), *from);
        let balance = self
            .balances
            .get_mut(&key)
            .ok_or(LendingError::InsufficientFunds)?;
        if *balance < *amount {
            return Err(LendingError::InsufficientFunds);
        }
        *balance -= amount;
        if balance.is_zero() {
            self.balances.remove(&key);
        }
        Ok(())
    }
}

impl AssetTransfer for TokenLedger {
    fn transfer(
        &mut self,
        asset: &AssetId,
        from: &Address,
        to: &Address,
        amount: &BigUint,
    ) -> LendingResult<()> {
        self.take(asset, from, amount)?;
        self.mint(asset, to, amount);
        Ok(())
    }

    fn balance_of(&self, asset: &AssetId, holder: &Address) -> BigUint {
        self.balances
            .get(&(asset.clone(), *holder))
            .cloned()
            .unwrap_or_default()
    }
}
