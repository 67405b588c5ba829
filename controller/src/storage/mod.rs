use std::collections::BTreeMap;

use common_errors::{LendingError, LendingResult};
use common_math::Decimal;
use common_proxies::RiskParameters;
use common_structs::{AccountPosition, Address, AssetConfig, AssetId};

/// Exclusive owner of every `(asset, account)` position.
///
/// A position without supply and debt is never stored, and a stored position
/// with zero supply never has its collateral flag set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionTracker {
    positions: BTreeMap<(AssetId, Address), AccountPosition>,
}

impl PositionTracker {
    pub fn get(&self, asset: &AssetId, account: &Address) -> Option<&AccountPosition> {
        self.positions.get(&(asset.clone(), *account))
    }

    /// The stored position, or a fresh empty one.
    pub fn get_or_new(&self, asset: &AssetId, account: &Address) -> AccountPosition {
        self.get(asset, account)
            .cloned()
            .unwrap_or_else(|| AccountPosition::new(asset.clone(), *account))
    }

    pub fn store(&mut self, position: AccountPosition) {
        let key = (position.asset_id.clone(), position.account);
        if position.is_empty() {
            self.positions.remove(&key);
        } else {
            self.positions.insert(key, position);
        }
    }

    /// Puts back a position read earlier with [`PositionTracker::get`].
    pub fn restore(
        &mut self,
        asset: &AssetId,
        account: &Address,
        previous: Option<AccountPosition>,
    ) {
        let key = (asset.clone(), *account);
        match previous {
            Some(position) => {
                self.positions.insert(key, position);
            },
            None => {
                self.positions.remove(&key);
            },
        }
    }

    pub fn account_positions<'a>(
        &'a self,
        account: &'a Address,
    ) -> impl Iterator<Item = &'a AccountPosition> + 'a {
        self.positions
            .values()
            .filter(move |position| position.account == *account)
    }

    pub fn has_debt(&self, account: &Address) -> bool {
        self.account_positions(account).any(AccountPosition::has_debt)
    }

    pub fn is_collateral_enabled(&self, asset: &AssetId, account: &Address) -> bool {
        self.get(asset, account)
            .map(|position| position.usage_as_collateral)
            .unwrap_or(false)
    }

    /// Sets the collateral flag. Enabling fails on a position without supply.
    pub fn set_collateral_flag(
        &mut self,
        asset: &AssetId,
        account: &Address,
        enabled: bool,
    ) -> LendingResult<()> {
        match self.positions.get_mut(&(asset.clone(), *account)) {
            Some(position) if position.has_supply() || !enabled => {
                position.usage_as_collateral = enabled;
                Ok(())
            },
            Some(_) => Err(LendingError::CollateralWithZeroBalance),
            None if enabled => Err(LendingError::CollateralWithZeroBalance),
            None => Ok(()),
        }
    }

    /// Clears the collateral flag of a position left without supply.
    /// Returns whether the flag changed.
    pub fn auto_reconcile_flag(&mut self, asset: &AssetId, account: &Address) -> bool {
        match self.positions.get_mut(&(asset.clone(), *account)) {
            Some(position) if !position.has_supply() && position.usage_as_collateral => {
                position.usage_as_collateral = false;
                true
            },
            _ => false,
        }
    }
}

/// Risk parameters per supported asset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssetConfigs {
    configs: BTreeMap<AssetId, AssetConfig>,
}

impl AssetConfigs {
    pub fn get(&self, asset: &AssetId) -> LendingResult<&AssetConfig> {
        self.configs.get(asset).ok_or(LendingError::AssetNotSupported)
    }

    pub fn insert(&mut self, asset: AssetId, config: AssetConfig) {
        self.configs.insert(asset, config);
    }
}

impl RiskParameters for AssetConfigs {
    fn liquidation_threshold(&self, asset: &AssetId) -> LendingResult<Decimal> {
        Ok(self.get(asset)?.liquidation_threshold_bps.clone())
    }

    fn loan_to_value(&self, asset: &AssetId) -> LendingResult<Decimal> {
        Ok(self.get(asset)?.loan_to_value_bps.clone())
    }
}
