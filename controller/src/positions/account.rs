use common_errors::LendingResult;
use common_math::Decimal;
use common_proxies::{AssetTransfer, PriceOracle};
use common_structs::{Address, AssetId, PositionAction};

use crate::{cache::Cache, Controller};

impl<O, T> Controller<O, T>
where
    O: PriceOracle,
    T: AssetTransfer + Clone,
{
    /// Turns the collateral usage of a supply position on or off.
    ///
    /// Enabling requires a nonzero balance; disabling must leave the account
    /// healthy.
    pub fn set_collateral_usage(
        &mut self,
        caller: &Address,
        asset: &AssetId,
        enabled: bool,
    ) -> LendingResult<()> {
        self.reentrancy_guard()?;
        self.require_asset_supported(asset)?;

        let previous = self.positions.get(asset, caller).cloned();
        self.positions.set_collateral_flag(asset, caller, enabled)?;

        if !enabled {
            let mut cache = Cache::new();
            if let Err(err) = self.validate_is_healthy(caller, &mut cache) {
                self.positions.restore(asset, caller, previous);
                return Err(err);
            }
        }

        if let Some(position) = self.positions.get(asset, caller) {
            common_events::update_position_event(
                &Decimal::zero(0),
                position,
                PositionAction::CollateralToggle,
                Some(caller),
            );
        }
        Ok(())
    }
}
