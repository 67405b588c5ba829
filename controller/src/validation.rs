use common_errors::{LendingError, LendingResult};
use common_proxies::{AssetTransfer, PriceOracle};
use common_structs::{Address, AssetConfig, AssetId, SwapRequest};
use num_bigint::BigUint;
use num_traits::Zero;

use crate::Controller;

impl<O, T> Controller<O, T>
where
    O: PriceOracle,
    T: AssetTransfer + Clone,
{
    /// Rejects any call made while a swap adapter holds control.
    pub(crate) fn reentrancy_guard(&self) -> LendingResult<()> {
        if self.swap_ongoing {
            return Err(LendingError::ReentrantCall);
        }
        Ok(())
    }

    /// Ensures an asset has a reserve and returns its risk parameters.
    pub(crate) fn require_asset_supported(&self, asset: &AssetId) -> LendingResult<&AssetConfig> {
        if !self.reserves.contains(asset) {
            return Err(LendingError::AssetNotSupported);
        }
        self.asset_configs.get(asset)
    }

    pub(crate) fn require_amount_greater_than_zero(&self, amount: &BigUint) -> LendingResult<()> {
        if amount.is_zero() {
            return Err(LendingError::AmountMustBeGreaterThanZero);
        }
        Ok(())
    }

    /// Validates a supported asset and a nonzero amount.
    pub(crate) fn validate_payment(&self, asset: &AssetId, amount: &BigUint) -> LendingResult<()> {
        self.require_asset_supported(asset)?;
        self.require_amount_greater_than_zero(amount)
    }

    /// Checks a swap against the state at invocation start.
    ///
    /// Both reserves must exist and be active, the destination must not be
    /// frozen. A frozen source is accepted: swapping out of it is how users
    /// leave a frozen market.
    pub(crate) fn validate_swap_request(&self, request: &SwapRequest) -> LendingResult<()> {
        self.require_asset_supported(&request.source_asset)?;
        self.require_asset_supported(&request.destination_asset)?;

        let source = self.reserves.market_state(&request.source_asset)?;
        let destination = self.reserves.market_state(&request.destination_asset)?;
        if !source.is_active || !destination.is_active {
            return Err(LendingError::ReserveInactive);
        }
        if destination.is_frozen {
            return Err(LendingError::ReserveFrozen);
        }

        self.require_amount_greater_than_zero(&request.amount)
    }

    /// The adapter must be approved and can be neither the caller nor a
    /// reserve account.
    pub(crate) fn validate_swap_adapter(
        &self,
        caller: &Address,
        adapter: &Address,
    ) -> LendingResult<()> {
        if adapter.is_reserve() || adapter == caller || !self.swap_adapters.contains(adapter) {
            return Err(LendingError::InvalidSwapAdapter);
        }
        Ok(())
    }
}
