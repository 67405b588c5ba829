use common_errors::{LendingError, LendingResult};
use common_proxies::{
    AssetTransfer, ControllerProxy, PriceOracle, SwapAdapter, SwapContext, SwapError,
};
use common_structs::{Address, AssetId, PositionAction, SwapReceipt, SwapRequest};
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::{debug, warn};

use crate::{cache::Cache, Controller};

/// What a swap adapter sees of the pool while it holds control.
///
/// Transfers move funds out of the adapter's own address only. Calls made
/// through [`SwapContext::lending`] reach the real controller, whose
/// reentrancy guard rejects them for as long as the swap is in flight.
pub struct AdapterContext<'a, O, T> {
    controller: &'a mut Controller<O, T>,
    adapter: Address,
}

impl<O, T> SwapContext for AdapterContext<'_, O, T>
where
    O: PriceOracle,
    T: AssetTransfer + Clone,
{
    fn adapter(&self) -> &Address {
        &self.adapter
    }

    fn balance_of(&self, asset: &AssetId, holder: &Address) -> BigUint {
        self.controller.tokens.balance_of(asset, holder)
    }

    fn transfer(
        &mut self,
        asset: &AssetId,
        to: &Address,
        amount: &BigUint,
    ) -> Result<(), SwapError> {
        self.controller
            .tokens
            .transfer(asset, &self.adapter, to, amount)
            .map_err(SwapError::from)
    }

    fn pool_address(&self, asset: &AssetId) -> Address {
        Address::reserve(asset)
    }

    fn lending(&mut self) -> &mut dyn ControllerProxy {
        &mut *self.controller
    }
}

impl<O, T> Controller<O, T>
where
    O: PriceOracle,
    T: AssetTransfer + Clone,
{
    /// **SWAP COLLATERAL STRATEGY: Convert Collateral Between Reserves**
    ///
    /// # Purpose and Scope
    /// Moves `amount` of the caller's `source_asset` supply into
    /// `destination_asset` supply in one step, trading through an external
    /// adapter instead of a withdraw, trade and redeposit done by the user.
    ///
    /// # Methodology and Process
    /// 1. **Validation**: assets differ, both reserves exist and are active,
    ///    the destination is not frozen, the amount is nonzero and the adapter
    ///    is an approved one. These checks read the state as it was when the
    ///    call started.
    /// 2. **Collateral Withdrawal**: accrues the source reserve, debits the
    ///    caller's position and clears its collateral flag if it is emptied.
    /// 3. **Token Conversion**: moves the debited tokens from the source
    ///    reserve to the adapter and hands it control.
    /// 4. **Proceeds Reconciliation**: measures what actually arrived in the
    ///    destination reserve. The adapter's declared amount is only logged.
    /// 5. **Collateral Redeposit**: accrues the destination reserve and
    ///    credits the observed proceeds, enabling the destination flag.
    /// 6. **Health Validation**: the post-swap health factor must be at least
    ///    1.0 when the caller has debt.
    ///
    /// # Security Checks Implemented
    /// - **Reentrancy Protection**: every entry point fails with `ReentrantCall`
    ///   from step 2 until the swap commits or rolls back.
    /// - **Atomicity**: both reserves, both positions and token balances are
    ///   checkpointed before step 2 and restored on any failure.
    /// - **Untrusted Output**: only the observed balance delta is credited.
    /// - **Adapter Custody**: the adapter can only spend its own address, which
    ///   must be registered and can never be a reserve or the caller.
    ///
    /// # Returns
    /// - `SwapReceipt` with the amount taken, the amount the adapter claimed
    ///   and the amount credited, plus the health factor after the swap.
    ///
    /// # Errors
    /// - `EqualAssets`, `AssetNotSupported`, `ReserveInactive`, `ReserveFrozen`,
    ///   `AmountMustBeGreaterThanZero` from step 1.
    /// - `InvalidSwapAdapter` when the adapter is not approved, is the caller
    ///   or claims a reserve address.
    /// - `InsufficientBalance` / `InsufficientLiquidity` from step 2.
    /// - `AdapterFailure` when the adapter errors or nothing arrives.
    /// - `HealthFactorBelowThreshold` from step 6.
    pub fn swap_liquidity(
        &mut self,
        caller: &Address,
        adapter: &mut dyn SwapAdapter,
        source_asset: &AssetId,
        destination_asset: &AssetId,
        amount: &BigUint,
        params: &[u8],
    ) -> LendingResult<SwapReceipt> {
        self.reentrancy_guard()?;

        let request = SwapRequest::new(
            *adapter.address(),
            source_asset,
            destination_asset,
            amount,
            params,
        )?;
        self.validate_swap_request(&request)?;
        self.validate_swap_adapter(caller, &request.adapter)?;

        let checkpoint = self.checkpoint(&[source_asset, destination_asset], caller)?;

        self.swap_ongoing = true;
        let result = self.common_swap_collateral(caller, adapter, &request);
        self.swap_ongoing = false;

        match result {
            Ok(receipt) => {
                common_events::swap_collateral_event(
                    caller,
                    &request,
                    &receipt.amount_out,
                    &receipt.health_factor,
                );
                Ok(receipt)
            },
            Err(err) => {
                debug!(
                    caller = ?caller,
                    source_asset = %request.source_asset,
                    destination_asset = %request.destination_asset,
                    error = %err,
                    "collateral swap rolled back"
                );
                self.rollback(checkpoint)?;
                Err(err)
            },
        }
    }

    /// Debit, adapter call, credit and health check of a swap. Leaves partial
    /// effects behind on failure; the caller restores the checkpoint.
    fn common_swap_collateral(
        &mut self,
        caller: &Address,
        adapter: &mut dyn SwapAdapter,
        request: &SwapRequest,
    ) -> LendingResult<SwapReceipt> {
        let now = self.timestamp;

        let mut source_position = self.positions.get_or_new(&request.source_asset, caller);
        let debited = self.reserves.debit(
            &request.source_asset,
            &mut source_position,
            &request.amount,
            now,
        )?;
        let snapshot = source_position.clone();
        self.update_position(source_position, &debited, PositionAction::SwapOut, Some(caller));
        self.reconcile_collateral_flag(&snapshot);

        let declared_out = self.convert_token_from_to(adapter, request)?;
        let amount_out = declared_out.observed;

        let mut destination_position = self
            .positions
            .get_or_new(&request.destination_asset, caller);
        let credited = self.reserves.credit(
            &request.destination_asset,
            &mut destination_position,
            &amount_out,
            now,
        )?;
        if destination_position.has_supply() {
            destination_position.usage_as_collateral = true;
        }
        self.update_position(
            destination_position,
            &credited,
            PositionAction::SwapIn,
            Some(caller),
        );

        // Fresh prices for the health factor, after control came back
        let mut cache = Cache::new();
        cache.clean_prices_cache();
        let health_factor = self.validate_is_healthy(caller, &mut cache)?;

        Ok(SwapReceipt {
            amount_in: request.amount.clone(),
            declared_out: declared_out.declared,
            amount_out,
            health_factor,
        })
    }

    /// Sends the source tokens to the adapter, runs it and reconciles what it
    /// sent back against the destination reserve's balance.
    fn convert_token_from_to(
        &mut self,
        adapter: &mut dyn SwapAdapter,
        request: &SwapRequest,
    ) -> LendingResult<SwapProceeds> {
        let adapter_address = *adapter.address();
        let source_holder = Address::reserve(&request.source_asset);
        let destination_holder = Address::reserve(&request.destination_asset);

        self.tokens.transfer(
            &request.source_asset,
            &source_holder,
            &adapter_address,
            &request.amount,
        )?;

        let balance_before = self
            .tokens
            .balance_of(&request.destination_asset, &destination_holder);

        let declared = {
            let mut context = AdapterContext {
                controller: &mut *self,
                adapter: adapter_address,
            };
            adapter
                .swap(&mut context, request)
                .map_err(|err| LendingError::AdapterFailure(err.to_string()))?
        };

        let balance_after = self
            .tokens
            .balance_of(&request.destination_asset, &destination_holder);
        let observed = if balance_after > balance_before {
            balance_after - balance_before
        } else {
            BigUint::zero()
        };

        if observed.is_zero() {
            return Err(LendingError::AdapterFailure(
                "no proceeds received".to_string(),
            ));
        }
        if observed != declared {
            warn!(
                adapter = ?adapter_address,
                asset = %request.destination_asset,
                declared = %declared,
                observed = %observed,
                "adapter declared proceeds differ from received balance"
            );
        }

        Ok(SwapProceeds { declared, observed })
    }
}

struct SwapProceeds {
    declared: BigUint,
    observed: BigUint,
}
