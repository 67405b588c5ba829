//! Interfaces of the collaborators the lending core consumes.
//!
//! The controller only ever talks to prices, risk parameters, token balances
//! and swap executors through these traits.

use common_errors::{LendingError, LendingResult};
use common_math::Decimal;
use common_structs::{Address, AssetId, SwapReceipt, SwapRequest};
use num_bigint::BigUint;
use thiserror::Error;

pub trait PriceOracle {
    /// WAD based price of one whole unit of `asset`.
    fn price(&self, asset: &AssetId) -> LendingResult<Decimal>;
}

pub trait RiskParameters {
    /// BPS based share of the collateral value counted by the health factor.
    fn liquidation_threshold(&self, asset: &AssetId) -> LendingResult<Decimal>;

    /// BPS based share of the collateral value that can be borrowed against.
    fn loan_to_value(&self, asset: &AssetId) -> LendingResult<Decimal>;
}

pub trait AssetTransfer {
    fn transfer(
        &mut self,
        asset: &AssetId,
        from: &Address,
        to: &Address,
        amount: &BigUint,
    ) -> LendingResult<()>;

    fn balance_of(&self, asset: &AssetId, holder: &Address) -> BigUint;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("swap rejected: {0}")]
    Rejected(String),
    #[error("insufficient input: received {received}, expected {expected}")]
    InsufficientInput { received: BigUint, expected: BigUint },
    #[error("lending call failed: {0}")]
    Lending(#[from] LendingError),
}

/// What an adapter can do while it holds control during a swap.
///
/// Transfers always move funds out of the adapter's own address.
pub trait SwapContext {
    fn adapter(&self) -> &Address;

    fn balance_of(&self, asset: &AssetId, holder: &Address) -> BigUint;

    fn transfer(
        &mut self,
        asset: &AssetId,
        to: &Address,
        amount: &BigUint,
    ) -> Result<(), SwapError>;

    /// Holder that proceeds in `asset` must be sent to.
    fn pool_address(&self, asset: &AssetId) -> Address;

    /// The lending pool entry points, reachable from inside the swap.
    fn lending(&mut self) -> &mut dyn ControllerProxy;
}

/// External swap executor.
///
/// When `swap` is called the adapter already holds `request.amount` of the
/// source asset. It must transfer the destination asset to
/// [`SwapContext::pool_address`] before returning, and returns the amount it
/// claims to have sent.
pub trait SwapAdapter {
    fn address(&self) -> &Address;

    fn swap(
        &mut self,
        ctx: &mut dyn SwapContext,
        request: &SwapRequest,
    ) -> Result<BigUint, SwapError>;
}

/// Public entry points of the lending controller.
pub trait ControllerProxy {
    fn supply(&mut self, caller: &Address, asset: &AssetId, amount: &BigUint) -> LendingResult<()>;

    fn withdraw(
        &mut self,
        caller: &Address,
        asset: &AssetId,
        amount: &BigUint,
    ) -> LendingResult<BigUint>;

    fn swap_liquidity(
        &mut self,
        caller: &Address,
        adapter: &mut dyn SwapAdapter,
        source_asset: &AssetId,
        destination_asset: &AssetId,
        amount: &BigUint,
        params: &[u8],
    ) -> LendingResult<SwapReceipt>;

    fn collateral_balance(&self, asset: &AssetId, account: &Address) -> LendingResult<BigUint>;
}
