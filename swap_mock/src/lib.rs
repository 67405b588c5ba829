//! Swap adapters for tests.
//!
//! Every adapter pays out of its own inventory: tests mint the destination
//! asset to the adapter address before swapping.

use common_errors::LendingError;
use common_proxies::{SwapAdapter, SwapContext, SwapError};
use common_structs::{Address, SwapRequest};
use num_bigint::BigUint;

/// Pays `amount * numerator / denominator` of the destination asset, raw
/// units, rounding down.
#[derive(Clone, Debug)]
pub struct FixedRateSwap {
    address: Address,
    numerator: BigUint,
    denominator: BigUint,
}

impl FixedRateSwap {
    pub fn new(address: Address, numerator: u64, denominator: u64) -> Self {
        FixedRateSwap {
            address,
            numerator: BigUint::from(numerator),
            denominator: BigUint::from(denominator.max(1)),
        }
    }

    pub fn quote(&self, amount: &BigUint) -> BigUint {
        amount * &self.numerator / &self.denominator
    }

    fn pay_out(
        &self,
        ctx: &mut dyn SwapContext,
        request: &SwapRequest,
    ) -> Result<BigUint, SwapError> {
        let received = ctx.balance_of(&request.source_asset, &self.address);
        if received < request.amount {
            return Err(SwapError::InsufficientInput {
                received,
                expected: request.amount.clone(),
            });
        }

        let amount_out = self.quote(&request.amount);
        let pool = ctx.pool_address(&request.destination_asset);
        ctx.transfer(&request.destination_asset, &pool, &amount_out)?;
        Ok(amount_out)
    }
}

impl SwapAdapter for FixedRateSwap {
    fn address(&self) -> &Address {
        &self.address
    }

    fn swap(
        &mut self,
        ctx: &mut dyn SwapContext,
        request: &SwapRequest,
    ) -> Result<BigUint, SwapError> {
        self.pay_out(ctx, request)
    }
}

/// Pays like [`FixedRateSwap`] but claims `extra` more than it sent.
#[derive(Clone, Debug)]
pub struct OverReportingSwap {
    inner: FixedRateSwap,
    extra: BigUint,
}

impl OverReportingSwap {
    pub fn new(inner: FixedRateSwap, extra: u64) -> Self {
        OverReportingSwap {
            inner,
            extra: BigUint::from(extra),
        }
    }
}

impl SwapAdapter for OverReportingSwap {
    fn address(&self) -> &Address {
        self.inner.address()
    }

    fn swap(
        &mut self,
        ctx: &mut dyn SwapContext,
        request: &SwapRequest,
    ) -> Result<BigUint, SwapError> {
        let sent = self.inner.pay_out(ctx, request)?;
        Ok(sent + &self.extra)
    }
}

/// Keeps the input and rejects the swap.
#[derive(Clone, Debug)]
pub struct FailingSwap {
    address: Address,
    reason: String,
}

impl FailingSwap {
    pub fn new(address: Address, reason: &str) -> Self {
        FailingSwap {
            address,
            reason: reason.to_string(),
        }
    }
}

impl SwapAdapter for FailingSwap {
    fn address(&self) -> &Address {
        &self.address
    }

    fn swap(
        &mut self,
        _ctx: &mut dyn SwapContext,
        _request: &SwapRequest,
    ) -> Result<BigUint, SwapError> {
        Err(SwapError::Rejected(self.reason.clone()))
    }
}

/// Keeps the input, sends nothing and claims it sent `request.amount`.
#[derive(Clone, Debug)]
pub struct ZeroOutputSwap {
    address: Address,
}

impl ZeroOutputSwap {
    pub fn new(address: Address) -> Self {
        ZeroOutputSwap { address }
    }
}

impl SwapAdapter for ZeroOutputSwap {
    fn address(&self) -> &Address {
        &self.address
    }

    fn swap(
        &mut self,
        _ctx: &mut dyn SwapContext,
        request: &SwapRequest,
    ) -> Result<BigUint, SwapError> {
        Ok(request.amount.clone())
    }
}

/// Claims an address it does not own. While it runs it sends everything that
/// address holds of the source asset to `beneficiary`, then pays the quote
/// of [`FixedRateSwap`] out of the same address.
#[derive(Clone, Debug)]
pub struct ImpostorSwap {
    inner: FixedRateSwap,
    beneficiary: Address,
}

impl ImpostorSwap {
    pub fn new(claimed: Address, beneficiary: Address) -> Self {
        ImpostorSwap {
            inner: FixedRateSwap::new(claimed, 1, 1),
            beneficiary,
        }
    }
}

impl SwapAdapter for ImpostorSwap {
    fn address(&self) -> &Address {
        self.inner.address()
    }

    fn swap(
        &mut self,
        ctx: &mut dyn SwapContext,
        request: &SwapRequest,
    ) -> Result<BigUint, SwapError> {
        let holder = *ctx.adapter();
        let held = ctx.balance_of(&request.source_asset, &holder);
        ctx.transfer(&request.source_asset, &self.beneficiary, &held)?;

        let amount_out = self.inner.quote(&request.amount);
        let pool = ctx.pool_address(&request.destination_asset);
        ctx.transfer(&request.destination_asset, &pool, &amount_out)?;
        Ok(amount_out)
    }
}

/// Calls back into the pool on behalf of `victim` before paying like
/// [`FixedRateSwap`]. Every result of those calls is recorded.
#[derive(Debug)]
pub struct ReentrantSwap {
    inner: FixedRateSwap,
    victim: Address,
    observed: Vec<Result<(), LendingError>>,
}

impl ReentrantSwap {
    pub fn new(inner: FixedRateSwap, victim: Address) -> Self {
        ReentrantSwap {
            inner,
            victim,
            observed: Vec::new(),
        }
    }

    /// Outcome of each reentrant call, in call order.
    pub fn observed(&self) -> &[Result<(), LendingError>] {
        &self.observed
    }
}

impl SwapAdapter for ReentrantSwap {
    fn address(&self) -> &Address {
        self.inner.address()
    }

    fn swap(
        &mut self,
        ctx: &mut dyn SwapContext,
        request: &SwapRequest,
    ) -> Result<BigUint, SwapError> {
        let victim = self.victim;
        let one = BigUint::from(1u64);
        let mut nested = FailingSwap::new(*self.inner.address(), "nested");

        let lending = ctx.lending();
        self.observed.push(
            lending
                .collateral_balance(&request.source_asset, &victim)
                .map(|_| ()),
        );
        self.observed
            .push(lending.withdraw(&victim, &request.source_asset, &one).map(|_| ()));
        self.observed
            .push(lending.supply(&victim, &request.destination_asset, &one));
        self.observed.push(
            lending
                .swap_liquidity(
                    &victim,
                    &mut nested,
                    &request.source_asset,
                    &request.destination_asset,
                    &one,
                    &[],
                )
                .map(|_| ()),
        );

        self.inner.pay_out(ctx, request)
    }
}
