use common_constants::RAY_PRECISION;
use common_math::{div_half_up, ray_zero, to_decimal, Decimal};
use common_rates::{get_utilization, scaled_to_original, InterestRateStrategy};
use common_structs::{AssetId, MarketIndex, MarketParams};
use num_bigint::BigUint;

use crate::{storage::MarketState, LiquidityPool};

/// A working copy of one reserve's state for the duration of a single
/// ledger operation.
///
/// Mutations only reach the reserve through [`Cache::commit`]; dropping the
/// cache discards them, so an operation that fails after accruing leaves the
/// reserve untouched.
///
/// **Fields**:
/// - `supplied`, `borrowed` and `revenue` are scaled RAY totals.
/// - `reserves` is in the asset's own decimals.
/// - Indexes use RAY precision, timestamps are milliseconds.
pub struct Cache<'a> {
    target: &'a mut MarketState,
    /// Total scaled supply.
    pub supplied: Decimal,
    /// Total scaled debt.
    pub borrowed: Decimal,
    /// Scaled supply owned by the protocol.
    pub revenue: Decimal,
    /// Available liquidity.
    pub reserves: Decimal,
    pub supply_index: Decimal,
    pub borrow_index: Decimal,
    /// The time the operation runs at.
    pub timestamp: u64,
    pub last_timestamp: u64,
    pub is_active: bool,
    pub is_frozen: bool,
    pub params: &'a MarketParams,
    pub strategy: &'a dyn InterestRateStrategy,
    /// Zero in asset decimals.
    pub zero: Decimal,
}

impl<'a> Cache<'a> {
    pub fn new(pool: &'a mut LiquidityPool, timestamp: u64) -> Self {
        let LiquidityPool {
            state,
            params,
            strategy,
        } = pool;
        Cache {
            supplied: state.supplied.clone(),
            borrowed: state.borrowed.clone(),
            revenue: state.revenue.clone(),
            reserves: state.reserves.clone(),
            supply_index: state.supply_index.clone(),
            borrow_index: state.borrow_index.clone(),
            timestamp,
            last_timestamp: state.last_timestamp,
            is_active: state.is_active,
            is_frozen: state.is_frozen,
            zero: Decimal::zero(params.asset_decimals),
            params,
            strategy: &**strategy,
            target: state,
        }
    }

    /// Writes the mutable fields back to the reserve.
    pub fn commit(self) {
        let Cache {
            target,
            supplied,
            borrowed,
            revenue,
            reserves,
            supply_index,
            borrow_index,
            last_timestamp,
            ..
        } = self;
        target.supplied = supplied;
        target.borrowed = borrowed;
        target.revenue = revenue;
        target.reserves = reserves;
        target.supply_index = supply_index;
        target.borrow_index = borrow_index;
        target.last_timestamp = last_timestamp;
    }

    pub fn asset(&self) -> &AssetId {
        &self.params.asset_id
    }

    /// Raw units to a decimal in the asset's precision.
    pub fn get_decimal_value(&self, value: &BigUint) -> Decimal {
        to_decimal(value.clone(), self.params.asset_decimals)
    }

    /// Real borrowed over real supplied, RAY based. Zero for an empty market.
    pub fn get_utilization(&self) -> Decimal {
        if self.supplied.is_zero() {
            return ray_zero();
        }
        let total_borrowed = self.original_borrow(&self.borrowed);
        let total_supplied = self.original_supply(&self.supplied);
        get_utilization(&total_borrowed, &total_supplied)
    }

    pub fn has_reserves(&self, amount: &Decimal) -> bool {
        self.reserves >= *amount
    }

    pub fn scaled_supply(&self, amount: &Decimal) -> Decimal {
        div_half_up(amount, &self.supply_index, RAY_PRECISION)
    }

    pub fn scaled_borrow(&self, amount: &Decimal) -> Decimal {
        div_half_up(amount, &self.borrow_index, RAY_PRECISION)
    }

    pub fn original_supply(&self, scaled_amount: &Decimal) -> Decimal {
        scaled_to_original(scaled_amount, &self.supply_index, self.params.asset_decimals)
    }

    pub fn original_borrow(&self, scaled_amount: &Decimal) -> Decimal {
        scaled_to_original(scaled_amount, &self.borrow_index, self.params.asset_decimals)
    }

    pub fn market_index(&self) -> MarketIndex {
        MarketIndex {
            supply_index_ray: self.supply_index.clone(),
            borrow_index_ray: self.borrow_index.clone(),
        }
    }
}
