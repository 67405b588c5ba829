use common_math::{ray, ray_zero, Decimal};
use common_structs::MarketParams;

/// Persisted state of one reserve.
///
/// `supplied`, `borrowed` and `revenue` are scaled RAY totals, `reserves` is
/// the liquidity held by the reserve in asset decimals.
#[derive(Clone, Debug, PartialEq)]
pub struct MarketState {
    /// Total scaled supply, including the scaled protocol revenue.
    pub supplied: Decimal,
    /// Total scaled debt.
    pub borrowed: Decimal,
    /// Scaled supply minted to the protocol treasury (subset of `supplied`).
    pub revenue: Decimal,
    /// Liquidity available for withdrawals and borrows.
    pub reserves: Decimal,
    /// Liquidity index; real supply = scaled supply * supply index.
    pub supply_index: Decimal,
    pub borrow_index: Decimal,
    /// Milliseconds of the last accrual.
    pub last_timestamp: u64,
    pub is_active: bool,
    pub is_frozen: bool,
}

impl MarketState {
    pub fn new(params: &MarketParams, timestamp: u64) -> Self {
        MarketState {
            supplied: ray_zero(),
            borrowed: ray_zero(),
            revenue: ray_zero(),
            reserves: Decimal::zero(params.asset_decimals),
            supply_index: ray(),
            borrow_index: ray(),
            last_timestamp: timestamp,
            is_active: true,
            is_frozen: false,
        }
    }
}
