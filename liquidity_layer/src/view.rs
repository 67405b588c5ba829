use common_math::Decimal;
use common_rates::{
    calc_deposit_rate, get_utilization, scaled_to_original, simulate_update_indexes,
};
use common_structs::MarketIndex;

use crate::LiquidityPool;

/// Read-only market metrics. Views never accrue: stored values reflect the
/// last balance affecting operation, `*_at` variants project to a given time.
impl LiquidityPool {
    /// Real borrowed over real supplied, RAY based.
    pub fn get_capital_utilisation(&self) -> Decimal {
        get_utilization(&self.get_borrowed_amount(), &self.get_supplied_amount())
    }

    /// Per-millisecond borrow rate at the stored utilization.
    pub fn get_borrow_rate(&self) -> Decimal {
        self.strategy
            .current_rate(&self.params.asset_id, &self.get_capital_utilisation())
    }

    pub fn get_deposit_rate(&self) -> Decimal {
        let utilization = self.get_capital_utilisation();
        let borrow_rate = self
            .strategy
            .current_rate(&self.params.asset_id, &utilization);
        calc_deposit_rate(&utilization, &borrow_rate, &self.params.reserve_factor)
    }

    pub fn get_delta_time(&self, now: u64) -> u64 {
        now.saturating_sub(self.state.last_timestamp)
    }

    /// Real supply, protocol revenue included.
    pub fn get_supplied_amount(&self) -> Decimal {
        self.original_supply(&self.state.supplied)
    }

    pub fn get_borrowed_amount(&self) -> Decimal {
        self.original_borrow(&self.state.borrowed)
    }

    pub fn get_protocol_revenue(&self) -> Decimal {
        self.original_supply(&self.state.revenue)
    }

    pub fn get_reserves(&self) -> &Decimal {
        &self.state.reserves
    }

    /// Reserves plus outstanding debt.
    pub fn get_total_capital(&self) -> Decimal {
        self.state.reserves.clone() + self.get_borrowed_amount()
    }

    pub fn get_supply_index(&self) -> &Decimal {
        &self.state.supply_index
    }

    pub fn get_borrow_index(&self) -> &Decimal {
        &self.state.borrow_index
    }

    /// Indexes the reserve would have if it were accrued at `now`.
    pub fn get_indexes_at(&self, now: u64) -> MarketIndex {
        simulate_update_indexes(
            now,
            self.state.last_timestamp,
            &self.state.borrowed,
            &self.state.borrow_index,
            &self.state.supplied,
            &self.state.supply_index,
            &self.params,
            self.strategy.as_ref(),
        )
    }

    /// Scaled supply to real units at the stored liquidity index.
    pub fn original_supply(&self, scaled_amount: &Decimal) -> Decimal {
        scaled_to_original(scaled_amount, &self.state.supply_index, self.params.asset_decimals)
    }

    pub fn original_borrow(&self, scaled_amount: &Decimal) -> Decimal {
        scaled_to_original(scaled_amount, &self.state.borrow_index, self.params.asset_decimals)
    }

    /// Scaled supply to real units at the index projected to `now`.
    pub fn supply_balance_at(&self, scaled_amount: &Decimal, now: u64) -> Decimal {
        let index = self.get_indexes_at(now);
        scaled_to_original(scaled_amount, &index.supply_index_ray, self.params.asset_decimals)
    }

    pub fn debt_balance_at(&self, scaled_amount: &Decimal, now: u64) -> Decimal {
        let index = self.get_indexes_at(now);
        scaled_to_original(scaled_amount, &index.borrow_index_ray, self.params.asset_decimals)
    }

    pub fn get_scaled_supplied(&self) -> &Decimal {
        &self.state.supplied
    }
}
