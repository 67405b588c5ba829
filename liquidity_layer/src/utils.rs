use common_math::{get_min, Decimal};
use common_rates::{
    calc_supplier_rewards, calculate_compounded_interest, update_borrow_index, update_supply_index,
};

use crate::cache::Cache;

/// Brings the reserve's indexes up to `cache.timestamp`.
///
/// **Process**:
/// 1. Computes the elapsed time since `cache.last_timestamp`; nothing happens
///    when it is zero, which makes repeated accruals at the same time no-ops.
/// 2. Asks the strategy for the borrow rate at the current utilization and
///    compounds it over the elapsed time into the borrow index.
/// 3. Splits the accrued interest into supplier rewards, which grow the supply
///    index, and the protocol fee, minted as scaled supply to `revenue`.
///
/// A timestamp older than the last accrual is treated as no elapsed time.
pub fn global_sync(cache: &mut Cache) {
    let delta = cache.timestamp.saturating_sub(cache.last_timestamp);

    if delta > 0 {
        let utilization = cache.get_utilization();
        let borrow_rate = cache.strategy.current_rate(cache.asset(), &utilization);
        let borrow_factor = calculate_compounded_interest(&borrow_rate, delta);
        let (new_borrow_index, old_borrow_index) =
            update_borrow_index(&cache.borrow_index, &borrow_factor);

        let (supplier_rewards_ray, protocol_fee_ray) = calc_supplier_rewards(
            cache.params,
            &cache.borrowed,
            &new_borrow_index,
            &old_borrow_index,
        );

        let new_supply_index =
            update_supply_index(&cache.supplied, &cache.supply_index, &supplier_rewards_ray);

        cache.supply_index = new_supply_index;
        cache.borrow_index = new_borrow_index;

        if !protocol_fee_ray.is_zero() {
            let fee_scaled = cache.scaled_supply(&protocol_fee_ray);
            cache.revenue += &fee_scaled;
            cache.supplied += &fee_scaled; // mint to total supply
        }

        cache.last_timestamp = cache.timestamp;
    }
}

pub fn emit_market_update(cache: &Cache) {
    common_events::update_market_state_event(
        cache.asset(),
        cache.timestamp,
        &cache.supply_index,
        &cache.borrow_index,
        &cache.reserves,
        &cache.supplied,
        &cache.borrowed,
        &cache.revenue,
    );
}

/// Returns `(scaled_to_burn, amount)` for taking `requested` out of a supply
/// position. Taking the whole current balance burns the whole scaled balance
/// so the position ends at exactly zero.
pub fn determine_gross_withdrawal_amounts(
    cache: &Cache,
    position_scaled_amount: &Decimal,
    requested: &Decimal,
) -> (Decimal, Decimal) {
    let current_supply = cache.original_supply(position_scaled_amount);

    if *requested >= current_supply {
        (position_scaled_amount.clone(), current_supply)
    } else {
        let requested_scaled = cache.scaled_supply(requested);
        (
            get_min(requested_scaled, position_scaled_amount.clone()),
            requested.clone(),
        )
    }
}

/// Returns `(scaled_to_repay, over_paid)` for a payment against a debt position.
pub fn determine_repayment_details(
    cache: &Cache,
    position_scaled_amount: &Decimal,
    payment: &Decimal,
) -> (Decimal, Decimal) {
    let current_debt = cache.original_borrow(position_scaled_amount);

    if *payment >= current_debt {
        let over_paid = payment.clone() - &current_debt;
        (position_scaled_amount.clone(), over_paid)
    } else {
        let payment_scaled = cache.scaled_borrow(payment);
        (
            get_min(payment_scaled, position_scaled_amount.clone()),
            cache.zero.clone(),
        )
    }
}
