//! Structured protocol events.
//!
//! Every event is a `tracing` record on the [`EVENTS_TARGET`] target with an
//! `event` field naming it, so indexers can subscribe with a target filter
//! such as `lending::events=info`.

use common_constants::EVENTS_TARGET;
use common_math::Decimal;
use num_bigint::BigUint;
use tracing::info;

pub use common_structs::*;

pub fn create_market_params_event(params: &MarketParams, config: &AssetConfig) {
    info!(
        target: EVENTS_TARGET,
        event = "create_market_params",
        asset = %params.asset_id,
        max_borrow_rate = %params.max_borrow_rate,
        base_borrow_rate = %params.base_borrow_rate,
        slope1 = %params.slope1,
        slope2 = %params.slope2,
        slope3 = %params.slope3,
        mid_utilization = %params.mid_utilization,
        optimal_utilization = %params.optimal_utilization,
        reserve_factor = %params.reserve_factor,
        ltv = %config.loan_to_value_bps,
        liquidation_threshold = %config.liquidation_threshold_bps,
    );
}

pub fn update_asset_config_event(asset: &AssetId, config: &AssetConfig) {
    info!(
        target: EVENTS_TARGET,
        event = "update_asset_config",
        asset = %asset,
        ltv = %config.loan_to_value_bps,
        liquidation_threshold = %config.liquidation_threshold_bps,
        is_collateralizable = config.is_collateralizable,
        is_borrowable = config.is_borrowable,
    );
}

pub fn update_reserve_status_event(asset: &AssetId, is_active: bool, is_frozen: bool) {
    info!(
        target: EVENTS_TARGET,
        event = "update_reserve_status",
        asset = %asset,
        is_active,
        is_frozen,
    );
}

#[allow(clippy::too_many_arguments)]
pub fn update_market_state_event(
    asset: &AssetId,
    timestamp: u64,
    supply_index: &Decimal,
    borrow_index: &Decimal,
    reserves: &Decimal,
    supplied: &Decimal,
    borrowed: &Decimal,
    revenue: &Decimal,
) {
    info!(
        target: EVENTS_TARGET,
        event = "update_market_state",
        asset = %asset,
        timestamp,
        supply_index = %supply_index,
        borrow_index = %borrow_index,
        reserves = %reserves,
        supplied = %supplied,
        borrowed = %borrowed,
        revenue = %revenue,
    );
}

// `amount` is the real amount moved by `action`. Positions touched by the
// protocol itself (collateral flag reconciliation) carry no caller.
pub fn update_position_event(
    amount: &Decimal,
    position: &AccountPosition,
    action: PositionAction,
    caller: Option<&Address>,
) {
    info!(
        target: EVENTS_TARGET,
        event = "update_position",
        action = %action,
        asset = %position.asset_id,
        account = ?position.account,
        caller = ?caller,
        amount = %amount,
        scaled_amount = %position.scaled_amount_ray,
        scaled_debt = %position.scaled_debt_ray,
        usage_as_collateral = position.usage_as_collateral,
    );
}

pub fn update_asset_price_event(asset: &AssetId, price: &Decimal) {
    info!(
        target: EVENTS_TARGET,
        event = "update_asset_price",
        asset = %asset,
        price = %price,
    );
}

pub fn swap_collateral_event(
    caller: &Address,
    request: &SwapRequest,
    amount_out: &BigUint,
    health_factor: &HealthFactor,
) {
    info!(
        target: EVENTS_TARGET,
        event = "swap_collateral",
        caller = ?caller,
        adapter = ?request.adapter,
        source_asset = %request.source_asset,
        destination_asset = %request.destination_asset,
        amount_in = %request.amount,
        amount_out = %amount_out,
        health_factor = %health_factor,
    );
}
