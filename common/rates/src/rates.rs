use common_constants::{MILLISECONDS_PER_YEAR, RAY_PRECISION};
use common_math::{
    bps, div_half_up, from_units, mul_half_up, ray, ray_zero, rescale_half_up, Decimal,
};
use common_structs::{AssetId, MarketIndex, MarketParams};

/// Source of the borrow rate of a reserve.
///
/// The rate must be a pure function of the reserve state it is given: the
/// ledger calls it once per accrual and replays the result to compute the
/// liquidity index.
pub trait InterestRateStrategy {
    /// Per-millisecond borrow rate (RAY) for the given RAY based utilization.
    fn current_rate(&self, asset: &AssetId, utilization: &Decimal) -> Decimal;
}

/// Three slope utilization curve driven by [`MarketParams`].
#[derive(Clone, Debug)]
pub struct PiecewiseRateModel {
    params: MarketParams,
}

impl PiecewiseRateModel {
    pub fn new(params: MarketParams) -> Self {
        PiecewiseRateModel { params }
    }

    pub fn params(&self) -> &MarketParams {
        &self.params
    }
}

impl InterestRateStrategy for PiecewiseRateModel {
    fn current_rate(&self, _asset: &AssetId, utilization: &Decimal) -> Decimal {
        calc_borrow_rate(utilization, &self.params)
    }
}

/// Calculates the borrow rate based on current utilization and pool parameters.
///
/// **Formula**:
/// - If `utilization < mid_utilization`: `base_borrow_rate + (utilization * slope1 / mid_utilization)`.
/// - If `mid_utilization <= utilization < optimal_utilization`: `base_borrow_rate + slope1 + ((utilization - mid_utilization) * slope2 / (optimal_utilization - mid_utilization))`.
/// - If `utilization >= optimal_utilization`: `base_borrow_rate + slope1 + slope2 + ((utilization - optimal_utilization) * slope3 / (RAY - optimal_utilization))`.
/// - The annual rate is capped at `max_borrow_rate` and converted to a per-millisecond rate.
pub fn calc_borrow_rate(utilization: &Decimal, params: &MarketParams) -> Decimal {
    let annual_rate = if *utilization < params.mid_utilization {
        // Region 1: utilization < mid_utilization
        let utilization_ratio = div_half_up(
            &mul_half_up(utilization, &params.slope1, RAY_PRECISION),
            &params.mid_utilization,
            RAY_PRECISION,
        );
        params.base_borrow_rate.clone() + utilization_ratio
    } else if *utilization < params.optimal_utilization {
        // Region 2: mid_utilization <= utilization < optimal_utilization
        let excess_utilization = utilization.clone() - &params.mid_utilization;
        let slope_contribution = div_half_up(
            &mul_half_up(&excess_utilization, &params.slope2, RAY_PRECISION),
            &(params.optimal_utilization.clone() - &params.mid_utilization),
            RAY_PRECISION,
        );
        params.base_borrow_rate.clone() + &params.slope1 + slope_contribution
    } else {
        // Region 3: utilization >= optimal_utilization, linear growth
        let base_rate = params.base_borrow_rate.clone() + &params.slope1 + &params.slope2;
        let excess_utilization = utilization.saturating_sub(&params.optimal_utilization);
        let slope_contribution = div_half_up(
            &mul_half_up(&excess_utilization, &params.slope3, RAY_PRECISION),
            &(ray() - &params.optimal_utilization),
            RAY_PRECISION,
        );
        base_rate + slope_contribution
    };

    let capped_rate = common_math::get_min(annual_rate, params.max_borrow_rate.clone());

    div_half_up(
        &capped_rate,
        &from_units(MILLISECONDS_PER_YEAR),
        RAY_PRECISION,
    )
}

/// Deposit rate: `utilization * borrow_rate * (1 - reserve_factor)`.
pub fn calc_deposit_rate(
    utilization: &Decimal,
    borrow_rate: &Decimal,
    reserve_factor: &Decimal,
) -> Decimal {
    if utilization.is_zero() {
        return ray_zero();
    }

    mul_half_up(
        &mul_half_up(utilization, borrow_rate, RAY_PRECISION),
        &(bps() - reserve_factor),
        RAY_PRECISION,
    )
}

/// `e^(rate * exp)` by Taylor expansion up to the fifth term.
pub fn calculate_compounded_interest(rate: &Decimal, exp: u64) -> Decimal {
    if exp == 0 {
        return ray();
    }

    // x = rate * time_delta
    let x = mul_half_up(rate, &from_units(exp), RAY_PRECISION);

    let x_sq = mul_half_up(&x, &x, RAY_PRECISION);
    let x_cub = mul_half_up(&x_sq, &x, RAY_PRECISION);
    let x_pow4 = mul_half_up(&x_cub, &x, RAY_PRECISION);
    let x_pow5 = mul_half_up(&x_pow4, &x, RAY_PRECISION);

    let term2 = div_half_up(&x_sq, &from_units(2), RAY_PRECISION);
    let term3 = div_half_up(&x_cub, &from_units(6), RAY_PRECISION);
    let term4 = div_half_up(&x_pow4, &from_units(24), RAY_PRECISION);
    let term5 = div_half_up(&x_pow5, &from_units(120), RAY_PRECISION);

    ray() + x + term2 + term3 + term4 + term5
}

/// Returns `(new_borrow_index, old_borrow_index)`.
pub fn update_borrow_index(
    old_borrow_index: &Decimal,
    interest_factor: &Decimal,
) -> (Decimal, Decimal) {
    let new_borrow_index = mul_half_up(old_borrow_index, interest_factor, RAY_PRECISION);

    (new_borrow_index, old_borrow_index.clone())
}

/// Grows the supply index by the ratio of `rewards_increase` to the current
/// real supply. An empty market keeps its index.
pub fn update_supply_index(
    supplied: &Decimal,
    old_supply_index: &Decimal,
    rewards_increase: &Decimal,
) -> Decimal {
    if supplied.is_zero() {
        return old_supply_index.clone();
    }

    let total_supplied_with_interest = mul_half_up(supplied, old_supply_index, RAY_PRECISION);
    if total_supplied_with_interest.is_zero() {
        return old_supply_index.clone();
    }
    let rewards_ratio = div_half_up(
        rewards_increase,
        &total_supplied_with_interest,
        RAY_PRECISION,
    );

    let rewards_factor = ray() + rewards_ratio;

    mul_half_up(old_supply_index, &rewards_factor, RAY_PRECISION)
}

/// Splits the interest accrued on `borrowed` between suppliers and the
/// protocol. Returns `(supplier_rewards_ray, protocol_fee_ray)`.
pub fn calc_supplier_rewards(
    params: &MarketParams,
    borrowed: &Decimal,
    new_borrow_index: &Decimal,
    old_borrow_index: &Decimal,
) -> (Decimal, Decimal) {
    let old_total_debt = mul_half_up(borrowed, old_borrow_index, RAY_PRECISION);
    let new_total_debt = mul_half_up(borrowed, new_borrow_index, RAY_PRECISION);

    let accrued_interest_ray = new_total_debt.saturating_sub(&old_total_debt);

    let protocol_fee = mul_half_up(&accrued_interest_ray, &params.reserve_factor, RAY_PRECISION);
    let supplier_rewards_ray = accrued_interest_ray.saturating_sub(&protocol_fee);

    (supplier_rewards_ray, protocol_fee)
}

pub fn get_utilization(borrowed: &Decimal, supplied: &Decimal) -> Decimal {
    if supplied.is_zero() {
        return ray_zero();
    }
    div_half_up(borrowed, supplied, RAY_PRECISION)
}

pub fn scaled_to_original(
    scaled_amount: &Decimal,
    index: &Decimal,
    asset_decimals: usize,
) -> Decimal {
    let original_amount = mul_half_up(scaled_amount, index, RAY_PRECISION);
    rescale_half_up(&original_amount, asset_decimals)
}

/// Indexes the market would have at `current_timestamp`, without mutating it.
#[allow(clippy::too_many_arguments)]
pub fn simulate_update_indexes(
    current_timestamp: u64,
    last_timestamp: u64,
    borrowed: &Decimal,
    current_borrowed_index: &Decimal,
    supplied: &Decimal,
    current_supply_index: &Decimal,
    params: &MarketParams,
    strategy: &dyn InterestRateStrategy,
) -> MarketIndex {
    let delta = current_timestamp.saturating_sub(last_timestamp);

    if delta == 0 {
        return MarketIndex {
            supply_index_ray: current_supply_index.clone(),
            borrow_index_ray: current_borrowed_index.clone(),
        };
    }

    let borrowed_original =
        scaled_to_original(borrowed, current_borrowed_index, params.asset_decimals);
    let supplied_original =
        scaled_to_original(supplied, current_supply_index, params.asset_decimals);
    let utilization = get_utilization(&borrowed_original, &supplied_original);
    let borrow_rate = strategy.current_rate(&params.asset_id, &utilization);
    let borrow_factor = calculate_compounded_interest(&borrow_rate, delta);
    let (new_borrow_index, old_borrow_index) =
        update_borrow_index(current_borrowed_index, &borrow_factor);

    let (supplier_rewards_ray, _) =
        calc_supplier_rewards(params, borrowed, &new_borrow_index, &old_borrow_index);

    let new_supply_index =
        update_supply_index(supplied, current_supply_index, &supplier_rewards_ray);

    MarketIndex {
        supply_index_ray: new_supply_index,
        borrow_index_ray: new_borrow_index,
    }
}
