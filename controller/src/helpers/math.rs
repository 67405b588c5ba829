use common_constants::WAD_PRECISION;
use common_math::{div_half_up, mul_half_up, Decimal};
use common_structs::HealthFactor;

/// Value of `amount` (asset decimals) at a WAD price, WAD based.
pub fn token_value_wad(amount: &Decimal, price_wad: &Decimal) -> Decimal {
    mul_half_up(amount, price_wad, WAD_PRECISION)
}

/// `share` (BPS) of a WAD value.
pub fn weighted_value(value_wad: &Decimal, share_bps: &Decimal) -> Decimal {
    mul_half_up(value_wad, share_bps, WAD_PRECISION)
}

/// Risk weighted collateral over borrowed value. No debt means infinite.
pub fn compute_health_factor(
    weighted_collateral_wad: &Decimal,
    borrowed_value_wad: &Decimal,
) -> HealthFactor {
    if borrowed_value_wad.is_zero() {
        return HealthFactor::Infinite;
    }

    HealthFactor::Ratio(div_half_up(
        weighted_collateral_wad,
        borrowed_value_wad,
        WAD_PRECISION,
    ))
}
