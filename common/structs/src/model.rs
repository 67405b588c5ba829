use core::fmt;
use std::borrow::Cow;

use common_constants::{BPS_PRECISION, RAY_PRECISION, WAD_PRECISION};
use common_errors::LendingError;
use common_math::{ray, to_decimal, Decimal};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(ticker: &str) -> Self {
        AssetId(ticker.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        AssetId::new(value)
    }
}

const ACCOUNT_TAG: u8 = 0x01;
const RESERVE_TAG: u8 = 0x02;

/// 32 byte account identifier for users, reserves and adapters.
///
/// Layout: namespace tag, name length, name bytes, zero padding. Reserve
/// accounts live in their own namespace and cannot be built from a name.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 32]);

impl Address {
    /// Longest name an address can hold.
    pub const MAX_NAME_LEN: usize = 30;

    fn tagged(tag: u8, name: &str) -> Self {
        let mut bytes = [0u8; 32];
        let len = name.len().min(Self::MAX_NAME_LEN);
        bytes[0] = tag;
        bytes[1] = len as u8;
        bytes[2..2 + len].copy_from_slice(&name.as_bytes()[..len]);
        Address(bytes)
    }

    /// Account address derived from a human readable name.
    ///
    /// # Errors
    /// - `InvalidAddress`: If the name is empty or longer than
    ///   [`Address::MAX_NAME_LEN`] bytes.
    pub fn from_name(name: &str) -> Result<Self, LendingError> {
        if name.is_empty() || name.len() > Self::MAX_NAME_LEN {
            return Err(LendingError::InvalidAddress);
        }
        Ok(Address::tagged(ACCOUNT_TAG, name))
    }

    /// Holder address of the reserve backing `asset`.
    pub fn reserve(asset: &AssetId) -> Self {
        Address::tagged(RESERVE_TAG, asset.as_str())
    }

    pub fn is_reserve(&self) -> bool {
        self.0[0] == RESERVE_TAG
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    fn name(&self) -> Cow<'_, str> {
        let len = usize::from(self.0[1]).min(Self::MAX_NAME_LEN);
        String::from_utf8_lossy(&self.0[2..2 + len])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_reserve() {
            write!(f, "Address(reserve:{})", self.name())
        } else {
            write!(f, "Address({})", self.name())
        }
    }
}

/// Interest rate model and reserve factor of a market.
///
/// Rates and utilization points are RAY based annual values, the reserve
/// factor is BPS based.
#[derive(Clone, Debug, PartialEq)]
pub struct MarketParams {
    pub max_borrow_rate: Decimal,
    pub base_borrow_rate: Decimal,
    pub slope1: Decimal,
    pub slope2: Decimal,
    pub slope3: Decimal,
    pub mid_utilization: Decimal,
    pub optimal_utilization: Decimal,
    pub reserve_factor: Decimal,
    pub asset_id: AssetId,
    pub asset_decimals: usize,
}

impl MarketParams {
    pub fn validate(&self) -> Result<(), LendingError> {
        let ticker_len = self.asset_id.as_str().len();
        if ticker_len == 0 || ticker_len > Address::MAX_NAME_LEN {
            return Err(LendingError::InvalidMarketParams("asset id length"));
        }
        if self.mid_utilization.is_zero() {
            return Err(LendingError::InvalidMarketParams("mid utilization is zero"));
        }
        if self.optimal_utilization <= self.mid_utilization {
            return Err(LendingError::InvalidMarketParams(
                "optimal utilization must exceed mid utilization",
            ));
        }
        if self.optimal_utilization >= ray() {
            return Err(LendingError::InvalidMarketParams(
                "optimal utilization must be below 100%",
            ));
        }
        if self.max_borrow_rate < self.base_borrow_rate {
            return Err(LendingError::InvalidMarketParams(
                "max borrow rate is below the base rate",
            ));
        }
        if self.reserve_factor >= common_math::bps() {
            return Err(LendingError::InvalidMarketParams(
                "reserve factor must be below 100%",
            ));
        }
        Ok(())
    }
}

/// Risk parameters of an asset, BPS based.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetConfig {
    pub loan_to_value_bps: Decimal,
    pub liquidation_threshold_bps: Decimal,
    pub is_collateralizable: bool,
    pub is_borrowable: bool,
}

impl AssetConfig {
    pub fn new(ltv_bps: u64, liquidation_threshold_bps: u64) -> Self {
        AssetConfig {
            loan_to_value_bps: bps_value(ltv_bps),
            liquidation_threshold_bps: bps_value(liquidation_threshold_bps),
            is_collateralizable: liquidation_threshold_bps > 0,
            is_borrowable: true,
        }
    }

    pub fn can_supply(&self) -> bool {
        self.is_collateralizable
    }

    pub fn can_borrow(&self) -> bool {
        self.is_borrowable
    }

    pub fn validate(&self) -> Result<(), LendingError> {
        if self.liquidation_threshold_bps < self.loan_to_value_bps
            || self.liquidation_threshold_bps > common_math::bps()
        {
            return Err(LendingError::InvalidLiquidationThreshold);
        }
        Ok(())
    }
}

pub fn bps_value(value: u64) -> Decimal {
    to_decimal(BigUint::from(value), BPS_PRECISION)
}

/// Converts a BPS amount (e.g. `450` for 4.5%) to a RAY based ratio.
pub fn bps_to_ray(value: u64) -> Decimal {
    bps_value(value).rescale(RAY_PRECISION)
}

pub fn price_wad(raw: BigUint) -> Decimal {
    to_decimal(raw, WAD_PRECISION)
}

#[derive(Clone, Debug, PartialEq)]
pub struct MarketIndex {
    pub supply_index_ray: Decimal,
    pub borrow_index_ray: Decimal,
}

/// Per (asset, account) record held by the position tracker.
///
/// Scaled amounts are RAY based and independent of time; the real balance is
/// the scaled amount times the reserve index at query time.
#[derive(Clone, Debug, PartialEq)]
pub struct AccountPosition {
    pub asset_id: AssetId,
    pub account: Address,
    pub scaled_amount_ray: Decimal,
    pub scaled_debt_ray: Decimal,
    pub usage_as_collateral: bool,
}

impl AccountPosition {
    pub fn new(asset_id: AssetId, account: Address) -> Self {
        AccountPosition {
            asset_id,
            account,
            scaled_amount_ray: common_math::ray_zero(),
            scaled_debt_ray: common_math::ray_zero(),
            usage_as_collateral: false,
        }
    }

    pub fn has_supply(&self) -> bool {
        !self.scaled_amount_ray.is_zero()
    }

    pub fn has_debt(&self) -> bool {
        !self.scaled_debt_ray.is_zero()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_supply() && !self.has_debt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionAction {
    Supply,
    Withdraw,
    Borrow,
    Repay,
    SwapOut,
    SwapIn,
    CollateralToggle,
}

impl fmt::Display for PositionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PositionAction::Supply => "supply",
            PositionAction::Withdraw => "withdraw",
            PositionAction::Borrow => "borrow",
            PositionAction::Repay => "repay",
            PositionAction::SwapOut => "swap_out",
            PositionAction::SwapIn => "swap_in",
            PositionAction::CollateralToggle => "collateral_toggle",
        };
        f.write_str(name)
    }
}

/// Ephemeral description of one collateral swap.
#[derive(Clone, Debug, PartialEq)]
pub struct SwapRequest {
    pub adapter: Address,
    pub source_asset: AssetId,
    pub destination_asset: AssetId,
    pub amount: BigUint,
    pub params: Vec<u8>,
}

impl SwapRequest {
    pub fn new(
        adapter: Address,
        source_asset: &AssetId,
        destination_asset: &AssetId,
        amount: &BigUint,
        params: &[u8],
    ) -> Result<Self, LendingError> {
        if source_asset == destination_asset {
            return Err(LendingError::EqualAssets);
        }
        Ok(SwapRequest {
            adapter,
            source_asset: source_asset.clone(),
            destination_asset: destination_asset.clone(),
            amount: amount.clone(),
            params: params.to_vec(),
        })
    }
}

/// Outcome of a committed swap, in raw asset units.
#[derive(Clone, Debug, PartialEq)]
pub struct SwapReceipt {
    pub amount_in: BigUint,
    pub declared_out: BigUint,
    pub amount_out: BigUint,
    pub health_factor: HealthFactor,
}

/// Risk weighted collateral over debt. Never stored.
#[derive(Clone, Debug, PartialEq)]
pub enum HealthFactor {
    /// No outstanding debt.
    Infinite,
    /// WAD based ratio.
    Ratio(Decimal),
}

impl HealthFactor {
    pub fn is_at_least(&self, threshold: &Decimal) -> bool {
        match self {
            HealthFactor::Infinite => true,
            HealthFactor::Ratio(value) => value >= threshold,
        }
    }

    pub fn ratio(&self) -> Option<&Decimal> {
        match self {
            HealthFactor::Infinite => None,
            HealthFactor::Ratio(value) => Some(value),
        }
    }
}

impl fmt::Display for HealthFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthFactor::Infinite => f.write_str("inf"),
            HealthFactor::Ratio(value) => write!(f, "{}", value),
        }
    }
}
