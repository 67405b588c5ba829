use std::path::Path;

use common_errors::{LendingError, LendingResult};
use common_proxies::{AssetTransfer, PriceOracle};
use common_rates::InterestRateStrategy;
use common_structs::{
    bps_to_ray, bps_value, price_wad, Address, AssetConfig, AssetId, MarketParams,
};
use common_tokens::TokenLedger;
use liquidity_layer::LiquidityPool;
use num_bigint::BigUint;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::{oracle::PriceFeeds, Controller};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid protocol config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("cannot read protocol config: {0}")]
    Io(#[from] std::io::Error),
    #[error("market rejected: {0}")]
    Lending(#[from] LendingError),
    #[error("invalid price for {0}")]
    InvalidPrice(String),
}

fn default_true() -> bool {
    true
}

/// Markets a controller starts with.
///
/// ```toml
/// start_timestamp = 0
/// swap_adapters = ["dex-router"]
///
/// [[markets]]
/// asset_id = "USDC"
/// decimals = 6
/// max_borrow_rate_bps = 10000
/// base_borrow_rate_bps = 100
/// slope1_bps = 400
/// slope2_bps = 1000
/// slope3_bps = 15000
/// mid_utilization_bps = 5000
/// optimal_utilization_bps = 8000
/// reserve_factor_bps = 1000
/// ltv_bps = 7500
/// liquidation_threshold_bps = 8000
/// price_wad = "1000000000000000000"
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ProtocolConfig {
    #[serde(default)]
    pub start_timestamp: u64,
    /// Account names of the approved swap adapters.
    #[serde(default)]
    pub swap_adapters: Vec<String>,
    #[serde(default)]
    pub markets: Vec<MarketConfig>,
}

/// One `[[markets]]` table. Rates and utilization points are annual BPS.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MarketConfig {
    pub asset_id: AssetId,
    pub decimals: usize,
    pub max_borrow_rate_bps: u64,
    pub base_borrow_rate_bps: u64,
    pub slope1_bps: u64,
    pub slope2_bps: u64,
    pub slope3_bps: u64,
    pub mid_utilization_bps: u64,
    pub optimal_utilization_bps: u64,
    pub reserve_factor_bps: u64,
    pub ltv_bps: u64,
    pub liquidation_threshold_bps: u64,
    #[serde(default = "default_true")]
    pub is_collateralizable: bool,
    #[serde(default = "default_true")]
    pub is_borrowable: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_frozen: bool,
    /// WAD price of one whole token, as a decimal string.
    #[serde(default)]
    pub price_wad: Option<String>,
}

impl ProtocolConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

impl MarketConfig {
    pub fn market_params(&self) -> MarketParams {
        MarketParams {
            max_borrow_rate: bps_to_ray(self.max_borrow_rate_bps),
            base_borrow_rate: bps_to_ray(self.base_borrow_rate_bps),
            slope1: bps_to_ray(self.slope1_bps),
            slope2: bps_to_ray(self.slope2_bps),
            slope3: bps_to_ray(self.slope3_bps),
            mid_utilization: bps_to_ray(self.mid_utilization_bps),
            optimal_utilization: bps_to_ray(self.optimal_utilization_bps),
            reserve_factor: bps_value(self.reserve_factor_bps),
            asset_id: self.asset_id.clone(),
            asset_decimals: self.decimals,
        }
    }

    pub fn asset_config(&self) -> AssetConfig {
        AssetConfig {
            loan_to_value_bps: bps_value(self.ltv_bps),
            liquidation_threshold_bps: bps_value(self.liquidation_threshold_bps),
            is_collateralizable: self.is_collateralizable,
            is_borrowable: self.is_borrowable,
        }
    }

    pub fn initial_price(&self) -> Result<Option<BigUint>, ConfigError> {
        match &self.price_wad {
            None => Ok(None),
            Some(raw) => BigUint::parse_bytes(raw.trim().as_bytes(), 10)
                .map(Some)
                .ok_or_else(|| ConfigError::InvalidPrice(self.asset_id.to_string())),
        }
    }
}

impl Controller<PriceFeeds, TokenLedger> {
    /// Builds a controller with every configured market, its initial status
    /// flags and, when given, its initial price.
    pub fn from_config(config: &ProtocolConfig) -> Result<Self, ConfigError> {
        let mut controller = Controller::new(config.start_timestamp);

        for market in &config.markets {
            controller.create_market(market.market_params(), market.asset_config())?;

            if !market.is_active {
                controller.deactivate_reserve(&market.asset_id)?;
            }
            if market.is_frozen {
                controller.freeze_reserve(&market.asset_id)?;
            }
            if let Some(price) = market.initial_price()? {
                controller
                    .oracle_mut()
                    .submit_price(&market.asset_id, price_wad(price));
            }
        }

        for name in &config.swap_adapters {
            controller.register_swap_adapter(Address::from_name(name)?)?;
        }

        info!(
            markets = config.markets.len(),
            swap_adapters = config.swap_adapters.len(),
            "controller configured"
        );
        Ok(controller)
    }
}

impl<O, T> Controller<O, T>
where
    O: PriceOracle,
    T: AssetTransfer + Clone,
{
    /// Creates a new market driven by the three slope curve of `params`.
    ///
    /// # Arguments
    /// - `params`: Interest rate model, reserve factor and decimals.
    /// - `config`: Risk parameters of the asset.
    ///
    /// # Errors
    /// - `AssetAlreadySupported`: If the asset has a market.
    /// - `InvalidLiquidationThreshold`: If the threshold is below the LTV.
    /// - `InvalidMarketParams`: If the rate curve is malformed.
    pub fn create_market(
        &mut self,
        params: MarketParams,
        config: AssetConfig,
    ) -> LendingResult<()> {
        let pool = LiquidityPool::with_rate_model(params, self.timestamp);
        self.register_market(pool, config)
    }

    /// Creates a new market whose borrow rate comes from `strategy`.
    pub fn create_market_with_strategy(
        &mut self,
        params: MarketParams,
        config: AssetConfig,
        strategy: Box<dyn InterestRateStrategy>,
    ) -> LendingResult<()> {
        let pool = LiquidityPool::new(params, strategy, self.timestamp);
        self.register_market(pool, config)
    }

    fn register_market(&mut self, pool: LiquidityPool, config: AssetConfig) -> LendingResult<()> {
        self.reentrancy_guard()?;
        config.validate()?;

        let params = pool.params().clone();
        self.reserves.create_market(pool)?;
        self.asset_configs.insert(params.asset_id.clone(), config.clone());

        common_events::create_market_params_event(&params, &config);
        Ok(())
    }

    /// Replaces the risk parameters of a supported asset.
    ///
    /// # Errors
    /// - `AssetNotSupported`: If the asset has no market.
    /// - `InvalidLiquidationThreshold`: If the threshold is below the LTV.
    pub fn edit_asset_config(&mut self, asset: &AssetId, config: AssetConfig) -> LendingResult<()> {
        self.reentrancy_guard()?;
        self.require_asset_supported(asset)?;
        config.validate()?;

        common_events::update_asset_config_event(asset, &config);
        self.asset_configs.insert(asset.clone(), config);
        Ok(())
    }

    pub fn activate_reserve(&mut self, asset: &AssetId) -> LendingResult<()> {
        self.reentrancy_guard()?;
        self.reserves.set_active(asset, true)
    }

    /// Stops every balance affecting operation on the reserve.
    pub fn deactivate_reserve(&mut self, asset: &AssetId) -> LendingResult<()> {
        self.reentrancy_guard()?;
        self.reserves.set_active(asset, false)
    }

    /// Stops new supply and borrows; withdrawals, repayments and swaps out of
    /// the reserve keep working.
    pub fn freeze_reserve(&mut self, asset: &AssetId) -> LendingResult<()> {
        self.reentrancy_guard()?;
        self.reserves.set_frozen(asset, true)
    }

    pub fn unfreeze_reserve(&mut self, asset: &AssetId) -> LendingResult<()> {
        self.reentrancy_guard()?;
        self.reserves.set_frozen(asset, false)
    }

    /// Approves an adapter address for collateral swaps.
    /// The adapter may spend whatever its address holds while it runs.
    ///
    /// # Arguments
    /// - `address`: Account the adapter receives input at and pays out from.
    ///
    /// # Errors
    /// - `InvalidSwapAdapter`: If the address is a reserve account.
    pub fn register_swap_adapter(&mut self, address: Address) -> LendingResult<()> {
        self.reentrancy_guard()?;
        if address.is_reserve() {
            return Err(LendingError::InvalidSwapAdapter);
        }

        info!(adapter = ?address, "swap adapter registered");
        self.swap_adapters.insert(address);
        Ok(())
    }

    /// # Errors
    /// - `InvalidSwapAdapter`: If the address was never registered.
    pub fn remove_swap_adapter(&mut self, address: &Address) -> LendingResult<()> {
        self.reentrancy_guard()?;
        if !self.swap_adapters.remove(address) {
            return Err(LendingError::InvalidSwapAdapter);
        }

        info!(adapter = ?address, "swap adapter removed");
        Ok(())
    }
}
