#![allow(dead_code)]

pub const WEGLD_TOKEN: &str = "WEGLD-bd4d79";
pub const XEGLD_TOKEN: &str = "XEGLD-e413ed";
pub const USDC_TOKEN: &str = "USDC-c76f1f";
pub const UNLISTED_TOKEN: &str = "NOPE-000000";

pub const EGLD_DECIMALS: usize = 18;
pub const XEGLD_DECIMALS: usize = 18;
pub const USDC_DECIMALS: usize = 6;

pub const EGLD_PRICE_IN_DOLLARS: u64 = 40;
pub const XEGLD_PRICE_IN_DOLLARS: u64 = 48;
pub const USDC_PRICE_IN_DOLLARS: u64 = 1;

pub const OWNER_ADDRESS: &str = "owner";
pub const SUPPLIER_ADDRESS: &str = "supplier";
pub const BORROWER_ADDRESS: &str = "borrower";
pub const SWAPPER_ADDRESS: &str = "swapper";
pub const ADAPTER_ADDRESS: &str = "swap-adapter";

pub const MILLISECONDS_PER_DAY: u64 = 86_400_000;

/// Three markets sharing one rate curve. WEGLD and USDC are 75% LTV / 80%
/// threshold, XEGLD is 70% / 75%.
pub const MARKETS_TOML: &str = r#"
start_timestamp = 0
swap_adapters = ["swap-adapter"]

[[markets]]
asset_id = "WEGLD-bd4d79"
decimals = 18
max_borrow_rate_bps = 30000
base_borrow_rate_bps = 100
slope1_bps = 400
slope2_bps = 1000
slope3_bps = 15000
mid_utilization_bps = 5000
optimal_utilization_bps = 8000
reserve_factor_bps = 1000
ltv_bps = 7500
liquidation_threshold_bps = 8000
price_wad = "40000000000000000000"

[[markets]]
asset_id = "XEGLD-e413ed"
decimals = 18
max_borrow_rate_bps = 30000
base_borrow_rate_bps = 100
slope1_bps = 400
slope2_bps = 1000
slope3_bps = 15000
mid_utilization_bps = 5000
optimal_utilization_bps = 8000
reserve_factor_bps = 1000
ltv_bps = 7000
liquidation_threshold_bps = 7500
price_wad = "48000000000000000000"

[[markets]]
asset_id = "USDC-c76f1f"
decimals = 6
max_borrow_rate_bps = 30000
base_borrow_rate_bps = 100
slope1_bps = 400
slope2_bps = 1000
slope3_bps = 15000
mid_utilization_bps = 5000
optimal_utilization_bps = 8000
reserve_factor_bps = 1000
ltv_bps = 7500
liquidation_threshold_bps = 8000
price_wad = "1000000000000000000"
"#;
