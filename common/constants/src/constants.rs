pub const MILLISECONDS_PER_YEAR: u64 = 31_556_926_000;

pub const RAY: u128 = 1_000_000_000_000_000_000_000_000_000;
pub const RAY_PRECISION: usize = 27;

/// Price unit. All oracle prices and health factors are WAD based.
pub const WAD: u128 = 1_000_000_000_000_000_000;
pub const WAD_PRECISION: usize = 18;

pub const BPS: usize = 10_000; // 100%
pub const BPS_PRECISION: usize = 4;

/// Health factor below which a position can be liquidated (1.0 in WAD).
pub const MIN_HEALTH_FACTOR_WAD: u128 = WAD;

/// Upper bound for the annual borrow rate of any market (1000% in BPS).
pub const MAX_BORROW_RATE_BPS: u64 = 100_000;

/// Event target used by every structured protocol event.
pub const EVENTS_TARGET: &str = "lending::events";
