use thiserror::Error;

/// Every way a lending operation can be rejected.
///
/// A returned error always means the whole operation was aborted and no
/// state changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LendingError {
    #[error("Assets are the same.")]
    EqualAssets,

    #[error("Reserve is not active.")]
    ReserveInactive,

    #[error("Reserve is frozen.")]
    ReserveFrozen,

    #[error("Not enough tokens deposited for this account.")]
    InsufficientBalance,

    #[error("Swap adapter failure: {0}")]
    AdapterFailure(String),

    #[error("Health factor will be too low.")]
    HealthFactorBelowThreshold,

    #[error("Operation not allowed while a swap is ongoing.")]
    ReentrantCall,

    #[error("Asset not supported.")]
    AssetNotSupported,

    #[error("Asset already supported.")]
    AssetAlreadySupported,

    #[error("Amount must be greater than zero.")]
    AmountMustBeGreaterThanZero,

    #[error("Insufficient liquidity.")]
    InsufficientLiquidity,

    #[error("Not enough collateral available for this loan.")]
    InsufficientCollateral,

    #[error("Asset not borrowable.")]
    AssetNotBorrowable,

    #[error("No debt to repay for this asset.")]
    NoDebtToRepay,

    #[error("No price available for asset {0}.")]
    PriceNotAvailable(String),

    #[error("Invalid liquidation threshold has to be higher than the loan-to-value.")]
    InvalidLiquidationThreshold,

    #[error("Invalid market parameters: {0}")]
    InvalidMarketParams(&'static str),

    #[error("Collateral cannot be enabled on a zero balance.")]
    CollateralWithZeroBalance,

    #[error("Insufficient funds for transfer.")]
    InsufficientFunds,

    #[error("Invalid swap adapter.")]
    InvalidSwapAdapter,

    #[error("Invalid address name.")]
    InvalidAddress,
}

pub type LendingResult<T> = Result<T, LendingError>;
