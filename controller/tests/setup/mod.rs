#![allow(dead_code)]

use crate::constants::*;

use common_tokens::TokenLedger;
use controller::{
    AccountPosition, Address, AssetId, Controller, HealthFactor, LendingError, LendingResult,
    ProtocolConfig, SwapAdapter, SwapReceipt,
};
use liquidity_layer::MarketState;
use num_bigint::BigUint;
use swap_mock::FixedRateSwap;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

pub fn asset(token: &str) -> AssetId {
    AssetId::new(token)
}

pub fn address(name: &str) -> Address {
    Address::from_name(name).unwrap()
}

/// `amount` whole tokens in raw units.
pub fn scaled_amount(amount: u64, decimals: usize) -> BigUint {
    BigUint::from(amount) * BigUint::from(10u64).pow(decimals as u32)
}

/// `numerator / denominator` whole tokens in raw units.
pub fn fraction(numerator: u64, denominator: u64, decimals: usize) -> BigUint {
    scaled_amount(numerator, decimals) / BigUint::from(denominator)
}

/// Ledger contents compared before and after a rejected call.
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerSnapshot {
    pub markets: Vec<MarketState>,
    pub positions: Vec<Option<AccountPosition>>,
    pub tokens: TokenLedger,
}

pub struct LendingPoolTestState {
    pub controller: Controller,
}

impl LendingPoolTestState {
    /// WEGLD, XEGLD and USDC markets, all priced, at t = 0.
    pub fn new() -> Self {
        init_tracing();
        let config = ProtocolConfig::from_toml_str(MARKETS_TOML).unwrap();
        let controller = Controller::from_config(&config).unwrap();
        Self { controller }
    }

    pub fn change_timestamp(&mut self, timestamp: u64) {
        self.controller.set_timestamp(timestamp);
    }

    pub fn mint(&mut self, account: &str, token: &str, amount: &BigUint) {
        self.controller
            .tokens_mut()
            .mint(&asset(token), &address(account), amount);
    }

    pub fn supply_asset(&mut self, account: &str, token: &str, amount: BigUint) {
        self.mint(account, token, &amount);
        self.controller
            .supply(&address(account), &asset(token), &amount)
            .unwrap();
    }

    pub fn supply_asset_error(
        &mut self,
        account: &str,
        token: &str,
        amount: BigUint,
        expected: LendingError,
    ) {
        self.mint(account, token, &amount);
        let err = self
            .controller
            .supply(&address(account), &asset(token), &amount)
            .unwrap_err();
        assert_eq!(err, expected);
    }

    pub fn withdraw_asset(&mut self, account: &str, token: &str, amount: BigUint) -> BigUint {
        self.controller
            .withdraw(&address(account), &asset(token), &amount)
            .unwrap()
    }

    pub fn withdraw_asset_error(
        &mut self,
        account: &str,
        token: &str,
        amount: BigUint,
        expected: LendingError,
    ) {
        let err = self
            .controller
            .withdraw(&address(account), &asset(token), &amount)
            .unwrap_err();
        assert_eq!(err, expected);
    }

    pub fn borrow_asset(&mut self, account: &str, token: &str, amount: BigUint) {
        self.controller
            .borrow(&address(account), &asset(token), &amount)
            .unwrap();
    }

    pub fn borrow_asset_error(
        &mut self,
        account: &str,
        token: &str,
        amount: BigUint,
        expected: LendingError,
    ) {
        let err = self
            .controller
            .borrow(&address(account), &asset(token), &amount)
            .unwrap_err();
        assert_eq!(err, expected);
    }

    /// Mints `amount` to `account` and repays with it. Returns the refund.
    pub fn repay_asset(&mut self, account: &str, token: &str, amount: BigUint) -> BigUint {
        self.mint(account, token, &amount);
        self.controller
            .repay(&address(account), &asset(token), &amount)
            .unwrap()
    }

    pub fn swap_collateral(
        &mut self,
        account: &str,
        adapter: &mut dyn SwapAdapter,
        from: &str,
        to: &str,
        amount: BigUint,
    ) -> LendingResult<SwapReceipt> {
        self.controller.swap_liquidity(
            &address(account),
            adapter,
            &asset(from),
            &asset(to),
            &amount,
            &[],
        )
    }

    /// Adapter at [`ADAPTER_ADDRESS`] holding 1000 of every listed token.
    pub fn fixed_rate_adapter(&mut self, numerator: u64, denominator: u64) -> FixedRateSwap {
        self.fund_adapter();
        FixedRateSwap::new(address(ADAPTER_ADDRESS), numerator, denominator)
    }

    pub fn fund_adapter(&mut self) {
        self.mint(ADAPTER_ADDRESS, WEGLD_TOKEN, &scaled_amount(1_000, EGLD_DECIMALS));
        self.mint(ADAPTER_ADDRESS, XEGLD_TOKEN, &scaled_amount(1_000, XEGLD_DECIMALS));
        self.mint(ADAPTER_ADDRESS, USDC_TOKEN, &scaled_amount(1_000, USDC_DECIMALS));
    }

    pub fn update_markets(&mut self, tokens: &[&str]) {
        let assets: Vec<AssetId> = tokens.iter().map(|token| asset(token)).collect();
        self.controller.update_markets(&assets).unwrap();
    }

    pub fn submit_price(&mut self, token: &str, price_in_dollars: u64) {
        let price = common_structs::price_wad(scaled_amount(price_in_dollars, 18));
        self.controller
            .oracle_mut()
            .submit_price(&asset(token), price);
    }

    pub fn collateral_balance(&self, account: &str, token: &str) -> BigUint {
        self.controller
            .collateral_balance(&asset(token), &address(account))
            .unwrap()
    }

    pub fn debt_balance(&self, account: &str, token: &str) -> BigUint {
        self.controller
            .debt_balance(&asset(token), &address(account))
            .unwrap()
    }

    pub fn health_factor(&self, account: &str) -> HealthFactor {
        self.controller.health_factor(&address(account)).unwrap()
    }

    pub fn is_collateral_enabled(&self, account: &str, token: &str) -> bool {
        self.controller
            .is_collateral_enabled(&asset(token), &address(account))
            .unwrap()
    }

    pub fn position(&self, account: &str, token: &str) -> Option<AccountPosition> {
        self.controller
            .position(&asset(token), &address(account))
            .unwrap()
    }

    pub fn token_balance(&self, account: &str, token: &str) -> BigUint {
        use controller::AssetTransfer;
        self.controller
            .tokens()
            .balance_of(&asset(token), &address(account))
    }

    pub fn reserve_token_balance(&self, token: &str) -> BigUint {
        use controller::AssetTransfer;
        self.controller
            .tokens()
            .balance_of(&asset(token), &Address::reserve(&asset(token)))
    }

    pub fn market_state(&self, token: &str) -> MarketState {
        self.controller
            .reserves()
            .market_state(&asset(token))
            .unwrap()
            .clone()
    }

    pub fn snapshot(&self, accounts: &[&str]) -> LedgerSnapshot {
        let tokens = [WEGLD_TOKEN, XEGLD_TOKEN, USDC_TOKEN];
        let markets = tokens.iter().map(|token| self.market_state(token)).collect();
        let positions = accounts
            .iter()
            .flat_map(|account| tokens.iter().map(move |token| (account, token)))
            .map(|(account, token)| self.position(account, token))
            .collect();

        LedgerSnapshot {
            markets,
            positions,
            tokens: self.controller.tokens().clone(),
        }
    }

    /// Every reserve holds exactly the liquidity its market reports.
    pub fn assert_reserves_match_tokens(&self) {
        for token in [WEGLD_TOKEN, XEGLD_TOKEN, USDC_TOKEN] {
            let reserves = self.market_state(token).reserves.into_raw();
            assert_eq!(
                reserves,
                self.reserve_token_balance(token),
                "reserve of {} out of sync with its token balance",
                token
            );
        }
    }
}
