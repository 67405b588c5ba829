use common_math::wad;
use controller::{Controller, LendingResult};
use num_bigint::BigUint;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use swap_mock::FixedRateSwap;

pub mod constants;
pub mod setup;
use constants::*;
use setup::*;

const ACCOUNTS: [&str; 3] = ["alice", "bob", "carol"];
const TOKENS: [(&str, usize); 3] = [
    (WEGLD_TOKEN, EGLD_DECIMALS),
    (XEGLD_TOKEN, XEGLD_DECIMALS),
    (USDC_TOKEN, USDC_DECIMALS),
];

/// Between 0.01 and 100 whole tokens.
fn random_amount(rng: &mut ChaCha8Rng, decimals: usize) -> BigUint {
    fraction(rng.random_range(1..10_000u64), 100, decimals)
}

/// Runs `op`; a rejected call must leave the ledger exactly as it was.
fn checked<R>(
    state: &mut LendingPoolTestState,
    op: impl FnOnce(&mut Controller) -> LendingResult<R>,
) -> Option<R> {
    let before = state.snapshot(&ACCOUNTS);
    match op(&mut state.controller) {
        Ok(value) => Some(value),
        Err(err) => {
            assert_eq!(
                state.snapshot(&ACCOUNTS),
                before,
                "rejected call ({:?}) changed the ledger",
                err
            );
            None
        },
    }
}

fn assert_invariants(state: &LendingPoolTestState) {
    assert!(!state.controller.is_swap_ongoing());
    state.assert_reserves_match_tokens();

    for account in ACCOUNTS {
        for (token, _) in TOKENS {
            if let Some(position) = state.position(account, token) {
                assert!(!position.is_empty(), "empty position stored");
                if !position.has_supply() {
                    assert!(
                        !position.usage_as_collateral,
                        "collateral flag on a zero balance"
                    );
                }
            }
        }
    }
}

fn assert_healthy(state: &LendingPoolTestState, account: &str) {
    assert!(state.health_factor(account).is_at_least(&wad()));
}

fn run_simulation(seed: u64, steps: usize) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut state = LendingPoolTestState::new();
    state.supply_asset(SUPPLIER_ADDRESS, WEGLD_TOKEN, scaled_amount(10_000, EGLD_DECIMALS));
    state.supply_asset(SUPPLIER_ADDRESS, XEGLD_TOKEN, scaled_amount(10_000, XEGLD_DECIMALS));
    state.supply_asset(SUPPLIER_ADDRESS, USDC_TOKEN, scaled_amount(1_000_000, USDC_DECIMALS));
    state.fund_adapter();

    let mut now = 0u64;
    let mut committed_swaps = 0usize;

    for _ in 0..steps {
        let account = ACCOUNTS[rng.random_range(0..ACCOUNTS.len())];
        let (token, decimals) = TOKENS[rng.random_range(0..TOKENS.len())];
        let caller = address(account);
        let id = asset(token);

        match rng.random_range(0..8u32) {
            0 => {
                let amount = random_amount(&mut rng, decimals);
                state.mint(account, token, &amount);
                checked(&mut state, |controller| controller.supply(&caller, &id, &amount));
            },
            1 => {
                let amount = random_amount(&mut rng, decimals);
                if checked(&mut state, |controller| controller.withdraw(&caller, &id, &amount))
                    .is_some()
                {
                    assert_healthy(&state, account);
                }
            },
            2 => {
                let amount = random_amount(&mut rng, decimals);
                checked(&mut state, |controller| controller.borrow(&caller, &id, &amount));
            },
            3 => {
                let amount = random_amount(&mut rng, decimals);
                state.mint(account, token, &amount);
                checked(&mut state, |controller| controller.repay(&caller, &id, &amount));
            },
            4 | 5 => {
                let (destination, _) = TOKENS[rng.random_range(0..TOKENS.len())];
                let destination_id = asset(destination);
                let balance = state.collateral_balance(account, token);
                let amount = match rng.random_range(0..4u32) {
                    0 => balance.clone(),
                    1 => balance.clone() / 2u64,
                    2 => balance.clone() + 1u64,
                    _ => random_amount(&mut rng, decimals),
                };
                let mut adapter = FixedRateSwap::new(
                    address(ADAPTER_ADDRESS),
                    rng.random_range(1..=4u64),
                    rng.random_range(1..=4u64),
                );

                let source_reserve_before = state.reserve_token_balance(token);
                let destination_reserve_before = state.reserve_token_balance(destination);
                let receipt = checked(&mut state, |controller| {
                    controller.swap_liquidity(
                        &caller,
                        &mut adapter,
                        &id,
                        &destination_id,
                        &amount,
                        &[],
                    )
                });

                if let Some(receipt) = receipt {
                    committed_swaps += 1;
                    assert!(receipt.health_factor.is_at_least(&wad()));
                    assert_healthy(&state, account);
                    assert_eq!(
                        source_reserve_before - &receipt.amount_in,
                        state.reserve_token_balance(token)
                    );
                    assert_eq!(
                        destination_reserve_before + &receipt.amount_out,
                        state.reserve_token_balance(destination)
                    );
                    assert!(state.is_collateral_enabled(account, destination));
                    if state.collateral_balance(account, token) == BigUint::from(0u64) {
                        assert!(!state.is_collateral_enabled(account, token));
                    }
                }
            },
            6 => {
                now += rng.random_range(1..=5u64) * MILLISECONDS_PER_DAY;
                state.change_timestamp(now);
            },
            _ => {
                if rng.random_bool(0.5) {
                    let price = rng.random_range(20..=60u64);
                    state.submit_price(WEGLD_TOKEN, price);
                } else {
                    let enabled = rng.random_bool(0.5);
                    checked(&mut state, |controller| {
                        controller.set_collateral_usage(&caller, &id, enabled)
                    });
                }
            },
        }

        assert_invariants(&state);
    }

    assert!(committed_swaps > 0, "seed {} never committed a swap", seed);
}

/// Random supplies, borrows, repayments, swaps, price moves and time jumps.
///
/// Covers:
/// - Rejected calls never leave partial effects
/// - Reserve liquidity always equals the tokens it holds
/// - Collateral flags never stay on an empty balance
/// - Committed swaps and withdrawals leave the account healthy
#[test]
fn randomized_operations_keep_ledger_consistent() {
    for seed in [7u64, 42, 1_337] {
        run_simulation(seed, 300);
    }
}
