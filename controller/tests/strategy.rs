use controller::{Address, HealthFactor, LendingError};
use num_bigint::BigUint;
use swap_mock::{
    FailingSwap, FixedRateSwap, ImpostorSwap, OverReportingSwap, ReentrantSwap, ZeroOutputSwap,
};

pub mod constants;
pub mod setup;
use constants::*;
use setup::*;

/// Swapper holds 1 WEGLD as collateral, the adapter pays 2 XEGLD per WEGLD.
fn setup_swapper() -> (LendingPoolTestState, FixedRateSwap) {
    let mut state = LendingPoolTestState::new();
    state.supply_asset(SUPPLIER_ADDRESS, WEGLD_TOKEN, scaled_amount(100, EGLD_DECIMALS));
    state.supply_asset(SUPPLIER_ADDRESS, USDC_TOKEN, scaled_amount(10_000, USDC_DECIMALS));
    state.supply_asset(SWAPPER_ADDRESS, WEGLD_TOKEN, scaled_amount(1, EGLD_DECIMALS));
    let adapter = state.fixed_rate_adapter(2, 1);
    (state, adapter)
}

#[test]
fn swap_quarter_of_deposit_into_destination_collateral() {
    let (mut state, mut adapter) = setup_swapper();

    let receipt = state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            fraction(1, 4, EGLD_DECIMALS),
        )
        .unwrap();

    assert_eq!(receipt.amount_in, fraction(1, 4, EGLD_DECIMALS));
    assert_eq!(receipt.amount_out, fraction(1, 2, XEGLD_DECIMALS));
    assert_eq!(receipt.declared_out, receipt.amount_out);
    assert_eq!(receipt.health_factor, HealthFactor::Infinite);

    assert_eq!(
        state.collateral_balance(SWAPPER_ADDRESS, WEGLD_TOKEN),
        fraction(3, 4, EGLD_DECIMALS)
    );
    assert_eq!(
        state.collateral_balance(SWAPPER_ADDRESS, XEGLD_TOKEN),
        fraction(1, 2, XEGLD_DECIMALS)
    );
    assert!(state.is_collateral_enabled(SWAPPER_ADDRESS, WEGLD_TOKEN));
    assert!(state.is_collateral_enabled(SWAPPER_ADDRESS, XEGLD_TOKEN));
    assert_eq!(
        state.token_balance(ADAPTER_ADDRESS, WEGLD_TOKEN),
        scaled_amount(1_000, EGLD_DECIMALS) + fraction(1, 4, EGLD_DECIMALS)
    );
    state.assert_reserves_match_tokens();
}

#[test]
fn swap_more_than_deposit_fails_and_keeps_balances() {
    let (mut state, mut adapter) = setup_swapper();
    let before = state.snapshot(&[SWAPPER_ADDRESS]);

    let err = state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            fraction(11, 10, EGLD_DECIMALS),
        )
        .unwrap_err();

    assert_eq!(err, LendingError::InsufficientBalance);
    assert_eq!(state.snapshot(&[SWAPPER_ADDRESS]), before);
    assert_eq!(
        state.collateral_balance(SWAPPER_ADDRESS, WEGLD_TOKEN),
        scaled_amount(1, EGLD_DECIMALS)
    );
}

#[test]
fn swap_without_source_position_fails_with_insufficient_balance() {
    let (mut state, mut adapter) = setup_swapper();

    let err = state
        .swap_collateral(
            BORROWER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            scaled_amount(1, EGLD_DECIMALS),
        )
        .unwrap_err();

    assert_eq!(err, LendingError::InsufficientBalance);
    assert_eq!(state.position(BORROWER_ADDRESS, WEGLD_TOKEN), None);
}

#[test]
fn swap_breaking_health_factor_is_rolled_back() {
    let mut state = LendingPoolTestState::new();
    state.supply_asset(SUPPLIER_ADDRESS, USDC_TOKEN, scaled_amount(10_000, USDC_DECIMALS));
    state.supply_asset(SWAPPER_ADDRESS, WEGLD_TOKEN, scaled_amount(1, EGLD_DECIMALS));

    // 1 WEGLD = $40 weighted at 80% covers $32; 29 USDC keeps it just above 1.0
    state.borrow_asset(SWAPPER_ADDRESS, USDC_TOKEN, scaled_amount(29, USDC_DECIMALS));
    assert!(matches!(
        state.health_factor(SWAPPER_ADDRESS),
        HealthFactor::Ratio(_)
    ));

    // Half a WEGLD for a quarter XEGLD: $12 of collateral weighted at 75%
    let mut adapter = state.fixed_rate_adapter(1, 2);
    let before = state.snapshot(&[SWAPPER_ADDRESS]);

    let err = state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            fraction(1, 2, EGLD_DECIMALS),
        )
        .unwrap_err();

    assert_eq!(err, LendingError::HealthFactorBelowThreshold);
    assert_eq!(state.snapshot(&[SWAPPER_ADDRESS]), before);
    assert_eq!(
        state.collateral_balance(SWAPPER_ADDRESS, WEGLD_TOKEN),
        scaled_amount(1, EGLD_DECIMALS)
    );
    assert_eq!(
        state.collateral_balance(SWAPPER_ADDRESS, XEGLD_TOKEN),
        BigUint::from(0u64)
    );
    assert!(!state.controller.is_swap_ongoing());
}

#[test]
fn swap_keeping_health_factor_above_threshold_succeeds() {
    let mut state = LendingPoolTestState::new();
    state.supply_asset(SUPPLIER_ADDRESS, USDC_TOKEN, scaled_amount(10_000, USDC_DECIMALS));
    state.supply_asset(SWAPPER_ADDRESS, WEGLD_TOKEN, scaled_amount(1, EGLD_DECIMALS));
    state.borrow_asset(SWAPPER_ADDRESS, USDC_TOKEN, scaled_amount(20, USDC_DECIMALS));

    // Fair price: 5 XEGLD for 6 WEGLD
    let mut adapter = state.fixed_rate_adapter(5, 6);
    let receipt = state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            fraction(1, 2, EGLD_DECIMALS),
        )
        .unwrap();

    let threshold = common_math::wad();
    assert!(receipt.health_factor.is_at_least(&threshold));
    assert_eq!(state.health_factor(SWAPPER_ADDRESS), receipt.health_factor);
}

#[test]
fn swap_entire_balance_after_repayment_empties_source() {
    let mut state = LendingPoolTestState::new();
    state.supply_asset(SUPPLIER_ADDRESS, WEGLD_TOKEN, scaled_amount(100, EGLD_DECIMALS));
    state.supply_asset(SUPPLIER_ADDRESS, USDC_TOKEN, scaled_amount(10_000, USDC_DECIMALS));
    state.supply_asset(BORROWER_ADDRESS, USDC_TOKEN, scaled_amount(5_000, USDC_DECIMALS));
    state.supply_asset(SWAPPER_ADDRESS, WEGLD_TOKEN, scaled_amount(1, EGLD_DECIMALS));

    // WEGLD earns interest from another borrower while the swapper is in debt
    state.borrow_asset(BORROWER_ADDRESS, WEGLD_TOKEN, scaled_amount(50, EGLD_DECIMALS));
    state.borrow_asset(SWAPPER_ADDRESS, USDC_TOKEN, scaled_amount(10, USDC_DECIMALS));

    state.change_timestamp(30 * MILLISECONDS_PER_DAY);
    let refund = state.repay_asset(SWAPPER_ADDRESS, USDC_TOKEN, scaled_amount(20, USDC_DECIMALS));
    assert!(refund > BigUint::from(0u64));
    assert_eq!(
        state.debt_balance(SWAPPER_ADDRESS, USDC_TOKEN),
        BigUint::from(0u64)
    );

    state.update_markets(&[WEGLD_TOKEN]);
    let balance = state.collateral_balance(SWAPPER_ADDRESS, WEGLD_TOKEN);
    assert!(balance > scaled_amount(1, EGLD_DECIMALS));

    let mut adapter = state.fixed_rate_adapter(1, 1);
    let receipt = state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            balance.clone(),
        )
        .unwrap();

    assert_eq!(receipt.amount_out, balance);
    assert_eq!(
        state.collateral_balance(SWAPPER_ADDRESS, WEGLD_TOKEN),
        BigUint::from(0u64)
    );
    assert_eq!(state.position(SWAPPER_ADDRESS, WEGLD_TOKEN), None);
    assert!(!state.is_collateral_enabled(SWAPPER_ADDRESS, WEGLD_TOKEN));
    assert!(state.is_collateral_enabled(SWAPPER_ADDRESS, XEGLD_TOKEN));
    state.assert_reserves_match_tokens();
}

#[test]
fn swap_same_asset_fails_for_any_amount() {
    let (mut state, mut adapter) = setup_swapper();

    for amount in [
        BigUint::from(0u64),
        BigUint::from(1u64),
        scaled_amount(1, EGLD_DECIMALS),
        scaled_amount(1_000_000_000, EGLD_DECIMALS),
    ] {
        for token in [WEGLD_TOKEN, USDC_TOKEN, UNLISTED_TOKEN] {
            let err = state
                .swap_collateral(SWAPPER_ADDRESS, &mut adapter, token, token, amount.clone())
                .unwrap_err();
            assert_eq!(err, LendingError::EqualAssets);
        }
    }
}

#[test]
fn swap_touching_inactive_reserve_fails_and_keeps_state() {
    let (mut state, mut adapter) = setup_swapper();

    for (inactive, from, to) in [
        (WEGLD_TOKEN, WEGLD_TOKEN, XEGLD_TOKEN),
        (XEGLD_TOKEN, WEGLD_TOKEN, XEGLD_TOKEN),
    ] {
        state.controller.deactivate_reserve(&asset(inactive)).unwrap();
        let before = state.snapshot(&[SWAPPER_ADDRESS]);

        let err = state
            .swap_collateral(
                SWAPPER_ADDRESS,
                &mut adapter,
                from,
                to,
                fraction(1, 4, EGLD_DECIMALS),
            )
            .unwrap_err();

        assert_eq!(err, LendingError::ReserveInactive);
        assert_eq!(state.snapshot(&[SWAPPER_ADDRESS]), before);
        state.controller.activate_reserve(&asset(inactive)).unwrap();
    }
}

#[test]
fn swap_into_frozen_reserve_fails() {
    let (mut state, mut adapter) = setup_swapper();
    state.controller.freeze_reserve(&asset(XEGLD_TOKEN)).unwrap();
    let before = state.snapshot(&[SWAPPER_ADDRESS]);

    let err = state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            fraction(1, 4, EGLD_DECIMALS),
        )
        .unwrap_err();

    assert_eq!(err, LendingError::ReserveFrozen);
    assert_eq!(state.snapshot(&[SWAPPER_ADDRESS]), before);
}

#[test]
fn swap_out_of_frozen_reserve_succeeds() {
    let (mut state, mut adapter) = setup_swapper();
    state.controller.freeze_reserve(&asset(WEGLD_TOKEN)).unwrap();

    state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            fraction(1, 4, EGLD_DECIMALS),
        )
        .unwrap();

    assert_eq!(
        state.collateral_balance(SWAPPER_ADDRESS, WEGLD_TOKEN),
        fraction(3, 4, EGLD_DECIMALS)
    );
    assert!(state.market_state(WEGLD_TOKEN).is_frozen);
}

#[test]
fn swap_rejects_zero_amount_and_unlisted_assets() {
    let (mut state, mut adapter) = setup_swapper();

    let err = state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            BigUint::from(0u64),
        )
        .unwrap_err();
    assert_eq!(err, LendingError::AmountMustBeGreaterThanZero);

    for (from, to) in [(UNLISTED_TOKEN, XEGLD_TOKEN), (WEGLD_TOKEN, UNLISTED_TOKEN)] {
        let err = state
            .swap_collateral(
                SWAPPER_ADDRESS,
                &mut adapter,
                from,
                to,
                scaled_amount(1, EGLD_DECIMALS),
            )
            .unwrap_err();
        assert_eq!(err, LendingError::AssetNotSupported);
    }
}

#[test]
fn swap_credits_observed_proceeds_not_declared_ones() {
    let (mut state, adapter) = setup_swapper();
    let mut adapter = OverReportingSwap::new(adapter, 1_000_000);

    let receipt = state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            fraction(1, 4, EGLD_DECIMALS),
        )
        .unwrap();

    assert_eq!(receipt.amount_out, fraction(1, 2, XEGLD_DECIMALS));
    assert_eq!(
        receipt.declared_out,
        fraction(1, 2, XEGLD_DECIMALS) + BigUint::from(1_000_000u64)
    );
    assert_eq!(
        state.collateral_balance(SWAPPER_ADDRESS, XEGLD_TOKEN),
        fraction(1, 2, XEGLD_DECIMALS)
    );
    state.assert_reserves_match_tokens();
}

#[test]
fn swap_with_no_proceeds_fails_and_restores_tokens() {
    let (mut state, _) = setup_swapper();
    let mut adapter = ZeroOutputSwap::new(address(ADAPTER_ADDRESS));
    let before = state.snapshot(&[SWAPPER_ADDRESS]);

    let err = state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            fraction(1, 4, EGLD_DECIMALS),
        )
        .unwrap_err();

    assert!(matches!(err, LendingError::AdapterFailure(_)));
    assert_eq!(state.snapshot(&[SWAPPER_ADDRESS]), before);
}

#[test]
fn swap_with_failing_adapter_reports_reason() {
    let (mut state, _) = setup_swapper();
    let mut adapter = FailingSwap::new(address(ADAPTER_ADDRESS), "route not found");
    let before = state.snapshot(&[SWAPPER_ADDRESS]);

    let err = state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            fraction(1, 4, EGLD_DECIMALS),
        )
        .unwrap_err();

    match err {
        LendingError::AdapterFailure(reason) => assert!(reason.contains("route not found")),
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(state.snapshot(&[SWAPPER_ADDRESS]), before);
}

#[test]
fn reentrant_calls_during_swap_are_rejected() {
    let (mut state, adapter) = setup_swapper();
    let mut adapter = ReentrantSwap::new(adapter, address(SWAPPER_ADDRESS));

    state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            fraction(1, 4, EGLD_DECIMALS),
        )
        .unwrap();

    assert_eq!(adapter.observed().len(), 4);
    for outcome in adapter.observed() {
        assert_eq!(outcome, &Err(LendingError::ReentrantCall));
    }
    assert!(!state.controller.is_swap_ongoing());

    // The guard is released once the swap commits
    assert_eq!(
        state.collateral_balance(SWAPPER_ADDRESS, WEGLD_TOKEN),
        fraction(3, 4, EGLD_DECIMALS)
    );
    state.withdraw_asset(SWAPPER_ADDRESS, WEGLD_TOKEN, fraction(1, 4, EGLD_DECIMALS));
}

#[test]
fn swap_reenables_destination_flag_on_existing_position() {
    let (mut state, mut adapter) = setup_swapper();
    state.supply_asset(SWAPPER_ADDRESS, XEGLD_TOKEN, scaled_amount(1, XEGLD_DECIMALS));
    state
        .controller
        .set_collateral_usage(&address(SWAPPER_ADDRESS), &asset(XEGLD_TOKEN), false)
        .unwrap();
    assert!(!state.is_collateral_enabled(SWAPPER_ADDRESS, XEGLD_TOKEN));

    state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            fraction(1, 4, EGLD_DECIMALS),
        )
        .unwrap();

    assert!(state.is_collateral_enabled(SWAPPER_ADDRESS, XEGLD_TOKEN));
    assert_eq!(
        state.collateral_balance(SWAPPER_ADDRESS, XEGLD_TOKEN),
        fraction(3, 2, XEGLD_DECIMALS)
    );
}

const THIEF_ADDRESS: &str = "thief";

#[test]
fn swap_with_adapter_claiming_a_reserve_is_rejected() {
    let (mut state, _) = setup_swapper();
    let wegld_reserve = Address::reserve(&asset(WEGLD_TOKEN));
    // Proceeds parked at the reserve address so the payout side would succeed
    state.controller.tokens_mut().mint(
        &asset(XEGLD_TOKEN),
        &wegld_reserve,
        &fraction(1, 2, XEGLD_DECIMALS),
    );
    let mut adapter = ImpostorSwap::new(wegld_reserve, address(THIEF_ADDRESS));
    let before = state.snapshot(&[SWAPPER_ADDRESS, SUPPLIER_ADDRESS]);

    let err = state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            fraction(1, 2, EGLD_DECIMALS),
        )
        .unwrap_err();

    assert_eq!(err, LendingError::InvalidSwapAdapter);
    assert_eq!(state.snapshot(&[SWAPPER_ADDRESS, SUPPLIER_ADDRESS]), before);
    assert_eq!(state.token_balance(THIEF_ADDRESS, WEGLD_TOKEN), BigUint::from(0u64));
    state.assert_reserves_match_tokens();

    // The pool still holds every WEGLD it owes
    let withdrawn =
        state.withdraw_asset(SUPPLIER_ADDRESS, WEGLD_TOKEN, scaled_amount(100, EGLD_DECIMALS));
    assert_eq!(withdrawn, scaled_amount(100, EGLD_DECIMALS));
}

#[test]
fn swap_with_adapter_claiming_the_caller_is_rejected() {
    let (mut state, _) = setup_swapper();
    // Even a registered address cannot be the caller's own wallet
    state
        .controller
        .register_swap_adapter(address(SWAPPER_ADDRESS))
        .unwrap();
    state.mint(SWAPPER_ADDRESS, XEGLD_TOKEN, &fraction(1, 2, XEGLD_DECIMALS));
    state.mint(SWAPPER_ADDRESS, WEGLD_TOKEN, &scaled_amount(5, EGLD_DECIMALS));
    let mut adapter = ImpostorSwap::new(address(SWAPPER_ADDRESS), address(THIEF_ADDRESS));
    let before = state.snapshot(&[SWAPPER_ADDRESS]);

    let err = state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            fraction(1, 2, EGLD_DECIMALS),
        )
        .unwrap_err();

    assert_eq!(err, LendingError::InvalidSwapAdapter);
    assert_eq!(state.snapshot(&[SWAPPER_ADDRESS]), before);
    assert_eq!(
        state.token_balance(SWAPPER_ADDRESS, WEGLD_TOKEN),
        scaled_amount(5, EGLD_DECIMALS)
    );
}

#[test]
fn swap_with_unregistered_adapter_is_rejected() {
    let (mut state, _) = setup_swapper();
    state.mint(SUPPLIER_ADDRESS, XEGLD_TOKEN, &fraction(1, 2, XEGLD_DECIMALS));
    state.mint(SUPPLIER_ADDRESS, WEGLD_TOKEN, &scaled_amount(5, EGLD_DECIMALS));
    let before = state.snapshot(&[SWAPPER_ADDRESS, SUPPLIER_ADDRESS]);

    // Another user's wallet
    let mut impostor = ImpostorSwap::new(address(SUPPLIER_ADDRESS), address(THIEF_ADDRESS));
    let err = state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut impostor,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            fraction(1, 2, EGLD_DECIMALS),
        )
        .unwrap_err();
    assert_eq!(err, LendingError::InvalidSwapAdapter);

    // An honest adapter that was never approved
    let mut unknown = FixedRateSwap::new(address("other-adapter"), 2, 1);
    let err = state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut unknown,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            fraction(1, 2, EGLD_DECIMALS),
        )
        .unwrap_err();
    assert_eq!(err, LendingError::InvalidSwapAdapter);

    assert_eq!(state.snapshot(&[SWAPPER_ADDRESS, SUPPLIER_ADDRESS]), before);
    assert_eq!(
        state.token_balance(SUPPLIER_ADDRESS, WEGLD_TOKEN),
        scaled_amount(5, EGLD_DECIMALS)
    );
}

#[test]
fn removed_adapter_cannot_swap_until_registered_again() {
    let (mut state, mut adapter) = setup_swapper();
    state
        .controller
        .remove_swap_adapter(&address(ADAPTER_ADDRESS))
        .unwrap();

    let err = state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            fraction(1, 4, EGLD_DECIMALS),
        )
        .unwrap_err();
    assert_eq!(err, LendingError::InvalidSwapAdapter);

    state
        .controller
        .register_swap_adapter(address(ADAPTER_ADDRESS))
        .unwrap();
    let receipt = state
        .swap_collateral(
            SWAPPER_ADDRESS,
            &mut adapter,
            WEGLD_TOKEN,
            XEGLD_TOKEN,
            fraction(1, 4, EGLD_DECIMALS),
        )
        .unwrap();
    assert_eq!(receipt.amount_out, fraction(1, 2, XEGLD_DECIMALS));
}
