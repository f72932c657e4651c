use alloy_primitives::U256;
use puppy_config::Config;
use puppy_dapp::{
    Action, ContractError, MintFailure, MintOutcome, MintSkipped, MintState, Notice,
    ReceiptStatus,
};
use puppy_test_utils::{
    Confirmation, MockContract, MockWallet,
    fixtures::{ACCOUNT_A, MAINNET, MUMBAI, app, app_with_config},
};
use puppy_wallets::Account;
use std::{sync::Arc, time::Duration};

fn connected_wallet() -> Arc<MockWallet> {
    Arc::new(MockWallet::new(MUMBAI).with_authorized([ACCOUNT_A]))
}

#[tokio::test]
async fn successful_receipt_yields_token() {
    let wallet = connected_wallet();
    let contract =
        Arc::new(MockContract::new().confirming(Confirmation::Mined { token_id: Some(U256::from(7)) }));
    let mut app = app(&wallet, &contract);
    app.init().await;

    let outcome = app.mint().await;
    let tx_hash = MockContract::tx_hash(1);
    let MintOutcome::Succeeded(receipt) = outcome else { panic!("unexpected {outcome:?}") };
    assert_eq!(receipt.status, ReceiptStatus::Success);
    assert_eq!(receipt.token_id, Some(U256::from(7)));
    assert_eq!(app.mint_state(), &MintState::Succeeded { tx_hash, token_id: Some(U256::from(7)) });
    assert_eq!(contract.submissions(), vec![Account::new(ACCOUNT_A)]);

    let notices = app.drain_notices();
    assert_eq!(notices.len(), 2);
    assert!(matches!(&notices[0], Notice::MintSent { tx_url: Some(url), .. } if url.contains("/tx/")));
    assert!(matches!(
        &notices[1],
        Notice::Minted { token_id: Some(id), token_url: Some(url), .. }
            if *id == U256::from(7) && url.ends_with("/7")
    ));
}

#[tokio::test]
async fn reverted_receipt_fails_then_idles() {
    let wallet = connected_wallet();
    let contract = Arc::new(MockContract::new().confirming(Confirmation::Reverted));
    let mut app = app(&wallet, &contract);
    app.init().await;

    let tx_hash = MockContract::tx_hash(1);
    assert_eq!(app.mint().await, MintOutcome::Failed(MintFailure::Reverted { tx_hash }));
    assert_eq!(app.mint_state(), &MintState::Idle);
    assert_eq!(
        app.mint_controller().last_failure(),
        Some(&MintFailure::Reverted { tx_hash })
    );
    assert!(app.drain_notices().contains(&Notice::MintFailed(MintFailure::Reverted { tx_hash })));
    assert!(app.view().mint_enabled());
}

#[tokio::test]
async fn submission_failure_means_never_sent() {
    let wallet = connected_wallet();
    let contract = Arc::new(
        MockContract::new()
            .failing_submission(ContractError::UserRejected)
            .failing_submission(ContractError::rpc("insufficient funds")),
    );
    let mut app = app(&wallet, &contract);
    app.init().await;

    assert_eq!(
        app.mint().await,
        MintOutcome::Failed(MintFailure::NotSent(ContractError::UserRejected))
    );
    assert_eq!(app.drain_notices(), vec![Notice::Rejected(Action::Mint)]);

    let outcome = app.mint().await;
    assert!(matches!(outcome, MintOutcome::Failed(MintFailure::NotSent(ContractError::Rpc { .. }))));
    assert_eq!(app.mint_state(), &MintState::Idle);
    assert_eq!(contract.submission_count(), 0);
}

#[tokio::test]
async fn confirmation_error_is_distinct_from_revert() {
    let wallet = connected_wallet();
    let contract = Arc::new(
        MockContract::new().confirming(Confirmation::Error(ContractError::rpc("connection reset"))),
    );
    let mut app = app(&wallet, &contract);
    app.init().await;

    let MintOutcome::Failed(failure) = app.mint().await else { panic!("mint should fail") };
    assert!(matches!(failure, MintFailure::Unconfirmed { .. }));
    assert_eq!(failure.tx_hash(), Some(MockContract::tx_hash(1)));
    assert_eq!(app.mint_state(), &MintState::Idle);
}

#[tokio::test]
async fn mint_while_pending_is_a_noop() {
    let wallet = connected_wallet();
    let contract = Arc::new(MockContract::new().confirming(Confirmation::Never));
    let mut app = app(&wallet, &contract);
    app.init().await;

    // abandon the first attempt while it waits for its receipt
    let abandoned = tokio::time::timeout(Duration::from_millis(50), app.mint()).await;
    assert!(abandoned.is_err());
    assert_eq!(app.mint_state(), &MintState::Pending { tx_hash: Some(MockContract::tx_hash(1)) });
    assert!(!app.view().mint_enabled());

    let before = app.mint_state().clone();
    assert_eq!(app.mint().await, MintOutcome::Skipped(MintSkipped::AlreadyPending));
    assert_eq!(app.mint_state(), &before);
    assert_eq!(contract.submission_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn confirmation_times_out() {
    let config = Config { confirmation_timeout: 5, ..Default::default() };
    let wallet = connected_wallet();
    let contract = Arc::new(MockContract::new().confirming(Confirmation::Never));
    let mut app = app_with_config(config, Some(&wallet), &contract);
    app.init().await;

    let tx_hash = MockContract::tx_hash(1);
    assert_eq!(
        app.mint().await,
        MintOutcome::Failed(MintFailure::TimedOut { tx_hash, after: Duration::from_secs(5) })
    );
    assert_eq!(app.mint_state(), &MintState::Idle);
}

#[tokio::test]
async fn mint_requires_session_on_required_network() {
    let contract = Arc::new(MockContract::new());

    let disconnected = Arc::new(MockWallet::new(MUMBAI));
    let mut app = app(&disconnected, &contract);
    app.init().await;
    assert_eq!(app.mint().await, MintOutcome::Skipped(MintSkipped::NotConnected));

    let wrong_network = Arc::new(MockWallet::new(MAINNET).with_authorized([ACCOUNT_A]));
    let mut app = app_with_config(Config::default(), Some(&wrong_network), &contract);
    app.init().await;
    assert_eq!(app.mint().await, MintOutcome::Skipped(MintSkipped::WrongNetwork));

    assert_eq!(contract.submission_count(), 0);
    assert_eq!(app.mint_state(), &MintState::Idle);
}

#[tokio::test]
async fn chain_change_resets_mint_state() {
    let wallet = connected_wallet();
    let contract = Arc::new(MockContract::new());
    let mut app = app(&wallet, &contract);
    app.init().await;

    assert!(matches!(app.mint().await, MintOutcome::Succeeded(_)));
    wallet.change_chain(MAINNET);
    assert!(app.follow_chain_change().await);
    assert_eq!(app.mint_state(), &MintState::Idle);
}
