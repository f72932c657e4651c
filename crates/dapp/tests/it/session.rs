use puppy_dapp::{Notice, SessionState, ViewState};
use puppy_test_utils::{
    MockContract, MockWallet, WalletCall,
    fixtures::{ACCOUNT_A, ACCOUNT_B, MAINNET, MUMBAI, app, app_without_wallet},
};
use puppy_wallets::{Account, WalletError};
use std::sync::Arc;

#[tokio::test]
async fn recovery_without_authorized_account_does_not_prompt() {
    let wallet = Arc::new(MockWallet::new(MUMBAI).granting([ACCOUNT_A]));
    let contract = Arc::new(MockContract::new());
    let mut app = app(&wallet, &contract);

    let view = app.init().await;
    assert_eq!(app.session_state(), &SessionState::Disconnected);
    assert_eq!(view, ViewState::NotConnected { wallet_available: true });
    assert_eq!(wallet.count(|call| *call == WalletCall::RequestAccounts), 0);
    assert_eq!(contract.subscription_count(), 0);
}

#[tokio::test]
async fn recovers_authorized_account_and_network() {
    let wallet = Arc::new(MockWallet::new(MUMBAI).with_authorized([ACCOUNT_A, ACCOUNT_B]));
    let contract = Arc::new(MockContract::new());
    let mut app = app(&wallet, &contract);

    app.init().await;
    let state = app.session_state();
    assert_eq!(state.account(), Some(&Account::new(ACCOUNT_A)));
    let network = state.network().unwrap();
    assert_eq!(network.chain_id, MUMBAI);
    assert_eq!(network.name.as_known(), Some("Polygon Mumbai Testnet"));
    assert!(app.session().is_subscribed_to_mint_events());
    assert_eq!(contract.subscription_count(), 1);
}

#[tokio::test]
async fn init_runs_once() {
    let wallet = Arc::new(MockWallet::new(MUMBAI).with_authorized([ACCOUNT_A]));
    let contract = Arc::new(MockContract::new());
    let mut app = app(&wallet, &contract);

    app.init().await;
    app.init().await;
    assert_eq!(wallet.count(|call| *call == WalletCall::Accounts), 1);
    assert_eq!(wallet.count(|call| *call == WalletCall::OnChainChanged), 1);
    assert_eq!(wallet.chain_listeners(), 1);
}

#[tokio::test]
async fn unreadable_chain_keeps_account_without_network() {
    let wallet = Arc::new(
        MockWallet::new(MUMBAI)
            .with_authorized([ACCOUNT_A])
            .failing_chain_id(WalletError::rpc("disconnected")),
    );
    let contract = Arc::new(MockContract::new());
    let mut app = app(&wallet, &contract);

    let view = app.init().await;
    assert!(app.session_state().is_connected());
    assert_eq!(app.session_state().network(), None);
    assert!(matches!(view, ViewState::WrongNetwork { .. }));
    assert!(!view.mint_enabled());
}

#[tokio::test]
async fn connect_without_wallet_reports_unavailable() {
    let contract = Arc::new(MockContract::new());
    let mut app = app_without_wallet(&contract);

    assert_eq!(app.init().await, ViewState::NotConnected { wallet_available: false });
    app.connect().await;
    assert_eq!(app.session_state(), &SessionState::Disconnected);
    assert_eq!(app.drain_notices(), vec![Notice::WalletUnavailable]);
    assert_eq!(contract.subscription_count(), 0);
}

#[tokio::test]
async fn rejected_connect_is_not_fatal() {
    let wallet = Arc::new(MockWallet::new(MUMBAI).failing_requests(WalletError::UserRejected));
    let contract = Arc::new(MockContract::new());
    let mut app = app(&wallet, &contract);

    app.init().await;
    app.connect().await;
    assert_eq!(app.session_state(), &SessionState::Disconnected);
    assert_eq!(app.drain_notices(), vec![Notice::Rejected(puppy_dapp::Action::Connect)]);
}

#[tokio::test]
async fn reconnecting_keeps_a_single_subscription() {
    let wallet = Arc::new(MockWallet::new(MUMBAI).granting([ACCOUNT_B]));
    let contract = Arc::new(MockContract::new());
    let mut app = app(&wallet, &contract);

    app.init().await;
    app.connect().await;
    app.connect().await;
    assert_eq!(wallet.count(|call| *call == WalletCall::RequestAccounts), 2);
    assert_eq!(contract.subscription_count(), 1);
    assert_eq!(contract.active_subscriptions(), 1);
}

#[tokio::test]
async fn chain_change_reloads_the_session() {
    let wallet = Arc::new(MockWallet::new(MUMBAI).with_authorized([ACCOUNT_A]));
    let contract = Arc::new(MockContract::new());
    let mut app = app(&wallet, &contract);

    assert!(app.init().await.mint_enabled());

    wallet.change_chain(MAINNET);
    assert!(app.follow_chain_change().await);
    let view = app.view();
    assert!(matches!(view, ViewState::WrongNetwork { .. }));
    assert!(app.session_state().is_on(MAINNET));

    // the reload dropped the old mint subscription and made a new one
    assert_eq!(contract.subscription_count(), 2);
    assert_eq!(contract.active_subscriptions(), 1);
    // the listener survives reloads
    assert_eq!(wallet.count(|call| *call == WalletCall::OnChainChanged), 1);
}
