use puppy_config::{Config, NetworkDescriptor};
use puppy_dapp::{Action, Notice, ViewState};
use puppy_test_utils::{
    MockContract, MockWallet, WalletCall,
    fixtures::{ACCOUNT_A, MAINNET, MUMBAI, UNKNOWN_CHAIN, app, app_with_config},
};
use puppy_wallets::WalletError;
use std::sync::Arc;

#[tokio::test]
async fn switches_to_known_network() {
    let wallet = Arc::new(MockWallet::new(MAINNET).with_authorized([ACCOUNT_A]).knowing_chain(MUMBAI));
    let contract = Arc::new(MockContract::new());
    let mut app = app(&wallet, &contract);

    app.init().await;
    app.switch_network().await;
    assert_eq!(wallet.count(|call| matches!(call, WalletCall::SwitchChain(MUMBAI))), 1);
    assert_eq!(wallet.count(|call| matches!(call, WalletCall::AddChain(_))), 0);
    assert!(app.drain_notices().is_empty());

    // the session only follows once the chain change is observed
    assert!(app.session_state().is_on(MAINNET));
    assert!(app.follow_chain_change().await);
    assert!(app.session_state().is_on(MUMBAI));
    assert!(app.view().mint_enabled());
}

#[tokio::test]
async fn adds_unrecognized_network() {
    let wallet = Arc::new(MockWallet::new(MAINNET).with_authorized([ACCOUNT_A]));
    let contract = Arc::new(MockContract::new());
    let mut app = app(&wallet, &contract);

    app.init().await;
    app.switch_network().await;

    let added: Vec<_> = wallet
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            WalletCall::AddChain(network) => Some(network),
            _ => None,
        })
        .collect();
    assert_eq!(added, vec![NetworkDescriptor::polygon_mumbai()]);
    assert!(app.drain_notices().is_empty());
    assert_eq!(wallet.current_chain_id(), Some(MUMBAI));
}

#[tokio::test]
async fn failed_switch_leaves_session_untouched() {
    let wallet = Arc::new(
        MockWallet::new(MAINNET)
            .with_authorized([ACCOUNT_A])
            .failing_switch(WalletError::rpc("request already pending")),
    );
    let contract = Arc::new(MockContract::new());
    let mut app = app(&wallet, &contract);

    app.init().await;
    let before = app.session_state().clone();
    app.switch_network().await;

    assert_eq!(app.session_state(), &before);
    assert_eq!(wallet.count(|call| matches!(call, WalletCall::AddChain(_))), 0);
    assert!(matches!(app.view(), ViewState::WrongNetwork { .. }));
    assert_eq!(
        app.drain_notices(),
        vec![Notice::Failed {
            action: Action::SwitchNetwork,
            reason: "wallet request failed: request already pending".to_string(),
        }]
    );
}

#[tokio::test]
async fn failed_add_is_reported() {
    let wallet = Arc::new(
        MockWallet::new(MAINNET)
            .with_authorized([ACCOUNT_A])
            .failing_add(WalletError::UserRejected),
    );
    let contract = Arc::new(MockContract::new());
    let mut app = app(&wallet, &contract);

    app.init().await;
    app.switch_network().await;
    assert!(app.session_state().is_on(MAINNET));
    assert_eq!(app.drain_notices(), vec![Notice::Rejected(Action::SwitchNetwork)]);
}

#[tokio::test]
async fn unknown_chains_are_unrecognized() {
    let wallet = Arc::new(MockWallet::new(UNKNOWN_CHAIN).with_authorized([ACCOUNT_A]));
    let contract = Arc::new(MockContract::new());
    let mut app = app(&wallet, &contract);

    let view = app.init().await;
    let network = app.session_state().network().unwrap();
    assert!(network.name.is_unrecognized());
    let ViewState::WrongNetwork { wallet, .. } = view else { panic!("expected a switch prompt") };
    assert_eq!(wallet.network_name, "Unrecognized network");
}

#[tokio::test]
async fn configured_networks_are_named() {
    let mut config = Config::default();
    config.networks.insert(format!("{UNKNOWN_CHAIN:#x}"), "Anvil".to_string());
    let wallet = Arc::new(MockWallet::new(UNKNOWN_CHAIN).with_authorized([ACCOUNT_A]));
    let contract = Arc::new(MockContract::new());
    let mut app = app_with_config(config, Some(&wallet), &contract);

    app.init().await;
    assert_eq!(app.session_state().network().unwrap().name.as_known(), Some("Anvil"));
}
