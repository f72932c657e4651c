use alloy_primitives::U256;
use puppy_dapp::{MintEvent, Notice};
use puppy_test_utils::{
    MockContract, MockWallet,
    fixtures::{ACCOUNT_A, ACCOUNT_B, MUMBAI, app},
};
use puppy_wallets::Account;
use std::sync::Arc;

#[tokio::test]
async fn mint_events_become_notices() {
    let wallet = Arc::new(MockWallet::new(MUMBAI).with_authorized([ACCOUNT_A]));
    let contract = Arc::new(MockContract::new());
    let mut app = app(&wallet, &contract);
    app.init().await;

    // events fire for every mint of the collection, not only ours
    contract.emit(MintEvent { from: Account::new(ACCOUNT_B), token_id: U256::from(3) });

    assert_eq!(
        app.drain_notices(),
        vec![Notice::PuppyMinted {
            from: Account::new(ACCOUNT_B),
            token_id: U256::from(3),
            token_url: "https://testnets.opensea.io/assets/mumbai/0xAac6b1DFab73f408eE66cE27fa630E1e170C3B33/3"
                .to_string(),
        }]
    );
}

#[tokio::test]
async fn events_are_delivered_once_per_mint() {
    let wallet = Arc::new(MockWallet::new(MUMBAI).with_authorized([ACCOUNT_A]).granting([ACCOUNT_A]));
    let contract = Arc::new(MockContract::new());
    let mut app = app(&wallet, &contract);
    app.init().await;
    app.connect().await;
    app.connect().await;

    contract.emit(MintEvent { from: Account::new(ACCOUNT_A), token_id: U256::from(1) });
    let minted = app
        .drain_notices()
        .into_iter()
        .filter(|notice| matches!(notice, Notice::PuppyMinted { .. }))
        .count();
    assert_eq!(minted, 1);
}

#[tokio::test]
async fn dropping_the_app_unsubscribes() {
    let wallet = Arc::new(MockWallet::new(MUMBAI).with_authorized([ACCOUNT_A]));
    let contract = Arc::new(MockContract::new());
    let mut app = app(&wallet, &contract);
    app.init().await;
    assert_eq!(contract.active_subscriptions(), 1);
    assert_eq!(wallet.chain_listeners(), 1);

    drop(app);
    assert_eq!(contract.active_subscriptions(), 0);
    assert_eq!(wallet.chain_listeners(), 0);
}
