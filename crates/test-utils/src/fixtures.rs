//! Accounts, chains and a ready to use app.

use crate::{MockContract, MockWallet};
use alloy_primitives::ChainId;
use puppy_config::Config;
use puppy_dapp::PuppyApp;
use std::sync::Arc;

pub const ACCOUNT_A: &str = "0xABC0000000000000000000000000000000001234";
pub const ACCOUNT_B: &str = "0xDEF00000000000000000000000000000000056cd";

pub const MUMBAI: ChainId = 0x13881;
pub const MAINNET: ChainId = 0x1;
/// A chain missing from the default registry.
pub const UNKNOWN_CHAIN: ChainId = 0x7a69;

pub type TestApp = PuppyApp<Arc<MockWallet>, Arc<MockContract>>;

/// An app over shared handles of `wallet` and `contract`, with the default config.
pub fn app(wallet: &Arc<MockWallet>, contract: &Arc<MockContract>) -> TestApp {
    app_with_config(Config::default(), Some(wallet), contract)
}

pub fn app_with_config(
    config: Config,
    wallet: Option<&Arc<MockWallet>>,
    contract: &Arc<MockContract>,
) -> TestApp {
    crate::init_tracing();
    PuppyApp::new(config, wallet.cloned(), contract.clone())
}

/// An app without any wallet injected.
pub fn app_without_wallet(contract: &Arc<MockContract>) -> TestApp {
    app_with_config(Config::default(), None, contract)
}
