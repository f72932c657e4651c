//! Test doubles and fixtures for the Random Puppy crates.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod contract;
pub use contract::{Confirmation, MockContract};

mod wallet;
pub use wallet::{MockWallet, WalletCall};

pub mod fixtures;

/// Initializes tracing for tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
