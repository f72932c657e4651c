//! # puppy-wallets
//!
//! The wallet side of the Random Puppy dapp.
//!
//! The dapp talks to the user's wallet through [`WalletProvider`], a thin capability trait
//! following [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193): account queries, the
//! authorization prompt, chain queries, `wallet_switchEthereumChain`/`wallet_addEthereumChain`
//! and `chainChanged` notifications. [`RpcWallet`] implements it on top of any alloy provider.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod account;
pub use account::Account;

pub mod error;
pub use error::{ProviderErrorCode, WalletError};

mod provider;
pub use provider::{ChainChanges, WalletProvider};

mod rpc;
pub use rpc::RpcWallet;
