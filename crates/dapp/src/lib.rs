//! # puppy-dapp
//!
//! Connects to the user's wallet, makes sure it is on the network the Random Puppy collection
//! lives on and mints puppies.
//!
//! [`SessionController`] owns the wallet session, [`MintController`] drives a mint transaction
//! to confirmation and [`ViewState`] is what gets rendered. [`PuppyApp`] wires them together
//! behind the three user actions: connect, switch network and mint.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod app;
pub use app::PuppyApp;

pub mod contract;
pub use contract::{
    ContractClient, ContractError, MintEvent, MintEventHandler, MintEventSubscription,
    MintReceipt, PendingMint, RandomPuppy, RandomPuppyClient, ReceiptStatus,
};

pub mod mint;
pub use mint::{MintController, MintFailure, MintOutcome, MintSkipped, MintState};

pub mod notice;
pub use notice::{Action, Notice, Notices};

pub mod session;
pub use session::{SessionController, SessionState};

pub mod view;
pub use view::{MintControl, MintedToken, ViewState, WalletBadge};

pub use puppy_config::Config;
