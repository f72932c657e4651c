use crate::{Account, WalletError};
use alloy_primitives::ChainId;
use async_trait::async_trait;
use auto_impl::auto_impl;
use puppy_config::NetworkDescriptor;
use tokio::sync::broadcast;

/// The wallet capability the dapp drives, modelled after the
/// [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193) provider API.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait WalletProvider: Send + Sync {
    /// Accounts that already authorized the dapp (`eth_accounts`). Never prompts.
    async fn accounts(&self) -> Result<Vec<Account>, WalletError>;

    /// Asks the user to authorize the dapp (`eth_requestAccounts`).
    async fn request_accounts(&self) -> Result<Vec<Account>, WalletError>;

    /// The chain the wallet is currently on (`eth_chainId`).
    async fn chain_id(&self) -> Result<ChainId, WalletError>;

    /// Asks the wallet to switch to `chain_id` (`wallet_switchEthereumChain`).
    ///
    /// Fails with [`WalletError::UnrecognizedChain`] if the wallet doesn't know the chain.
    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), WalletError>;

    /// Asks the wallet to add `network` (`wallet_addEthereumChain`).
    async fn add_chain(&self, network: &NetworkDescriptor) -> Result<(), WalletError>;

    /// Subscribes to `chainChanged` notifications.
    fn on_chain_changed(&self) -> ChainChanges;
}

/// Receiving end of a wallet's chain change notifications.
///
/// Dropping the handle unsubscribes.
#[derive(Debug)]
pub struct ChainChanges {
    rx: broadcast::Receiver<ChainId>,
}

impl ChainChanges {
    pub fn new(rx: broadcast::Receiver<ChainId>) -> Self {
        Self { rx }
    }

    /// Waits for the next chain the wallet switched to.
    ///
    /// Returns `None` once the wallet went away. Notifications missed by a slow receiver are
    /// skipped.
    pub async fn next(&mut self) -> Option<ChainId> {
        loop {
            match self.rx.recv().await {
                Ok(chain_id) => return Some(chain_id),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    trace!(skipped, "chain change notifications lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
