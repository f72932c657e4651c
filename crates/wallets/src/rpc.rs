//! A [`WalletProvider`] over an alloy [`Provider`].

use crate::{Account, ChainChanges, WalletError, WalletProvider};
use alloy_primitives::ChainId;
use alloy_provider::Provider;
use async_trait::async_trait;
use parking_lot::Mutex;
use puppy_config::{Config, NetworkDescriptor};
use serde::de::IgnoredAny;
use std::time::Duration;
use tokio::{runtime::Handle, sync::broadcast, task::JoinHandle};

/// Capacity of the chain change channel.
const CHAIN_CHANGES_CAPACITY: usize = 16;

/// Wallet backed by an EIP-1193 capable JSON-RPC endpoint.
///
/// Chain changes are detected by polling `eth_chainId`. The poller starts with the first
/// [`WalletProvider::on_chain_changed`] subscription and stops when the wallet is dropped.
#[derive(Debug)]
pub struct RpcWallet<P> {
    provider: P,
    poll_interval: Duration,
    chain_changes: broadcast::Sender<ChainId>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl<P: Provider + Clone + 'static> RpcWallet<P> {
    pub fn new(provider: P) -> Self {
        Self::with_poll_interval(provider, Duration::from_secs(1))
    }

    pub fn with_poll_interval(provider: P, poll_interval: Duration) -> Self {
        let (chain_changes, _) = broadcast::channel(CHAIN_CHANGES_CAPACITY);
        Self { provider, poll_interval, chain_changes, poller: Mutex::new(None) }
    }

    /// Polls for chain changes on the configured `poll_interval_ms`.
    pub fn from_config(provider: P, config: &Config) -> Self {
        Self::with_poll_interval(provider, config.poll_interval())
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn ensure_poller(&self) {
        let mut poller = self.poller.lock();
        if poller.is_some() {
            return;
        }
        let Ok(handle) = Handle::try_current() else {
            warn!("no async runtime, chain changes will not be detected");
            return;
        };
        debug!(interval = ?self.poll_interval, "starting chain id poller");
        *poller = Some(handle.spawn(poll_chain_id(
            self.provider.clone(),
            self.poll_interval,
            self.chain_changes.clone(),
        )));
    }
}

impl<P> Drop for RpcWallet<P> {
    fn drop(&mut self) {
        if let Some(poller) = self.poller.get_mut().take() {
            poller.abort();
        }
    }
}

#[async_trait]
impl<P: Provider + Clone + 'static> WalletProvider for RpcWallet<P> {
    async fn accounts(&self) -> Result<Vec<Account>, WalletError> {
        trace!("eth_accounts");
        let accounts = self.provider.get_accounts().await?;
        Ok(accounts.into_iter().map(Account::from).collect())
    }

    async fn request_accounts(&self) -> Result<Vec<Account>, WalletError> {
        trace!("eth_requestAccounts");
        let accounts: Vec<String> =
            self.provider.raw_request("eth_requestAccounts".into(), [(); 0]).await?;
        Ok(accounts.into_iter().map(Account::from).collect())
    }

    async fn chain_id(&self) -> Result<ChainId, WalletError> {
        trace!("eth_chainId");
        Ok(self.provider.get_chain_id().await?)
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), WalletError> {
        debug!(chain_id, "wallet_switchEthereumChain");
        self.provider
            .raw_request::<_, IgnoredAny>(
                "wallet_switchEthereumChain".into(),
                [serde_json::json!({ "chainId": format!("{chain_id:#x}") })],
            )
            .await?;
        Ok(())
    }

    async fn add_chain(&self, network: &NetworkDescriptor) -> Result<(), WalletError> {
        debug!(chain_id = network.chain_id, name = %network.chain_name, "wallet_addEthereumChain");
        let params = serde_json::to_value(network.add_chain_parameter())
            .map_err(|err| WalletError::rpc(err.to_string()))?;
        self.provider
            .raw_request::<_, IgnoredAny>("wallet_addEthereumChain".into(), [params])
            .await?;
        Ok(())
    }

    fn on_chain_changed(&self) -> ChainChanges {
        let rx = self.chain_changes.subscribe();
        self.ensure_poller();
        ChainChanges::new(rx)
    }
}

/// Broadcasts every change of the wallet's chain id.
async fn poll_chain_id<P: Provider>(
    provider: P,
    interval: Duration,
    chain_changes: broadcast::Sender<ChainId>,
) {
    let mut ticker = tokio::time::interval(interval);
    let mut current = None;
    loop {
        ticker.tick().await;
        let chain_id = match provider.get_chain_id().await {
            Ok(chain_id) => chain_id,
            Err(err) => {
                trace!(%err, "failed to poll chain id");
                continue;
            }
        };
        if current.is_some_and(|current| current != chain_id) {
            debug!(chain_id, "chain changed");
            // No receivers is fine, someone may subscribe later.
            let _ = chain_changes.send(chain_id);
        }
        current = Some(chain_id);
    }
}
