//! A scripted [`WalletProvider`].

use alloy_primitives::ChainId;
use async_trait::async_trait;
use parking_lot::Mutex;
use puppy_config::NetworkDescriptor;
use puppy_wallets::{Account, ChainChanges, WalletError, WalletProvider};
use std::collections::BTreeSet;
use tokio::sync::broadcast;

/// A request the dapp made to the wallet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalletCall {
    Accounts,
    RequestAccounts,
    ChainId,
    SwitchChain(ChainId),
    AddChain(NetworkDescriptor),
    OnChainChanged,
}

#[derive(Debug)]
struct WalletState {
    authorized: Vec<Account>,
    /// What `eth_requestAccounts` resolves to.
    grant: Result<Vec<Account>, WalletError>,
    chain_id: Result<ChainId, WalletError>,
    known_chains: BTreeSet<ChainId>,
    switch_error: Option<WalletError>,
    add_error: Option<WalletError>,
    calls: Vec<WalletCall>,
}

/// In-memory wallet.
///
/// Switching to a chain the wallet doesn't know fails with [`WalletError::UnrecognizedChain`];
/// adding a chain makes it known and switches to it, like browser wallets do. Every switch
/// notifies chain change listeners.
#[derive(Debug)]
pub struct MockWallet {
    state: Mutex<WalletState>,
    chain_changes: broadcast::Sender<ChainId>,
}

impl MockWallet {
    /// A wallet on `chain_id` that nobody authorized yet.
    pub fn new(chain_id: ChainId) -> Self {
        let (chain_changes, _) = broadcast::channel(16);
        Self {
            state: Mutex::new(WalletState {
                authorized: Vec::new(),
                grant: Ok(Vec::new()),
                chain_id: Ok(chain_id),
                known_chains: BTreeSet::from([chain_id]),
                switch_error: None,
                add_error: None,
                calls: Vec::new(),
            }),
            chain_changes,
        }
    }

    /// Accounts that already authorized the dapp.
    pub fn with_authorized(self, accounts: impl IntoIterator<Item = impl Into<Account>>) -> Self {
        self.state.lock().authorized = accounts.into_iter().map(Into::into).collect();
        self
    }

    /// Accounts the user grants when prompted.
    pub fn granting(self, accounts: impl IntoIterator<Item = impl Into<Account>>) -> Self {
        self.state.lock().grant = Ok(accounts.into_iter().map(Into::into).collect());
        self
    }

    /// Makes the authorization prompt fail.
    pub fn failing_requests(self, err: WalletError) -> Self {
        self.state.lock().grant = Err(err);
        self
    }

    pub fn failing_chain_id(self, err: WalletError) -> Self {
        self.state.lock().chain_id = Err(err);
        self
    }

    pub fn knowing_chain(self, chain_id: ChainId) -> Self {
        self.state.lock().known_chains.insert(chain_id);
        self
    }

    pub fn failing_switch(self, err: WalletError) -> Self {
        self.state.lock().switch_error = Some(err);
        self
    }

    pub fn failing_add(self, err: WalletError) -> Self {
        self.state.lock().add_error = Some(err);
        self
    }

    /// The user switched chains in the wallet.
    pub fn change_chain(&self, chain_id: ChainId) {
        {
            let mut state = self.state.lock();
            state.known_chains.insert(chain_id);
            state.chain_id = Ok(chain_id);
        }
        let _ = self.chain_changes.send(chain_id);
    }

    pub fn current_chain_id(&self) -> Option<ChainId> {
        self.state.lock().chain_id.clone().ok()
    }

    pub fn calls(&self) -> Vec<WalletCall> {
        self.state.lock().calls.clone()
    }

    /// Number of recorded calls matching `f`.
    pub fn count(&self, f: impl Fn(&WalletCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|call| f(call)).count()
    }

    /// Number of live chain change subscriptions.
    pub fn chain_listeners(&self) -> usize {
        self.chain_changes.receiver_count()
    }

    fn record(&self, call: WalletCall) {
        trace!(?call, "wallet call");
        self.state.lock().calls.push(call);
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn accounts(&self) -> Result<Vec<Account>, WalletError> {
        self.record(WalletCall::Accounts);
        Ok(self.state.lock().authorized.clone())
    }

    async fn request_accounts(&self) -> Result<Vec<Account>, WalletError> {
        self.record(WalletCall::RequestAccounts);
        let mut state = self.state.lock();
        let granted = state.grant.clone()?;
        state.authorized.clone_from(&granted);
        Ok(granted)
    }

    async fn chain_id(&self) -> Result<ChainId, WalletError> {
        self.record(WalletCall::ChainId);
        self.state.lock().chain_id.clone()
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), WalletError> {
        self.record(WalletCall::SwitchChain(chain_id));
        {
            let state = self.state.lock();
            if let Some(err) = &state.switch_error {
                return Err(err.clone());
            }
            if !state.known_chains.contains(&chain_id) {
                return Err(WalletError::UnrecognizedChain);
            }
        }
        self.change_chain(chain_id);
        Ok(())
    }

    async fn add_chain(&self, network: &NetworkDescriptor) -> Result<(), WalletError> {
        self.record(WalletCall::AddChain(network.clone()));
        if let Some(err) = self.state.lock().add_error.clone() {
            return Err(err);
        }
        self.change_chain(network.chain_id);
        Ok(())
    }

    fn on_chain_changed(&self) -> ChainChanges {
        self.record(WalletCall::OnChainChanged);
        ChainChanges::new(self.chain_changes.subscribe())
    }
}
