//! Wallet session: which account is connected and which network it is on.

use crate::{
    contract::{ContractClient, MintEvent, MintEventSubscription},
    notice::{Notice, Notices},
};
use alloy_primitives::ChainId;
use puppy_config::{ChainRegistry, Config, NetworkDescriptor, NetworkIdentity};
use puppy_wallets::{Account, ChainChanges, WalletError, WalletProvider};
use std::sync::Arc;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// The wallet has not been asked yet.
    #[default]
    Unchecked,
    Disconnected,
    /// `network` is `None` until the wallet reported its chain.
    Connected { account: Account, network: Option<NetworkIdentity> },
}

impl SessionState {
    pub fn account(&self) -> Option<&Account> {
        match self {
            Self::Connected { account, .. } => Some(account),
            _ => None,
        }
    }

    pub fn network(&self) -> Option<&NetworkIdentity> {
        match self {
            Self::Connected { network, .. } => network.as_ref(),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    /// Whether an account is connected and on `chain_id`.
    pub fn is_on(&self, chain_id: ChainId) -> bool {
        self.network().is_some_and(|network| network.is(chain_id))
    }
}

/// Establishes and maintains the wallet session.
///
/// Owns the chain change listener and the mint event subscription of the session.
#[derive(Debug)]
pub struct SessionController<W, C> {
    config: Arc<Config>,
    registry: ChainRegistry,
    wallet: Option<W>,
    contract: C,
    notices: Notices,
    state: SessionState,
    chain_changes: Option<ChainChanges>,
    mint_events: Option<MintEventSubscription>,
}

impl<W: WalletProvider, C: ContractClient> SessionController<W, C> {
    /// `wallet` is `None` when no wallet is injected.
    pub fn new(config: Arc<Config>, wallet: Option<W>, contract: C, notices: Notices) -> Self {
        let registry = config.chain_registry();
        Self {
            config,
            registry,
            wallet,
            contract,
            notices,
            state: SessionState::Unchecked,
            chain_changes: None,
            mint_events: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn required_network(&self) -> &NetworkDescriptor {
        &self.config.required_network
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet.is_some()
    }

    pub fn is_listening_for_chain_changes(&self) -> bool {
        self.chain_changes.is_some()
    }

    pub fn is_subscribed_to_mint_events(&self) -> bool {
        self.mint_events.is_some()
    }

    /// Picks up an account that already authorized the dapp, without prompting.
    ///
    /// Failures are logged and leave the session disconnected.
    pub async fn recover_session(&mut self) -> &SessionState {
        let Some(wallet) = &self.wallet else {
            info!("no wallet found");
            self.state = SessionState::Disconnected;
            return &self.state;
        };
        if self.chain_changes.is_none() {
            debug!("listening for chain changes");
            self.chain_changes = Some(wallet.on_chain_changed());
        }

        let accounts = match wallet.accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                warn!(%err, "failed to query authorized accounts");
                self.state = SessionState::Disconnected;
                return &self.state;
            }
        };
        match first_account(accounts) {
            Some(account) => {
                info!(%account, "found an authorized account");
                self.connected(account).await;
            }
            None => {
                debug!("no authorized account");
                self.state = SessionState::Disconnected;
            }
        }
        &self.state
    }

    /// Prompts the user to authorize the dapp.
    pub async fn request_session(&mut self) -> Result<(), WalletError> {
        let wallet = self.wallet.as_ref().ok_or(WalletError::Unavailable)?;
        if self.chain_changes.is_none() {
            self.chain_changes = Some(wallet.on_chain_changed());
        }
        debug!("requesting accounts");
        let accounts = wallet.request_accounts().await?;
        match first_account(accounts) {
            Some(account) => {
                info!(%account, "connected");
                self.connected(account).await;
            }
            None => warn!("wallet granted no accounts"),
        }
        Ok(())
    }

    /// Asks the wallet to move to the required network, adding it first if the wallet doesn't
    /// know it.
    ///
    /// Never changes the session; the chain change listener reports the switch.
    pub async fn switch_to_required_network(&self) -> Result<(), WalletError> {
        let wallet = self.wallet.as_ref().ok_or(WalletError::Unavailable)?;
        let required = &self.config.required_network;
        match wallet.switch_chain(required.chain_id).await {
            Err(WalletError::UnrecognizedChain) => {
                info!(chain_id = required.chain_id, "chain unknown to the wallet, adding it");
                wallet.add_chain(required).await
            }
            result => result,
        }
    }

    /// Waits for the wallet to report a chain change.
    ///
    /// Returns `None` if there is no listener or the wallet stopped reporting.
    pub async fn next_chain_change(&mut self) -> Option<ChainId> {
        let chain_id = self.chain_changes.as_mut()?.next().await;
        if chain_id.is_none() {
            debug!("chain change listener closed");
            self.chain_changes = None;
        }
        chain_id
    }

    /// Discards the session and recovers it from scratch.
    pub async fn reload(&mut self) -> &SessionState {
        debug!("reloading session");
        self.state = SessionState::Unchecked;
        self.mint_events = None;
        self.recover_session().await
    }

    async fn connected(&mut self, account: Account) {
        self.state = SessionState::Connected { account, network: None };
        self.refresh_network().await;
        self.subscribe_to_mint_events();
    }

    async fn refresh_network(&mut self) {
        let Some(wallet) = &self.wallet else { return };
        let network = match wallet.chain_id().await {
            Ok(chain_id) => Some(self.registry.identify(chain_id)),
            Err(err) => {
                warn!(%err, "failed to query chain id");
                None
            }
        };
        if let SessionState::Connected { network: current, .. } = &mut self.state {
            debug!(?network, "network");
            *current = network;
        }
    }

    fn subscribe_to_mint_events(&mut self) {
        if self.mint_events.is_some() {
            trace!("already subscribed to mint events");
            return;
        }
        debug!("subscribing to mint events");
        let notices = self.notices.clone();
        let config = self.config.clone();
        let handler = move |event: MintEvent| {
            notices.send(Notice::PuppyMinted {
                token_url: config.token_url(event.token_id),
                from: event.from,
                token_id: event.token_id,
            })
        };
        self.mint_events = Some(self.contract.subscribe_to_mint_events(Box::new(handler)));
    }
}

fn first_account(accounts: Vec<Account>) -> Option<Account> {
    accounts.into_iter().find(|account| !account.is_empty())
}
