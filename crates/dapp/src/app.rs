use crate::{
    contract::ContractClient,
    mint::{MintController, MintOutcome, MintState},
    notice::{Action, Notice, Notices},
    session::{SessionController, SessionState},
    view::ViewState,
};
use alloy_primitives::ChainId;
use puppy_config::Config;
use puppy_wallets::{WalletError, WalletProvider};
use std::sync::Arc;
use tokio::sync::mpsc;

/// The Random Puppy dapp.
///
/// Every user action catches its own failures and reports them as [`Notice`]s, see
/// [`PuppyApp::drain_notices`].
#[derive(Debug)]
pub struct PuppyApp<W, C> {
    config: Arc<Config>,
    session: SessionController<W, Arc<C>>,
    mint: MintController<Arc<C>>,
    notify: Notices,
    notices: mpsc::UnboundedReceiver<Notice>,
    initialized: bool,
}

impl<W: WalletProvider, C: ContractClient> PuppyApp<W, C> {
    pub fn new(config: Config, wallet: Option<W>, contract: C) -> Self {
        let config = Arc::new(config);
        let contract = Arc::new(contract);
        let (notices, rx) = Notices::channel();
        Self {
            session: SessionController::new(
                config.clone(),
                wallet,
                contract.clone(),
                notices.clone(),
            ),
            mint: MintController::new(config.clone(), contract, notices.clone()),
            config,
            notify: notices,
            notices: rx,
            initialized: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionController<W, Arc<C>> {
        &self.session
    }

    pub fn session_state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn mint_state(&self) -> &MintState {
        self.mint.state()
    }

    pub fn mint_controller(&self) -> &MintController<Arc<C>> {
        &self.mint
    }

    /// Recovers an existing session. Only the first call does anything.
    pub async fn init(&mut self) -> ViewState {
        if !self.initialized {
            self.initialized = true;
            self.session.recover_session().await;
        }
        self.view()
    }

    /// The "Connect Wallet" action.
    pub async fn connect(&mut self) {
        if let Err(err) = self.session.request_session().await {
            self.report(Action::Connect, err);
        }
    }

    /// The "Switch Network" action.
    pub async fn switch_network(&mut self) {
        if let Err(err) = self.session.switch_to_required_network().await {
            self.report(Action::SwitchNetwork, err);
        }
    }

    /// The "Mint NFT" action.
    pub async fn mint(&mut self) -> MintOutcome {
        self.mint.mint(self.session.state()).await
    }

    /// Waits for the wallet to change chains.
    pub async fn next_chain_change(&mut self) -> Option<ChainId> {
        self.session.next_chain_change().await
    }

    /// Starts over as if the page was reloaded, keeping only the wallet subscriptions.
    pub async fn reload(&mut self) -> ViewState {
        self.mint.reset();
        self.session.reload().await;
        self.view()
    }

    /// Waits for the next chain change and reloads. Returns `false` once no more changes will
    /// be reported.
    pub async fn follow_chain_change(&mut self) -> bool {
        match self.next_chain_change().await {
            Some(chain_id) => {
                info!(chain_id, "chain changed, reloading");
                self.reload().await;
                true
            }
            None => false,
        }
    }

    pub fn view(&self) -> ViewState {
        ViewState::project(
            self.session.state(),
            self.mint.state(),
            &self.config,
            self.session.has_wallet(),
        )
    }

    /// Takes every notice produced so far.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(notice) = self.notices.try_recv() {
            notices.push(notice);
        }
        notices
    }

    fn report(&self, action: Action, err: WalletError) {
        warn!(%action, %err, "action failed");
        let notice = match err {
            WalletError::Unavailable => Notice::WalletUnavailable,
            WalletError::UserRejected => Notice::Rejected(action),
            err => Notice::Failed { action, reason: err.to_string() },
        };
        self.notify.send(notice);
    }
}
