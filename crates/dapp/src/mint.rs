//! Minting a puppy.

use crate::{
    contract::{ContractClient, ContractError, MintReceipt},
    notice::{Action, Notice, Notices},
    session::SessionState,
};
use alloy_primitives::{TxHash, U256};
use puppy_config::Config;
use std::{fmt, sync::Arc, time::Duration};

/// Why a mint attempt failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MintFailure {
    /// The transaction was never sent.
    NotSent(ContractError),
    /// The transaction was mined but reverted.
    Reverted { tx_hash: TxHash },
    /// The transaction was sent but waiting for it failed.
    Unconfirmed { tx_hash: TxHash, error: ContractError },
    /// The transaction was not mined in time.
    TimedOut { tx_hash: TxHash, after: Duration },
}

impl MintFailure {
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Self::NotSent(_) => None,
            Self::Reverted { tx_hash } |
            Self::Unconfirmed { tx_hash, .. } |
            Self::TimedOut { tx_hash, .. } => Some(*tx_hash),
        }
    }
}

impl fmt::Display for MintFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSent(err) => write!(f, "transaction was not sent: {err}"),
            Self::Reverted { tx_hash } => write!(f, "transaction {tx_hash} reverted"),
            Self::Unconfirmed { tx_hash, error } => {
                write!(f, "could not confirm transaction {tx_hash}: {error}")
            }
            Self::TimedOut { tx_hash, after } => {
                write!(f, "transaction {tx_hash} was not mined within {after:?}")
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MintState {
    #[default]
    Idle,
    /// `tx_hash` is set once the wallet sent the transaction.
    Pending { tx_hash: Option<TxHash> },
    Succeeded { tx_hash: TxHash, token_id: Option<U256> },
    /// Held only while a failure is being reported. The controller then settles in `Idle`
    /// and keeps the failure in [`MintController::last_failure`].
    Failed(MintFailure),
}

impl MintState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// Why [`MintController::mint`] did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MintSkipped {
    AlreadyPending,
    NotConnected,
    WrongNetwork,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MintOutcome {
    Skipped(MintSkipped),
    Succeeded(MintReceipt),
    Failed(MintFailure),
}

/// Drives one mint attempt at a time from submission to confirmation.
#[derive(Debug)]
pub struct MintController<C> {
    config: Arc<Config>,
    contract: C,
    notices: Notices,
    state: MintState,
    last_failure: Option<MintFailure>,
}

impl<C: ContractClient> MintController<C> {
    pub fn new(config: Arc<Config>, contract: C, notices: Notices) -> Self {
        Self { config, contract, notices, state: MintState::Idle, last_failure: None }
    }

    pub fn state(&self) -> &MintState {
        &self.state
    }

    /// Why the last attempt failed, until the next one starts.
    pub fn last_failure(&self) -> Option<&MintFailure> {
        self.last_failure.as_ref()
    }

    /// Forgets the last attempt.
    pub fn reset(&mut self) {
        self.state = MintState::Idle;
        self.last_failure = None;
    }

    /// Mints a puppy for the connected account.
    ///
    /// Does nothing unless the session is on the required network and no other attempt is
    /// pending. If the returned future is dropped before it resolves, the controller stays
    /// pending.
    pub async fn mint(&mut self, session: &SessionState) -> MintOutcome {
        if self.state.is_pending() {
            debug!("mint already pending");
            return MintOutcome::Skipped(MintSkipped::AlreadyPending);
        }
        let Some(account) = session.account() else {
            debug!("mint without a connected account");
            return MintOutcome::Skipped(MintSkipped::NotConnected);
        };
        let required = &self.config.required_network;
        if !session.is_on(required.chain_id) {
            debug!(network = ?session.network(), "mint on the wrong network");
            return MintOutcome::Skipped(MintSkipped::WrongNetwork);
        }

        self.state = MintState::Pending { tx_hash: None };
        self.last_failure = None;
        let pending = match self.contract.submit_mint_request(account).await {
            Ok(pending) => pending,
            Err(err) => return self.fail(MintFailure::NotSent(err)),
        };
        let tx_hash = pending.tx_hash;
        self.state = MintState::Pending { tx_hash: Some(tx_hash) };
        self.notices.send(Notice::MintSent { tx_hash, tx_url: required.tx_url(tx_hash) });

        let confirmation = self.contract.await_confirmation(&pending);
        let result = match self.config.confirmation_timeout() {
            Some(after) => match tokio::time::timeout(after, confirmation).await {
                Ok(result) => result,
                Err(_) => return self.fail(MintFailure::TimedOut { tx_hash, after }),
            },
            None => confirmation.await,
        };

        match result {
            Ok(receipt) if receipt.status.is_success() => {
                info!(%tx_hash, token_id = ?receipt.token_id, "puppy minted");
                self.state = MintState::Succeeded { tx_hash, token_id: receipt.token_id };
                self.notices.send(Notice::Minted {
                    token_id: receipt.token_id,
                    token_url: receipt.token_id.map(|token_id| self.config.token_url(token_id)),
                    tx_url: required.tx_url(tx_hash),
                });
                MintOutcome::Succeeded(receipt)
            }
            Ok(_) => self.fail(MintFailure::Reverted { tx_hash }),
            Err(error) => self.fail(MintFailure::Unconfirmed { tx_hash, error }),
        }
    }

    /// Reports `failure` and makes the controller ready for the next attempt.
    fn fail(&mut self, failure: MintFailure) -> MintOutcome {
        warn!(%failure, "mint failed");
        self.state = MintState::Failed(failure.clone());
        let notice = match &failure {
            MintFailure::NotSent(ContractError::UserRejected) => Notice::Rejected(Action::Mint),
            failure => Notice::MintFailed(failure.clone()),
        };
        self.notices.send(notice);
        self.state = MintState::Idle;
        self.last_failure = Some(failure.clone());
        MintOutcome::Failed(failure)
    }
}
