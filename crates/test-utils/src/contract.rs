//! A scripted [`ContractClient`].

use alloy_primitives::{B256, TxHash, U256};
use async_trait::async_trait;
use parking_lot::Mutex;
use puppy_dapp::{
    ContractClient, ContractError, MintEvent, MintEventHandler, MintEventSubscription,
    MintReceipt, PendingMint, ReceiptStatus,
};
use puppy_wallets::Account;
use std::{
    collections::{BTreeMap, VecDeque},
    sync::Arc,
};

/// How a submitted mint ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Confirmation {
    /// Mined successfully, minting `token_id`.
    Mined { token_id: Option<U256> },
    /// Mined but reverted.
    Reverted,
    /// Waiting for the receipt failed.
    Error(ContractError),
    /// Never mined.
    Never,
}

type Handlers = Arc<Mutex<BTreeMap<u64, Arc<MintEventHandler>>>>;

#[derive(Debug, Default)]
struct ContractState {
    submissions: Vec<Account>,
    submit_errors: VecDeque<ContractError>,
    confirmations: VecDeque<Confirmation>,
    subscriptions: u64,
}

/// In-memory Random Puppy contract.
///
/// Every submission gets a fresh transaction hash; confirmations are scripted in order and
/// default to a successful mint of the next token id.
#[derive(Default)]
pub struct MockContract {
    state: Mutex<ContractState>,
    handlers: Handlers,
}

impl std::fmt::Debug for MockContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockContract")
            .field("state", &self.state)
            .field("active_subscriptions", &self.active_subscriptions())
            .finish()
    }
}

impl MockContract {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues how the next awaited confirmation ends.
    pub fn confirming(self, confirmation: Confirmation) -> Self {
        self.push_confirmation(confirmation);
        self
    }

    /// Makes the next submission fail before a transaction exists.
    pub fn failing_submission(self, err: ContractError) -> Self {
        self.state.lock().submit_errors.push_back(err);
        self
    }

    pub fn push_confirmation(&self, confirmation: Confirmation) {
        self.state.lock().confirmations.push_back(confirmation);
    }

    /// Accounts that submitted mint requests, in order.
    pub fn submissions(&self) -> Vec<Account> {
        self.state.lock().submissions.clone()
    }

    pub fn submission_count(&self) -> usize {
        self.state.lock().submissions.len()
    }

    /// Number of subscriptions ever made.
    pub fn subscription_count(&self) -> u64 {
        self.state.lock().subscriptions
    }

    /// Number of subscriptions not dropped yet.
    pub fn active_subscriptions(&self) -> usize {
        self.handlers.lock().len()
    }

    /// Emits a `PuppyMinted` event to every active subscription.
    pub fn emit(&self, event: MintEvent) {
        let handlers: Vec<_> = self.handlers.lock().values().cloned().collect();
        for handler in handlers {
            (**handler)(event.clone());
        }
    }

    /// Hash of the `n`th submitted transaction, starting at 1.
    pub fn tx_hash(n: usize) -> TxHash {
        B256::left_padding_from(&n.to_be_bytes())
    }
}

#[async_trait]
impl ContractClient for MockContract {
    async fn submit_mint_request(&self, from: &Account) -> Result<PendingMint, ContractError> {
        let mut state = self.state.lock();
        if let Some(err) = state.submit_errors.pop_front() {
            return Err(err);
        }
        state.submissions.push(from.clone());
        let tx_hash = Self::tx_hash(state.submissions.len());
        trace!(%from, %tx_hash, "mint submitted");
        Ok(PendingMint { tx_hash })
    }

    async fn await_confirmation(
        &self,
        pending: &PendingMint,
    ) -> Result<MintReceipt, ContractError> {
        let confirmation = self.state.lock().confirmations.pop_front();
        let tx_hash = pending.tx_hash;
        match confirmation {
            Some(Confirmation::Mined { token_id }) => {
                Ok(MintReceipt { tx_hash, status: ReceiptStatus::Success, token_id })
            }
            Some(Confirmation::Reverted) => {
                Ok(MintReceipt { tx_hash, status: ReceiptStatus::Reverted, token_id: None })
            }
            Some(Confirmation::Error(err)) => Err(err),
            Some(Confirmation::Never) => std::future::pending().await,
            None => {
                let token_id = U256::from(self.submission_count());
                Ok(MintReceipt { tx_hash, status: ReceiptStatus::Success, token_id: Some(token_id) })
            }
        }
    }

    fn subscribe_to_mint_events(&self, handler: MintEventHandler) -> MintEventSubscription {
        let id = {
            let mut state = self.state.lock();
            state.subscriptions += 1;
            state.subscriptions
        };
        self.handlers.lock().insert(id, Arc::new(handler));
        let handlers = self.handlers.clone();
        MintEventSubscription::new(move || {
            handlers.lock().remove(&id);
        })
    }
}
