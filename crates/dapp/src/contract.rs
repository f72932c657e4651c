//! The Random Puppy contract capability.

use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::{PendingTransactionBuilder, PendingTransactionError, Provider};
use alloy_rpc_types::{Filter, Log, TransactionInput, TransactionRequest};
use alloy_sol_types::{SolCall, SolEvent, sol};
use alloy_transport::TransportError;
use async_trait::async_trait;
use auto_impl::auto_impl;
use futures::StreamExt;
use puppy_config::Config;
use puppy_wallets::{Account, ProviderErrorCode};
use std::{fmt, pin::pin, time::Duration};
use tokio::{runtime::Handle, task::JoinHandle};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    contract RandomPuppy {
        event PuppyMinted(address from, uint256 tokenId);

        function requestPuppy() external;
    }
}

/// A mint transaction that was accepted by the wallet but not necessarily mined yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingMint {
    pub tx_hash: TxHash,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

impl ReceiptStatus {
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl From<bool> for ReceiptStatus {
    fn from(success: bool) -> Self {
        if success { Self::Success } else { Self::Reverted }
    }
}

/// Outcome of a mined mint transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintReceipt {
    pub tx_hash: TxHash,
    pub status: ReceiptStatus,
    /// Token minted by the transaction, taken from its `PuppyMinted` log.
    pub token_id: Option<U256>,
}

/// A `PuppyMinted` event, emitted for every mint of the collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintEvent {
    pub from: Account,
    pub token_id: U256,
}

impl From<RandomPuppy::PuppyMinted> for MintEvent {
    fn from(event: RandomPuppy::PuppyMinted) -> Self {
        Self { from: event.from.into(), token_id: event.tokenId }
    }
}

/// Callback invoked for every [`MintEvent`].
pub type MintEventHandler = Box<dyn Fn(MintEvent) + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    #[error("account `{0}` can't send transactions")]
    InvalidSender(Account),
    #[error("transaction rejected by the user")]
    UserRejected,
    #[error("contract call failed: {message}")]
    Rpc { code: Option<i64>, message: String },
}

impl ContractError {
    pub fn rpc(message: impl Into<String>) -> Self {
        Self::Rpc { code: None, message: message.into() }
    }
}

impl From<TransportError> for ContractError {
    fn from(err: TransportError) -> Self {
        let Some(payload) = err.as_error_resp() else { return Self::rpc(err.to_string()) };
        match ProviderErrorCode::from_payload(payload) {
            Some(ProviderErrorCode::UserRejectedRequest) => Self::UserRejected,
            _ => Self::Rpc { code: Some(payload.code), message: payload.message.to_string() },
        }
    }
}

impl From<PendingTransactionError> for ContractError {
    fn from(err: PendingTransactionError) -> Self {
        match err {
            PendingTransactionError::TransportError(err) => err.into(),
            err => Self::rpc(err.to_string()),
        }
    }
}

/// Handle of an active mint event subscription. Dropping it unsubscribes.
#[must_use = "the subscription ends when the handle is dropped"]
pub struct MintEventSubscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl MintEventSubscription {
    /// Creates a subscription that runs `release` when it ends.
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    /// A subscription backed by a task delivering the events.
    pub fn from_task(task: JoinHandle<()>) -> Self {
        let task = task.abort_handle();
        Self::new(move || task.abort())
    }

    /// A subscription that never delivers anything.
    pub fn inert() -> Self {
        Self { release: None }
    }

}

impl Drop for MintEventSubscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for MintEventSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MintEventSubscription").field("active", &self.release.is_some()).finish()
    }
}

/// The contract capability the mint flow drives.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait ContractClient: Send + Sync {
    /// Sends `requestPuppy()` from `from`. Resolves once the wallet handed out a transaction
    /// hash, without waiting for the transaction to be mined.
    async fn submit_mint_request(&self, from: &Account) -> Result<PendingMint, ContractError>;

    /// Waits until the transaction is mined.
    ///
    /// A reverted transaction is a successful call returning [`ReceiptStatus::Reverted`]; errors
    /// mean the outcome is unknown.
    async fn await_confirmation(&self, pending: &PendingMint)
    -> Result<MintReceipt, ContractError>;

    /// Calls `handler` for every `PuppyMinted` event until the returned handle is dropped.
    fn subscribe_to_mint_events(&self, handler: MintEventHandler) -> MintEventSubscription;
}

/// [`ContractClient`] for a deployed Random Puppy contract.
#[derive(Clone, Debug)]
pub struct RandomPuppyClient<P> {
    provider: P,
    address: Address,
    poll_interval: Duration,
}

impl<P: Provider + Clone + 'static> RandomPuppyClient<P> {
    pub fn new(provider: P, address: Address) -> Self {
        Self { provider, address, poll_interval: Duration::from_secs(1) }
    }

    /// Binds the configured `contract_address`, polling logs on `poll_interval_ms`.
    pub fn from_config(provider: P, config: &Config) -> Self {
        Self::new(provider, config.contract_address).with_poll_interval(config.poll_interval())
    }

    /// Sets how often new `PuppyMinted` logs are polled for.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    fn mint_filter(&self) -> Filter {
        Filter::new().address(self.address).event_signature(RandomPuppy::PuppyMinted::SIGNATURE_HASH)
    }
}

#[async_trait]
impl<P: Provider + Clone + 'static> ContractClient for RandomPuppyClient<P> {
    async fn submit_mint_request(&self, from: &Account) -> Result<PendingMint, ContractError> {
        let sender = from.address().ok_or_else(|| ContractError::InvalidSender(from.clone()))?;
        let tx = TransactionRequest::default()
            .from(sender)
            .to(self.address)
            .input(TransactionInput::new(RandomPuppy::requestPuppyCall {}.abi_encode().into()));

        debug!(%sender, contract = %self.address, "sending requestPuppy");
        let pending = self.provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        debug!(%tx_hash, "requestPuppy sent");
        Ok(PendingMint { tx_hash })
    }

    async fn await_confirmation(
        &self,
        pending: &PendingMint,
    ) -> Result<MintReceipt, ContractError> {
        trace!(tx_hash = %pending.tx_hash, "waiting for receipt");
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), pending.tx_hash)
            .get_receipt()
            .await?;
        let status = ReceiptStatus::from(receipt.status());
        let token_id = minted_token_id(self.address, receipt.inner.logs());
        debug!(tx_hash = %pending.tx_hash, ?status, ?token_id, "mint mined");
        Ok(MintReceipt { tx_hash: pending.tx_hash, status, token_id })
    }

    fn subscribe_to_mint_events(&self, handler: MintEventHandler) -> MintEventSubscription {
        let Ok(runtime) = Handle::try_current() else {
            warn!("no async runtime, mint events will not be delivered");
            return MintEventSubscription::inert();
        };
        let provider = self.provider.clone();
        let filter = self.mint_filter();
        let poll_interval = self.poll_interval;
        let task = runtime.spawn(async move {
            let poller = match provider.watch_logs(&filter).await {
                Ok(poller) => poller,
                Err(err) => {
                    warn!(%err, "failed to install PuppyMinted filter");
                    return;
                }
            };
            let mut logs = pin!(poller.with_poll_interval(poll_interval).into_stream());
            while let Some(batch) = logs.next().await {
                for log in batch {
                    match log.log_decode::<RandomPuppy::PuppyMinted>() {
                        Ok(event) => handler(event.inner.data.into()),
                        Err(err) => trace!(%err, "skipping undecodable log"),
                    }
                }
            }
            debug!("PuppyMinted log stream ended");
        });
        MintEventSubscription::from_task(task)
    }
}

/// Id of the token minted by `contract` according to `logs`.
pub fn minted_token_id(contract: Address, logs: &[Log]) -> Option<U256> {
    logs.iter()
        .filter(|log| log.address() == contract)
        .find_map(|log| log.log_decode::<RandomPuppy::PuppyMinted>().ok())
        .map(|event| event.inner.data.tokenId)
}
