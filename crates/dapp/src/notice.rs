//! User-facing notices.

use crate::mint::MintFailure;
use alloy_primitives::{TxHash, U256};
use puppy_wallets::Account;
use std::fmt;
use tokio::sync::mpsc;

/// A user triggered action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Connect,
    SwitchNetwork,
    Mint,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect the wallet",
            Self::SwitchNetwork => "switch networks",
            Self::Mint => "mint",
        })
    }
}

/// Something the user should be told about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// There is no wallet to talk to.
    WalletUnavailable,
    /// The user declined a wallet prompt.
    Rejected(Action),
    /// An action failed, retrying it is up to the user.
    Failed { action: Action, reason: String },
    /// The mint transaction was sent and is being mined.
    MintSent { tx_hash: TxHash, tx_url: Option<String> },
    /// The mint transaction was mined successfully.
    Minted { token_id: Option<U256>, token_url: Option<String>, tx_url: Option<String> },
    MintFailed(MintFailure),
    /// Somebody minted a puppy.
    PuppyMinted { from: Account, token_id: U256, token_url: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WalletUnavailable => {
                f.write_str("No wallet found. Install or enable a browser wallet such as MetaMask.")
            }
            Self::Rejected(action) => write!(f, "Request to {action} was rejected."),
            Self::Failed { action, reason } => write!(f, "Could not {action}: {reason}"),
            Self::MintSent { tx_hash, tx_url } => {
                write!(f, "Mining... please wait. ")?;
                match tx_url {
                    Some(url) => write!(f, "See transaction: {url}"),
                    None => write!(f, "Transaction: {tx_hash}"),
                }
            }
            Self::Minted { token_id, token_url, tx_url } => {
                f.write_str("Your Random Puppy was minted and sent to your wallet!")?;
                if let Some(token_id) = token_id {
                    write!(f, " Token #{token_id}.")?;
                }
                if let Some(url) = token_url {
                    write!(
                        f,
                        " It may take a few minutes to show up on the marketplace: {url}"
                    )?;
                }
                if let Some(url) = tx_url {
                    write!(f, " Transaction: {url}")?;
                }
                Ok(())
            }
            Self::MintFailed(failure) => write!(f, "Minting failed: {failure}"),
            Self::PuppyMinted { from, token_id, token_url } => {
                write!(f, "{} minted puppy #{token_id}: {token_url}", from.short())
            }
        }
    }
}

/// Sending half of the notice channel, shared by everything that reports to the user.
#[derive(Clone, Debug)]
pub struct Notices {
    tx: mpsc::UnboundedSender<Notice>,
}

impl Notices {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, notice: Notice) {
        debug!(%notice, "notice");
        if self.tx.send(notice).is_err() {
            trace!("notice receiver dropped");
        }
    }
}
