//! Render-only projection of the session and mint state.

use crate::{mint::MintState, session::SessionState};
use alloy_primitives::U256;
use puppy_config::{Config, NetworkLogo};
use puppy_wallets::Account;

/// Header badge of a connected wallet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletBadge {
    /// `Wallet: 0xABCD...1234`
    pub label: String,
    pub network_name: String,
    pub logo: NetworkLogo,
}

/// The mint button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MintControl {
    Enabled,
    /// Disabled while a mint is in flight.
    Pending { tx_url: Option<String> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintedToken {
    pub token_id: U256,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewState {
    /// The wallet has not been queried yet.
    Loading,
    /// Shows the connect button.
    NotConnected { wallet_available: bool },
    /// Connected to another network than the required one; shows the switch button.
    WrongNetwork { wallet: WalletBadge, prompt: String },
    Connected {
        wallet: WalletBadge,
        mint: MintControl,
        collection_url: String,
        minted: Option<MintedToken>,
    },
}

impl ViewState {
    pub fn project(
        session: &SessionState,
        mint: &MintState,
        config: &Config,
        wallet_available: bool,
    ) -> Self {
        let (account, network) = match session {
            SessionState::Unchecked => return Self::Loading,
            SessionState::Disconnected => return Self::NotConnected { wallet_available },
            SessionState::Connected { account, network } => (account, network.as_ref()),
        };
        if account.is_empty() {
            return Self::NotConnected { wallet_available };
        }

        let required = &config.required_network;
        let wallet = WalletBadge {
            label: wallet_label(account),
            network_name: network
                .map(|network| network.name.to_string())
                .unwrap_or_else(|| "Unknown network".to_string()),
            logo: network.map(|network| network.logo()).unwrap_or(NetworkLogo::Ethereum),
        };
        if !session.is_on(required.chain_id) {
            return Self::WrongNetwork {
                wallet,
                prompt: format!("Please switch to the {}!", required.chain_name),
            };
        }

        let mint_control = match mint {
            MintState::Pending { tx_hash } => {
                MintControl::Pending { tx_url: tx_hash.and_then(|hash| required.tx_url(hash)) }
            }
            _ => MintControl::Enabled,
        };
        let minted = match mint {
            MintState::Succeeded { token_id: Some(token_id), .. } => {
                Some(MintedToken { token_id: *token_id, url: config.token_url(*token_id) })
            }
            _ => None,
        };
        Self::Connected {
            wallet,
            mint: mint_control,
            collection_url: config.collection_url.clone(),
            minted,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::WrongNetwork { .. } | Self::Connected { .. })
    }

    pub fn mint_enabled(&self) -> bool {
        matches!(self, Self::Connected { mint: MintControl::Enabled, .. })
    }

    pub fn wallet(&self) -> Option<&WalletBadge> {
        match self {
            Self::WrongNetwork { wallet, .. } | Self::Connected { wallet, .. } => Some(wallet),
            _ => None,
        }
    }
}

pub fn wallet_label(account: &Account) -> String {
    format!("Wallet: {}", account.short())
}
