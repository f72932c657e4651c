use alloy_json_rpc::ErrorPayload;
use alloy_transport::TransportError;
use serde::Deserialize;
use std::fmt;

/// Provider error codes defined by [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193#provider-errors)
/// and [EIP-3326](https://eips.ethereum.org/EIPS/eip-3326).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// The user rejected the request.
    UserRejectedRequest,
    /// The requested method and/or account has not been authorized by the user.
    Unauthorized,
    /// The provider does not support the requested method.
    UnsupportedMethod,
    /// The provider is disconnected from all chains.
    Disconnected,
    /// The provider is not connected to the requested chain.
    ChainDisconnected,
    /// The chain has not been added to the wallet.
    UnrecognizedChain,
}

impl ProviderErrorCode {
    pub const fn code(self) -> i64 {
        match self {
            Self::UserRejectedRequest => 4001,
            Self::Unauthorized => 4100,
            Self::UnsupportedMethod => 4200,
            Self::Disconnected => 4900,
            Self::ChainDisconnected => 4901,
            Self::UnrecognizedChain => 4902,
        }
    }

    pub const fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            4001 => Self::UserRejectedRequest,
            4100 => Self::Unauthorized,
            4200 => Self::UnsupportedMethod,
            4900 => Self::Disconnected,
            4901 => Self::ChainDisconnected,
            4902 => Self::UnrecognizedChain,
            _ => return None,
        })
    }

    /// Decodes the provider error code of a JSON-RPC error payload.
    ///
    /// Some wallets wrap the actual code into an internal error (`-32603`) and report it under
    /// `data.originalError.code`, that one is picked up as well.
    pub fn from_payload(payload: &ErrorPayload) -> Option<Self> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Wrapped {
            original_error: Code,
        }

        #[derive(Deserialize)]
        struct Code {
            code: i64,
        }

        Self::from_code(payload.code).or_else(|| {
            let wrapped = payload.try_data_as::<Wrapped>()?.ok()?;
            Self::from_code(wrapped.original_error.code)
        })
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.code().fmt(f)
    }
}

/// Errors surfaced by a [`WalletProvider`](crate::WalletProvider).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    /// No wallet is injected; the user has to install or enable one.
    #[error("no wallet found, install or enable a browser wallet")]
    Unavailable,
    /// The user declined the prompt.
    #[error("request rejected by the user")]
    UserRejected,
    /// The wallet does not know the requested chain yet.
    #[error("unrecognized chain, it has to be added to the wallet first")]
    UnrecognizedChain,
    #[error("wallet request failed: {message}")]
    Rpc { code: Option<i64>, message: String },
}

impl WalletError {
    pub fn rpc(message: impl Into<String>) -> Self {
        Self::Rpc { code: None, message: message.into() }
    }

    pub fn from_payload(payload: &ErrorPayload) -> Self {
        match ProviderErrorCode::from_payload(payload) {
            Some(ProviderErrorCode::UserRejectedRequest) => Self::UserRejected,
            Some(ProviderErrorCode::UnrecognizedChain) => Self::UnrecognizedChain,
            _ => Self::Rpc { code: Some(payload.code), message: payload.message.to_string() },
        }
    }
}

impl From<TransportError> for WalletError {
    fn from(err: TransportError) -> Self {
        match err.as_error_resp() {
            Some(payload) => Self::from_payload(payload),
            None => Self::rpc(err.to_string()),
        }
    }
}
