//! Descriptor of the network the dapp requires.

use crate::chain::ChainRegistry;
use alloy_primitives::{ChainId, TxHash};
use serde::{Deserialize, Serialize};

/// Native currency of a network, as understood by `wallet_addEthereumChain`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Full description of a network.
///
/// The same value is compared against the wallet's current chain and sent as the payload when
/// asking the wallet to add the chain, see [`NetworkDescriptor::add_chain_parameter`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    #[serde(with = "alloy_serde::quantity")]
    pub chain_id: ChainId,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    #[serde(default)]
    pub block_explorer_urls: Vec<String>,
}

/// [EIP-3085](https://eips.ethereum.org/EIPS/eip-3085) `wallet_addEthereumChain` parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEthereumChainParameter<'a> {
    #[serde(with = "alloy_serde::quantity")]
    pub chain_id: ChainId,
    pub chain_name: &'a str,
    pub rpc_urls: &'a [String],
    pub native_currency: &'a NativeCurrency,
    pub block_explorer_urls: &'a [String],
}

impl Default for NetworkDescriptor {
    fn default() -> Self {
        Self::polygon_mumbai()
    }
}

impl NetworkDescriptor {
    /// Polygon Mumbai testnet, where the Random Puppy collection lives.
    pub fn polygon_mumbai() -> Self {
        Self {
            chain_id: 0x13881,
            chain_name: "Polygon Mumbai Testnet".to_string(),
            rpc_urls: vec!["https://rpc-mumbai.maticvigil.com/".to_string()],
            native_currency: NativeCurrency {
                name: "Mumbai Matic".to_string(),
                symbol: "MATIC".to_string(),
                decimals: 18,
            },
            block_explorer_urls: vec!["https://mumbai.polygonscan.com/".to_string()],
        }
    }

    pub fn add_chain_parameter(&self) -> AddEthereumChainParameter<'_> {
        AddEthereumChainParameter {
            chain_id: self.chain_id,
            chain_name: &self.chain_name,
            rpc_urls: &self.rpc_urls,
            native_currency: &self.native_currency,
            block_explorer_urls: &self.block_explorer_urls,
        }
    }

    /// Makes sure the registry resolves this network to its display name.
    pub fn register(&self, registry: &mut ChainRegistry) {
        registry.insert(self.chain_id, self.chain_name.clone());
    }

    pub fn explorer_url(&self) -> Option<&str> {
        self.block_explorer_urls.first().map(|url| url.trim_end_matches('/'))
    }

    /// Block explorer link for a transaction, if the network has an explorer.
    pub fn tx_url(&self, tx_hash: TxHash) -> Option<String> {
        self.explorer_url().map(|explorer| format!("{explorer}/tx/{tx_hash}"))
    }
}
