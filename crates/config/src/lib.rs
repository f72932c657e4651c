//! # puppy-config
//!
//! Random Puppy dapp configuration: the contract to mint from, the network it lives on, the
//! marketplace it is listed on and the timing knobs of the wallet/transaction flow.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

use alloy_primitives::{Address, U256, address};
use figment::{
    Error, Figment, Metadata, Profile, Provider,
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Map},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path, time::Duration};

pub mod chain;
pub use chain::{
    ChainRegistry, KNOWN_CHAINS, NetworkIdentity, NetworkLogo, NetworkName, ParseChainIdError,
    parse_chain_id,
};

pub mod error;
pub use error::ExtractConfigError;

pub mod network;
pub use network::{AddEthereumChainParameter, NativeCurrency, NetworkDescriptor};

/// Dapp configuration.
///
/// Values are resolved from, in increasing priority: [`Config::default`], `puppy.toml` in the
/// root directory and `PUPPY_`-prefixed environment variables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deployment address of the Random Puppy contract.
    pub contract_address: Address,
    /// The network minting is allowed on; also the payload for the "add network" fallback.
    pub required_network: NetworkDescriptor,
    /// Base URL of per-token marketplace pages, `{base}/{contract}/{token_id}`.
    pub marketplace_assets_url: String,
    /// Marketplace page of the whole collection.
    pub collection_url: String,
    /// Seconds to wait for a mint transaction to be mined. `0` waits forever.
    pub confirmation_timeout: u64,
    /// Interval for chain-change and event polling against RPC-backed providers.
    pub poll_interval_ms: u64,
    /// Additional `chain id -> name` entries for the chain registry.
    pub networks: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contract_address: Self::DEFAULT_CONTRACT_ADDRESS,
            required_network: NetworkDescriptor::polygon_mumbai(),
            marketplace_assets_url: "https://testnets.opensea.io/assets/mumbai".to_string(),
            collection_url: "https://testnets.opensea.io/collection/random-puppy-v4".to_string(),
            confirmation_timeout: 300,
            poll_interval_ms: 1_000,
            networks: BTreeMap::new(),
        }
    }
}

impl Config {
    /// The name of the config file.
    pub const FILE_NAME: &'static str = "puppy.toml";

    /// Prefix of environment variables that override file values.
    pub const ENV_PREFIX: &'static str = "PUPPY_";

    /// Random Puppy deployment on Polygon Mumbai.
    ///
    /// `0xAac6b1DFab73f408eE66cE27fa630E1e170C3B33`
    pub const DEFAULT_CONTRACT_ADDRESS: Address =
        address!("0xAac6b1DFab73f408eE66cE27fa630E1e170C3B33");

    /// Returns the `Config` of the current directory.
    ///
    /// # Panics
    ///
    /// If the config could not be extracted; use [`Config::try_from`] to handle the error.
    #[track_caller]
    pub fn load() -> Self {
        Self::load_with_root(".")
    }

    /// Returns the `Config` rooted at `root`.
    #[track_caller]
    pub fn load_with_root(root: impl AsRef<Path>) -> Self {
        Self::from_provider(Self::figment_with_root(root))
    }

    /// Extract a `Config` from `provider`, panicking if extraction fails.
    #[track_caller]
    pub fn from_provider<T: Provider>(provider: T) -> Self {
        trace!("load config with provider: {:?}", provider.metadata());
        Self::try_from(provider).unwrap_or_else(|err| panic!("{}", err))
    }

    /// Attempts to extract a `Config` from `provider`.
    pub fn try_from<T: Provider>(provider: T) -> Result<Self, ExtractConfigError> {
        Figment::from(provider).extract::<Self>().map_err(ExtractConfigError::new)
    }

    /// The default figment of the current directory.
    pub fn figment() -> Figment {
        Self::figment_with_root(".")
    }

    /// Defaults, then `{root}/puppy.toml`, then `PUPPY_*` environment variables.
    pub fn figment_with_root(root: impl AsRef<Path>) -> Figment {
        Figment::from(Self::default())
            .merge(Toml::file(root.as_ref().join(Self::FILE_NAME)))
            .merge(Env::prefixed(Self::ENV_PREFIX))
    }

    /// How long to wait for a mint to be mined, `None` meaning forever.
    pub fn confirmation_timeout(&self) -> Option<Duration> {
        (self.confirmation_timeout > 0).then(|| Duration::from_secs(self.confirmation_timeout))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// The chain registry with the required network and the configured extras merged in.
    ///
    /// Entries whose key is not a valid chain id are skipped.
    pub fn chain_registry(&self) -> ChainRegistry {
        let mut registry = ChainRegistry::default();
        for (chain_id, name) in &self.networks {
            match parse_chain_id(chain_id) {
                Ok(id) => registry.insert(id, name.clone()),
                Err(err) => warn!(%err, "ignoring configured network"),
            }
        }
        self.required_network.register(&mut registry);
        registry
    }

    /// Marketplace page of a minted token.
    pub fn token_url(&self, token_id: U256) -> String {
        format!(
            "{}/{}/{}",
            self.marketplace_assets_url.trim_end_matches('/'),
            self.contract_address,
            token_id
        )
    }
}

impl Provider for Config {
    fn metadata(&self) -> Metadata {
        Metadata::named("Random Puppy Config")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        Serialized::defaults(self).data()
    }
}
