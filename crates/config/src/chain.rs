//! Chain identifiers and the registry of networks the dapp can name.

use alloy_primitives::ChainId;
use std::{borrow::Cow, collections::BTreeMap, fmt, num::ParseIntError, str::FromStr};

/// Networks known out of the box, keyed by chain id.
pub const KNOWN_CHAINS: &[(ChainId, &str)] = &[
    (0x1, "Mainnet"),
    (0x3, "Ropsten"),
    (0x2a, "Kovan"),
    (0x4, "Rinkeby"),
    (0x5, "Goerli"),
    (0x61, "BSC Testnet"),
    (0x38, "BSC Mainnet"),
    (0x89, "Polygon Mainnet"),
    (0x13881, "Polygon Mumbai Testnet"),
    (0xa86a, "AVAX Mainnet"),
];

/// Error returned when a chain identifier string can't be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid chain id `{input}`: {source}")]
pub struct ParseChainIdError {
    input: String,
    #[source]
    source: ParseIntError,
}

/// Parses a chain identifier as reported by wallets (`0x`-prefixed hex) or written by humans
/// (decimal).
pub fn parse_chain_id(input: &str) -> Result<ChainId, ParseChainIdError> {
    let trimmed = input.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => ChainId::from_str_radix(hex, 16),
        None => trimmed.parse::<ChainId>(),
    };
    parsed.map_err(|source| ParseChainIdError { input: input.to_string(), source })
}

/// The human readable name of a network.
///
/// Chains missing from the [`ChainRegistry`] resolve to [`NetworkName::Unrecognized`] instead of
/// failing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NetworkName {
    Known(Cow<'static, str>),
    Unrecognized,
}

impl NetworkName {
    /// Returns the name if the network is known.
    pub fn as_known(&self) -> Option<&str> {
        match self {
            Self::Known(name) => Some(name.as_ref()),
            Self::Unrecognized => None,
        }
    }

    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized)
    }
}

impl fmt::Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(name) => f.write_str(name),
            Self::Unrecognized => f.write_str("Unrecognized network"),
        }
    }
}

/// Logo shown next to the wallet label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NetworkLogo {
    Polygon,
    Ethereum,
}

impl NetworkLogo {
    /// Polygon networks get the polygon logo, everything else the ethereum one.
    pub fn for_name(name: &NetworkName) -> Self {
        match name.as_known() {
            Some(name) if name.contains("Polygon") => Self::Polygon,
            _ => Self::Ethereum,
        }
    }
}

/// A chain identifier together with its resolved name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NetworkIdentity {
    pub chain_id: ChainId,
    pub name: NetworkName,
}

impl NetworkIdentity {
    pub fn is(&self, chain_id: ChainId) -> bool {
        self.chain_id == chain_id
    }

    pub fn logo(&self) -> NetworkLogo {
        NetworkLogo::for_name(&self.name)
    }
}

impl fmt::Display for NetworkIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#x})", self.name, self.chain_id)
    }
}

/// Static lookup from chain id to network name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainRegistry {
    chains: BTreeMap<ChainId, Cow<'static, str>>,
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self {
            chains: KNOWN_CHAINS
                .iter()
                .map(|&(id, name)| (id, Cow::Borrowed(name)))
                .collect(),
        }
    }
}

impl ChainRegistry {
    /// An empty registry, every lookup is unrecognized.
    pub fn empty() -> Self {
        Self { chains: BTreeMap::new() }
    }

    /// Adds or renames a chain.
    pub fn with_chain(mut self, chain_id: ChainId, name: impl Into<Cow<'static, str>>) -> Self {
        self.insert(chain_id, name);
        self
    }

    pub fn insert(&mut self, chain_id: ChainId, name: impl Into<Cow<'static, str>>) {
        self.chains.insert(chain_id, name.into());
    }

    pub fn name_of(&self, chain_id: ChainId) -> NetworkName {
        self.chains
            .get(&chain_id)
            .map(|name| NetworkName::Known(name.clone()))
            .unwrap_or(NetworkName::Unrecognized)
    }

    pub fn identify(&self, chain_id: ChainId) -> NetworkIdentity {
        NetworkIdentity { chain_id, name: self.name_of(chain_id) }
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl FromStr for NetworkIdentity {
    type Err = ParseChainIdError;

    /// Resolves against the default registry.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ChainRegistry::default().identify(parse_chain_id(s)?))
    }
}
