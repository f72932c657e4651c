use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// An account as reported by the wallet.
///
/// Kept as the opaque string the wallet returned; [`Account::address`] parses it on demand.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Account(String);

impl Account {
    pub fn new(account: impl Into<String>) -> Self {
        Self(account.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn address(&self) -> Option<Address> {
        Address::from_str(self.0.trim()).ok()
    }

    /// Shortened form for display, `0xABCD...1234`.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 10 {
            return self.0.clone();
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Address> for Account {
    fn from(address: Address) -> Self {
        Self(address.to_checksum(None))
    }
}

impl From<&str> for Account {
    fn from(account: &str) -> Self {
        Self::new(account)
    }
}

impl From<String> for Account {
    fn from(account: String) -> Self {
        Self(account)
    }
}
