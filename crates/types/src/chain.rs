//! Chain identifiers and service-spec registry rows.

use crate::BlockHeight;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a service specification, e.g. `"ETH1"`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    /// Create a new chain ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier as raw bytes, as hashed into the selection seed.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Whether the identifier is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ChainId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainId({})", self.0)
    }
}

/// Registry row for a service specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecInfo {
    /// Whether the spec is currently enabled for pairing.
    pub enabled: bool,
    /// Block at which the spec was last updated.
    pub block_last_updated: BlockHeight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_display() {
        let id = ChainId::new("ETH1");
        assert_eq!(id.to_string(), "ETH1");
        assert_eq!(id.as_bytes(), b"ETH1");
    }
}
