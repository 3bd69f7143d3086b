//! Account address type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account identifier.
///
/// The text form is lowercase hex, optionally `0x`-prefixed on input.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped).map_err(|_| AddressError::InvalidHex(s.to_string()))?;
        let bytes: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| AddressError::InvalidLength(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

/// Address parse errors.
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    /// The text form is not valid hex.
    #[error("address is not valid hex: {0}")]
    InvalidHex(String),

    /// The decoded byte string has the wrong length.
    #[error("address must be {ADDRESS_LEN} bytes: {0}")]
    InvalidLength(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_roundtrip() {
        let addr = Address::from_bytes([0xaa; 20]);
        let parsed: Address = addr.to_string().parse().expect("parse own display");
        assert_eq!(addr, parsed);
    }

    #[test]
    fn test_address_parse_without_prefix() {
        let addr: Address = "00000000000000000000000000000000000000aa"
            .parse()
            .expect("bare hex");
        assert_eq!(addr.as_bytes()[19], 0xaa);
    }

    #[test]
    fn test_address_rejects_bad_input() {
        assert!("zz".parse::<Address>().is_err());
        assert!("0xabcd".parse::<Address>().is_err());
    }
}
