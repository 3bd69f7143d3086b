//! Stake entries and snapshot roles.

use crate::{Address, BlockHeight, Coin, Geolocation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a staked participant within an epoch snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Consumer requesting pairings.
    Client,
    /// Servicer answering relays.
    Provider,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Client => f.write_str("client"),
            Role::Provider => f.write_str("provider"),
        }
    }
}

/// One staked participant at an epoch.
///
/// Entries are sealed into per-`(role, chain_id)` snapshots at each epoch
/// boundary. `deadline` is the block at or after which the entry becomes
/// effective; an entry with `deadline > block` is not yet active at `block`
/// (activation grace, or a jail that pushed the deadline forward).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeEntry {
    /// Account address of the participant.
    pub address: Address,
    /// Staked amount.
    pub stake: Coin,
    /// Block at which the entry becomes effective.
    pub deadline: BlockHeight,
    /// Supported-region bitmap.
    pub geolocation: Geolocation,
}

impl StakeEntry {
    /// Whether the entry is effective at `block` (deadline reached).
    pub fn active_at(&self, block: BlockHeight) -> bool {
        self.deadline <= block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_at_deadline_boundary() {
        let entry = StakeEntry {
            address: Address::from_bytes([1; 20]),
            stake: Coin::new("umesh", 100),
            deadline: 50,
            geolocation: Geolocation::GLOBAL,
        };
        assert!(!entry.active_at(49));
        assert!(entry.active_at(50));
        assert!(entry.active_at(51));
    }
}
