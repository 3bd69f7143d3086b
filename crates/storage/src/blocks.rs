//! Committed block header access.

use crate::error::Result;
use chrono::{DateTime, Utc};
use relaymesh_types::{BlockHeight, Hash};
use serde::{Deserialize, Serialize};

/// Header fields of a committed block that pairing needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Block hash.
    pub hash: Hash,
    /// Block timestamp.
    pub time: DateTime<Utc>,
}

/// Read-only access to committed block headers.
///
/// Implementations must be deterministic at a given committed height: the
/// same `(state, height)` always yields the same header. Heights outside
/// `1..=latest_height()` are rejected with
/// [`StorageError::BlockUnavailable`](crate::StorageError::BlockUnavailable).
pub trait BlockOracle: Send + Sync {
    /// Latest committed height.
    fn latest_height(&self) -> BlockHeight;

    /// Header of the block at `height`.
    fn block(&self, height: BlockHeight) -> Result<BlockInfo>;
}
