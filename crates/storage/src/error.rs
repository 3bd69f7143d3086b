//! Chain-state read errors.

use relaymesh_types::BlockHeight;
use thiserror::Error;

/// Errors returned by the chain-state views.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// No epoch covers the requested block.
    #[error("no epoch covers block {0}")]
    EpochNotFound(BlockHeight),

    /// The epoch has no predecessor (first epoch, or predecessor pruned).
    #[error("epoch {0} has no previous epoch")]
    NoPreviousEpoch(BlockHeight),

    /// The block oracle cannot serve the height (zero or not yet committed).
    #[error("block {height} unavailable, latest committed is {latest}")]
    BlockUnavailable {
        /// Requested height.
        height: BlockHeight,
        /// Latest committed height.
        latest: BlockHeight,
    },

    /// A committed height is missing from the backing store.
    #[error("block {0} missing from store")]
    BlockMissing(BlockHeight),
}

/// Result type for chain-state reads.
pub type Result<T> = std::result::Result<T, StorageError>;
