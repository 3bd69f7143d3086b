//! Epoch metadata and sealed stake snapshots.

use crate::error::Result;
use relaymesh_types::{BlockHeight, ChainId, EpochParams, Role, StakeEntry};

/// Read-only view over epoch metadata and stake snapshots.
///
/// An epoch is a contiguous block range during which the pairing set is
/// fixed; it is identified by its first block. Snapshots are sealed at the
/// epoch boundary and retained for `blocks_to_save` blocks.
pub trait EpochStore: Send + Sync {
    /// First block of the earliest epoch still retained.
    fn earliest_epoch_start(&self) -> BlockHeight;

    /// First block of the current epoch.
    fn current_epoch_start(&self) -> BlockHeight;

    /// First block of the epoch following the one starting at `from`.
    fn next_epoch_start(&self, from: BlockHeight) -> Result<BlockHeight>;

    /// First block of the epoch preceding the one starting at `of`.
    fn previous_epoch_start(&self, of: BlockHeight) -> Result<BlockHeight>;

    /// Epoch start and parameters for the epoch covering `block`.
    fn epoch_start_for_block(&self, block: BlockHeight) -> Result<(BlockHeight, EpochParams)>;

    /// Retention window in blocks, as governed at `at_height`.
    fn blocks_to_save(&self, at_height: BlockHeight) -> Result<u64>;

    /// Sealed stake snapshot for `(epoch, role, chain_id)`.
    ///
    /// Returns `None` when no snapshot was sealed for the triple. Entry
    /// order is the snapshot order; the weighted selection depends on it.
    fn stake_entries(
        &self,
        epoch: BlockHeight,
        role: Role,
        chain_id: &ChainId,
    ) -> Option<Vec<StakeEntry>>;
}
