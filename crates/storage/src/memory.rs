//! In-memory implementation of the chain-state views.
//!
//! This implementation is primarily for testing and development. Epochs are
//! arithmetic: a configured first epoch start and epoch length generate the
//! epoch schedule, and the current epoch is the epoch covering the latest
//! committed block.
//!
//! All state lives under a single `parking_lot::RwLock` around one inner
//! struct, so every read observes one consistent snapshot and there is no
//! lock ordering to get wrong. Data is cloned out before the lock is
//! released.

use crate::blocks::{BlockInfo, BlockOracle};
use crate::epochs::EpochStore;
use crate::error::{Result, StorageError};
use crate::specs::SpecRegistry;
use parking_lot::RwLock;
use relaymesh_types::{BlockHeight, ChainId, EpochParams, Role, SpecInfo, StakeEntry};
use std::collections::{BTreeMap, HashMap};

/// Inner state guarded by a single lock.
struct StateInner {
    /// First block of the first epoch.
    first_epoch_start: BlockHeight,
    /// Epoch length in blocks.
    epoch_blocks: u64,
    /// First block of the earliest epoch still retained.
    earliest_epoch_start: BlockHeight,
    /// Current governance parameters.
    params: EpochParams,
    /// Committed block headers by height.
    blocks: BTreeMap<BlockHeight, BlockInfo>,
    /// Spec registry rows.
    specs: HashMap<ChainId, SpecInfo>,
    /// Sealed stake snapshots by (epoch, role, chain).
    snapshots: HashMap<(BlockHeight, Role, ChainId), Vec<StakeEntry>>,
}

/// In-memory chain state implementing [`EpochStore`], [`SpecRegistry`], and
/// [`BlockOracle`].
pub struct InMemoryState {
    inner: RwLock<StateInner>,
}

impl InMemoryState {
    /// Create a state with the given epoch schedule and parameters.
    ///
    /// `epoch_blocks` must be positive; a zero epoch length has no schedule.
    pub fn new(first_epoch_start: BlockHeight, epoch_blocks: u64, params: EpochParams) -> Self {
        assert!(epoch_blocks > 0, "epoch length must be positive");
        Self {
            inner: RwLock::new(StateInner {
                first_epoch_start,
                epoch_blocks,
                earliest_epoch_start: first_epoch_start,
                params,
                blocks: BTreeMap::new(),
                specs: HashMap::new(),
                snapshots: HashMap::new(),
            }),
        }
    }

    /// Commit a block header at `height`.
    pub fn insert_block(&self, height: BlockHeight, info: BlockInfo) {
        self.inner.write().blocks.insert(height, info);
    }

    /// Register or update a spec row.
    pub fn set_spec(&self, chain_id: ChainId, info: SpecInfo) {
        self.inner.write().specs.insert(chain_id, info);
    }

    /// Seal a stake snapshot for `(epoch, role, chain_id)`.
    pub fn set_stake_entries(
        &self,
        epoch: BlockHeight,
        role: Role,
        chain_id: ChainId,
        entries: Vec<StakeEntry>,
    ) {
        self.inner
            .write()
            .snapshots
            .insert((epoch, role, chain_id), entries);
    }

    /// Drop retention before `earliest`, as if old snapshots were pruned.
    pub fn prune_to(&self, earliest: BlockHeight) {
        self.inner.write().earliest_epoch_start = earliest;
    }
}

impl StateInner {
    fn epoch_of(&self, block: BlockHeight) -> Result<BlockHeight> {
        if block < self.first_epoch_start {
            return Err(StorageError::EpochNotFound(block));
        }
        let offset = (block - self.first_epoch_start) / self.epoch_blocks;
        Ok(self.first_epoch_start + offset * self.epoch_blocks)
    }

    fn latest_height(&self) -> BlockHeight {
        self.blocks.keys().next_back().copied().unwrap_or(0)
    }
}

impl EpochStore for InMemoryState {
    fn earliest_epoch_start(&self) -> BlockHeight {
        self.inner.read().earliest_epoch_start
    }

    fn current_epoch_start(&self) -> BlockHeight {
        let inner = self.inner.read();
        let latest = inner.latest_height();
        if latest < inner.first_epoch_start {
            return inner.first_epoch_start;
        }
        // latest >= first_epoch_start, so the lookup cannot fail
        inner
            .epoch_of(latest)
            .unwrap_or(inner.first_epoch_start)
    }

    fn next_epoch_start(&self, from: BlockHeight) -> Result<BlockHeight> {
        let inner = self.inner.read();
        let aligned = inner.epoch_of(from)?;
        Ok(aligned + inner.epoch_blocks)
    }

    fn previous_epoch_start(&self, of: BlockHeight) -> Result<BlockHeight> {
        let inner = self.inner.read();
        let aligned = inner.epoch_of(of)?;
        if aligned < inner.first_epoch_start + inner.epoch_blocks {
            return Err(StorageError::NoPreviousEpoch(of));
        }
        Ok(aligned - inner.epoch_blocks)
    }

    fn epoch_start_for_block(&self, block: BlockHeight) -> Result<(BlockHeight, EpochParams)> {
        let inner = self.inner.read();
        let start = inner.epoch_of(block)?;
        Ok((start, inner.params))
    }

    fn blocks_to_save(&self, _at_height: BlockHeight) -> Result<u64> {
        Ok(self.inner.read().params.blocks_to_save)
    }

    fn stake_entries(
        &self,
        epoch: BlockHeight,
        role: Role,
        chain_id: &ChainId,
    ) -> Option<Vec<StakeEntry>> {
        self.inner
            .read()
            .snapshots
            .get(&(epoch, role, chain_id.clone()))
            .cloned()
    }
}

impl SpecRegistry for InMemoryState {
    fn is_active(&self, chain_id: &ChainId) -> bool {
        self.inner
            .read()
            .specs
            .get(chain_id)
            .map(|spec| spec.enabled)
            .unwrap_or(false)
    }

    fn get(&self, chain_id: &ChainId) -> Option<SpecInfo> {
        self.inner.read().specs.get(chain_id).copied()
    }
}

impl BlockOracle for InMemoryState {
    fn latest_height(&self) -> BlockHeight {
        self.inner.read().latest_height()
    }

    fn block(&self, height: BlockHeight) -> Result<BlockInfo> {
        let inner = self.inner.read();
        let latest = inner.latest_height();
        if height == 0 || height > latest {
            return Err(StorageError::BlockUnavailable { height, latest });
        }
        inner
            .blocks
            .get(&height)
            .cloned()
            .ok_or(StorageError::BlockMissing(height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use relaymesh_types::Hash;

    fn block_at(second: i64) -> BlockInfo {
        BlockInfo {
            hash: Hash::compute(&second.to_be_bytes()),
            time: Utc.timestamp_opt(1_700_000_000 + second, 0).single().expect("valid ts"),
        }
    }

    fn state_with_blocks(n: u64) -> InMemoryState {
        let state = InMemoryState::new(0, 20, EpochParams::default());
        for height in 1..=n {
            state.insert_block(height, block_at(height as i64));
        }
        state
    }

    #[test]
    fn test_epoch_arithmetic() {
        let state = state_with_blocks(50);
        assert_eq!(state.current_epoch_start(), 40);
        assert_eq!(state.epoch_start_for_block(39).expect("covered").0, 20);
        assert_eq!(state.next_epoch_start(40).expect("scheduled"), 60);
        assert_eq!(state.previous_epoch_start(40).expect("exists"), 20);
    }

    #[test]
    fn test_no_previous_epoch_at_genesis() {
        let state = state_with_blocks(10);
        assert!(matches!(
            state.previous_epoch_start(0),
            Err(StorageError::NoPreviousEpoch(0))
        ));
    }

    #[test]
    fn test_epoch_before_schedule() {
        let state = InMemoryState::new(100, 20, EpochParams::default());
        assert!(matches!(
            state.epoch_start_for_block(99),
            Err(StorageError::EpochNotFound(99))
        ));
    }

    #[test]
    fn test_oracle_bounds() {
        let state = state_with_blocks(10);
        assert!(matches!(
            state.block(0),
            Err(StorageError::BlockUnavailable { height: 0, .. })
        ));
        assert!(matches!(
            state.block(11),
            Err(StorageError::BlockUnavailable { height: 11, .. })
        ));
        assert!(state.block(10).is_ok());
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let state = state_with_blocks(10);
        let chain = ChainId::new("ETH1");
        assert!(state.stake_entries(0, Role::Client, &chain).is_none());
        state.set_stake_entries(0, Role::Client, chain.clone(), vec![]);
        assert_eq!(state.stake_entries(0, Role::Client, &chain), Some(vec![]));
        assert!(state.stake_entries(0, Role::Provider, &chain).is_none());
    }

    #[test]
    fn test_spec_registry() {
        let state = state_with_blocks(1);
        let chain = ChainId::new("ETH1");
        assert!(!state.is_active(&chain));
        state.set_spec(
            chain.clone(),
            SpecInfo {
                enabled: true,
                block_last_updated: 7,
            },
        );
        assert!(state.is_active(&chain));
        state.set_spec(
            chain.clone(),
            SpecInfo {
                enabled: false,
                block_last_updated: 7,
            },
        );
        assert!(!state.is_active(&chain));
        assert_eq!(state.get(&chain).map(|s| s.block_last_updated), Some(7));
    }
}
