//! The pairing engine.
//!
//! Stateless over chain state: every operation re-reads the epoch store,
//! spec registry, and block oracle, so identical committed state yields
//! identical results on every peer. The only mutable field is the advisory
//! block-time cache used by the next-epoch estimator.

use crate::epoch_time::BlockTimeCache;
use crate::error::{BlockRangeKind, IneligibleReason, PairingError, Result};
use crate::selection::{filter_candidates, select_weighted_subset};
use parking_lot::Mutex;
use relaymesh_storage::{BlockOracle, EpochStore, SpecRegistry};
use relaymesh_types::{Address, BlockHeight, ChainId, Role, StakeEntry};
use std::sync::Arc;
use tracing::{debug, error};

/// Position of a provider within a computed pairing.
///
/// The wire encoding uses `-2` for "not selected"; the translation happens
/// at the query boundary only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The provider is in the pairing at this position.
    Selected {
        /// Zero-based position in the selected list.
        index: u32,
    },
    /// The provider is not in the pairing.
    NotSelected,
}

/// Outcome of validating a past `(client, provider)` pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingVerdict {
    /// The client's stake entry at the validated epoch.
    pub client_entry: StakeEntry,
    /// Whether and where the provider appeared in the pairing.
    pub selection: Selection,
}

impl PairingVerdict {
    /// Whether the proposed pairing was valid.
    pub fn is_valid(&self) -> bool {
        matches!(self.selection, Selection::Selected { .. })
    }
}

/// Deterministic pairing engine over the three chain-state views.
pub struct PairingEngine {
    pub(crate) epochs: Arc<dyn EpochStore>,
    pub(crate) specs: Arc<dyn SpecRegistry>,
    pub(crate) blocks: Arc<dyn BlockOracle>,
    pub(crate) block_time_cache: Mutex<BlockTimeCache>,
}

impl PairingEngine {
    /// Create an engine over the given chain-state views.
    pub fn new(
        epochs: Arc<dyn EpochStore>,
        specs: Arc<dyn SpecRegistry>,
        blocks: Arc<dyn BlockOracle>,
    ) -> Self {
        Self {
            epochs,
            specs,
            blocks,
            block_time_cache: Mutex::new(BlockTimeCache::default()),
        }
    }

    /// Verify that `client` was eligible for pairing on `chain_id` at `block`.
    ///
    /// Returns the client's stake entry from the snapshot of the epoch
    /// covering `block`. Each precondition failure maps to a distinct error.
    pub fn verify_pairing_data(
        &self,
        chain_id: &ChainId,
        client: &Address,
        block: BlockHeight,
    ) -> Result<StakeEntry> {
        if !self.specs.is_active(chain_id) {
            return Err(PairingError::SpecInactive(chain_id.clone()));
        }

        let earliest = self.epochs.earliest_epoch_start();
        if block < earliest {
            return Err(PairingError::BlockOutOfRange {
                block,
                kind: BlockRangeKind::BeforeRetention { earliest },
            });
        }

        let (requested_epoch, _) = self.epochs.epoch_start_for_block(block)?;
        let current_epoch = self.epochs.current_epoch_start();
        if requested_epoch > current_epoch {
            return Err(PairingError::BlockOutOfRange {
                block,
                kind: BlockRangeKind::FutureEpoch {
                    requested: requested_epoch,
                    current: current_epoch,
                },
            });
        }

        let blocks_to_save = self.epochs.blocks_to_save(self.blocks.latest_height())?;
        if requested_epoch + blocks_to_save < current_epoch {
            return Err(PairingError::BlockOutOfRange {
                block,
                kind: BlockRangeKind::OutsideRetention {
                    requested: requested_epoch,
                    current: current_epoch,
                    blocks_to_save,
                },
            });
        }

        let entries = self
            .epochs
            .stake_entries(requested_epoch, Role::Client, chain_id)
            .ok_or_else(|| PairingError::NoSnapshot {
                role: Role::Client,
                chain_id: chain_id.clone(),
                epoch: requested_epoch,
            })?;

        for entry in entries {
            if entry.address == *client {
                // deadline == block counts as eligible; strict > excludes
                if entry.deadline > block {
                    return Err(PairingError::ClientIneligible {
                        client: *client,
                        chain_id: chain_id.clone(),
                        block,
                        reason: IneligibleReason::NotYetActive {
                            deadline: entry.deadline,
                        },
                    });
                }
                return Ok(entry);
            }
        }
        Err(PairingError::ClientIneligible {
            client: *client,
            chain_id: chain_id.clone(),
            block,
            reason: IneligibleReason::NotStaked,
        })
    }

    /// Compute the pairing for `client` on `chain_id` at the current epoch.
    pub fn pairing_for_client(
        &self,
        chain_id: &ChainId,
        client: &Address,
    ) -> Result<Vec<StakeEntry>> {
        let current_epoch = self.epochs.current_epoch_start();
        let client_entry = self.verify_pairing_data(chain_id, client, current_epoch)?;

        let providers = self
            .epochs
            .stake_entries(current_epoch, Role::Provider, chain_id)
            .ok_or_else(|| PairingError::NoSnapshot {
                role: Role::Provider,
                chain_id: chain_id.clone(),
                epoch: current_epoch,
            })?;

        self.calculate_pairing(
            &providers,
            client,
            current_epoch,
            chain_id,
            client_entry.geolocation,
        )
    }

    /// Validate a past `(client, provider)` pairing at `block`.
    ///
    /// Recomputes the filtering and selection for the epoch covering
    /// `block` and looks the provider up in the result.
    pub fn validate_pairing(
        &self,
        chain_id: &ChainId,
        client: &Address,
        provider: &Address,
        block: BlockHeight,
    ) -> Result<PairingVerdict> {
        let (epoch_start, _) = self.epochs.epoch_start_for_block(block)?;
        let client_entry = self.verify_pairing_data(chain_id, client, epoch_start)?;

        let providers = self
            .epochs
            .stake_entries(epoch_start, Role::Provider, chain_id)
            .ok_or_else(|| PairingError::NoSnapshot {
                role: Role::Provider,
                chain_id: chain_id.clone(),
                epoch: epoch_start,
            })?;

        let selected = self.calculate_pairing(
            &providers,
            client,
            epoch_start,
            chain_id,
            client_entry.geolocation,
        )?;

        let selection = match selected.iter().position(|entry| entry.address == *provider) {
            Some(index) => Selection::Selected {
                index: index as u32,
            },
            None => Selection::NotSelected,
        };
        Ok(PairingVerdict {
            client_entry,
            selection,
        })
    }

    /// Filter the provider snapshot and select the weighted subset for one
    /// client at one epoch.
    fn calculate_pairing(
        &self,
        providers: &[StakeEntry],
        client: &Address,
        epoch_start: BlockHeight,
        chain_id: &ChainId,
        client_geolocation: relaymesh_types::Geolocation,
    ) -> Result<Vec<StakeEntry>> {
        let current_height = self.blocks.latest_height();
        if epoch_start > current_height {
            error!(
                epoch_start,
                current_height, "epoch start recorded past the committed head"
            );
            return Err(PairingError::InternalInvariant(format!(
                "epoch start {epoch_start} is past the committed head {current_height}"
            )));
        }

        let candidates = filter_candidates(providers, current_height, client_geolocation);
        let (_, params) = self.epochs.epoch_start_for_block(epoch_start)?;
        let epoch_hash = self.blocks.block(epoch_start)?.hash;

        debug!(
            chain = %chain_id,
            client = %client,
            epoch = epoch_start,
            candidates = candidates.len(),
            count = params.servicers_to_pair_count,
            "selecting pairing subset"
        );
        select_weighted_subset(
            &candidates,
            client,
            &epoch_hash,
            chain_id,
            params.servicers_to_pair_count,
        )
    }
}
