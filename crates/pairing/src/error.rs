//! Pairing engine errors.
//!
//! The error set is closed. Everything except [`PairingError::InternalInvariant`]
//! is recoverable and returned to the caller; `InternalInvariant` signals a
//! data-integrity fault the consensus host is expected to fail-stop on.

use relaymesh_storage::StorageError;
use relaymesh_types::{Address, BlockHeight, ChainId, Role};
use thiserror::Error;

/// Errors produced by the pairing engine.
#[derive(Debug, Error)]
pub enum PairingError {
    /// Malformed request input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Chain ID unknown or disabled in the spec registry.
    #[error("spec {0} not found or not enabled")]
    SpecInactive(ChainId),

    /// Requested block falls outside the usable epoch range.
    #[error("block {block} out of range: {kind}")]
    BlockOutOfRange {
        /// The requested block.
        block: BlockHeight,
        /// Which range precondition failed.
        kind: BlockRangeKind,
    },

    /// No sealed snapshot for the role at the epoch.
    #[error("no {role} snapshot for chain {chain_id} at epoch {epoch}")]
    NoSnapshot {
        /// Snapshot role.
        role: Role,
        /// Chain the snapshot was requested for.
        chain_id: ChainId,
        /// Epoch start block.
        epoch: BlockHeight,
    },

    /// Client cannot be paired at the requested block.
    #[error("client {client} ineligible for chain {chain_id} at block {block}: {reason}")]
    ClientIneligible {
        /// The client address.
        client: Address,
        /// Chain the pairing was requested for.
        chain_id: ChainId,
        /// Block the eligibility was checked at.
        block: BlockHeight,
        /// Why the client is ineligible.
        reason: IneligibleReason,
    },

    /// A chain-state view rejected a read.
    #[error("chain state unavailable: {0}")]
    OracleUnavailable(#[from] StorageError),

    /// The epoch timing data cannot produce a block-time estimate.
    #[error("degenerate epoch timing: {0}")]
    EpochTimeDegenerate(String),

    /// Stored state failed an integrity check; non-recoverable.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

/// Which block-range precondition failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlockRangeKind {
    /// The block precedes the earliest retained epoch.
    #[error("before retention, earliest saved epoch starts at {earliest}")]
    BeforeRetention {
        /// Earliest retained epoch start.
        earliest: BlockHeight,
    },

    /// The block's epoch is ahead of the current epoch.
    #[error("epoch {requested} is ahead of current epoch {current}")]
    FutureEpoch {
        /// Epoch of the requested block.
        requested: BlockHeight,
        /// Current epoch start.
        current: BlockHeight,
    },

    /// The block's epoch fell out of the retention window.
    #[error("epoch {requested} trails current epoch {current} by more than {blocks_to_save} blocks")]
    OutsideRetention {
        /// Epoch of the requested block.
        requested: BlockHeight,
        /// Current epoch start.
        current: BlockHeight,
        /// Retention window in blocks.
        blocks_to_save: u64,
    },
}

/// Why a client failed eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IneligibleReason {
    /// No stake entry for the client in the epoch snapshot.
    #[error("not staked")]
    NotStaked,

    /// The stake entry exists but its deadline has not been reached.
    #[error("stake entry not yet active, deadline {deadline}")]
    NotYetActive {
        /// Block at which the entry becomes effective.
        deadline: BlockHeight,
    },
}

/// Result type for pairing operations.
pub type Result<T> = std::result::Result<T, PairingError>;
