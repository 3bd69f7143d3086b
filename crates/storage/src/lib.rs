//! Read-only chain-state interfaces for the RelayMesh pairing module.
//!
//! The pairing engine never owns chain state. It reads three narrow views,
//! each deterministic at a given committed height:
//!
//! - [`EpochStore`]: epoch boundaries, retention window, and sealed stake
//!   snapshots per `(epoch, role, chain_id)`
//! - [`SpecRegistry`]: which chain IDs are known and enabled
//! - [`BlockOracle`]: hash and timestamp of committed block headers
//!
//! Production nodes implement these traits over their own state machine.
//! [`memory::InMemoryState`] implements all three over in-process maps for
//! tests, simulation, and local tooling.

pub mod blocks;
pub mod epochs;
pub mod error;
pub mod memory;
pub mod specs;

pub use blocks::{BlockInfo, BlockOracle};
pub use epochs::EpochStore;
pub use error::{Result, StorageError};
pub use memory::InMemoryState;
pub use specs::SpecRegistry;
