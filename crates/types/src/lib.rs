//! Core types for the RelayMesh pairing module.
//!
//! This crate provides the fundamental data structures shared across the
//! pairing engine and the chain-state interfaces: account addresses, stake
//! entries and their coins, geolocation bitmaps, chain identifiers, epoch
//! parameters, and the SHA-256 hash type used for selection seeding.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

pub mod address;
pub mod chain;
pub mod coin;
pub mod geolocation;
pub mod hash;
pub mod params;
pub mod stake;

pub use address::{Address, AddressError};
pub use chain::{ChainId, SpecInfo};
pub use coin::{Coin, CoinError};
pub use geolocation::Geolocation;
pub use hash::Hash;
pub use params::EpochParams;
pub use stake::{Role, StakeEntry};

/// Committed block ordinal.
///
/// Heights are plain `u64` at the storage layer; block 0 is never committed
/// and is rejected by the block oracle.
pub type BlockHeight = u64;
