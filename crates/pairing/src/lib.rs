//! Deterministic client-provider pairing engine.
//!
//! Given the on-chain set of staked providers and a requesting client, the
//! engine selects a bounded provider subset for the current epoch, verifies
//! proposed pairings against past epochs, and estimates the wall-clock time
//! until the next rotation.
//!
//! Every peer must compute byte-identical pairings from identical state:
//! selection is a pure function of the sealed snapshot, the client address,
//! the chain ID, and the epoch-start block hash. Nothing on the selection
//! path reads the wall clock or any local randomness; the only time-aware
//! component is the [next-epoch estimator](engine::PairingEngine::time_to_next_pairing),
//! whose output is observational and never feeds back into selection.

pub mod engine;
pub mod epoch_time;
pub mod error;
pub mod query;
pub mod selection;

pub use engine::{PairingEngine, PairingVerdict, Selection};
pub use error::{BlockRangeKind, IneligibleReason, PairingError, Result};
pub use query::{
    GetPairingRequest, GetPairingResponse, QueryError, VerifyPairingRequest,
    VerifyPairingResponse, INVALID_INDEX,
};
pub use selection::{filter_candidates, select_weighted_subset};
