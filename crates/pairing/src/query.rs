//! Query surface consumed by the RPC layer.
//!
//! These methods validate request input, run the engine, and translate
//! internal results into wire-friendly shapes. Envelope serialization and
//! transport stay outside this crate; the RPC layer maps [`QueryError`]
//! variants onto its own status codes.

use crate::engine::{PairingEngine, Selection};
use crate::error::PairingError;
use relaymesh_types::{Address, BlockHeight, ChainId, StakeEntry};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Wire sentinel meaning "provider not in the pairing".
pub const INVALID_INDEX: i64 = -2;

/// Request for the current pairing of a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPairingRequest {
    /// Chain to pair on.
    pub chain_id: ChainId,
    /// Client address, hex text form.
    pub client: String,
}

/// A client's current pairing plus rotation metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPairingResponse {
    /// Selected providers, in selection order.
    pub providers: Vec<StakeEntry>,
    /// Start block of the current epoch.
    pub current_epoch: BlockHeight,
    /// Estimated seconds until the next rotation; zero when the estimator
    /// could not produce a value.
    pub time_left_to_next_pairing: u64,
    /// Block at which the chain's spec last changed.
    pub spec_last_updated_block: BlockHeight,
}

/// Request to validate a past pairing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPairingRequest {
    /// Chain the pairing was made on.
    pub chain_id: ChainId,
    /// Client address, hex text form.
    pub client: String,
    /// Provider address, hex text form.
    pub provider: String,
    /// Block at which the pairing was claimed.
    pub block: BlockHeight,
}

/// Verdict on a past pairing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPairingResponse {
    /// Whether the provider was part of the client's pairing.
    pub valid: bool,
    /// Position of the provider in the pairing, or [`INVALID_INDEX`].
    pub index: i64,
    /// The client's stake entry at the validated epoch.
    pub client_stake: Option<StakeEntry>,
}

/// Errors surfaced to the RPC layer.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The request is malformed (missing or empty fields).
    #[error("invalid request: {0}")]
    InvalidArgument(String),

    /// An address field failed to parse.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Chain ID unknown or disabled.
    #[error("spec {0} not found or not enabled")]
    SpecInactive(ChainId),

    /// The pairing computation failed.
    #[error("pairing computation failed: {0}")]
    PairingCompute(PairingError),

    /// The epoch time estimation failed.
    #[error("epoch time estimation failed: {0}")]
    EpochTime(PairingError),

    /// Internal fault; the host should treat this as fatal.
    #[error("internal error: {0}")]
    Internal(String),
}

impl QueryError {
    /// Stable code string for the RPC layer.
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidArgument(_) => "InvalidArgument",
            QueryError::InvalidAddress(_) => "InvalidAddress",
            QueryError::SpecInactive(_) => "SpecInactive",
            QueryError::PairingCompute(_) => "PairingCompute",
            QueryError::EpochTime(_) => "EpochTime",
            QueryError::Internal(_) => "Internal",
        }
    }
}

impl From<PairingError> for QueryError {
    fn from(err: PairingError) -> Self {
        match err {
            PairingError::InvalidArgument(msg) => QueryError::InvalidArgument(msg),
            PairingError::SpecInactive(chain_id) => QueryError::SpecInactive(chain_id),
            PairingError::InternalInvariant(msg) => QueryError::Internal(msg),
            PairingError::EpochTimeDegenerate(_) => QueryError::EpochTime(err),
            other => QueryError::PairingCompute(other),
        }
    }
}

impl PairingEngine {
    /// Current pairing for a client, with rotation metadata.
    ///
    /// Estimator failure does not fail the query: the response reports zero
    /// seconds and the failure is logged.
    pub fn get_pairing(
        &self,
        request: &GetPairingRequest,
    ) -> std::result::Result<GetPairingResponse, QueryError> {
        if request.chain_id.is_empty() {
            return Err(QueryError::InvalidArgument("empty chain id".to_string()));
        }
        let client: Address = request
            .client
            .parse()
            .map_err(|_| QueryError::InvalidAddress(request.client.clone()))?;
        if !self.specs.is_active(&request.chain_id) {
            return Err(QueryError::SpecInactive(request.chain_id.clone()));
        }

        let providers = self.pairing_for_client(&request.chain_id, &client)?;

        let time_left_to_next_pairing = match self.time_to_next_pairing() {
            Ok(seconds) => seconds,
            Err(err) => {
                warn!(error = %err, "next-pairing time estimation failed, reporting zero");
                0
            }
        };

        let current_epoch = self.epochs.current_epoch_start();
        let spec = self
            .specs
            .get(&request.chain_id)
            .ok_or_else(|| QueryError::SpecInactive(request.chain_id.clone()))?;

        Ok(GetPairingResponse {
            providers,
            current_epoch,
            time_left_to_next_pairing,
            spec_last_updated_block: spec.block_last_updated,
        })
    }

    /// Validate a past `(client, provider)` pairing.
    pub fn verify_pairing(
        &self,
        request: &VerifyPairingRequest,
    ) -> std::result::Result<VerifyPairingResponse, QueryError> {
        if request.chain_id.is_empty() {
            return Err(QueryError::InvalidArgument("empty chain id".to_string()));
        }
        let client: Address = request
            .client
            .parse()
            .map_err(|_| QueryError::InvalidAddress(request.client.clone()))?;
        let provider: Address = request
            .provider
            .parse()
            .map_err(|_| QueryError::InvalidAddress(request.provider.clone()))?;

        let verdict =
            self.validate_pairing(&request.chain_id, &client, &provider, request.block)?;
        let index = match verdict.selection {
            Selection::Selected { index } => index as i64,
            Selection::NotSelected => INVALID_INDEX,
        };
        Ok(VerifyPairingResponse {
            valid: verdict.is_valid(),
            index,
            client_stake: Some(verdict.client_entry),
        })
    }

    /// Estimated seconds until the next rotation, as a standalone query.
    pub fn next_pairing_time(&self) -> std::result::Result<u64, QueryError> {
        self.time_to_next_pairing().map_err(QueryError::from)
    }
}
