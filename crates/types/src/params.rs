//! Governance-controlled pairing parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard upper bound on the pairing size.
///
/// The selection seed grows by a single iteration byte per pick, so more
/// than 256 picks would reuse seed material.
pub const MAX_SERVICERS_TO_PAIR: u64 = 256;

/// Governance-controlled knobs for an epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochParams {
    /// Grace blocks added past the nominal epoch boundary to smooth rotation.
    pub epoch_blocks_overlap: u64,
    /// Target pairing size per client per epoch.
    pub servicers_to_pair_count: u64,
    /// Retention window in blocks for historical epoch snapshots.
    pub blocks_to_save: u64,
}

impl Default for EpochParams {
    fn default() -> Self {
        Self {
            epoch_blocks_overlap: 5,
            servicers_to_pair_count: 3,
            blocks_to_save: 200,
        }
    }
}

impl EpochParams {
    /// Validate the parameter set.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.servicers_to_pair_count == 0 {
            return Err(ParamsError::ZeroPairCount);
        }
        if self.servicers_to_pair_count > MAX_SERVICERS_TO_PAIR {
            return Err(ParamsError::PairCountTooLarge(self.servicers_to_pair_count));
        }
        if self.blocks_to_save == 0 {
            return Err(ParamsError::ZeroRetention);
        }
        Ok(())
    }
}

/// Parameter validation errors.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// The pairing size must be positive.
    #[error("servicers_to_pair_count must be positive")]
    ZeroPairCount,

    /// The pairing size exceeds the seed-byte domain.
    #[error("servicers_to_pair_count {0} exceeds maximum {MAX_SERVICERS_TO_PAIR}")]
    PairCountTooLarge(u64),

    /// The retention window must be positive.
    #[error("blocks_to_save must be positive")]
    ZeroRetention,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        assert!(EpochParams::default().validate().is_ok());
    }

    #[test]
    fn test_params_bounds() {
        let mut params = EpochParams::default();
        params.servicers_to_pair_count = 0;
        assert!(matches!(
            params.validate(),
            Err(ParamsError::ZeroPairCount)
        ));

        params.servicers_to_pair_count = 257;
        assert!(matches!(
            params.validate(),
            Err(ParamsError::PairCountTooLarge(257))
        ));

        params.servicers_to_pair_count = 256;
        params.blocks_to_save = 0;
        assert!(matches!(params.validate(), Err(ParamsError::ZeroRetention)));
    }
}
