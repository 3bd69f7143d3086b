//! Next-epoch time estimation.
//!
//! Estimates seconds until the next pairing rotation as
//! `(next_epoch_start + overlap - current_height) * average_block_time`,
//! with the average refreshed at most once per epoch from sampled block
//! timestamps. The estimate is observational: it is returned to callers
//! and never flows into the deterministic pairing path, which is why
//! floating-point seconds are acceptable here.

use crate::engine::PairingEngine;
use crate::error::{PairingError, Result};
use relaymesh_types::BlockHeight;

/// Number of timestamp samples targeted per epoch.
pub(crate) const EPOCH_BLOCKS_DIVIDER: u64 = 5;

/// Smallest distance in blocks between two samples.
pub(crate) const MIN_SAMPLE_STEP: u64 = 1;

/// Cached block-time computation, keyed by the epoch it was computed in.
///
/// The cache is advisory. A stale read returns the previous epoch's value,
/// which is sound for an observational estimate; a failed recomputation
/// leaves the cache untouched.
#[derive(Debug, Default)]
pub(crate) struct BlockTimeCache {
    latest_epoch_calculated: Option<BlockHeight>,
    seconds_per_block: f64,
}

impl PairingEngine {
    /// Estimated seconds until the next pairing rotation.
    pub fn time_to_next_pairing(&self) -> Result<u64> {
        let current_epoch = self.epochs.current_epoch_start();

        let cached = {
            let cache = self.block_time_cache.lock();
            match cache.latest_epoch_calculated {
                Some(epoch) if epoch == current_epoch => Some(cache.seconds_per_block),
                _ => None,
            }
        };
        let average_block_time = match cached {
            Some(value) => value,
            None => {
                let value = self.average_block_time(current_epoch)?;
                let mut cache = self.block_time_cache.lock();
                cache.latest_epoch_calculated = Some(current_epoch);
                cache.seconds_per_block = value;
                value
            }
        };

        let next_epoch = self.epochs.next_epoch_start(current_epoch)?;
        let (_, params) = self.epochs.epoch_start_for_block(current_epoch)?;
        let blocks_left =
            (next_epoch + params.epoch_blocks_overlap).saturating_sub(self.blocks.latest_height());
        Ok(blocks_left.saturating_mul(average_block_time as u64))
    }

    /// Minimum observed seconds-per-block across the previous epoch.
    ///
    /// Samples every `epoch_blocks / EPOCH_BLOCKS_DIVIDER` blocks between
    /// the previous and current epoch starts and keeps the smallest
    /// per-block delta; a single slow stretch therefore cannot inflate the
    /// estimate. With a single-block epoch there are no interior samples
    /// and the estimate is zero.
    fn average_block_time(&self, epoch: BlockHeight) -> Result<f64> {
        let prev_epoch = self.epochs.previous_epoch_start(epoch)?;
        if epoch < prev_epoch {
            return Err(PairingError::EpochTimeDegenerate(format!(
                "previous epoch start {prev_epoch} is past current epoch start {epoch}"
            )));
        }
        let epoch_blocks = epoch - prev_epoch;
        if epoch_blocks < MIN_SAMPLE_STEP {
            return Err(PairingError::EpochTimeDegenerate(format!(
                "epoch spans {epoch_blocks} blocks, need at least {MIN_SAMPLE_STEP}"
            )));
        }
        let sample_step = if epoch_blocks > EPOCH_BLOCKS_DIVIDER {
            epoch_blocks / EPOCH_BLOCKS_DIVIDER
        } else {
            MIN_SAMPLE_STEP
        };

        // The oracle cannot serve block 0.
        let start = prev_epoch.max(1);
        let mut prev_time = self.blocks.block(start)?.time;
        let mut minimum = 0.0_f64;
        let mut block = start + sample_step;
        while block < epoch {
            let time = self.blocks.block(block)?.time;
            let delta =
                (time - prev_time).num_milliseconds() as f64 / 1000.0 / sample_step as f64;
            if delta <= 0.0 {
                return Err(PairingError::EpochTimeDegenerate(format!(
                    "non-positive block time between blocks {} and {block}",
                    block - sample_step
                )));
            }
            if minimum == 0.0 || delta < minimum {
                minimum = delta;
            }
            prev_time = time;
            block += sample_step;
        }
        Ok(minimum)
    }
}
