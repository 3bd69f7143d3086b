//! Candidate filtering and weighted-random subset selection.
//!
//! Both functions are pure: snapshot in, subset out. Determinism across
//! peers is the whole point, so the selection walks candidates in a fixed
//! direction and hashes a seed that depends only on consensus data.

use crate::error::{PairingError, Result};
use num_bigint::BigUint;
use num_traits::Zero;
use relaymesh_types::params::MAX_SERVICERS_TO_PAIR;
use relaymesh_types::{Address, BlockHeight, ChainId, Geolocation, Hash, StakeEntry};
use sha2::{Digest, Sha256};

/// Filter a provider snapshot down to candidates servable by `client_geolocation`.
///
/// A provider survives when its deadline has been reached at
/// `current_height` and its geolocation bitmap overlaps the client's. The
/// filter is stable: surviving candidates keep their snapshot order, which
/// [`select_weighted_subset`] depends on.
pub fn filter_candidates(
    snapshot: &[StakeEntry],
    current_height: BlockHeight,
    client_geolocation: Geolocation,
) -> Vec<StakeEntry> {
    snapshot
        .iter()
        .filter(|entry| {
            entry.active_at(current_height) && entry.geolocation.overlaps(client_geolocation)
        })
        .cloned()
        .collect()
}

/// Select `count` candidates weighted by stake, deterministically.
///
/// The seed is `epoch_hash ‖ chain_id ‖ client`; each completed iteration
/// appends its index as one byte before the next hash. Each pick takes
/// SHA-256 of the seed modulo the unselected stake mass and walks the
/// candidate list tail-first accumulating stakes until the running sum
/// exceeds the draw.
///
/// Snapshots are expected sorted ascending by stake so the tail-first walk
/// usually stops early; correctness does not depend on the order, but all
/// peers must walk the same direction.
///
/// Returns all candidates in snapshot order when `count` covers the whole
/// list, and fewer than `count` entries when the stake mass runs out.
pub fn select_weighted_subset(
    candidates: &[StakeEntry],
    client: &Address,
    epoch_hash: &Hash,
    chain_id: &ChainId,
    count: u64,
) -> Result<Vec<StakeEntry>> {
    if count > MAX_SERVICERS_TO_PAIR {
        return Err(PairingError::InvalidArgument(format!(
            "pair count {count} exceeds maximum {MAX_SERVICERS_TO_PAIR}"
        )));
    }
    if candidates.len() as u64 <= count {
        return Ok(candidates.to_vec());
    }
    debug_assert!(
        candidates
            .windows(2)
            .all(|pair| pair[0].stake.amount <= pair[1].stake.amount),
        "candidate snapshot expected sorted ascending by stake"
    );

    let denom = &candidates[0].stake.denom;
    let mut remaining = BigUint::zero();
    for candidate in candidates {
        if candidate.stake.denom != *denom {
            return Err(PairingError::InternalInvariant(format!(
                "mixed stake denominations in snapshot: {} vs {}",
                denom, candidate.stake.denom
            )));
        }
        remaining += &candidate.stake.amount;
    }
    if remaining.is_zero() {
        return Ok(Vec::new());
    }

    let mut seed =
        Vec::with_capacity(32 + chain_id.as_bytes().len() + client.as_bytes().len() + count as usize);
    seed.extend_from_slice(epoch_hash.as_bytes());
    seed.extend_from_slice(chain_id.as_bytes());
    seed.extend_from_slice(client.as_bytes());

    let mut used = vec![false; candidates.len()];
    let mut selected = Vec::with_capacity(count as usize);
    for iteration in 0..count {
        let digest = Sha256::digest(&seed);
        let draw = BigUint::from_bytes_be(&digest) % &remaining;

        let mut acc = BigUint::zero();
        for idx in (0..candidates.len()).rev() {
            if used[idx] {
                continue;
            }
            acc += &candidates[idx].stake.amount;
            if draw < acc {
                selected.push(candidates[idx].clone());
                remaining -= &candidates[idx].stake.amount;
                used[idx] = true;
                break;
            }
        }

        if selected.len() as u64 >= count {
            break;
        }
        if remaining.is_zero() {
            break;
        }
        seed.push(iteration as u8);
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaymesh_types::Coin;

    fn entry(tag: u8, stake: u128, deadline: BlockHeight, geolocation: u64) -> StakeEntry {
        StakeEntry {
            address: Address::from_bytes([tag; 20]),
            stake: Coin::new("umesh", stake),
            deadline,
            geolocation: Geolocation(geolocation),
        }
    }

    fn fixture() -> (Vec<StakeEntry>, Address, Hash, ChainId) {
        let candidates = vec![
            entry(1, 100, 0, 0xff),
            entry(2, 200, 0, 0xff),
            entry(3, 700, 0, 0xff),
        ];
        let mut hash_bytes = [0u8; 32];
        hash_bytes[31] = 0x01;
        (
            candidates,
            Address::from_bytes([0xaa; 20]),
            Hash::from_bytes(hash_bytes),
            ChainId::new("ETH1"),
        )
    }

    #[test]
    fn test_selection_deterministic() {
        let (candidates, client, hash, chain) = fixture();
        let first = select_weighted_subset(&candidates, &client, &hash, &chain, 2)
            .expect("selection succeeds");
        let second = select_weighted_subset(&candidates, &client, &hash, &chain, 2)
            .expect("selection succeeds");
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_ne!(first[0].address, first[1].address);
    }

    #[test]
    fn test_count_covers_whole_list() {
        let (candidates, client, hash, chain) = fixture();
        let selected = select_weighted_subset(&candidates, &client, &hash, &chain, 5)
            .expect("selection succeeds");
        assert_eq!(selected, candidates);
    }

    #[test]
    fn test_count_above_seed_domain_rejected() {
        let (candidates, client, hash, chain) = fixture();
        assert!(matches!(
            select_weighted_subset(&candidates, &client, &hash, &chain, 257),
            Err(PairingError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_mixed_denominations_rejected() {
        let (mut candidates, client, hash, chain) = fixture();
        candidates.push(StakeEntry {
            stake: Coin::new("uatom", 900),
            ..entry(4, 0, 0, 0xff)
        });
        assert!(matches!(
            select_weighted_subset(&candidates, &client, &hash, &chain, 2),
            Err(PairingError::InternalInvariant(_))
        ));
    }

    #[test]
    fn test_zero_stake_mass_selects_nothing() {
        let (client, hash, chain) = {
            let (_, client, hash, chain) = fixture();
            (client, hash, chain)
        };
        let candidates = vec![entry(1, 0, 0, 0xff), entry(2, 0, 0, 0xff), entry(3, 0, 0, 0xff)];
        let selected = select_weighted_subset(&candidates, &client, &hash, &chain, 2)
            .expect("selection succeeds");
        assert!(selected.is_empty());
    }

    #[test]
    fn test_filter_excludes_pending_deadline() {
        let snapshot = vec![entry(1, 100, 0, 0xff), entry(2, 900, 51, 0xff)];
        let filtered = filter_candidates(&snapshot, 50, Geolocation(0xff));
        assert_eq!(filtered, vec![entry(1, 100, 0, 0xff)]);
    }

    #[test]
    fn test_filter_requires_geolocation_overlap() {
        let snapshot = vec![entry(1, 100, 0, 0b0010), entry(2, 200, 0, 0b0100)];
        let filtered = filter_candidates(&snapshot, 50, Geolocation(0b0101));
        assert_eq!(filtered, vec![entry(2, 200, 0, 0b0100)]);
    }

    #[test]
    fn test_filter_is_stable() {
        let snapshot = vec![
            entry(1, 50, 0, 0xff),
            entry(2, 60, 99, 0xff),
            entry(3, 70, 0, 0x01),
            entry(4, 80, 0, 0xff),
        ];
        let filtered = filter_candidates(&snapshot, 50, Geolocation(0xff));
        let addresses: Vec<_> = filtered.iter().map(|e| e.address).collect();
        assert_eq!(
            addresses,
            vec![
                Address::from_bytes([1; 20]),
                Address::from_bytes([3; 20]),
                Address::from_bytes([4; 20]),
            ]
        );
    }
}
