//! Service-spec registry lookup.

use relaymesh_types::{ChainId, SpecInfo};

/// Read-only lookup over the service-spec registry.
pub trait SpecRegistry: Send + Sync {
    /// Whether `chain_id` is known and enabled.
    fn is_active(&self, chain_id: &ChainId) -> bool;

    /// Registry row for `chain_id`, if known.
    fn get(&self, chain_id: &ChainId) -> Option<SpecInfo>;
}
