//! Ratio-based priority: mean demand-to-capacity ratio
//!
//! Grounded on `original_source/src/snsim/policy.py`'s
//! `RatioBasedPolicy` (spec.md §4.5).

use crate::models::{ResourcePool, ServiceTemplate};

/// Mean over the service's demanded resources of `demand / capacity`.
/// Resources with undefined capacity in `pool` are skipped.
pub(super) fn key(template: &ServiceTemplate, pool: &ResourcePool) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for (resource, amount) in template.demand() {
        if let Some(capacity) = pool.capacity(resource) {
            if capacity > 0 {
                total += amount as f64 / capacity as f64;
                count += 1;
            }
        }
    }
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}
