//! Classified-penalty-based priority: gold customers weighted higher
//!
//! Grounded on `original_source/src/snsim/policy.py`'s
//! `ClassifiedPenaltyBasedPolicy` (spec.md §4.5).

use super::penalty;

/// The penalty-based key, multiplied by the customer's `GoldWeight` when
/// gold, by `1.0` otherwise (`Customer::weight`).
pub(super) fn key(revenue: f64, penalty_value: f64, progress: f64, customer_weight: f64) -> f64 {
    penalty::key(revenue, penalty_value, progress) * customer_weight
}
