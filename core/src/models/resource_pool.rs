//! Resource pool: named capacities with allocation bookkeeping
//!
//! Grounded on the allocate/deallocate/ledger pattern of
//! `original_source/src/snsim/resourcepool.py`, reworked into the
//! kernel's `Result`-based error style (spec.md §4.1).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::SimError;
use crate::models::ServiceInstanceId;

/// One ledger entry: `amount` of `resource` granted to `requester`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LedgerEntry {
    requester: ServiceInstanceId,
    resource: String,
    amount: i64,
}

/// A named capacity bucket holding zero or more resources.
///
/// Invariants (spec.md §3): for every resource, `0 <= level <= capacity`;
/// `level` always equals the sum of ledger amounts held for that
/// resource.
///
/// # Example
/// ```
/// use snsim_core::models::ResourcePool;
///
/// let mut pool = ResourcePool::new("P");
/// pool.set_capacity("CPU", 10);
/// pool.allocate(1, "CPU", 5).unwrap();
/// assert_eq!(pool.level("CPU"), Some(5));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePool {
    id: String,
    capacities: HashMap<String, i64>,
    levels: HashMap<String, i64>,
    ledger: Vec<LedgerEntry>,
}

impl ResourcePool {
    /// Create an empty pool with no declared resources.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            capacities: HashMap::new(),
            levels: HashMap::new(),
            ledger: Vec::new(),
        }
    }

    /// Pool identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Declare or overwrite a resource's capacity. Does not touch the
    /// current level even if it now exceeds the new capacity; the next
    /// `allocate` against that resource will simply fail until level
    /// drops back under it.
    pub fn set_capacity(&mut self, resource: &str, capacity: i64) {
        self.capacities.insert(resource.to_string(), capacity);
        self.levels.entry(resource.to_string()).or_insert(0);
    }

    /// Declared capacity for a resource, if any.
    pub fn capacity(&self, resource: &str) -> Option<i64> {
        self.capacities.get(resource).copied()
    }

    /// Current level for a resource (0 if the resource is unknown).
    pub fn level(&self, resource: &str) -> Option<i64> {
        self.levels.get(resource).copied()
    }

    /// All resource names this pool declares capacity for.
    pub fn resource_names(&self) -> impl Iterator<Item = &String> {
        self.capacities.keys()
    }

    /// Normalised level in `[0, 1]`, or `None` if capacity is zero or
    /// the resource is unknown.
    pub fn normalised_level(&self, resource: &str) -> Option<f64> {
        let capacity = self.capacities.get(resource).copied()?;
        if capacity <= 0 {
            return None;
        }
        let level = self.levels.get(resource).copied().unwrap_or(0);
        Some(level as f64 / capacity as f64)
    }

    /// Grant `amount` of `resource` to `requester`. Fails without
    /// mutating the pool if `level + amount` would exceed capacity.
    pub fn allocate(
        &mut self,
        requester: ServiceInstanceId,
        resource: &str,
        amount: i64,
    ) -> Result<(), SimError> {
        let capacity = self.capacities.get(resource).copied().unwrap_or(0);
        let level = self.levels.get(resource).copied().unwrap_or(0);
        if level + amount > capacity {
            return Err(SimError::ResourceCapacityExceeded {
                resource: resource.to_string(),
                requested: amount,
                available: capacity - level,
            });
        }
        self.levels.insert(resource.to_string(), level + amount);
        self.ledger.push(LedgerEntry {
            requester,
            resource: resource.to_string(),
            amount,
        });
        Ok(())
    }

    /// Release `amount` of `resource` previously granted to `requester`.
    ///
    /// Removes at most one matching ledger entry. If no entry matches
    /// the level is still decremented, unless that would drive it below
    /// zero, in which case the call fails and the pool is unchanged.
    pub fn deallocate(
        &mut self,
        requester: ServiceInstanceId,
        resource: &str,
        amount: i64,
    ) -> Result<(), SimError> {
        let level = self.levels.get(resource).copied().unwrap_or(0);
        if level - amount < 0 {
            return Err(SimError::ResourceCapacityUnderrun {
                resource: resource.to_string(),
                requested: amount,
                held: level,
            });
        }

        if let Some(pos) = self.ledger.iter().position(|entry| {
            entry.requester == requester && entry.resource == resource && entry.amount == amount
        }) {
            self.ledger.remove(pos);
        }

        self.levels.insert(resource.to_string(), level - amount);
        Ok(())
    }

    /// Zero every level and clear the ledger. Declared capacities are
    /// retained (the pool itself is never destroyed mid-run).
    pub fn reset(&mut self) {
        for level in self.levels.values_mut() {
            *level = 0;
        }
        self.ledger.clear();
    }

    #[cfg(test)]
    fn ledger_len(&self) -> usize {
        self.ledger.len()
    }
}
