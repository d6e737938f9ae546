//! Service template: a unit of work's fixed demand, duration and payoff
//!
//! Grounded on `original_source/src/snsim/service.py`'s
//! `ServiceTemplate.allocate`/`deallocate` rollback behaviour, translated
//! to spec.md §4.2's explicit rules.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::SimError;
use crate::models::{ResourcePool, ServiceInstanceId};

/// Immutable-after-load description of one kind of work.
///
/// # Example
/// ```
/// use snsim_core::models::{ResourcePool, ServiceTemplate};
///
/// let mut pool = ResourcePool::new("P");
/// pool.set_capacity("CPU", 10);
///
/// let mut template = ServiceTemplate::new("A", "P", 2, 1.0, 0.0, 1);
/// template.set_demand("CPU", 5);
///
/// template.allocate(&mut pool, 1).unwrap();
/// assert_eq!(pool.level("CPU"), Some(5));
/// template.deallocate(&mut pool, 1);
/// assert_eq!(pool.level("CPU"), Some(0));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceTemplate {
    id: String,
    pool_id: String,
    demand: HashMap<String, i64>,
    ticks: u32,
    revenue: f64,
    penalty: f64,
    max_attempts: u32,
}

impl ServiceTemplate {
    /// Create a template with no declared demand yet; call
    /// [`Self::set_demand`] for each resource it needs.
    pub fn new(
        id: impl Into<String>,
        pool_id: impl Into<String>,
        ticks: u32,
        revenue: f64,
        penalty: f64,
        max_attempts: u32,
    ) -> Self {
        Self {
            id: id.into(),
            pool_id: pool_id.into(),
            demand: HashMap::new(),
            ticks,
            revenue,
            penalty,
            max_attempts,
        }
    }

    /// Declare a positive demand for `resource`.
    pub fn set_demand(&mut self, resource: impl Into<String>, amount: i64) {
        self.demand.insert(resource.into(), amount);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pool_id(&self) -> &str {
        &self.pool_id
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn revenue(&self) -> f64 {
        self.revenue
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Iterate the per-resource demand map.
    pub fn demand(&self) -> impl Iterator<Item = (&str, i64)> {
        self.demand.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Attempt to grant every demanded resource to `requester`. On the
    /// first failure, rolls back every resource already granted for this
    /// call and surfaces the original error.
    pub fn allocate(
        &self,
        pool: &mut ResourcePool,
        requester: ServiceInstanceId,
    ) -> Result<(), SimError> {
        let mut granted: Vec<(&str, i64)> = Vec::new();
        for (resource, amount) in &self.demand {
            match pool.allocate(requester, resource, *amount) {
                Ok(()) => granted.push((resource, *amount)),
                Err(err) => {
                    for (resource, amount) in granted {
                        let _ = pool.deallocate(requester, resource, amount);
                    }
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Release every demanded resource held by `requester`. Per-resource
    /// underrun failures are swallowed (best-effort release).
    pub fn deallocate(&self, pool: &mut ResourcePool, requester: ServiceInstanceId) {
        for (resource, amount) in &self.demand {
            let _ = pool.deallocate(requester, resource, *amount);
        }
    }
}
