//! Scenario catalogue and the XML scenario file format
//!
//! A `Scenario` is the static catalogue a run is built from: resource
//! pools, service/job templates and customers, loaded once from a file
//! (spec.md §6) and never destroyed mid-run. The `Scenario` exclusively
//! owns these entities (spec.md §3, "Ownership summary"); the engine
//! separately owns the active job set built on top of them.

pub mod loader;
pub mod signature;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Customer, CustomerId, JobTemplate, ResourcePool, ServiceTemplate, TemplateId};

/// The full static catalogue for one simulation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    pub pools: HashMap<String, ResourcePool>,
    pub service_templates: HashMap<TemplateId, ServiceTemplate>,
    pub job_templates: HashMap<TemplateId, JobTemplate>,
    pub customers: HashMap<CustomerId, Customer>,

    /// Declared order of job template ids, used by `JobGenerator` for
    /// deterministic uniform sampling (never iterate a `HashMap`'s keys
    /// for that purpose — its order is not a stable function of input).
    pub job_template_ids: Vec<TemplateId>,
    /// Declared order of customer ids; same rationale.
    pub customer_ids: Vec<CustomerId>,

    /// The scenario file's `Seed` parameter, hashed by
    /// `RngManager::seed_from_str` to derive the run's PRNG seed.
    pub seed: String,
    /// The scenario file's `GoldWeight` parameter.
    pub gold_weight: f64,
}

impl Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero every pool's levels and ledger. Templates, customers and
    /// parameters are immutable after load and untouched by reset.
    pub fn reset(&mut self) {
        for pool in self.pools.values_mut() {
            pool.reset();
        }
    }
}
