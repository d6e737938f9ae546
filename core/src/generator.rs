//! Job generator: produces new jobs per tick from a fixed demand profile
//!
//! Grounded on `original_source/src/snsim/generator.py`'s
//! `SineJobGenerator`, with the sine formula spec.md §4.6 fixes
//! (differs from the source; the spec is authoritative). Random
//! selection is injected (spec.md §9, "Global PRNG vs. injected
//! source") so `reset` plus a fresh `RngManager` reproduces the same
//! job stream.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{CustomerId, JobId, JobInstance, JobTemplate, ServiceInstanceId, ServiceTemplate, TemplateId};
use crate::rng::RngManager;

/// Produces `newJobs(tick)` for the engine's Generate phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobGenerator {
    next_job_id: JobId,
}

impl JobGenerator {
    pub fn new() -> Self {
        Self { next_job_id: 0 }
    }

    /// Zero the job-identifier counter. Does not touch the RNG; the
    /// caller swaps in a freshly-seeded `RngManager` for a reproducible
    /// reset (spec.md §4.6).
    pub fn reset(&mut self) {
        self.next_job_id = 0;
    }

    /// `n(t) = max(0, floor((sin(0.05 * t) + 1) * 2.5))`.
    pub fn demand(tick: usize) -> usize {
        let raw = ((0.05 * tick as f64).sin() + 1.0) * 2.5;
        raw.floor().max(0.0) as usize
    }

    /// Sample `demand(tick)` jobs by drawing a job template and a
    /// customer uniformly (with replacement) from the scenario's
    /// catalogues, in their declared order — never from a `HashMap`'s
    /// iteration order, which is not guaranteed stable across runs.
    pub fn new_jobs(
        &mut self,
        tick: usize,
        job_template_ids: &[TemplateId],
        customer_ids: &[CustomerId],
        job_templates: &HashMap<TemplateId, JobTemplate>,
        service_templates: &HashMap<TemplateId, ServiceTemplate>,
        rng: &mut RngManager,
        next_service_id: &mut ServiceInstanceId,
    ) -> Vec<JobInstance> {
        let n = Self::demand(tick);
        if n == 0 || job_template_ids.is_empty() || customer_ids.is_empty() {
            return Vec::new();
        }

        let mut jobs = Vec::with_capacity(n);
        for _ in 0..n {
            let template_id = rng.choice(job_template_ids);
            let customer_id = rng.choice(customer_ids);
            let job_template = &job_templates[template_id];

            let id = self.next_job_id;
            self.next_job_id += 1;

            jobs.push(JobInstance::new(
                id,
                customer_id.clone(),
                job_template,
                service_templates,
                next_service_id,
            ));
        }
        jobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demand_is_never_negative() {
        for t in 0..200 {
            let _ = JobGenerator::demand(t); // usize, always >= 0; exercised for panics
        }
    }

    #[test]
    fn demand_matches_profile_at_known_ticks() {
        assert_eq!(JobGenerator::demand(0), 2); // floor((0+1)*2.5) = 2
    }

    #[test]
    fn reset_zeroes_job_id_counter() {
        let mut pool_templates = HashMap::new();
        let mut service_a = ServiceTemplate::new("A", "P", 1, 1.0, 0.0, 1);
        service_a.set_demand("CPU", 1);
        let mut service_templates = HashMap::new();
        service_templates.insert("A".to_string(), service_a);
        pool_templates.insert(
            "J1".to_string(),
            JobTemplate::new("J1", vec![vec!["A".to_string()]], 1.0, 0.0),
        );

        let mut generator = JobGenerator::new();
        let mut rng = RngManager::new(42);
        let mut next_service_id = 0u64;
        let job_template_ids = vec!["J1".to_string()];
        let customer_ids = vec!["C1".to_string()];

        let jobs = generator.new_jobs(
            0,
            &job_template_ids,
            &customer_ids,
            &pool_templates,
            &service_templates,
            &mut rng,
            &mut next_service_id,
        );
        assert!(!jobs.is_empty());
        generator.reset();
        assert_eq!(generator.next_job_id, 0);
    }
}
