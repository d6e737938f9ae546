//! Scheduling policy: orders pending services for the schedule phase
//!
//! Grounded on `backend/src/policy/mod.rs`'s trait-plus-enum shape
//! (a `CashManagerPolicy` capability the orchestrator holds without
//! branching on its concrete kind); here a single [`Policy`] enum plays
//! that role since spec.md §9 allows either a trait or a tagged variant
//! and the six concrete key formulas are small enough to dispatch on
//! directly (spec.md §4.5).

mod classified_penalty;
mod failed_attempts;
mod fcfs;
mod penalty;
mod ratio;
mod revenue;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Customer, CustomerId, JobInstance, JobTemplate, ResourcePool, ServiceInstanceId, ServiceTemplate, TemplateId};

/// Read-only catalogues a [`Policy`] needs to compute priority keys.
pub struct PolicyContext<'a> {
    pub job_templates: &'a HashMap<TemplateId, JobTemplate>,
    pub service_templates: &'a HashMap<TemplateId, ServiceTemplate>,
    pub customers: &'a HashMap<CustomerId, Customer>,
    pub pools: &'a HashMap<String, ResourcePool>,
}

/// The six concrete scheduling policies of spec.md §4.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    Fcfs,
    RatioBased,
    RevenueBased,
    PenaltyBased,
    ClassifiedPenaltyBased,
    FailedAttemptsBased,
}

impl Policy {
    /// Parse a CLI/config policy name. Unknown names are rejected by
    /// the caller (the scenario loader / CLI), not here.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fcfs" => Some(Self::Fcfs),
            "ratio" => Some(Self::RatioBased),
            "revenue" => Some(Self::RevenueBased),
            "penalty" => Some(Self::PenaltyBased),
            "classified-penalty" => Some(Self::ClassifiedPenaltyBased),
            "failed-attempts" => Some(Self::FailedAttemptsBased),
            _ => None,
        }
    }

    /// Order the union of every active job's pending services.
    ///
    /// Ties are broken by `sprintf("%012.2f %04d %s", key, job.id,
    /// service_identity)`, sorted descending — except FCFS, which sorts
    /// its own ascending key directly (spec.md §4.5, §9).
    pub fn prioritize(
        &self,
        active_jobs: &[JobInstance],
        ctx: &PolicyContext,
    ) -> Vec<ServiceInstanceId> {
        let mut entries: Vec<(String, ServiceInstanceId)> = Vec::new();

        for job in active_jobs {
            for service in job.pending_services() {
                let sort_key = match self {
                    Policy::Fcfs => fcfs::sort_key(job.id(), service),
                    _ => {
                        let value = self.priority_value(job, service, ctx);
                        format!("{:012.2} {:04} {}", value, job.id(), service.identity())
                    }
                };
                entries.push((sort_key, service.id()));
            }
        }

        match self {
            Policy::Fcfs => entries.sort_by(|a, b| a.0.cmp(&b.0)),
            _ => entries.sort_by(|a, b| b.0.cmp(&a.0)),
        }

        entries.into_iter().map(|(_, id)| id).collect()
    }

    fn priority_value(
        &self,
        job: &JobInstance,
        service: &crate::models::ServiceInstance,
        ctx: &PolicyContext,
    ) -> f64 {
        let job_template = ctx
            .job_templates
            .get(job.template_id())
            .expect("job references a known job template");
        let service_template = ctx
            .service_templates
            .get(service.template_id())
            .expect("service references a known service template");
        let progress = job.progress(job_template);

        match self {
            Policy::Fcfs => unreachable!("FCFS uses sort_key directly"),
            Policy::RatioBased => {
                let pool = ctx
                    .pools
                    .get(service_template.pool_id())
                    .expect("service template references a known pool");
                ratio::key(service_template, pool)
            }
            Policy::RevenueBased => revenue::key(job_template.revenue(), progress),
            Policy::PenaltyBased => penalty::key(job_template.revenue(), job_template.penalty(), progress),
            Policy::ClassifiedPenaltyBased => {
                let customer = ctx
                    .customers
                    .get(job.customer_id())
                    .expect("job references a known customer");
                classified_penalty::key(
                    job_template.revenue(),
                    job_template.penalty(),
                    progress,
                    customer.weight(),
                )
            }
            Policy::FailedAttemptsBased => {
                failed_attempts::key(service_template.max_attempts(), service.attempts())
            }
        }
    }
}
