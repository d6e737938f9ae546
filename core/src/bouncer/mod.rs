//! Admission control: decides which newly generated jobs enter the
//! active set (spec.md §4.7)

mod tendency;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{JobInstance, ResourcePool};

pub use tendency::TendencyBouncer;

/// One line of the bouncer trace file: `tick basevalue tendency newJobs
/// derivative quota` (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BouncerTraceEntry {
    pub tick: usize,
    pub base_value: f64,
    pub tendency: f64,
    pub new_jobs: usize,
    pub derivative: f64,
    pub quota: f64,
}

/// Admission controller, configured as either the tendency-based
/// estimator or its observer-only ("null") counterpart. Both produce
/// one trace line per tick regardless of job count (spec.md §9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Bouncer {
    Null(TendencyBouncer),
    Tendency(TendencyBouncer),
}

impl Bouncer {
    pub fn null() -> Self {
        Self::Null(TendencyBouncer::observer_only())
    }

    pub fn tendency() -> Self {
        Self::Tendency(TendencyBouncer::new())
    }

    pub fn reset(&mut self) {
        match self {
            Bouncer::Null(b) | Bouncer::Tendency(b) => b.reset(),
        }
    }

    pub fn filter_jobs(
        &mut self,
        tick: usize,
        jobs: Vec<JobInstance>,
        active_service_count: usize,
        pools: &HashMap<String, ResourcePool>,
    ) -> (Vec<JobInstance>, Vec<JobInstance>, BouncerTraceEntry) {
        match self {
            Bouncer::Null(b) | Bouncer::Tendency(b) => {
                b.filter_jobs(tick, jobs, active_service_count, pools)
            }
        }
    }
}
