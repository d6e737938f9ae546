//! The tick-driven simulation engine
//!
//! Grounded on `backend/src/orchestrator/engine.rs`'s overall shape — a
//! config-validated `Orchestrator` holding every sub-component and
//! driving a `tick()` method the caller steps, plus a `run`-to-
//! completion helper — retargeted to the Generate/Admit/Prioritise/
//! Schedule/Advance/Record pipeline of spec.md §4.8.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::bouncer::{Bouncer, BouncerTraceEntry};
use crate::errors::SimError;
use crate::generator::JobGenerator;
use crate::models::{JobInstance, ServiceInstanceId};
use crate::orchestrator::config::ScenarioConfig;
use crate::policy::{Policy, PolicyContext};
use crate::rng::RngManager;
use crate::scenario::Scenario;
use crate::time::Clock;
use crate::trace::TraceEntry;

/// The simulation engine: owns a [`Scenario`] catalogue plus every
/// piece of mutable run state (active jobs, clock, RNG, accumulators,
/// trace) and drives the per-tick pipeline (spec.md §4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engine {
    scenario: Scenario,
    policy: Policy,
    bouncer: Option<Bouncer>,

    clock: Clock,
    rng: RngManager,
    generator: JobGenerator,
    next_service_id: ServiceInstanceId,

    active_jobs: Vec<JobInstance>,

    aborted_jobs: usize,
    declined_jobs: usize,
    admitted_jobs: usize,
    acc_revenue: f64,
    acc_penalty: f64,

    trace: Vec<TraceEntry>,
    bouncer_trace: Vec<BouncerTraceEntry>,
}

impl Engine {
    pub fn new(scenario: Scenario, policy: Policy, bouncer: Option<Bouncer>) -> Self {
        let rng = RngManager::new(RngManager::seed_from_str(&scenario.seed));
        Self {
            scenario,
            policy,
            bouncer,
            clock: Clock::new(),
            rng,
            generator: JobGenerator::new(),
            next_service_id: 0,
            active_jobs: Vec::new(),
            aborted_jobs: 0,
            declined_jobs: 0,
            admitted_jobs: 0,
            acc_revenue: 0.0,
            acc_penalty: 0.0,
            trace: Vec::new(),
            bouncer_trace: Vec::new(),
        }
    }

    /// Validate `config` and build an engine from it (the CLI's entry
    /// point): the teacher-equivalent of `Orchestrator::new(config)`.
    pub fn from_config(scenario: Scenario, config: ScenarioConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self::new(scenario, config.policy, config.bouncer))
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    pub fn bouncer_trace(&self) -> &[BouncerTraceEntry] {
        &self.bouncer_trace
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Reset sub-components, per-job state and accumulators, and
    /// re-seed the RNG from the scenario's `Seed` parameter so a second
    /// `start` reproduces the same run (spec.md §4.8, §9).
    pub fn reset(&mut self) {
        self.scenario.reset();
        self.generator.reset();
        if let Some(bouncer) = &mut self.bouncer {
            bouncer.reset();
        }
        self.clock.reset();
        self.rng = RngManager::new(RngManager::seed_from_str(&self.scenario.seed));
        self.next_service_id = 0;
        self.active_jobs.clear();
        self.aborted_jobs = 0;
        self.declined_jobs = 0;
        self.admitted_jobs = 0;
        self.acc_revenue = 0.0;
        self.acc_penalty = 0.0;
        self.trace.clear();
        self.bouncer_trace.clear();
    }

    /// Reset, then run up to `max_ticks` iterations of the pipeline.
    #[instrument(skip(self))]
    pub fn start(&mut self, max_ticks: usize) {
        self.reset();
        info!(max_ticks, "starting simulation");
        for _ in 0..max_ticks {
            self.tick();
        }
        info!(ticks_run = max_ticks, "simulation finished");
    }

    fn tick(&mut self) {
        let t = self.clock.current_tick();

        // 1. Generate
        let new_jobs = self.generator.new_jobs(
            t,
            &self.scenario.job_template_ids,
            &self.scenario.customer_ids,
            &self.scenario.job_templates,
            &self.scenario.service_templates,
            &mut self.rng,
            &mut self.next_service_id,
        );
        let generated_count = new_jobs.len();

        // 2. Admit
        if let Some(bouncer) = &mut self.bouncer {
            let active_service_count: usize = self.active_jobs.iter().map(|j| j.num_running()).sum();
            let (accepted, declined, bounce_entry) =
                bouncer.filter_jobs(t, new_jobs, active_service_count, &self.scenario.pools);
            self.declined_jobs += declined.len();
            self.admitted_jobs += accepted.len();
            self.active_jobs.extend(accepted);
            self.bouncer_trace.push(bounce_entry);
        } else {
            self.admitted_jobs += new_jobs.len();
            self.active_jobs.extend(new_jobs);
        }

        // 3. Prioritise
        let ctx = PolicyContext {
            job_templates: &self.scenario.job_templates,
            service_templates: &self.scenario.service_templates,
            customers: &self.scenario.customers,
            pools: &self.scenario.pools,
        };
        let ordered = self.policy.prioritize(&self.active_jobs, &ctx);
        let num_services = ordered.len();
        let num_jobs = self.active_jobs.len();

        // 4. Schedule
        let job_index_of: HashMap<ServiceInstanceId, usize> = self
            .active_jobs
            .iter()
            .enumerate()
            .flat_map(|(idx, job)| job.pending_services().map(move |s| (s.id(), idx)))
            .collect();

        for service_id in ordered {
            let Some(&job_idx) = job_index_of.get(&service_id) else {
                continue; // already started/retired earlier in this same loop
            };
            let result = self.active_jobs[job_idx].start_service(
                service_id,
                &self.scenario.service_templates,
                &mut self.scenario.pools,
            );
            match result {
                Ok(()) => {}
                Err(SimError::ResourceCapacityExceeded { .. }) => {
                    // swallowed: service stays pending, retried next tick
                }
                Err(SimError::MaxAttemptsReached { .. }) | Err(SimError::ServiceNotPending) => {
                    debug!(service_id, tick = t, "aborting job after scheduling failure");
                    self.active_jobs[job_idx].abort(&self.scenario.service_templates, &mut self.scenario.pools);
                }
                Err(other) => {
                    debug!(service_id, tick = t, error = %other, "unexpected scheduling error");
                }
            }
        }

        // 5. Advance
        let mut still_active = Vec::with_capacity(self.active_jobs.len());
        for mut job in self.active_jobs.drain(..) {
            let job_template = &self.scenario.job_templates[job.template_id()];
            job.step(
                job_template,
                &self.scenario.service_templates,
                &mut self.scenario.pools,
                &mut self.next_service_id,
            );

            if job.is_finished() {
                if job.was_aborted() {
                    self.aborted_jobs += 1;
                    self.acc_penalty += job_template.penalty();
                } else {
                    self.acc_revenue += job_template.revenue();
                }
            } else {
                still_active.push(job);
            }
        }
        self.active_jobs = still_active;

        // 6. Record
        let mut pool_ids: Vec<&String> = self.scenario.pools.keys().collect();
        pool_ids.sort();
        let mut pool_levels = Vec::new();
        for pool_id in pool_ids {
            let pool = &self.scenario.pools[pool_id];
            let mut resource_names: Vec<&String> = pool.resource_names().collect();
            resource_names.sort();
            for resource in resource_names {
                let level = pool.normalised_level(resource).unwrap_or(0.0);
                pool_levels.push((pool_id.clone(), resource.clone(), level));
            }
        }

        self.trace.push(TraceEntry {
            tick: t,
            active_jobs: num_jobs,
            active_services: num_services,
            generated_jobs: generated_count,
            aborted_jobs: self.aborted_jobs,
            declined_jobs: self.declined_jobs,
            admitted_jobs: self.admitted_jobs,
            acc_revenue: self.acc_revenue,
            acc_penalty: self.acc_penalty,
            pool_levels,
        });

        self.clock.advance();
    }
}
