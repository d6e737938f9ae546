//! Job instance: a running job progressing stage by stage
//!
//! Grounded on the validation-chain style of
//! `backend/src/models/transaction.rs`, implementing spec.md §4.4's
//! stage-advance state machine. Finished-stage `ServiceInstance`s are
//! dropped on advance: downstream progress only needs the counts
//! recorded by [`JobTemplate`], not the retired instances themselves.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::errors::SimError;
use crate::models::{
    CustomerId, JobId, JobTemplate, ResourcePool, ServiceInstance, ServiceInstanceId, ServiceState,
    ServiceTemplate, TemplateId,
};

/// A running instance of a [`JobTemplate`], tracking the current
/// stage's pending/running/finished service partition (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInstance {
    id: JobId,
    template_id: TemplateId,
    customer_id: CustomerId,
    current_stage: Option<usize>,
    services: HashMap<ServiceInstanceId, ServiceInstance>,
    pending: HashSet<ServiceInstanceId>,
    running: HashSet<ServiceInstanceId>,
    finished: HashSet<ServiceInstanceId>,
    is_finished: bool,
    was_aborted: bool,
}

impl JobInstance {
    /// Create a job at "not-started" and immediately advance it into
    /// stage 0, populating `pendingServices` with fresh instances.
    pub fn new(
        id: JobId,
        customer_id: impl Into<CustomerId>,
        job_template: &JobTemplate,
        service_templates: &HashMap<TemplateId, ServiceTemplate>,
        next_service_id: &mut ServiceInstanceId,
    ) -> Self {
        let mut job = Self {
            id,
            template_id: job_template.id().to_string(),
            customer_id: customer_id.into(),
            current_stage: None,
            services: HashMap::new(),
            pending: HashSet::new(),
            running: HashSet::new(),
            finished: HashSet::new(),
            is_finished: false,
            was_aborted: false,
        };
        job.advance(job_template, service_templates, next_service_id);
        job
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn current_stage(&self) -> Option<usize> {
        self.current_stage
    }

    pub fn is_finished(&self) -> bool {
        self.is_finished
    }

    pub fn was_aborted(&self) -> bool {
        self.was_aborted
    }

    pub fn service(&self, id: ServiceInstanceId) -> Option<&ServiceInstance> {
        self.services.get(&id)
    }

    /// The current stage's pending services, in arbitrary order (the
    /// engine's `Policy` is responsible for ordering).
    pub fn pending_services(&self) -> impl Iterator<Item = &ServiceInstance> {
        self.pending.iter().filter_map(|id| self.services.get(id))
    }

    pub fn num_pending(&self) -> usize {
        self.pending.len()
    }

    pub fn num_running(&self) -> usize {
        self.running.len()
    }

    /// Fraction of the job's total service count that has completed;
    /// `1.0` once finished (spec.md §4.4).
    pub fn progress(&self, job_template: &JobTemplate) -> f64 {
        if self.is_finished {
            return 1.0;
        }
        let stage = self.current_stage.unwrap_or(0);
        let completed = job_template.completed_service_count(stage) + self.finished.len();
        completed as f64 / job_template.total_service_count() as f64
    }

    /// Start a pending service. Fails with `ServiceNotPending` if `id`
    /// is not in `pendingServices`; on success moves it to `running`. A
    /// propagated `ResourceCapacityExceeded`/`MaxAttemptsReached` is
    /// surfaced unchanged and the service stays pending — the job is
    /// not aborted here, that is the engine's decision (spec.md §4.4).
    pub fn start_service(
        &mut self,
        id: ServiceInstanceId,
        service_templates: &HashMap<TemplateId, ServiceTemplate>,
        pools: &mut HashMap<String, ResourcePool>,
    ) -> Result<(), SimError> {
        if !self.pending.contains(&id) {
            return Err(SimError::ServiceNotPending);
        }
        let service = self.services.get_mut(&id).expect("pending id must exist");
        let template = service_templates
            .get(service.template_id())
            .expect("service references a known template");
        let pool = pools
            .get_mut(template.pool_id())
            .expect("template references a known pool");

        service.start(template, pool)?;
        self.pending.remove(&id);
        self.running.insert(id);
        Ok(())
    }

    /// Advance every running service one tick, retire the ones that
    /// finish, then attempt a stage transition.
    pub fn step(
        &mut self,
        job_template: &JobTemplate,
        service_templates: &HashMap<TemplateId, ServiceTemplate>,
        pools: &mut HashMap<String, ResourcePool>,
        next_service_id: &mut ServiceInstanceId,
    ) {
        let running_ids: Vec<_> = self.running.iter().copied().collect();
        for id in running_ids {
            let service = self.services.get_mut(&id).expect("running id must exist");
            let template = service_templates
                .get(service.template_id())
                .expect("service references a known template");
            let pool = pools
                .get_mut(template.pool_id())
                .expect("template references a known pool");
            service.step(template, pool);
            if service.state() == ServiceState::Finished {
                self.running.remove(&id);
                self.finished.insert(id);
            }
        }
        self.advance(job_template, service_templates, next_service_id);
    }

    /// If the current stage is complete (`running` empty and `pending`
    /// empty), move to the next stage and repopulate `pending`, or mark
    /// the job finished if there is no next stage.
    fn advance(
        &mut self,
        job_template: &JobTemplate,
        service_templates: &HashMap<TemplateId, ServiceTemplate>,
        next_service_id: &mut ServiceInstanceId,
    ) {
        let stage_complete = match self.current_stage {
            None => true,
            Some(_) => self.running.is_empty() && self.pending.is_empty(),
        };
        if !stage_complete {
            return;
        }

        let next_stage = match self.current_stage {
            None => 0,
            Some(stage) => stage + 1,
        };

        let Some(service_ids) = job_template.stage(next_stage) else {
            self.is_finished = true;
            return;
        };

        self.current_stage = Some(next_stage);
        self.services.clear();
        self.pending.clear();
        self.running.clear();
        self.finished.clear();

        for template_id in service_ids {
            let template = service_templates
                .get(template_id)
                .expect("signature references a known template");
            let id = *next_service_id;
            *next_service_id += 1;
            let service = ServiceInstance::new(id, self.id, template_id.clone(), next_stage, template.ticks());
            self.services.insert(id, service);
            self.pending.insert(id);
        }
    }

    /// Mark the job finished-via-abort and abort every running service,
    /// releasing their resources synchronously.
    pub fn abort(
        &mut self,
        service_templates: &HashMap<TemplateId, ServiceTemplate>,
        pools: &mut HashMap<String, ResourcePool>,
    ) {
        self.is_finished = true;
        self.was_aborted = true;
        let running_ids: Vec<_> = self.running.iter().copied().collect();
        for id in running_ids {
            let service = self.services.get_mut(&id).expect("running id must exist");
            let template = service_templates
                .get(service.template_id())
                .expect("service references a known template");
            let pool = pools
                .get_mut(template.pool_id())
                .expect("template references a known pool");
            service.abort(template, pool);
            self.running.remove(&id);
        }
    }
}
