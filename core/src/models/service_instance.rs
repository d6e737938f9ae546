//! Service instance: one running/pending unit of work within a job
//!
//! Grounded on the state-machine/validation style of
//! `backend/src/models/transaction.rs` (status enum + per-call
//! precondition checks), implementing the transition table of spec.md
//! §4.3 exactly.

use serde::{Deserialize, Serialize};

use crate::errors::SimError;
use crate::models::{JobId, ResourcePool, ServiceInstanceId, ServiceTemplate};

/// Lifecycle state of a [`ServiceInstance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceState {
    Pending,
    Running,
    Finished,
    Aborted,
}

/// One attempt at running a [`ServiceTemplate`] on behalf of a job.
///
/// # Example
/// ```
/// use snsim_core::models::{ResourcePool, ServiceInstance, ServiceState, ServiceTemplate};
///
/// let mut pool = ResourcePool::new("P");
/// pool.set_capacity("CPU", 10);
/// let mut template = ServiceTemplate::new("A", "P", 2, 1.0, 0.0, 1);
/// template.set_demand("CPU", 5);
///
/// let mut service = ServiceInstance::new(1, 100, "A", 0, template.ticks());
/// service.start(&template, &mut pool).unwrap();
/// assert_eq!(service.state(), ServiceState::Running);
///
/// service.step(&template, &mut pool); // ticksLeft 2 -> 1
/// service.step(&template, &mut pool); // ticksLeft 1 -> 0, Finished
/// assert_eq!(service.state(), ServiceState::Finished);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInstance {
    id: ServiceInstanceId,
    job_id: JobId,
    template_id: String,
    stage_index: usize,
    state: ServiceState,
    attempts: u32,
    ticks_left: u32,
}

impl ServiceInstance {
    /// Create a fresh, pending service instance. `ticks_left` should be
    /// initialised from the owning template's `ticks()`.
    pub fn new(
        id: ServiceInstanceId,
        job_id: JobId,
        template_id: impl Into<String>,
        stage_index: usize,
        ticks_left: u32,
    ) -> Self {
        Self {
            id,
            job_id,
            template_id: template_id.into(),
            stage_index,
            state: ServiceState::Pending,
            attempts: 0,
            ticks_left,
        }
    }

    pub fn id(&self) -> ServiceInstanceId {
        self.id
    }

    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn ticks_left(&self) -> u32 {
        self.ticks_left
    }

    pub fn is_running(&self) -> bool {
        self.state == ServiceState::Running
    }

    /// Identity string used by policies for the tie-break key:
    /// `(job-identifier, current-stage-index, template-identifier)`.
    pub fn identity(&self) -> String {
        format!("{}:{}:{}", self.job_id, self.stage_index, self.template_id)
    }

    /// Attempt to start this service. See spec.md §4.3 for the full
    /// transition table.
    pub fn start(
        &mut self,
        template: &ServiceTemplate,
        pool: &mut ResourcePool,
    ) -> Result<(), SimError> {
        if self.attempts >= template.max_attempts() {
            return Err(SimError::MaxAttemptsReached {
                max_attempts: template.max_attempts(),
            });
        }

        match template.allocate(pool, self.id) {
            Ok(()) => {
                self.state = ServiceState::Running;
                Ok(())
            }
            Err(err) => {
                self.attempts += 1;
                Err(err)
            }
        }
    }

    /// Advance a running service by one tick. No-op unless `Running`.
    pub fn step(&mut self, template: &ServiceTemplate, pool: &mut ResourcePool) {
        if self.state != ServiceState::Running {
            return;
        }
        if self.ticks_left > 1 {
            self.ticks_left -= 1;
        } else {
            self.ticks_left = 0;
            template.deallocate(pool, self.id);
            self.state = ServiceState::Finished;
        }
    }

    /// Abort this service, releasing any held resources. No-op if
    /// already `Finished` or `Aborted`.
    pub fn abort(&mut self, template: &ServiceTemplate, pool: &mut ResourcePool) {
        match self.state {
            ServiceState::Running => {
                template.deallocate(pool, self.id);
                self.ticks_left = 0;
                self.state = ServiceState::Aborted;
            }
            ServiceState::Pending => {
                self.state = ServiceState::Aborted;
            }
            ServiceState::Finished | ServiceState::Aborted => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_and_pool(capacity: i64, max_attempts: u32) -> (ServiceTemplate, ResourcePool) {
        let mut pool = ResourcePool::new("P");
        pool.set_capacity("CPU", capacity);
        let mut template = ServiceTemplate::new("A", "P", 2, 1.0, 0.0, max_attempts);
        template.set_demand("CPU", 5);
        (template, pool)
    }

    #[test]
    fn start_succeeds_when_capacity_available() {
        let (template, mut pool) = template_and_pool(10, 1);
        let mut service = ServiceInstance::new(1, 100, "A", 0, template.ticks());
        service.start(&template, &mut pool).unwrap();
        assert_eq!(service.state(), ServiceState::Running);
        assert_eq!(service.attempts(), 0);
    }

    #[test]
    fn start_failure_increments_attempts_and_stays_pending() {
        let (template, mut pool) = template_and_pool(4, 2);
        let mut service = ServiceInstance::new(1, 100, "A", 0, template.ticks());
        let err = service.start(&template, &mut pool).unwrap_err();
        assert!(matches!(err, SimError::ResourceCapacityExceeded { .. }));
        assert_eq!(service.state(), ServiceState::Pending);
        assert_eq!(service.attempts(), 1);
    }

    #[test]
    fn start_at_max_attempts_raises_without_incrementing() {
        let (template, mut pool) = template_and_pool(4, 1);
        let mut service = ServiceInstance::new(1, 100, "A", 0, template.ticks());
        let _ = service.start(&template, &mut pool); // attempts -> 1, exhausted
        let err = service.start(&template, &mut pool).unwrap_err();
        assert!(matches!(err, SimError::MaxAttemptsReached { .. }));
        assert_eq!(service.attempts(), 1);
    }

    #[test]
    fn step_counts_down_then_finishes_and_releases() {
        let (template, mut pool) = template_and_pool(10, 1);
        let mut service = ServiceInstance::new(1, 100, "A", 0, template.ticks());
        service.start(&template, &mut pool).unwrap();

        service.step(&template, &mut pool);
        assert_eq!(service.state(), ServiceState::Running);
        assert_eq!(service.ticks_left(), 1);

        service.step(&template, &mut pool);
        assert_eq!(service.state(), ServiceState::Finished);
        assert_eq!(service.ticks_left(), 0);
        assert_eq!(pool.level("CPU"), Some(0));
    }

    #[test]
    fn abort_while_running_releases_resources() {
        let (template, mut pool) = template_and_pool(10, 1);
        let mut service = ServiceInstance::new(1, 100, "A", 0, template.ticks());
        service.start(&template, &mut pool).unwrap();
        service.abort(&template, &mut pool);
        assert_eq!(service.state(), ServiceState::Aborted);
        assert_eq!(pool.level("CPU"), Some(0));
    }

    #[test]
    fn abort_while_pending_is_immediate() {
        let (template, mut pool) = template_and_pool(10, 1);
        let mut service = ServiceInstance::new(1, 100, "A", 0, template.ticks());
        service.abort(&template, &mut pool);
        assert_eq!(service.state(), ServiceState::Aborted);
    }

    #[test]
    fn abort_is_terminal_noop_after_finished() {
        let (template, mut pool) = template_and_pool(10, 1);
        let mut service = ServiceInstance::new(1, 100, "A", 0, template.ticks());
        service.start(&template, &mut pool).unwrap();
        service.step(&template, &mut pool);
        service.step(&template, &mut pool);
        service.abort(&template, &mut pool);
        assert_eq!(service.state(), ServiceState::Finished);
    }
}
