//! Scenario entities: pools, templates, instances, customers
//!
//! Per spec.md §9 ("Ownership graph"), cross-entity references are
//! plain integer handles rather than mutual heap pointers: a
//! `JobInstance` owns its `ServiceInstance`s directly, while a
//! `ServiceInstance` only carries its owning job's [`JobId`] and its
//! template's identifier, and a [`ResourcePool`] ledger records the
//! requesting service by [`ServiceInstanceId`] alone.

mod customer;
mod job_instance;
mod job_template;
mod resource_pool;
mod service_instance;
mod service_template;

pub use customer::Customer;
pub use job_instance::JobInstance;
pub use job_template::JobTemplate;
pub use resource_pool::ResourcePool;
pub use service_instance::{ServiceInstance, ServiceState};
pub use service_template::ServiceTemplate;

/// Monotonically assigned job identifier.
pub type JobId = u64;

/// Stable handle for a service instance, unique for the lifetime of the
/// scenario (not reused across `reset`).
pub type ServiceInstanceId = u64;

/// Customer identifier as declared in the scenario file.
pub type CustomerId = String;

/// Template identifier as declared in the scenario file.
pub type TemplateId = String;
