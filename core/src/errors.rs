//! Kernel error types
//!
//! All fallible kernel operations return `Result<T, SimError>`. Engine
//! recovery policy per spec.md §7 is implemented by the engine matching
//! on these variants at the single call site the spec names; no variant
//! here is ever allowed to panic the simulation loop.

use thiserror::Error;

/// Errors raised by the simulation kernel.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// `ResourcePool::allocate` (or a `ServiceTemplate`/`ServiceInstance`
    /// allocation built on top of it) could not be satisfied without
    /// exceeding capacity.
    #[error("resource '{resource}' capacity exceeded: requested {requested}, available {available}")]
    ResourceCapacityExceeded {
        resource: String,
        requested: i64,
        available: i64,
    },

    /// `ResourcePool::deallocate` would have driven a level below zero.
    #[error("resource '{resource}' deallocation underrun: requested {requested}, held {held}")]
    ResourceCapacityUnderrun {
        resource: String,
        requested: i64,
        held: i64,
    },

    /// `ServiceInstance::start` called when `attempts >= maxAttempts`.
    #[error("service has already reached its maximum of {max_attempts} start attempts")]
    MaxAttemptsReached { max_attempts: u32 },

    /// `JobInstance::startService` called with a service that is not a
    /// member of `pendingServices`.
    #[error("service is not pending on its owning job")]
    ServiceNotPending,

    /// The scenario loader found a `Signature` string it could not parse
    /// at all (unbalanced parens, stray characters, empty stage).
    #[error("job template '{job_template}' has an invalid signature format: {detail}")]
    InvalidSignatureFormat { job_template: String, detail: String },

    /// The scenario loader found a signature nested more than two levels
    /// deep (stage-of-stages is the maximum; spec.md §6/§9).
    #[error("job template '{job_template}' signature is nested too deeply")]
    TooManyNestedScopes { job_template: String },

    /// A signature referenced a service-template identifier the scenario
    /// does not define.
    #[error("job template '{job_template}' references unknown service '{service_id}'")]
    InvalidServiceReference {
        job_template: String,
        service_id: String,
    },

    /// Any other structural problem in a loaded scenario file (missing
    /// required element, duplicate identifier, dangling pool reference).
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
}
