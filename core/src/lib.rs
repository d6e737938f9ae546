//! SNSim Core - discrete-time service-network simulation kernel
//!
//! A deterministic, tick-driven simulator of jobs competing for scarce
//! resources across a network of services.
//!
//! # Architecture
//!
//! - **time**: Discrete tick tracking
//! - **rng**: Deterministic random number generation (xorshift64*)
//! - **errors**: Kernel-wide `Result` error type
//! - **models**: Domain entities (resource pools, templates, instances, customers)
//! - **policy**: Scheduling policies for the Prioritise phase
//! - **generator**: Per-tick job arrivals
//! - **bouncer**: Admission control for the Admit phase
//! - **scenario**: The static catalogue a run is built from, plus its XML file format
//! - **orchestrator**: The `Engine` driving the per-tick pipeline
//! - **trace**: Per-tick and bouncer trace file formats
//!
//! # Critical invariants
//!
//! 1. No wall-clock time: the simulation only ever advances in discrete ticks.
//! 2. All randomness is deterministic (seeded `RngManager`); no other source
//!    of non-determinism (e.g. unordered `HashMap` iteration) may influence
//!    a run's outcome or trace output.
//! 3. A `reset` followed by a re-run from the same scenario reproduces an
//!    identical trace.

pub mod bouncer;
pub mod errors;
pub mod generator;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod rng;
pub mod scenario;
pub mod time;
pub mod trace;

pub use errors::SimError;
pub use orchestrator::{Engine, ScenarioConfig};
pub use policy::Policy;
pub use rng::RngManager;
pub use scenario::Scenario;
pub use time::Clock;
