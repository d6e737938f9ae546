//! Validated run configuration
//!
//! Grounded on `backend/src/orchestrator/engine.rs`'s `OrchestratorConfig`
//! plus its `validate_config` pass: a small, explicitly validated struct
//! bundling the choices that are independent of the scenario's static
//! catalogue (which policy, whether to bounce, how many ticks to run),
//! constructed once by the caller (the CLI, or a test) and handed to the
//! engine rather than threaded through as separate positional arguments.

use serde::{Deserialize, Serialize};

use crate::bouncer::Bouncer;
use crate::errors::SimError;
use crate::policy::Policy;

/// Run-level configuration for an [`Engine`](super::Engine): which
/// policy prioritises services, whether a bouncer gates admission, and
/// how many ticks to run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub policy: Policy,
    pub bouncer: Option<Bouncer>,
    pub max_ticks: usize,
}

impl ScenarioConfig {
    pub fn new(policy: Policy, bouncer: Option<Bouncer>, max_ticks: usize) -> Self {
        Self {
            policy,
            bouncer,
            max_ticks,
        }
    }

    /// Rejects configurations that could never produce a meaningful run.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.max_ticks == 0 {
            return Err(SimError::InvalidScenario(
                "max_ticks must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
