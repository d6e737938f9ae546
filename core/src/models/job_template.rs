//! Job template: an ordered signature of unordered service stages

use serde::{Deserialize, Serialize};

/// Identifier; a signature — an ordered sequence of stages, each an
/// unordered set of service-template identifiers (spec.md §3).
///
/// Construction is infallible here; signature-grammar validation
/// (non-empty stages, known service references, nesting depth) happens
/// once in [`crate::scenario::signature::parse_signature`] before a
/// `JobTemplate` is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTemplate {
    id: String,
    /// Ordered stages; each stage is an unordered set of service
    /// template identifiers.
    signature: Vec<Vec<String>>,
    revenue: f64,
    penalty: f64,
}

impl JobTemplate {
    pub fn new(id: impl Into<String>, signature: Vec<Vec<String>>, revenue: f64, penalty: f64) -> Self {
        assert!(!signature.is_empty(), "signature length must be >= 1");
        assert!(
            signature.iter().all(|stage| !stage.is_empty()),
            "every stage must be non-empty"
        );
        Self {
            id: id.into(),
            signature,
            revenue,
            penalty,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn revenue(&self) -> f64 {
        self.revenue
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    pub fn num_stages(&self) -> usize {
        self.signature.len()
    }

    /// The set of service-template identifiers for stage `index`.
    pub fn stage(&self, index: usize) -> Option<&[String]> {
        self.signature.get(index).map(|stage| stage.as_slice())
    }

    /// Total number of services across every stage, used by
    /// `JobInstance::getProgress`.
    pub fn total_service_count(&self) -> usize {
        self.signature.iter().map(|stage| stage.len()).sum()
    }

    /// Sum of stage sizes strictly before `index` — the numerator
    /// contribution of completed stages to progress.
    pub fn completed_service_count(&self, index: usize) -> usize {
        self.signature.iter().take(index).map(|stage| stage.len()).sum()
    }
}
