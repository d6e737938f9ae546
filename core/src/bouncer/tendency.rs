//! Tendency-based admission control
//!
//! Grounded on `original_source/src/snsim/bouncer.py`'s `Bouncer` class,
//! with the load/quota formulas spec.md §4.7 and §9 explicitly fix
//! (the spec's formulation is authoritative where it disagrees with the
//! source — see the open questions in spec.md §9).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{JobInstance, ResourcePool};

use super::BouncerTraceEntry;

/// Admission controller using a load-tendency/derivative estimator.
///
/// Constructed with [`TendencyBouncer::new`] for the real admission
/// behaviour, or via [`TendencyBouncer::observer_only`] for the "null"
/// bouncer that records the same trace line every tick but never
/// declines a job (spec.md §9, "Bouncer pluggability").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TendencyBouncer {
    horizon: usize,
    debug_accept_all: bool,
    load_history: Vec<f64>,
    tendency: Vec<f64>,
    derivative: Vec<f64>,
}

impl Default for TendencyBouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl TendencyBouncer {
    /// Horizon `H` from spec.md §4.7.
    pub const DEFAULT_HORIZON: usize = 20;

    pub fn new() -> Self {
        Self {
            horizon: Self::DEFAULT_HORIZON,
            debug_accept_all: false,
            load_history: Vec::new(),
            tendency: Vec::new(),
            derivative: Vec::new(),
        }
    }

    /// A bouncer that computes and records the same trace line every
    /// tick but always accepts every job — the "null" observer-only
    /// variant (spec.md §9).
    pub fn observer_only() -> Self {
        Self {
            debug_accept_all: true,
            ..Self::new()
        }
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_debug_accept_all(mut self, flag: bool) -> Self {
        self.debug_accept_all = flag;
        self
    }

    pub fn reset(&mut self) {
        self.load_history.clear();
        self.tendency.clear();
        self.derivative.clear();
    }

    /// Mean normalised utilisation across every (pool, resource) pair,
    /// scaled by the number of currently active (Running) services.
    fn current_load(active_service_count: usize, pools: &HashMap<String, ResourcePool>) -> f64 {
        // Iterate pools/resources in a fixed sort order rather than a
        // HashMap's: floating-point summation is order-sensitive, and a
        // HashMap's iteration order is not stable across process runs,
        // which would break the bit-identical-trace determinism
        // property (spec.md §8) for no algorithmic reason.
        let mut pool_ids: Vec<&String> = pools.keys().collect();
        pool_ids.sort();

        let mut sum = 0.0;
        let mut count = 0usize;
        for pool_id in pool_ids {
            let pool = &pools[pool_id];
            let mut resource_names: Vec<&String> = pool.resource_names().collect();
            resource_names.sort();
            for resource in resource_names {
                if let Some(level) = pool.normalised_level(resource) {
                    sum += level;
                    count += 1;
                }
            }
        }
        let mean = if count == 0 { 0.0 } else { sum / count as f64 };
        active_service_count as f64 * mean
    }

    /// Slope of the least-squares line through `(0, y[0]), (1, y[1]), ...`.
    ///
    /// The source estimates this via adaptive finite differences on the
    /// fitted polynomial; for a degree-1 fit the slope is constant
    /// everywhere, so the finite-difference iteration always converges
    /// to the regression coefficient itself. We compute that
    /// coefficient directly.
    fn linear_slope(values: &[f64]) -> f64 {
        let n = values.len();
        if n < 2 {
            return 0.0;
        }
        let n_f = n as f64;
        let sum_x: f64 = (0..n).map(|i| i as f64).sum();
        let sum_y: f64 = values.iter().sum();
        let sum_xy: f64 = values.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
        let sum_xx: f64 = (0..n).map(|i| (i as f64).powi(2)).sum();

        let denominator = n_f * sum_xx - sum_x * sum_x;
        if denominator.abs() < f64::EPSILON {
            return 0.0;
        }
        (n_f * sum_xy - sum_x * sum_y) / denominator
    }

    /// Partition `jobs` into (accepted, declined) for `tick`, recording
    /// one trace line regardless of `jobs`'s size (spec.md §4.7, §9).
    pub fn filter_jobs(
        &mut self,
        tick: usize,
        mut jobs: Vec<JobInstance>,
        active_service_count: usize,
        pools: &HashMap<String, ResourcePool>,
    ) -> (Vec<JobInstance>, Vec<JobInstance>, BouncerTraceEntry) {
        let new_jobs = jobs.len();
        let basevalue = Self::current_load(active_service_count, pools);

        if self.load_history.len() < 2 {
            self.load_history.push(basevalue);
            self.tendency.push(0.0);
            let entry = BouncerTraceEntry {
                tick,
                base_value: basevalue,
                tendency: 0.0,
                new_jobs,
                derivative: 0.0,
                quota: 1.0,
            };
            return (jobs, Vec::new(), entry);
        }

        let trace_len = self.load_history.len();
        let h = self.horizon.min(trace_len - 1).max(1);

        let mut raw = 0.0;
        for k in 1..h {
            let previous = self.load_history[trace_len - k];
            raw += (basevalue - previous) / k as f64;
        }
        raw /= h as f64;
        self.tendency.push(raw);

        // Smooth the just-appended value in place: average it with the
        // preceding min(H, |tendency| - 1) values.
        let window = self.horizon.min(self.tendency.len() - 1);
        let last = self.tendency.len() - 1;
        let mut smoothed = self.tendency[last];
        for j in 1..=window {
            smoothed += self.tendency[last - j];
        }
        self.tendency[last] = smoothed / (window + 1) as f64;
        let tendency = self.tendency[last];

        let fit_len = h.min(self.tendency.len());
        let fit_window = &self.tendency[self.tendency.len() - fit_len..];
        let derivative = Self::linear_slope(fit_window);
        self.derivative.push(derivative);

        let maxd_window = self.horizon.min(self.derivative.len());
        let max_d = self.derivative[self.derivative.len() - maxd_window..]
            .iter()
            .cloned()
            .fold(f64::MIN, f64::max);

        let quota;
        let pivot;
        if derivative <= 0.0 || max_d <= 0.0 {
            quota = 1.0;
            pivot = new_jobs;
        } else {
            quota = 1.0 - derivative / max_d;
            pivot = (quota * new_jobs as f64).floor() as usize;
        }

        self.load_history.push(basevalue);

        jobs.sort_by_key(|job| job.id());
        let (accepted, declined) = if self.debug_accept_all {
            (jobs, Vec::new())
        } else {
            let declined = jobs.split_off(pivot.min(jobs.len()));
            (jobs, declined)
        };

        let entry = BouncerTraceEntry {
            tick,
            base_value: basevalue,
            tendency,
            new_jobs,
            derivative,
            quota,
        };
        (accepted, declined, entry)
    }
}
