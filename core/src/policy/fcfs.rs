//! First-come-first-served ordering
//!
//! Grounded on `original_source/src/snsim/policy.py`'s `FCFSPolicy`,
//! the one variant that sorts ascending (spec.md §4.5, §9).

use crate::models::{JobId, ServiceInstance};

/// `printf("%04d%s", job.id, service.template.id)`, compared ascending.
pub(super) fn sort_key(job_id: JobId, service: &ServiceInstance) -> String {
    format!("{:04}{}", job_id, service.template_id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ServiceInstance;

    #[test]
    fn lower_job_id_sorts_first() {
        let a = ServiceInstance::new(1, 1, "A", 0, 2);
        let b = ServiceInstance::new(2, 2, "A", 0, 2);
        assert!(sort_key(1, &a) < sort_key(2, &b));
    }
}
