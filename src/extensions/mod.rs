//! Built-in tunable families and their fixed wiring.
//!
//! The host adapter builds both registries once at load time and injects
//! them; nothing registers itself through load-time side effects.

pub mod cpufreq;
pub mod preempt_rt;

use crate::config::types::Result;
use crate::config::{ControlPaths, ResourceId};
use crate::registry::{PostProcessFn, ResourceRegistry, ResourceTunable, SignalRegistry};

/// The fixed resource table: governor, work-queue affinity, frequency cap.
pub fn default_registry(paths: &ControlPaths) -> Result<ResourceRegistry> {
    ResourceRegistry::new(vec![
        (
            ResourceId::GOVERNOR,
            Box::new(preempt_rt::GovernorTunable::new(paths)) as Box<dyn ResourceTunable>,
        ),
        (
            ResourceId::WORKQUEUE,
            Box::new(preempt_rt::WorkqueueTunable::new(paths)),
        ),
        (
            ResourceId::CPU_FREQ,
            Box::new(cpufreq::CpuFreqTunable::new(paths)),
        ),
    ])
}

/// The fixed post-process table: recognized workloads and their taggers.
pub fn default_signal_registry() -> Result<SignalRegistry> {
    SignalRegistry::new(vec![
        ("cyclictest", preempt_rt::tag_cyclictest as PostProcessFn),
        ("gst-launch-1.0", cpufreq::tag_gst_launch as PostProcessFn),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_serves_all_families() {
        let registry = default_registry(&ControlPaths::default()).unwrap();
        let mut ids = registry.resource_ids();
        ids.sort_by_key(|id| id.0);
        assert_eq!(
            ids,
            vec![
                ResourceId::GOVERNOR,
                ResourceId::WORKQUEUE,
                ResourceId::CPU_FREQ
            ]
        );
    }

    #[test]
    fn test_default_signal_registry_serves_both_workloads() {
        let registry = default_signal_registry().unwrap();
        let mut names = registry.process_names();
        names.sort();
        assert_eq!(names, vec!["cyclictest", "gst-launch-1.0"]);
    }
}
