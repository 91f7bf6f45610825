//! Preempt-RT tunable family: CPU governors and work-queue affinity.
//!
//! Applied while a latency-sensitive workload holds the resource. Governor
//! apply pins every frequency-scaling domain to `performance`; work-queue
//! apply restricts kernel work queues to the machine-specific CPU mask.

use crate::config::types::{sig_code, SignalDescriptor, DEFAULT_SIGNAL_TYPE};
use crate::config::ControlPaths;
use crate::kernel::{MachineIdentityResolver, PolicyWalker};
use crate::registry::ResourceTunable;
use log::debug;
use std::any::Any;
use std::path::PathBuf;

const POLICY_PREFIX: &str = "policy";
const GOVERNOR_LEAF: &str = "governor";
const PERFORMANCE_GOVERNOR: &str = "performance";

/// Sets every `policy*` frequency-scaling domain's governor to `performance`.
pub struct GovernorTunable {
    cpufreq_root: PathBuf,
}

impl GovernorTunable {
    pub fn new(paths: &ControlPaths) -> Self {
        Self {
            cpufreq_root: paths.cpufreq_root.clone(),
        }
    }
}

impl ResourceTunable for GovernorTunable {
    fn apply(&mut self, _ctx: Option<&mut dyn Any>) {
        let walker = PolicyWalker::new(&self.cpufreq_root, POLICY_PREFIX);
        match walker.write_leaf(GOVERNOR_LEAF, PERFORMANCE_GOVERNOR) {
            Ok(written) => debug!("governor set on {} policy domains", written),
            Err(skip) => debug!("governor apply skipped: {}", skip),
        }
    }

    fn tear(&mut self, _ctx: Option<&mut dyn Any>) {
        // No pre-apply governor is captured, so there is nothing to restore.
    }
}

/// Writes the machine-resolved CPU affinity mask once per work-queue entry.
///
/// The mask is resolved once per apply, and the identity file is re-read
/// each time. An identity with no table entry produces zero writes: an empty
/// mask would take every CPU away from the queue.
pub struct WorkqueueTunable {
    workqueue_root: PathBuf,
    mask_target: PathBuf,
    resolver: MachineIdentityResolver,
}

impl WorkqueueTunable {
    pub fn new(paths: &ControlPaths) -> Self {
        Self {
            workqueue_root: paths.workqueue_root.clone(),
            mask_target: paths.workqueue_mask_target.clone(),
            resolver: MachineIdentityResolver::new(&paths.machine_identity),
        }
    }
}

impl ResourceTunable for WorkqueueTunable {
    fn apply(&mut self, _ctx: Option<&mut dyn Any>) {
        let mask = match self.resolver.workqueue_mask() {
            Ok(mask) => mask,
            Err(skip) => {
                debug!("workqueue apply skipped: {}", skip);
                return;
            }
        };

        let walker = PolicyWalker::new(&self.workqueue_root, "");
        match walker.write_fixed_target(&self.mask_target, &mask) {
            Ok(written) => debug!("workqueue mask {} written {} times", mask, written),
            Err(skip) => debug!("workqueue apply skipped: {}", skip),
        }
    }
}

/// Post-process tagger for the `cyclictest` latency benchmark.
pub fn tag_cyclictest(descriptor: &mut SignalDescriptor) {
    descriptor.signal_id = sig_code(0x80, 0x0001);
    descriptor.signal_type = DEFAULT_SIGNAL_TYPE;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::SignalType;
    use tempfile::TempDir;

    fn harness() -> (TempDir, ControlPaths) {
        let dir = TempDir::new().unwrap();
        let paths = ControlPaths::rooted_at(dir.path());
        std::fs::create_dir_all(&paths.cpufreq_root).unwrap();
        std::fs::create_dir_all(&paths.workqueue_root).unwrap();
        std::fs::create_dir_all(paths.machine_identity.parent().unwrap()).unwrap();
        (dir, paths)
    }

    fn add_policy_domain(paths: &ControlPaths, name: &str) {
        let domain = paths.cpufreq_root.join(name);
        std::fs::create_dir(&domain).unwrap();
        std::fs::write(domain.join("governor"), "schedutil\n").unwrap();
    }

    #[test]
    fn test_governor_apply_pins_matching_domains() {
        let (_dir, paths) = harness();
        add_policy_domain(&paths, "policy0");
        add_policy_domain(&paths, "policy1");
        add_policy_domain(&paths, "notpolicy");

        GovernorTunable::new(&paths).apply(None);

        for name in ["policy0", "policy1"] {
            let governor =
                std::fs::read_to_string(paths.cpufreq_root.join(name).join("governor"))
                    .unwrap();
            assert_eq!(governor, "performance");
        }
        let untouched =
            std::fs::read_to_string(paths.cpufreq_root.join("notpolicy").join("governor"))
                .unwrap();
        assert_eq!(untouched, "schedutil\n");
    }

    #[test]
    fn test_governor_apply_without_control_root_is_noop() {
        let dir = TempDir::new().unwrap();
        let paths = ControlPaths::rooted_at(dir.path());
        // No cpufreq tree at all; apply must not create one or panic.
        GovernorTunable::new(&paths).apply(None);
        assert!(!paths.cpufreq_root.exists());
    }

    #[test]
    fn test_governor_tear_without_apply_is_noop() {
        let (_dir, paths) = harness();
        add_policy_domain(&paths, "policy0");

        GovernorTunable::new(&paths).tear(None);
        let governor =
            std::fs::read_to_string(paths.cpufreq_root.join("policy0").join("governor"))
                .unwrap();
        assert_eq!(governor, "schedutil\n");
    }

    #[test]
    fn test_workqueue_apply_writes_resolved_mask() {
        let (_dir, paths) = harness();
        std::fs::write(&paths.machine_identity, "QCS9100\n").unwrap();
        std::fs::create_dir(paths.workqueue_root.join("writeback")).unwrap();
        std::fs::create_dir(paths.workqueue_root.join("kblockd")).unwrap();
        std::fs::create_dir_all(paths.workqueue_mask_target.parent().unwrap()).unwrap();

        WorkqueueTunable::new(&paths).apply(None);
        assert_eq!(
            std::fs::read_to_string(&paths.workqueue_mask_target).unwrap(),
            "7F"
        );
    }

    #[test]
    fn test_workqueue_apply_unknown_machine_writes_nothing() {
        let (_dir, paths) = harness();
        std::fs::write(&paths.machine_identity, "sm8650\n").unwrap();
        std::fs::create_dir(paths.workqueue_root.join("writeback")).unwrap();
        std::fs::create_dir_all(paths.workqueue_mask_target.parent().unwrap()).unwrap();

        WorkqueueTunable::new(&paths).apply(None);
        assert!(!paths.workqueue_mask_target.exists());
    }

    #[test]
    fn test_workqueue_apply_unreadable_identity_writes_nothing() {
        let (_dir, paths) = harness();
        std::fs::create_dir(paths.workqueue_root.join("writeback")).unwrap();
        std::fs::create_dir_all(paths.workqueue_mask_target.parent().unwrap()).unwrap();

        WorkqueueTunable::new(&paths).apply(None);
        assert!(!paths.workqueue_mask_target.exists());
    }

    #[test]
    fn test_tag_cyclictest_stamps_fixed_code() {
        let mut descriptor = SignalDescriptor::new();
        tag_cyclictest(&mut descriptor);
        assert_eq!(descriptor.signal_id, sig_code(0x80, 0x0001));
        assert_eq!(descriptor.signal_type, SignalType::Default);
    }
}
