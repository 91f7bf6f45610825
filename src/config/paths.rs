//! Control-surface path configuration.
//!
//! Defaults point at the real kernel control surface; every field can be
//! overridden so tests run against a temp-directory harness instead of sysfs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where each tunable family reads and writes.
///
/// Note the workqueue mapping: entries are enumerated under `workqueue_root`
/// but the affinity mask is written to `workqueue_mask_target`, which defaults
/// to `<cpufreq_root>/cpumask`. That mapping is carried over verbatim from the
/// shipped extension; supplying a corrected target here is a configuration
/// change, not a code change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlPaths {
    /// CPU frequency-scaling root holding the `policy*` domains.
    pub cpufreq_root: PathBuf,
    /// Virtual work-queue root enumerated by the affinity apply.
    pub workqueue_root: PathBuf,
    /// File the work-queue affinity mask is written to.
    pub workqueue_mask_target: PathBuf,
    /// Single-line machine identity file.
    pub machine_identity: PathBuf,
    /// Root holding `cpu_max_freq` / `cpu_min_freq` per-cluster lists.
    pub msm_performance_root: PathBuf,
}

impl Default for ControlPaths {
    fn default() -> Self {
        let cpufreq_root = PathBuf::from("/sys/devices/system/cpu/cpufreq");
        let workqueue_mask_target = cpufreq_root.join("cpumask");
        Self {
            cpufreq_root,
            workqueue_root: PathBuf::from("/sys/devices/virtual/workqueue"),
            workqueue_mask_target,
            machine_identity: PathBuf::from("/sys/devices/soc0/machine"),
            msm_performance_root: PathBuf::from("/sys/kernel/msm_performance/parameters"),
        }
    }
}

impl ControlPaths {
    /// Root all control paths under `base`, preserving the relative layout.
    /// Test harnesses use this to mirror the sysfs shape inside a tempdir.
    pub fn rooted_at(base: &std::path::Path) -> Self {
        let cpufreq_root = base.join("devices/system/cpu/cpufreq");
        let workqueue_mask_target = cpufreq_root.join("cpumask");
        Self {
            cpufreq_root,
            workqueue_root: base.join("devices/virtual/workqueue"),
            workqueue_mask_target,
            machine_identity: base.join("devices/soc0/machine"),
            msm_performance_root: base.join("kernel/msm_performance/parameters"),
        }
    }
}
