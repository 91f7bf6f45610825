//! CPU frequency-cap tunable family with snapshot/restore.
//!
//! The kernel exposes the caps as per-cluster lists:
//!
//! ```text
//! # cat /sys/kernel/msm_performance/parameters/cpu_max_freq
//! 0:2147483647 1:2147483647 2:2147483647 3:2147483647 4:2147483647 5:2147483647 6:2147483647 7:2147483647
//! ```
//!
//! Apply captures the current lists before writing the requested bounds;
//! teardown writes the captured lists back verbatim and drops them. Teardown
//! without a prior apply touches nothing.

use crate::config::types::{sig_code, CpuFreqRequest, SignalDescriptor, Skip, DEFAULT_SIGNAL_TYPE};
use crate::config::ControlPaths;
use crate::kernel::control_file;
use crate::registry::ResourceTunable;
use log::debug;
use std::any::Any;
use std::path::{Path, PathBuf};

const MAX_FREQ_LEAF: &str = "cpu_max_freq";
const MIN_FREQ_LEAF: &str = "cpu_min_freq";

/// Cluster count assumed when the current list cannot be read.
const DEFAULT_CLUSTERS: usize = 8;

/// Applies host-requested frequency bounds and restores the prior ones.
///
/// Each bound is snapshotted independently, exactly as read, the first time
/// this tunable writes it. `None` means the bound has not been written since
/// the last teardown (or its file had no readable content) and will not be
/// restored.
pub struct CpuFreqTunable {
    max_path: PathBuf,
    min_path: PathBuf,
    saved_max: Option<String>,
    saved_min: Option<String>,
}

impl CpuFreqTunable {
    pub fn new(paths: &ControlPaths) -> Self {
        Self {
            max_path: paths.msm_performance_root.join(MAX_FREQ_LEAF),
            min_path: paths.msm_performance_root.join(MIN_FREQ_LEAF),
            saved_max: None,
            saved_min: None,
        }
    }

    /// Format a bound as the kernel's `cpu:value` list, one entry per
    /// cluster. The cluster count is taken from the current list when it is
    /// readable so the write matches the machine's actual topology.
    fn format_bound(value_khz: u64, current: Option<&str>) -> String {
        let clusters = current
            .map(|line| line.split_whitespace().count())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_CLUSTERS);
        (0..clusters)
            .map(|cpu| format!("{}:{}", cpu, value_khz))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn write_bound(path: &Path, value_khz: u64, current: Option<&str>) {
        let list = Self::format_bound(value_khz, current);
        if let Err(skip) = control_file::write_line(path, &list) {
            debug!("frequency bound skipped: {}", skip);
        }
    }
}

impl ResourceTunable for CpuFreqTunable {
    fn apply(&mut self, ctx: Option<&mut dyn Any>) {
        let Some(request) = ctx.and_then(|c| c.downcast_mut::<CpuFreqRequest>()) else {
            debug!("frequency-cap apply skipped: {}", Skip::NullContext);
            return;
        };
        if request.max_khz.is_none() && request.min_khz.is_none() {
            debug!("frequency-cap apply skipped: request carries no bounds");
            return;
        }

        // Each bound is captured the first time we write it, so repeated
        // applies never replace the pre-apply state with our own earlier
        // write, and a bound first touched by a later apply is still saved.
        if let Some(max_khz) = request.max_khz {
            let current = control_file::read_line(&self.max_path).ok();
            if self.saved_max.is_none() {
                self.saved_max = current.clone();
            }
            Self::write_bound(&self.max_path, max_khz, current.as_deref());
        }
        if let Some(min_khz) = request.min_khz {
            let current = control_file::read_line(&self.min_path).ok();
            if self.saved_min.is_none() {
                self.saved_min = current.clone();
            }
            Self::write_bound(&self.min_path, min_khz, current.as_deref());
        }
    }

    fn tear(&mut self, _ctx: Option<&mut dyn Any>) {
        if self.saved_max.is_none() && self.saved_min.is_none() {
            debug!("frequency-cap tear skipped: no snapshot captured");
            return;
        }

        if let Some(max) = self.saved_max.take() {
            if let Err(skip) = control_file::write_line(&self.max_path, &max) {
                debug!("frequency-cap restore skipped: {}", skip);
            }
        }
        if let Some(min) = self.saved_min.take() {
            if let Err(skip) = control_file::write_line(&self.min_path, &min) {
                debug!("frequency-cap restore skipped: {}", skip);
            }
        }
    }
}

/// Post-process tagger for the `gst-launch-1.0` media pipeline.
pub fn tag_gst_launch(descriptor: &mut SignalDescriptor) {
    descriptor.signal_id = sig_code(0x81, 0x0001);
    descriptor.signal_type = DEFAULT_SIGNAL_TYPE;
}
