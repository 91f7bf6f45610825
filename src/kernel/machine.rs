//! Machine identity resolution.
//!
//! The identity file is re-read on every resolution: callers must not assume
//! a value cached from an earlier call, and none is kept.

use crate::config::types::{Skip, SkipResult};
use crate::kernel::control_file;
use std::path::{Path, PathBuf};

/// Machine identity → work-queue affinity mask.
///
/// Identities absent from this table resolve to no mask at all; dependent
/// writes are skipped rather than given an empty mask, which would disable
/// every CPU for the work queue.
const WORKQUEUE_MASKS: &[(&str, &str)] = &[
    ("qcs9100", "7F"),
    ("qcs8300", "F7"),
    ("qcm6490", "7F"),
];

/// Resolves the platform identity and machine-conditioned policy values.
pub struct MachineIdentityResolver {
    identity_path: PathBuf,
}

impl MachineIdentityResolver {
    pub fn new(identity_path: &Path) -> Self {
        Self {
            identity_path: identity_path.to_path_buf(),
        }
    }

    /// Normalized machine identity: first line of the identity file, trimmed
    /// and lowercased. Never fails; an unreadable file yields `""`.
    pub fn identity(&self) -> String {
        match control_file::read_line(&self.identity_path) {
            Ok(line) => line.trim().to_lowercase(),
            Err(_) => String::new(),
        }
    }

    /// Work-queue affinity mask for the current machine.
    pub fn workqueue_mask(&self) -> SkipResult<String> {
        let identity = self.identity();
        WORKQUEUE_MASKS
            .iter()
            .find(|(name, _)| *name == identity)
            .map(|(_, mask)| (*mask).to_string())
            .ok_or(Skip::NoPolicyForMachine { identity })
    }
}
