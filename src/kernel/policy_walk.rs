//! Prefix-filtered walks over sibling policy directories.
//!
//! Machines without a given subsystem simply have no control root; an
//! unopenable root is a skip for the whole walk, never an error surfaced to
//! the host.

use crate::config::types::{Skip, SkipResult};
use crate::kernel::control_file;
use log::debug;
use std::path::{Path, PathBuf};

/// Walks the direct children of a control root, filtering by name prefix.
pub struct PolicyWalker {
    root: PathBuf,
    prefix: String,
}

impl PolicyWalker {
    /// Walker over `root` matching entries whose name starts with `prefix`.
    /// An empty prefix matches every entry.
    pub fn new(root: &Path, prefix: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            prefix: prefix.to_string(),
        }
    }

    fn matching_entries(&self) -> SkipResult<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| {
            debug!("control root {} not enumerable: {}", self.root.display(), e);
            Skip::IoUnavailable {
                path: self.root.display().to_string(),
            }
        })?;

        let mut matched = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with(&self.prefix) {
                matched.push(entry.path());
            }
        }
        // read_dir order is filesystem-dependent; keep walks deterministic.
        matched.sort();
        Ok(matched)
    }

    /// Write `value` to `<root>/<entry>/<leaf_name>` for every matching entry.
    /// Returns the number of attempted writes.
    pub fn write_leaf(&self, leaf_name: &str, value: &str) -> SkipResult<usize> {
        let mut written = 0;
        for entry in self.matching_entries()? {
            let leaf = entry.join(leaf_name);
            match control_file::write_line(&leaf, value) {
                Ok(()) => written += 1,
                Err(skip) => debug!("skipping {}: {}", leaf.display(), skip),
            }
        }
        Ok(written)
    }

    /// Write `value` to the one fixed `target` once per matching entry.
    ///
    /// The work-queue affinity family enumerates one tree but writes to a
    /// target outside it; the mapping stays a caller-supplied parameter so
    /// it is visible in configuration rather than buried here.
    ///
    /// An existing but empty root yields zero writes: unlike a raw `readdir`
    /// loop, the enumeration never yields the `.`/`..` dot entries, so that
    /// artifact of the original extension is deliberately not reproduced.
    pub fn write_fixed_target(&self, target: &Path, value: &str) -> SkipResult<usize> {
        let mut written = 0;
        for _entry in self.matching_entries()? {
            match control_file::write_line(target, value) {
                Ok(()) => written += 1,
                Err(skip) => debug!("skipping {}: {}", target.display(), skip),
            }
        }
        Ok(written)
    }
}
