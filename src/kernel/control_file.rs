//! Scoped, defensive access to single kernel control files.
//!
//! Every operation is one bounded open/read-or-write/close sequence with no
//! retries and no timeouts. Failures never escalate past the typed skip
//! result: a missing or unwritable tunable must not abort a broader apply
//! sequence.

use crate::config::types::{Skip, SkipResult};
use log::{debug, warn};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

fn unavailable(path: &Path) -> Skip {
    Skip::IoUnavailable {
        path: path.display().to_string(),
    }
}

/// Replace the content of a control file with `value`, verbatim.
///
/// Truncate-then-write-once: the file either ends up holding exactly `value`
/// (no implicit newline) or is not touched at all. An empty path or a target
/// that cannot be opened yields `Skip::IoUnavailable` with no filesystem
/// effect. A failure after the open succeeded is logged and swallowed; the
/// truncating open has already happened, and best-effort means we do not
/// report a half-written tunable to the host as anything other than done.
pub fn write_line(path: &Path, value: &str) -> SkipResult<()> {
    if path.as_os_str().is_empty() {
        return Err(unavailable(path));
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| {
            debug!("control file {} not writable: {}", path.display(), e);
            unavailable(path)
        })?;

    if let Err(e) = file.write_all(value.as_bytes()) {
        warn!("write to {} failed mid-stream: {}", path.display(), e);
        return Ok(());
    }
    if let Err(e) = file.flush() {
        warn!("flush of {} failed: {}", path.display(), e);
    }

    Ok(())
}

/// Read exactly the first line of a control file, without its newline.
///
/// An empty path, an unopenable file, or a file with no content at all yield
/// `Skip::IoUnavailable`. A file whose first line is blank yields `Ok("")` —
/// "the file had no content" and "the file held the value ''" are distinct
/// outcomes.
pub fn read_line(path: &Path) -> SkipResult<String> {
    if path.as_os_str().is_empty() {
        return Err(unavailable(path));
    }

    let file = File::open(path).map_err(|e| {
        debug!("control file {} not readable: {}", path.display(), e);
        unavailable(path)
    })?;

    let mut line = String::new();
    let read = BufReader::new(file)
        .read_line(&mut line)
        .map_err(|e| {
            debug!("read of {} failed: {}", path.display(), e);
            unavailable(path)
        })?;
    if read == 0 {
        return Err(unavailable(path));
    }

    if line.ends_with('\n') {
        line.pop();
    }
    Ok(line)
}
