//! tunebox: a performance-tunable extension core for a host
//! resource-management runtime
//!
//! The host discovers tunables and post-process taggers through explicit
//! registries, then invokes apply/teardown callbacks by resource identifier
//! and taggers by recognized process name. This crate owns what happens once
//! a callback is invoked; discovery, scheduling, and command parsing belong
//! to the host.
//!
//! # Architecture
//!
//! ## Kernel control surface ([`kernel`])
//! - [`kernel::control_file`]: defensive single-file read/write, typed skips
//! - [`kernel::machine`]: machine identity + identity-conditioned policy
//! - [`kernel::policy_walk`]: prefix-filtered walks over policy directories
//!
//! ## Callback protocol ([`registry`])
//! - [`registry::ResourceRegistry`]: resource id → apply/teardown tunable
//! - [`registry::SignalRegistry`]: process name → post-process tagger
//!
//! ## Tunable families ([`extensions`])
//! - [`extensions::preempt_rt`]: CPU governors, work-queue affinity
//! - [`extensions::cpufreq`]: frequency caps with snapshot/restore
//!
//! ## Configuration ([`config`])
//! - [`config::types`]: shared types, error and skip taxonomies
//! - [`config::paths`]: control-surface paths, overridable for tests
//!
//! # Design Principles
//!
//! 1. **Best-effort, never escalate** - a missing subsystem skips its own
//!    writes and nothing else; the host only sees "callback returned"
//! 2. **Typed skips over silence** - every omitted write carries a reason a
//!    test can assert on
//! 3. **Teardown is always safe** - with no captured state it is a pure no-op
//! 4. **Writes are all-or-nothing** - truncate-then-write-once, no partial
//!    control-file content
//! 5. **No caching across calls** - machine identity is re-read every time

// Kernel control surface
pub mod kernel;

// Callback protocol
pub mod registry;

// Tunable families
pub mod extensions;

// Configuration & shared types
pub mod config;

// Re-export commonly used types for convenience
pub use config::paths::ControlPaths;
pub use config::types::*;
pub use extensions::{default_registry, default_signal_registry};
pub use registry::{PostProcessFn, ResourceRegistry, ResourceTunable, SignalRegistry};
