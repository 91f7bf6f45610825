//! Thin wrappers around the kernel-exposed control surface.
//!
//! Everything here is best-effort by contract: operations return a typed
//! skip reason instead of escalating, and never block beyond a single
//! open/read-or-write/close sequence.
//! Dependency direction: control_file -> machine -> policy_walk

pub mod control_file;
pub mod machine;
pub mod policy_walk;

pub use machine::MachineIdentityResolver;
pub use policy_walk::PolicyWalker;
