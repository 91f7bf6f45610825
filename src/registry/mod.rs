//! Apply/teardown and post-process callback registries.
//!
//! The host discovers callbacks through these tables instead of load-time
//! side effects: each registry is built once at process start from a fixed
//! entry list, checked for duplicate keys, and read-only afterwards. The
//! host invokes callbacks one at a time on a thread of its choosing; nothing
//! here spawns work or retains state between invocations beyond what a
//! tunable captures for its own teardown.
//!
//! Invocation never reports failure to the host. Unknown keys, absent
//! contexts, and contexts of the wrong shape are logged no-ops; the host
//! only ever observes "callback returned".

use crate::config::types::{ExtensionError, ResourceId, Result, SignalDescriptor, Skip};
use log::{debug, info};
use std::any::Any;
use std::collections::HashMap;

/// A tunable resource family: one apply, one optional teardown.
///
/// `tear` must be safe to invoke without a prior `apply`. The default
/// implementation is the pure no-op, which is correct for families with no
/// reversible effect.
pub trait ResourceTunable: Send {
    /// Apply the tunable. The context is host-owned and opaque; a tunable
    /// that expects a particular shape treats anything else as a no-op.
    fn apply(&mut self, ctx: Option<&mut dyn Any>);

    /// Revert to the pre-apply state if one was captured; otherwise do
    /// nothing. Never writes garbage, never raises.
    fn tear(&mut self, _ctx: Option<&mut dyn Any>) {}
}

/// Immutable table mapping resource identifiers to their tunables.
pub struct ResourceRegistry {
    tunables: HashMap<ResourceId, Box<dyn ResourceTunable>>,
}

impl ResourceRegistry {
    /// Build the registry from a fixed entry list. Duplicate identifiers are
    /// a build-time wiring mistake and are rejected outright.
    pub fn new(entries: Vec<(ResourceId, Box<dyn ResourceTunable>)>) -> Result<Self> {
        let mut tunables = HashMap::with_capacity(entries.len());
        for (id, tunable) in entries {
            if tunables.insert(id, tunable).is_some() {
                return Err(ExtensionError::DuplicateResource(id));
            }
        }
        Ok(Self { tunables })
    }

    /// Resource identifiers this registry serves.
    pub fn resource_ids(&self) -> Vec<ResourceId> {
        self.tunables.keys().copied().collect()
    }

    /// Invoke the apply callback for `id`, if one is registered.
    pub fn apply(&mut self, id: ResourceId, ctx: Option<&mut dyn Any>) {
        match self.tunables.get_mut(&id) {
            Some(tunable) => {
                info!("applying resource {}", id);
                tunable.apply(ctx);
            }
            None => debug!("no apply callback registered for {}", id),
        }
    }

    /// Invoke the teardown callback for `id`, if one is registered.
    pub fn tear(&mut self, id: ResourceId, ctx: Option<&mut dyn Any>) {
        match self.tunables.get_mut(&id) {
            Some(tunable) => {
                info!("tearing down resource {}", id);
                tunable.tear(ctx);
            }
            None => debug!("no tear callback registered for {}", id),
        }
    }
}

/// Post-process tagger: stamps a host-owned signal descriptor in place.
pub type PostProcessFn = fn(&mut SignalDescriptor);

/// Immutable table mapping recognized process names to their taggers.
///
/// Lookup is by exact, case-sensitive match on the host-provided name.
pub struct SignalRegistry {
    taggers: HashMap<&'static str, PostProcessFn>,
}

impl SignalRegistry {
    pub fn new(entries: Vec<(&'static str, PostProcessFn)>) -> Result<Self> {
        let mut taggers = HashMap::with_capacity(entries.len());
        for (name, tagger) in entries {
            if taggers.insert(name, tagger).is_some() {
                return Err(ExtensionError::DuplicateProcessName(name.to_string()));
            }
        }
        Ok(Self { taggers })
    }

    /// Process names this registry recognizes.
    pub fn process_names(&self) -> Vec<&'static str> {
        self.taggers.keys().copied().collect()
    }

    /// Invoke the tagger for `process_name` against the host context.
    ///
    /// The context must be a `SignalDescriptor`; an absent context, a context
    /// of another shape, or an unrecognized name all leave the descriptor
    /// untouched.
    pub fn post_process(&self, process_name: &str, ctx: Option<&mut dyn Any>) {
        let Some(tagger) = self.taggers.get(process_name) else {
            debug!("no post-process callback registered for {:?}", process_name);
            return;
        };
        let Some(descriptor) = ctx.and_then(|c| c.downcast_mut::<SignalDescriptor>()) else {
            debug!(
                "post-process for {:?} skipped: {}",
                process_name,
                Skip::NullContext
            );
            return;
        };
        info!("tagging post-process signal for {:?}", process_name);
        tagger(descriptor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{sig_code, SignalType, DEFAULT_SIGNAL_TYPE};

    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct CountingTunable {
        applied: Arc<AtomicU32>,
        torn: Arc<AtomicU32>,
    }

    impl ResourceTunable for CountingTunable {
        fn apply(&mut self, _ctx: Option<&mut dyn Any>) {
            self.applied.fetch_add(1, Ordering::SeqCst);
        }
        fn tear(&mut self, _ctx: Option<&mut dyn Any>) {
            self.torn.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct ApplyOnlyTunable;

    impl ResourceTunable for ApplyOnlyTunable {
        fn apply(&mut self, _ctx: Option<&mut dyn Any>) {}
    }

    fn test_tag(descriptor: &mut SignalDescriptor) {
        descriptor.signal_id = sig_code(0x80, 0x0001);
        descriptor.signal_type = DEFAULT_SIGNAL_TYPE;
    }

    #[test]
    fn test_duplicate_resource_id_rejected() {
        let id = ResourceId(0x0080_0000);
        let result = ResourceRegistry::new(vec![
            (id, Box::new(ApplyOnlyTunable)),
            (id, Box::new(ApplyOnlyTunable)),
        ]);
        assert!(matches!(
            result,
            Err(ExtensionError::DuplicateResource(dup)) if dup == id
        ));
    }

    #[test]
    fn test_unknown_resource_id_is_noop() {
        let mut registry = ResourceRegistry::new(vec![]).unwrap();
        registry.apply(ResourceId(0xDEAD_BEEF), None);
        registry.tear(ResourceId(0xDEAD_BEEF), None);
    }

    #[test]
    fn test_tear_without_apply_uses_default_noop() {
        let id = ResourceId(0x0080_0002);
        let mut registry =
            ResourceRegistry::new(vec![(id, Box::new(ApplyOnlyTunable))]).unwrap();
        // ApplyOnlyTunable has no tear of its own; the default must be safe.
        registry.tear(id, None);
    }

    #[test]
    fn test_apply_and_tear_dispatch_by_id() {
        let id = ResourceId(0x0090_0001);
        let applied = Arc::new(AtomicU32::new(0));
        let torn = Arc::new(AtomicU32::new(0));
        let mut registry = ResourceRegistry::new(vec![(
            id,
            Box::new(CountingTunable {
                applied: Arc::clone(&applied),
                torn: Arc::clone(&torn),
            }) as Box<dyn ResourceTunable>,
        )])
        .unwrap();

        registry.apply(id, None);
        registry.apply(id, None);
        registry.tear(id, None);
        registry.apply(ResourceId(0x0090_0002), None);

        assert_eq!(applied.load(Ordering::SeqCst), 2);
        assert_eq!(torn.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_duplicate_process_name_rejected() {
        let result = SignalRegistry::new(vec![
            ("cyclictest", test_tag as PostProcessFn),
            ("cyclictest", test_tag as PostProcessFn),
        ]);
        assert!(matches!(
            result,
            Err(ExtensionError::DuplicateProcessName(name)) if name == "cyclictest"
        ));
    }

    #[test]
    fn test_post_process_stamps_descriptor() {
        let registry =
            SignalRegistry::new(vec![("cyclictest", test_tag as PostProcessFn)]).unwrap();
        let mut descriptor = SignalDescriptor::new();

        registry.post_process("cyclictest", Some(&mut descriptor));
        assert_eq!(descriptor.signal_id, sig_code(0x80, 0x0001));
        assert_eq!(descriptor.signal_type, SignalType::Default);
    }

    #[test]
    fn test_post_process_lookup_is_exact_and_case_sensitive() {
        let registry =
            SignalRegistry::new(vec![("cyclictest", test_tag as PostProcessFn)]).unwrap();
        let mut descriptor = SignalDescriptor::new();

        registry.post_process("Cyclictest", Some(&mut descriptor));
        registry.post_process("cyclictest2", Some(&mut descriptor));
        registry.post_process("unknown", Some(&mut descriptor));
        assert_eq!(descriptor, SignalDescriptor::new());
    }

    #[test]
    fn test_post_process_absent_context_is_noop() {
        let registry =
            SignalRegistry::new(vec![("cyclictest", test_tag as PostProcessFn)]).unwrap();
        registry.post_process("cyclictest", None);
    }

    #[test]
    fn test_post_process_wrong_context_shape_is_noop() {
        let registry =
            SignalRegistry::new(vec![("cyclictest", test_tag as PostProcessFn)]).unwrap();
        let mut not_a_descriptor = String::from("something else");
        registry.post_process("cyclictest", Some(&mut not_a_descriptor));
        assert_eq!(not_a_descriptor, "something else");
    }
}
