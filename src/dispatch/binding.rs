//! # Per-subscription binding record.
//!
//! A [`Binding`] is one row of the dispatcher's subscriber table: the tuple
//! of event name, owner handle and invocation thunk created at registration
//! time. Bindings are immutable after construction; their only implicit
//! state is liveness, which is owned by the component arena and only ever
//! moves from alive to dead.

use std::any::Any;
use std::sync::Arc;

use crate::components::{Components, Handle, ListenerFn, ListenerSpec};
use crate::error::FireError;
use crate::events::EventCtx;

/// One subscription: (event name, owner handle, listener thunk).
///
/// ### Rules
/// - Valid to invoke only while the owner handle resolves in the arena;
///   once the owner is gone the binding is dead and is pruned by the next
///   fire pass that walks over it.
/// - Ownership checks compare handle identity (index **and** generation),
///   never component equality.
pub struct Binding {
    event: Arc<str>,
    owner: Handle,
    method: &'static str,
    component: &'static str,
    thunk: ListenerFn,
}

impl Binding {
    /// Creates a binding for `owner` from one row of its listener table.
    ///
    /// `component` is the owner's type name, carried for fault messages.
    pub(crate) fn new(owner: Handle, component: &'static str, spec: &ListenerSpec) -> Self {
        Self {
            event: spec.event.into(),
            owner,
            method: spec.method,
            component,
            thunk: spec.thunk,
        }
    }

    /// Event name this binding subscribes to.
    #[inline]
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Handle of the owning component.
    #[inline]
    pub fn owner(&self) -> Handle {
        self.owner
    }

    /// Identifier of the bound listener method.
    #[inline]
    pub fn method(&self) -> &'static str {
        self.method
    }

    /// Name of the declaring component type.
    #[inline]
    pub fn component(&self) -> &'static str {
        self.component
    }

    /// Returns true while the owner is still alive in `components`.
    #[inline]
    pub fn is_alive(&self, components: &Components) -> bool {
        components.contains(self.owner)
    }

    /// Returns true iff this binding is owned by exactly `candidate`.
    #[inline]
    pub fn is_owned_by(&self, candidate: Handle) -> bool {
        self.owner == candidate
    }

    /// Returns true iff the bound method's identifier equals `name`.
    #[inline]
    pub fn matches_method(&self, name: &str) -> bool {
        self.method == name
    }

    /// Shared key for the subscriber table.
    #[inline]
    pub(crate) fn event_key(&self) -> Arc<str> {
        Arc::clone(&self.event)
    }

    /// Invokes the bound listener on `target` with the given context.
    ///
    /// Any listener fault is wrapped with the event name, the method
    /// identifier and the declaring type, and re-raised - one misdeclared
    /// signature must not silently no-op.
    pub(crate) fn invoke(
        &self,
        target: &mut dyn Any,
        ctx: &mut EventCtx<'_>,
    ) -> Result<(), FireError> {
        (self.thunk)(target, ctx).map_err(|source| FireError::Listener {
            event: Arc::clone(&self.event),
            method: self.method,
            component: self.component,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Component;

    struct Ghost;

    impl Component for Ghost {
        fn listeners(&self) -> &'static [ListenerSpec] {
            &[]
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn noop_spec() -> ListenerSpec {
        ListenerSpec {
            event: "Haunt",
            method: "on_haunt",
            thunk: |_, _| Ok(()),
        }
    }

    #[test]
    fn test_ownership_is_handle_identity() {
        let mut arena = Components::new();
        let first = arena.insert(Box::new(Ghost));
        let binding = Binding::new(first, "Ghost", &noop_spec());

        assert!(binding.is_owned_by(first));
        arena.remove(first);
        let second = arena.insert(Box::new(Ghost));
        assert_eq!(first.index(), second.index());
        assert!(
            !binding.is_owned_by(second),
            "recycled slot must not claim the old binding"
        );
    }

    #[test]
    fn test_liveness_follows_the_arena() {
        let mut arena = Components::new();
        let handle = arena.insert(Box::new(Ghost));
        let binding = Binding::new(handle, "Ghost", &noop_spec());

        assert!(binding.is_alive(&arena));
        arena.remove(handle);
        assert!(!binding.is_alive(&arena));
    }

    #[test]
    fn test_matches_method_is_string_comparison() {
        let mut arena = Components::new();
        let handle = arena.insert(Box::new(Ghost));
        let binding = Binding::new(handle, "Ghost", &noop_spec());

        assert!(binding.matches_method("on_haunt"));
        assert!(!binding.matches_method("on_hauntt"));
    }
}
