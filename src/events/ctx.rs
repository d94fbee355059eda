//! # Listener invocation context with deferred mutation.
//!
//! Every listener receives an [`EventCtx`]: the event name, the payload, the
//! listener's own owner handle, and a queue for mutations of the dispatcher.
//!
//! ## Architecture
//! ```text
//! Dispatcher::fire ──► pass over bindings (newest → oldest)
//!        │                   │
//!        │                   ├─► listener(ctx) ──► ctx.unregister_all(..) ─┐
//!        │                   │                     ctx.fire(..)            │ queued
//!        │                   ▼                                             │
//!        │             next listener                                       │
//!        │                                                                 │
//!        └─── pass complete ──► apply queued ops ◄─────────────────────────┘
//!                               (fires cascade breadth-first)
//! ```
//!
//! ## Rules
//! - Mutations requested from inside a listener are **deferred**: queued on
//!   the context and applied once the current pass over the event's bindings
//!   has finished. The pass itself only ever observes the binding list it
//!   started with, minus stale entries it prunes itself.
//! - Deferral is what makes reentrant mutation safe: a listener that
//!   unregisters itself - or any other listener of the same event - cannot
//!   cause a skip or a double invocation in the running pass.
//! - Deferred fires are appended to a cascade queue and processed
//!   breadth-first after the pass, subject to
//!   [`DispatcherConfig::max_cascade`](crate::DispatcherConfig::max_cascade).
//! - Ops queued by listeners that ran before a faulting listener are still
//!   applied; the fault aborts only the remaining invocations of the pass.

use std::sync::Arc;

use crate::components::Handle;
use crate::events::Args;

/// A mutation requested from inside a listener, applied after the pass.
pub(crate) enum Op {
    RegisterAll(Handle),
    RegisterOne(Handle, String),
    UnregisterAll(Handle),
    UnregisterOne(Handle, String),
    Remove(Handle),
    Fire(Arc<str>, Args),
}

/// Per-invocation view handed to a listener.
///
/// Borrowed for the duration of one listener call. Read access (event name,
/// payload, own handle) is direct; write access to the dispatcher goes
/// through the deferred op queue described in the module docs.
pub struct EventCtx<'a> {
    event: &'a str,
    owner: Handle,
    args: &'a Args,
    ops: &'a mut Vec<Op>,
}

impl<'a> EventCtx<'a> {
    pub(crate) fn new(event: &'a str, owner: Handle, args: &'a Args, ops: &'a mut Vec<Op>) -> Self {
        Self {
            event,
            owner,
            args,
            ops,
        }
    }

    /// Name of the event being fired.
    #[inline]
    pub fn event(&self) -> &str {
        self.event
    }

    /// Handle of the component this listener is bound to.
    ///
    /// Lets a listener act on itself without storing its own handle:
    /// `ctx.unregister_all(ctx.owner())`.
    #[inline]
    pub fn owner(&self) -> Handle {
        self.owner
    }

    /// The fire payload, shared by every listener of this pass.
    #[inline]
    pub fn args(&self) -> &Args {
        self.args
    }

    /// Queues a follow-up event, fired after the current pass completes.
    ///
    /// Cascaded fires count against the dispatcher's cascade ceiling.
    pub fn fire(&mut self, event: impl Into<Arc<str>>, args: Args) {
        self.ops.push(Op::Fire(event.into(), args));
    }

    /// Queues registration of every listener `owner`'s type declares.
    ///
    /// If `owner` is no longer alive when the op is applied, the request is
    /// dropped (logged at debug level).
    pub fn register_all(&mut self, owner: Handle) {
        self.ops.push(Op::RegisterAll(owner));
    }

    /// Queues registration of one declared listener method on `owner`.
    ///
    /// Unknown methods and stale handles are dropped at apply time (logged
    /// at debug level) - a deferred request has no caller left to fail to.
    pub fn register_one(&mut self, owner: Handle, method: impl Into<String>) {
        self.ops.push(Op::RegisterOne(owner, method.into()));
    }

    /// Queues removal of every binding owned by `owner`.
    pub fn unregister_all(&mut self, owner: Handle) {
        self.ops.push(Op::UnregisterAll(owner));
    }

    /// Queues removal of every binding matching `owner` and `method`.
    pub fn unregister_one(&mut self, owner: Handle, method: impl Into<String>) {
        self.ops.push(Op::UnregisterOne(owner, method.into()));
    }

    /// Queues removal of the component itself from the arena.
    ///
    /// Its bindings are left to lazy pruning, same as any other dead owner.
    pub fn remove(&mut self, owner: Handle) {
        self.ops.push(Op::Remove(owner));
    }
}
