//! # Event dispatcher: subscriber table plus dispatch loop.
//!
//! [`Dispatcher`] is the context object tying everything together: it owns
//! the component arena and the per-event binding lists, and runs fire
//! passes over them.
//!
//! ## Architecture
//! ```text
//!            register_all / register_one
//! caller ───────────────────────────────► subscribers
//!                                          HashMap<event, Vec<Binding>>
//!                                               │
//! caller ──► fire(event, args) ─────────────────┤ walk newest → oldest
//!                                               ▼
//!                                      owner alive? ──no──► prune in place
//!                                               │yes
//!                                               ▼
//!                                      listener(&mut component, ctx)
//!                                               │
//!                            Err ──► wrap + re-raise (pass aborted)
//!                                               │Ok
//!                                               ▼
//!                            ctx ops queued ──► applied after the pass
//! ```
//!
//! ## Rules
//! - Within one event name, bindings keep insertion order; a fire pass
//!   walks them **in reverse insertion order**. Reverse iteration is what
//!   makes in-place pruning safe: removing the entry at the cursor (or any
//!   already-visited one) never shifts an unvisited entry, so nothing is
//!   skipped or invoked twice.
//! - Dead bindings are pruned lazily, amortized across fire calls; nobody
//!   pays for a removal until the next fire of that event.
//! - A listener fault aborts the remainder of its pass and propagates to
//!   the `fire` caller. Deferred ops queued by listeners that already ran
//!   are still applied.
//! - Single-threaded by design: every operation runs to completion on the
//!   calling thread, and no locking is performed. Embedding in a
//!   multi-threaded host requires serializing whole operations externally -
//!   a fire pass must not interleave with other mutations.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::components::{Component, Components, Handle, ListenerSpec};
use crate::dispatch::binding::Binding;
use crate::dispatch::config::DispatcherConfig;
use crate::error::{FireError, RegisterError};
use crate::events::{Args, EventCtx, Op};
use crate::policies::RegisterPolicy;

/// Event dispatcher and component registry.
///
/// ### Responsibilities
/// - Owns live components and hands out generation-checked handles.
/// - Maps event names to ordered binding lists.
/// - Runs fire passes: invoke live bindings, prune dead ones, apply
///   deferred mutations, cascade follow-up fires.
///
/// Construct one per independent event domain; there is no global instance.
#[derive(Default)]
pub struct Dispatcher {
    components: Components,
    subscribers: HashMap<Arc<str>, Vec<Binding>>,
    config: DispatcherConfig,
}

impl Dispatcher {
    /// Creates an empty dispatcher with the given configuration.
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            components: Components::new(),
            subscribers: HashMap::new(),
            config,
        }
    }

    /// Returns the active configuration.
    #[inline]
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    // ---------------------------
    // Component plumbing
    // ---------------------------

    /// Stores a component without registering any listeners.
    ///
    /// Use [`Self::register_all`] / [`Self::register_one`] later, or
    /// [`Self::spawn`] to do both at once.
    pub fn insert(&mut self, component: impl Component) -> Handle {
        self.components.insert(Box::new(component))
    }

    /// Stores a component and registers every listener its type declares.
    pub fn spawn(&mut self, component: impl Component) -> Handle {
        let specs = component.listeners();
        let name = component.name();
        let owner = self.components.insert(Box::new(component));
        for spec in specs {
            self.bind(Binding::new(owner, name, spec));
        }
        owner
    }

    /// Removes a component, returning it if it was alive.
    ///
    /// Its bindings are not touched here: they go stale with the handle and
    /// are pruned by the next fire pass that walks over them. Call
    /// [`Self::unregister_all`] first for eager cleanup.
    pub fn remove(&mut self, owner: Handle) -> Option<Box<dyn Component>> {
        self.components.remove(owner)
    }

    /// Returns true iff `owner` resolves to a live component.
    #[inline]
    pub fn contains(&self, owner: Handle) -> bool {
        self.components.contains(owner)
    }

    /// Typed read access to a live component.
    pub fn get<C: Component>(&self, owner: Handle) -> Option<&C> {
        self.components
            .get(owner)
            .and_then(|c| c.as_any().downcast_ref())
    }

    /// Typed write access to a live component.
    pub fn get_mut<C: Component>(&mut self, owner: Handle) -> Option<&mut C> {
        self.components
            .get_mut(owner)
            .and_then(|c| c.as_any_mut().downcast_mut())
    }

    /// The underlying arena, for liveness queries and iteration-free stats.
    #[inline]
    pub fn components(&self) -> &Components {
        &self.components
    }

    /// Number of bindings currently registered under `event`.
    ///
    /// Counts dead-but-unpruned bindings too; the figure is exact again
    /// after the next fire of that event.
    pub fn listener_count(&self, event: &str) -> usize {
        self.subscribers.get(event).map_or(0, Vec::len)
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Registers every listener declared by `owner`'s type.
    ///
    /// Walks the type's listener table and appends one binding per row to
    /// that row's event list. An empty table is a valid no-op. Duplicate
    /// handling follows [`DispatcherConfig::register`].
    pub fn register_all(&mut self, owner: Handle) -> Result<(), RegisterError> {
        let (specs, component) = self.table_of(owner)?;
        for spec in specs {
            self.bind(Binding::new(owner, component, spec));
        }
        Ok(())
    }

    /// Registers exactly one declared listener method on `owner`.
    ///
    /// Fails with [`RegisterError::MethodNotFound`] when the owner's type
    /// declares no listener under that identifier; the subscriber table is
    /// left unmodified.
    pub fn register_one(&mut self, owner: Handle, method: &str) -> Result<(), RegisterError> {
        let (specs, component) = self.table_of(owner)?;
        let spec = specs.iter().find(|spec| spec.method == method).ok_or_else(|| {
            RegisterError::MethodNotFound {
                method: method.to_string(),
                component,
            }
        })?;
        self.bind(Binding::new(owner, component, spec));
        Ok(())
    }

    /// Removes every binding owned by `owner`, across all event names.
    ///
    /// Safe to call with zero or many bindings, and with stale handles -
    /// unregistering what is already gone is a no-op.
    pub fn unregister_all(&mut self, owner: Handle) {
        let mut removed = 0usize;
        for list in self.subscribers.values_mut() {
            let before = list.len();
            list.retain(|b| !b.is_owned_by(owner));
            removed += before - list.len();
        }
        if removed > 0 {
            debug!(%owner, removed, "unregistered all listeners");
        }
    }

    /// Removes every binding matching both `owner` and `method`.
    ///
    /// Removes all matches, not just the first, so it also cleans up after
    /// repeated registration under [`RegisterPolicy::Append`].
    pub fn unregister_one(&mut self, owner: Handle, method: &str) {
        let mut removed = 0usize;
        for list in self.subscribers.values_mut() {
            let before = list.len();
            list.retain(|b| !(b.is_owned_by(owner) && b.matches_method(method)));
            removed += before - list.len();
        }
        if removed > 0 {
            debug!(%owner, method, removed, "unregistered listener");
        }
    }

    // ---------------------------
    // Dispatch
    // ---------------------------

    /// Fires `event`, invoking every live binding with `args`.
    ///
    /// Unknown event names are a silent no-op - firing into the void is not
    /// an error. The pass runs in reverse insertion order (see module docs);
    /// dead bindings encountered on the way are pruned in place. Deferred
    /// ops are applied after the pass, and deferred fires cascade
    /// breadth-first until the queue drains or the configured ceiling cuts
    /// them off.
    ///
    /// The first listener fault aborts the remainder of that pass and
    /// propagates as [`FireError::Listener`].
    pub fn fire(&mut self, event: &str, args: Args) -> Result<(), FireError> {
        let mut cascade: VecDeque<(Arc<str>, Args)> = VecDeque::new();
        cascade.push_back((event.into(), args));
        let mut processed = 0usize;

        while let Some((name, args)) = cascade.pop_front() {
            processed += 1;
            if let Some(limit) = self.config.cascade_limit() {
                if processed > limit {
                    return Err(FireError::CascadeOverflow { event: name, limit });
                }
            }
            self.fire_one(&name, &args, &mut cascade)?;
        }
        Ok(())
    }

    /// One event: run the pass, then apply whatever the listeners queued.
    ///
    /// Ops are applied even when the pass faulted - listeners that ran
    /// before the fault keep their requests.
    fn fire_one(
        &mut self,
        event: &str,
        args: &Args,
        cascade: &mut VecDeque<(Arc<str>, Args)>,
    ) -> Result<(), FireError> {
        let mut ops = Vec::new();
        let result = self.run_pass(event, args, &mut ops);
        self.apply(ops, cascade);
        result
    }

    fn run_pass(&mut self, event: &str, args: &Args, ops: &mut Vec<Op>) -> Result<(), FireError> {
        let Some(bindings) = self.subscribers.get_mut(event) else {
            return Ok(());
        };
        trace!(event, listeners = bindings.len(), "fire pass");

        let mut i = bindings.len();
        while i > 0 {
            i -= 1;
            let binding = &bindings[i];
            let Some(component) = self.components.get_mut(binding.owner()) else {
                trace!(event, owner = %binding.owner(), "stale binding pruned");
                bindings.remove(i);
                continue;
            };
            let mut ctx = EventCtx::new(event, binding.owner(), args, ops);
            binding.invoke(component.as_any_mut(), &mut ctx)?;
        }
        Ok(())
    }

    fn apply(&mut self, ops: Vec<Op>, cascade: &mut VecDeque<(Arc<str>, Args)>) {
        for op in ops {
            match op {
                Op::RegisterAll(owner) => {
                    if let Err(err) = self.register_all(owner) {
                        debug!(%owner, error = %err, "deferred register_all dropped");
                    }
                }
                Op::RegisterOne(owner, method) => {
                    if let Err(err) = self.register_one(owner, &method) {
                        debug!(%owner, method = %method, error = %err, "deferred register_one dropped");
                    }
                }
                Op::UnregisterAll(owner) => self.unregister_all(owner),
                Op::UnregisterOne(owner, method) => self.unregister_one(owner, &method),
                Op::Remove(owner) => {
                    self.components.remove(owner);
                }
                Op::Fire(event, args) => cascade.push_back((event, args)),
            }
        }
    }

    // ---------------------------
    // Helpers
    // ---------------------------

    /// Resolves a live owner to its listener table and type name.
    fn table_of(
        &self,
        owner: Handle,
    ) -> Result<(&'static [ListenerSpec], &'static str), RegisterError> {
        let component = self
            .components
            .get(owner)
            .ok_or(RegisterError::StaleHandle { handle: owner })?;
        Ok((component.listeners(), component.name()))
    }

    /// Appends a binding to its event list, honoring the duplicate policy.
    fn bind(&mut self, binding: Binding) {
        let list = self.subscribers.entry(binding.event_key()).or_default();
        if self.config.register == RegisterPolicy::Dedupe
            && list
                .iter()
                .any(|b| b.is_owned_by(binding.owner()) && b.matches_method(binding.method()))
        {
            trace!(
                event = binding.event(),
                method = binding.method(),
                owner = %binding.owner(),
                "duplicate registration skipped"
            );
            return;
        }
        trace!(
            event = binding.event(),
            method = binding.method(),
            component = binding.component(),
            owner = %binding.owner(),
            "listener bound"
        );
        list.push(binding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ArgError, ListenerError};
    use crate::{args, listeners};

    #[derive(Default)]
    struct Probe {
        pings: u32,
        pongs: u32,
    }

    impl Probe {
        fn on_ping(&mut self, _ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
            self.pings += 1;
            Ok(())
        }

        fn on_pong(&mut self, _ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
            self.pongs += 1;
            Ok(())
        }
    }

    listeners!(Probe {
        "Ping" => on_ping,
        "Pong" => on_pong,
    });

    #[derive(Default)]
    struct Adder {
        total: i64,
    }

    impl Adder {
        fn on_add(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
            self.total += ctx.args().int(0)?;
            Ok(())
        }
    }

    listeners!(Adder {
        "Add" => on_add,
    });

    /// Reads the wrong kind on purpose.
    #[derive(Default)]
    struct Brittle;

    impl Brittle {
        fn on_add(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
            ctx.args().str(0)?;
            Ok(())
        }
    }

    listeners!(Brittle {
        "Add" => on_add,
    });

    /// Unregisters itself from inside its own handler.
    #[derive(Default)]
    struct Quitter {
        calls: u32,
    }

    impl Quitter {
        fn on_ping(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
            self.calls += 1;
            ctx.unregister_all(ctx.owner());
            Ok(())
        }
    }

    listeners!(Quitter {
        "Ping" => on_ping,
    });

    /// Same, but for the "Add" event, to pair with `Brittle`.
    #[derive(Default)]
    struct AddQuitter;

    impl AddQuitter {
        fn on_add(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
            ctx.unregister_all(ctx.owner());
            Ok(())
        }
    }

    listeners!(AddQuitter {
        "Add" => on_add,
    });

    /// Unregisters a different component from inside its handler.
    struct Saboteur {
        target: Handle,
    }

    impl Saboteur {
        fn on_ping(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
            ctx.unregister_all(self.target);
            Ok(())
        }
    }

    listeners!(Saboteur {
        "Ping" => on_ping,
    });

    #[derive(Default)]
    struct Chain {
        seen: Vec<String>,
    }

    impl Chain {
        fn on_first(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
            self.seen.push("first".into());
            ctx.fire("Second", args![]);
            Ok(())
        }

        fn on_second(&mut self, _ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
            self.seen.push("second".into());
            Ok(())
        }
    }

    listeners!(Chain {
        "First" => on_first,
        "Second" => on_second,
    });

    /// Re-fires its own event forever; only the cascade ceiling stops it.
    #[derive(Default)]
    struct Echo;

    impl Echo {
        fn on_echo(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
            ctx.fire("Echo", args![]);
            Ok(())
        }
    }

    listeners!(Echo {
        "Echo" => on_echo,
    });

    /// Removes its own component from inside its handler.
    #[derive(Default)]
    struct Fader {
        calls: u32,
    }

    impl Fader {
        fn on_fade(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
            self.calls += 1;
            ctx.remove(ctx.owner());
            Ok(())
        }
    }

    listeners!(Fader {
        "Fade" => on_fade,
    });

    /// Registers another component's listeners from inside its handler.
    struct Recruiter {
        rookie: Handle,
    }

    impl Recruiter {
        fn on_muster(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
            ctx.register_all(self.rookie);
            Ok(())
        }
    }

    listeners!(Recruiter {
        "Muster" => on_muster,
    });

    /// Forwards its tag so invocation order can be observed end to end.
    struct Tracer {
        tag: &'static str,
    }

    impl Tracer {
        fn on_trace(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
            ctx.fire("Record", args![self.tag]);
            Ok(())
        }
    }

    listeners!(Tracer {
        "Trace" => on_trace,
    });

    #[derive(Default)]
    struct Recorder {
        order: Vec<String>,
    }

    impl Recorder {
        fn on_record(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
            self.order.push(ctx.args().str(0)?.to_string());
            Ok(())
        }
    }

    listeners!(Recorder {
        "Record" => on_record,
    });

    #[derive(Default)]
    struct Introspect {
        expect: Option<Handle>,
        event: String,
        owner_ok: bool,
    }

    impl Introspect {
        fn on_probe(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
            self.event = ctx.event().to_string();
            self.owner_ok = self.expect == Some(ctx.owner());
            Ok(())
        }
    }

    listeners!(Introspect {
        "Probe" => on_probe,
    });

    #[test]
    fn test_register_all_binds_every_declared_listener() {
        let mut bus = Dispatcher::default();
        let probe = bus.insert(Probe::default());
        bus.register_all(probe).unwrap();
        assert_eq!(bus.listener_count("Ping"), 1);
        assert_eq!(bus.listener_count("Pong"), 1);
    }

    #[test]
    fn test_register_all_with_empty_table_is_noop() {
        struct Mute;
        listeners!(Mute {});

        let mut bus = Dispatcher::default();
        let mute = bus.insert(Mute);
        bus.register_all(mute).unwrap();
        assert_eq!(bus.listener_count("Ping"), 0);
    }

    #[test]
    fn test_spawn_registers_and_fires() {
        let mut bus = Dispatcher::default();
        let probe = bus.spawn(Probe::default());
        bus.fire("Ping", args![]).unwrap();
        assert_eq!(bus.get::<Probe>(probe).unwrap().pings, 1);
        assert_eq!(bus.get::<Probe>(probe).unwrap().pongs, 0);
    }

    #[test]
    fn test_register_one_unknown_method_fails_and_leaves_table_untouched() {
        let mut bus = Dispatcher::default();
        let probe = bus.insert(Probe::default());
        let err = bus.register_one(probe, "on_missing").unwrap_err();
        assert!(matches!(err, RegisterError::MethodNotFound { .. }));
        assert_eq!(bus.listener_count("Ping"), 0);
        assert_eq!(bus.listener_count("Pong"), 0);
    }

    #[test]
    fn test_register_with_stale_handle_fails() {
        let mut bus = Dispatcher::default();
        let probe = bus.insert(Probe::default());
        bus.remove(probe);
        assert!(matches!(
            bus.register_all(probe),
            Err(RegisterError::StaleHandle { .. })
        ));
        assert!(matches!(
            bus.register_one(probe, "on_ping"),
            Err(RegisterError::StaleHandle { .. })
        ));
    }

    #[test]
    fn test_unregister_one_keeps_other_events() {
        let mut bus = Dispatcher::default();
        let probe = bus.spawn(Probe::default());
        bus.unregister_one(probe, "on_ping");

        bus.fire("Ping", args![]).unwrap();
        bus.fire("Pong", args![]).unwrap();

        let p = bus.get::<Probe>(probe).unwrap();
        assert_eq!(p.pings, 0, "unregistered listener must not fire");
        assert_eq!(p.pongs, 1, "sibling listener must be unaffected");
    }

    #[test]
    fn test_unregister_all_spares_other_owners() {
        let mut bus = Dispatcher::default();
        let quiet = bus.spawn(Probe::default());
        let loud = bus.spawn(Probe::default());
        bus.unregister_all(quiet);

        bus.fire("Ping", args![]).unwrap();
        assert_eq!(bus.get::<Probe>(quiet).unwrap().pings, 0);
        assert_eq!(bus.get::<Probe>(loud).unwrap().pings, 1);

        // Idempotent: nothing left to remove.
        bus.unregister_all(quiet);
    }

    #[test]
    fn test_fire_unknown_event_is_silent_noop() {
        let mut bus = Dispatcher::default();
        let probe = bus.spawn(Probe::default());
        assert!(bus.fire("NoSuchEvent", args![]).is_ok());
        assert_eq!(bus.get::<Probe>(probe).unwrap().pings, 0);
    }

    #[test]
    fn test_removed_owner_is_pruned_on_first_fire() {
        let mut bus = Dispatcher::default();
        let probe = bus.spawn(Probe::default());
        bus.remove(probe);

        assert_eq!(bus.listener_count("Ping"), 1, "pruning is lazy");
        bus.fire("Ping", args![]).unwrap();
        assert_eq!(bus.listener_count("Ping"), 0, "first fire prunes");
        bus.fire("Ping", args![]).unwrap();
    }

    #[test]
    fn test_reregistration_is_idempotent_under_dedupe() {
        let mut bus = Dispatcher::default();
        let probe = bus.spawn(Probe::default());

        bus.register_all(probe).unwrap();
        assert_eq!(bus.listener_count("Ping"), 1);

        bus.unregister_one(probe, "on_ping");
        bus.register_one(probe, "on_ping").unwrap();
        bus.fire("Ping", args![]).unwrap();
        assert_eq!(bus.get::<Probe>(probe).unwrap().pings, 1);
    }

    #[test]
    fn test_append_policy_fans_out_per_registration() {
        let mut bus = Dispatcher::new(DispatcherConfig {
            register: RegisterPolicy::Append,
            ..Default::default()
        });
        let probe = bus.spawn(Probe::default());
        bus.register_one(probe, "on_ping").unwrap();
        assert_eq!(bus.listener_count("Ping"), 2);

        bus.fire("Ping", args![]).unwrap();
        assert_eq!(bus.get::<Probe>(probe).unwrap().pings, 2);

        bus.unregister_one(probe, "on_ping");
        assert_eq!(bus.listener_count("Ping"), 0, "all duplicates removed");
    }

    #[test]
    fn test_payload_reaches_every_fire() {
        let mut bus = Dispatcher::default();
        let adder = bus.spawn(Adder::default());
        bus.fire("Add", args![5]).unwrap();
        bus.fire("Add", args![2]).unwrap();
        assert_eq!(bus.get::<Adder>(adder).unwrap().total, 7);
    }

    #[test]
    fn test_shape_mismatch_propagates_and_aborts_pass() {
        let mut bus = Dispatcher::default();
        let early = bus.spawn(Adder::default());
        bus.spawn(Brittle);
        let late = bus.spawn(Adder::default());

        let err = bus.fire("Add", args![5]).unwrap_err();
        match &err {
            FireError::Listener {
                event,
                method,
                component,
                source,
            } => {
                assert_eq!(&**event, "Add");
                assert_eq!(*method, "on_add");
                assert!(component.contains("Brittle"));
                assert!(matches!(
                    source,
                    ListenerError::Arg(ArgError::Kind { index: 0, .. })
                ));
            }
            other => panic!("unexpected error: {other}"),
        }

        // Reverse order: `late` ran before the fault, `early` never did.
        assert_eq!(bus.get::<Adder>(late).unwrap().total, 5);
        assert_eq!(bus.get::<Adder>(early).unwrap().total, 0);
    }

    #[test]
    fn test_fault_message_names_event_method_and_type() {
        let mut bus = Dispatcher::default();
        bus.spawn(Brittle);
        let err = bus.fire("Add", args![1]).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("Add"));
        assert!(text.contains("on_add"));
        assert!(text.contains("Brittle"));
    }

    #[test]
    fn test_self_unregister_mid_pass_skips_nobody() {
        let mut bus = Dispatcher::default();
        let a = bus.spawn(Probe::default());
        let quitter = bus.spawn(Quitter::default());
        let c = bus.spawn(Probe::default());

        bus.fire("Ping", args![]).unwrap();
        assert_eq!(bus.get::<Probe>(a).unwrap().pings, 1);
        assert_eq!(bus.get::<Quitter>(quitter).unwrap().calls, 1);
        assert_eq!(bus.get::<Probe>(c).unwrap().pings, 1);
        assert_eq!(bus.listener_count("Ping"), 2);

        bus.fire("Ping", args![]).unwrap();
        assert_eq!(
            bus.get::<Quitter>(quitter).unwrap().calls,
            1,
            "quitter must not fire after unregistering itself"
        );
        assert_eq!(bus.get::<Probe>(a).unwrap().pings, 2);
    }

    #[test]
    fn test_unregistering_another_listener_mid_pass_skips_nobody() {
        let mut bus = Dispatcher::default();
        let victim = bus.spawn(Probe::default());
        bus.spawn(Saboteur { target: victim });
        let bystander = bus.spawn(Probe::default());

        bus.fire("Ping", args![]).unwrap();
        // The saboteur runs before the victim (reverse order), but removal
        // is deferred, so the victim still fires exactly once this pass.
        assert_eq!(bus.get::<Probe>(victim).unwrap().pings, 1);
        assert_eq!(bus.get::<Probe>(bystander).unwrap().pings, 1);

        bus.fire("Ping", args![]).unwrap();
        assert_eq!(bus.get::<Probe>(victim).unwrap().pings, 1);
        assert_eq!(bus.get::<Probe>(bystander).unwrap().pings, 2);
    }

    #[test]
    fn test_fire_order_is_reverse_registration() {
        let mut bus = Dispatcher::default();
        let recorder = bus.spawn(Recorder::default());
        bus.spawn(Tracer { tag: "a" });
        bus.spawn(Tracer { tag: "b" });
        bus.spawn(Tracer { tag: "c" });

        bus.fire("Trace", args![]).unwrap();
        assert_eq!(
            bus.get::<Recorder>(recorder).unwrap().order,
            vec!["c", "b", "a"]
        );
    }

    #[test]
    fn test_cascaded_fire_runs_after_current_pass() {
        let mut bus = Dispatcher::default();
        let chain = bus.spawn(Chain::default());
        bus.fire("First", args![]).unwrap();
        assert_eq!(bus.get::<Chain>(chain).unwrap().seen, vec!["first", "second"]);
    }

    #[test]
    fn test_cascade_ceiling_cuts_off_loops() {
        let mut bus = Dispatcher::new(DispatcherConfig {
            max_cascade: 3,
            ..Default::default()
        });
        bus.spawn(Echo);
        let err = bus.fire("Echo", args![]).unwrap_err();
        assert!(matches!(err, FireError::CascadeOverflow { limit: 3, .. }));
    }

    #[test]
    fn test_deferred_remove_takes_effect_after_pass() {
        let mut bus = Dispatcher::default();
        let fader = bus.spawn(Fader::default());

        bus.fire("Fade", args![]).unwrap();
        assert!(!bus.contains(fader));
        assert_eq!(bus.listener_count("Fade"), 1, "binding pruned lazily");

        bus.fire("Fade", args![]).unwrap();
        assert_eq!(bus.listener_count("Fade"), 0);
    }

    #[test]
    fn test_deferred_register_applies_after_pass() {
        let mut bus = Dispatcher::default();
        let rookie = bus.insert(Probe::default());
        bus.spawn(Recruiter { rookie });

        bus.fire("Muster", args![]).unwrap();
        assert_eq!(bus.listener_count("Ping"), 1);

        bus.fire("Ping", args![]).unwrap();
        assert_eq!(bus.get::<Probe>(rookie).unwrap().pings, 1);
    }

    #[test]
    fn test_ops_before_a_fault_still_apply() {
        let mut bus = Dispatcher::default();
        bus.spawn(Brittle);
        let quitter = bus.spawn(AddQuitter);

        // Reverse order: the quitter runs first and queues its unregister,
        // then Brittle faults. The queued op must survive the fault.
        assert!(bus.fire("Add", args![1]).is_err());
        assert_eq!(bus.listener_count("Add"), 1);

        bus.unregister_all(quitter);
        assert_eq!(bus.listener_count("Add"), 1, "only Brittle should remain");
    }

    #[test]
    fn test_ctx_reports_event_and_owner() {
        let mut bus = Dispatcher::default();
        let h = bus.spawn(Introspect::default());
        bus.get_mut::<Introspect>(h).unwrap().expect = Some(h);

        bus.fire("Probe", args![]).unwrap();
        let seen = bus.get::<Introspect>(h).unwrap();
        assert_eq!(seen.event, "Probe");
        assert!(seen.owner_ok);
    }
}
