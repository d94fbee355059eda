//! # signalbus
//!
//! **Signalbus** is a named-event dispatch library for component models.
//!
//! Components declare which events they listen to through an explicit,
//! compile-time table; a [`Dispatcher`] owns the live components, maps event
//! names to ordered listener bindings, and fires events with caller-supplied
//! argument bundles. The crate is designed as a building block for game
//! runtimes and other simulation loops that route named signals between
//! live objects.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐
//!  │  Component  │  │  Component  │  │  Component  │
//!  │ listeners!{}│  │ listeners!{}│  │ listeners!{}│
//!  └──────┬──────┘  └──────┬──────┘  └──────┬──────┘
//!         ▼ spawn / register_all            ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │  Dispatcher (explicit context object, one per domain)    │
//! │  - Components (arena, generation-checked handles)        │
//! │  - subscribers: event name → ordered Vec<Binding>        │
//! └──────────────────────────┬───────────────────────────────┘
//!                            │ fire("Name", args![...])
//!                            ▼
//!               pass over bindings, newest → oldest
//!                  ├─ owner dead  → prune in place
//!                  ├─ owner alive → invoke listener method
//!                  │     └─ fault → wrap + re-raise to caller
//!                  └─ ctx ops (fire/register/remove) → after pass
//! ```
//!
//! ### Liveness
//! A [`Handle`] pairs a slot index with a generation. Removing a component
//! bumps the generation, so every binding it owned goes stale at once;
//! stale bindings are swept out lazily by the next fire pass that meets
//! them. Nothing is ever invoked on a dead owner.
//!
//! ## Features
//! | Area               | Description                                                          | Key types / macros                       |
//! |--------------------|----------------------------------------------------------------------|------------------------------------------|
//! | **Declaration**    | Explicit per-type listener tables, no runtime reflection.            | [`listeners!`], [`ListenerSpec`]         |
//! | **Ownership**      | Arena storage with generation-checked handles.                       | [`Components`], [`Handle`]               |
//! | **Dispatch**       | Ordered fan-out, lazy pruning, deferred reentrant mutation.          | [`Dispatcher`], [`Binding`], [`EventCtx`]|
//! | **Payloads**       | Closed tagged-union argument bundles with typed accessors.           | [`Args`], [`Value`], [`args!`]           |
//! | **Policies**       | Duplicate-registration handling per dispatcher.                      | [`RegisterPolicy`]                       |
//! | **Errors**         | Fail-loud invocation faults naming event, method and type.           | [`FireError`], [`RegisterError`]         |
//!
//! ## Concurrency
//! Single-threaded and synchronous: every operation runs to completion on
//! the calling thread, with no locking and no suspension points. Wrap the
//! whole dispatcher in a mutex if a multi-threaded host needs one, and hold
//! the lock for entire operations - a fire pass must not interleave with
//! other mutations.
//!
//! ## Example
//! ```rust
//! use signalbus::{args, listeners, Dispatcher, EventCtx, ListenerError};
//!
//! #[derive(Default)]
//! struct Turret {
//!     shots_left: i64,
//! }
//!
//! impl Turret {
//!     fn on_fire_order(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
//!         let rounds = ctx.args().int(0)?;
//!         if rounds > self.shots_left {
//!             return Err(ListenerError::failed("out of ammo"));
//!         }
//!         self.shots_left -= rounds;
//!         Ok(())
//!     }
//!
//!     fn on_resupply(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
//!         self.shots_left += ctx.args().int(0)?;
//!         Ok(())
//!     }
//! }
//!
//! listeners!(Turret {
//!     "FireOrder" => on_fire_order,
//!     "Resupply" => on_resupply,
//! });
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut bus = Dispatcher::default();
//!     let turret = bus.spawn(Turret { shots_left: 3 });
//!
//!     bus.fire("FireOrder", args![2])?;
//!     assert_eq!(bus.get::<Turret>(turret).unwrap().shots_left, 1);
//!
//!     // Selective unregister: the resupply listener keeps working.
//!     bus.unregister_one(turret, "on_fire_order");
//!     bus.fire("FireOrder", args![2])?;
//!     bus.fire("Resupply", args![4])?;
//!     assert_eq!(bus.get::<Turret>(turret).unwrap().shots_left, 5);
//!
//!     // Dead owners are pruned, never invoked.
//!     bus.remove(turret);
//!     bus.fire("Resupply", args![1])?;
//!     Ok(())
//! }
//! ```

mod components;
mod dispatch;
mod error;
mod events;
mod policies;

// ---- Public re-exports ----

pub use components::{Component, Components, Handle, ListenerFn, ListenerSpec};
pub use dispatch::{Binding, Dispatcher, DispatcherConfig};
pub use error::{ArgError, FireError, ListenerError, RegisterError};
pub use events::{Args, EventCtx, Value};
pub use policies::RegisterPolicy;
