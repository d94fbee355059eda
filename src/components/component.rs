//! # Component trait and listener declaration tables.
//!
//! A component is any `'static` type that declares which named events it
//! listens to. Declarations are an explicit, compile-time table: a static
//! slice of [`ListenerSpec`] entries, one per (event name, method) pair.
//! There is no runtime type scan - what the table says is what fires.
//!
//! The [`listeners!`](crate::listeners) macro writes both the table and the
//! [`Component`] impl:
//!
//! ```
//! use signalbus::{EventCtx, ListenerError};
//!
//! struct Turret {
//!     shots: u32,
//! }
//!
//! impl Turret {
//!     fn on_fire_order(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
//!         self.shots += ctx.args().int(0)? as u32;
//!         Ok(())
//!     }
//! }
//!
//! signalbus::listeners!(Turret {
//!     "FireOrder" => on_fire_order,
//! });
//! ```
//!
//! Listener methods may be private to their module; the table is declared
//! next to the type, where they are visible.

use std::any::Any;

use crate::error::ListenerError;
use crate::events::EventCtx;

/// Type-erased listener entry point.
///
/// Downcasts the target back to the declaring type and calls the listener
/// method. Produced by the [`listeners!`](crate::listeners) macro; plain fn
/// pointer, no captures.
pub type ListenerFn = fn(&mut dyn Any, &mut EventCtx<'_>) -> Result<(), ListenerError>;

/// One row of a component type's listener table.
///
/// Pairs an event name with the method identifier and the erased thunk that
/// invokes it. The fields are public so the table can be written by hand,
/// but the normal way to produce one is [`listeners!`](crate::listeners).
#[derive(Clone, Copy)]
pub struct ListenerSpec {
    /// Event name this listener subscribes to.
    pub event: &'static str,
    /// Identifier of the listener method, used for selective (un)register.
    pub method: &'static str,
    /// Erased invocation thunk.
    pub thunk: ListenerFn,
}

/// # A live object that can own event listeners.
///
/// Implemented for any `'static` type, normally via the
/// [`listeners!`](crate::listeners) macro. Components are stored in
/// [`Components`](super::Components) and addressed through generation-checked
/// [`Handle`](super::Handle)s; the dispatcher reads [`Self::listeners`] at
/// registration time to create bindings.
pub trait Component: 'static {
    /// Returns this type's listener declaration table.
    ///
    /// An empty table is valid: the component can still live in the arena,
    /// it just never receives events through `register_all`.
    fn listeners(&self) -> &'static [ListenerSpec];

    /// Upcast for typed read access.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for listener invocation and typed write access.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the component type's name, used in diagnostics and faults.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose -
    /// override it when a short name reads better in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Declares a component's listener table and implements [`Component`].
///
/// Takes the component type followed by `"EventName" => method_name` pairs.
/// Each method must have the signature
/// `fn(&mut self, &mut EventCtx<'_>) -> Result<(), ListenerError>` and may
/// be private to the declaring module.
///
/// ```
/// use signalbus::{EventCtx, ListenerError};
///
/// #[derive(Default)]
/// struct Scoreboard {
///     points: i64,
/// }
///
/// impl Scoreboard {
///     fn on_score(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
///         self.points += ctx.args().int(0)?;
///         Ok(())
///     }
///
///     fn on_reset(&mut self, _ctx: &mut EventCtx<'_>) -> Result<(), ListenerError> {
///         self.points = 0;
///         Ok(())
///     }
/// }
///
/// signalbus::listeners!(Scoreboard {
///     "Score" => on_score,
///     "MatchReset" => on_reset,
/// });
/// ```
#[macro_export]
macro_rules! listeners {
    ($ty:ty { $($event:literal => $method:ident),* $(,)? }) => {
        impl $crate::Component for $ty {
            fn listeners(&self) -> &'static [$crate::ListenerSpec] {
                const SPECS: &[$crate::ListenerSpec] = &[
                    $(
                        $crate::ListenerSpec {
                            event: $event,
                            method: stringify!($method),
                            thunk: |target, ctx| match target.downcast_mut::<$ty>() {
                                Some(this) => <$ty>::$method(this, ctx),
                                None => Err($crate::ListenerError::TargetMismatch {
                                    expected: ::std::any::type_name::<$ty>(),
                                }),
                            },
                        },
                    )*
                ];
                SPECS
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
}
