//! Dispatch core: subscriptions and the fire loop.
//!
//! Internal modules:
//! - [`binding`]: the per-subscription [`Binding`] record;
//! - [`config`]: per-dispatcher settings;
//! - [`dispatcher`]: the [`Dispatcher`] itself - registration, firing,
//!   lazy pruning, deferred ops.

mod binding;
mod config;
mod dispatcher;

pub use binding::Binding;
pub use config::DispatcherConfig;
pub use dispatcher::Dispatcher;
