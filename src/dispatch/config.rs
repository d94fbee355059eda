//! # Dispatcher configuration.
//!
//! Provides [`DispatcherConfig`], the per-dispatcher settings consulted at
//! registration and fire time.
//!
//! ## Sentinel values
//! - `max_cascade = 0` → unlimited (no cascade ceiling enforced)

use crate::policies::RegisterPolicy;

/// Configuration for one [`Dispatcher`](crate::Dispatcher) instance.
///
/// ## Field semantics
/// - `register`: what happens when an (owner, method) pair is registered
///   twice under the same event (see [`RegisterPolicy`])
/// - `max_cascade`: ceiling on events processed per outer `fire` call,
///   cascaded fires included (`0` = unlimited)
#[derive(Clone, Copy, Debug, Default)]
pub struct DispatcherConfig {
    /// Duplicate-registration policy.
    ///
    /// Consulted every time a binding is about to be appended. Can only be
    /// chosen per dispatcher, not per event.
    pub register: RegisterPolicy,

    /// Maximum number of events one `fire` call may process.
    ///
    /// - `0` = unlimited - a listener chain that keeps re-firing its own
    ///   event will loop until it stops itself
    /// - `n > 0` = the n+1-th event of a single outer call fails with
    ///   `FireError::CascadeOverflow`
    ///
    /// Counts the outer event itself plus every cascaded fire.
    pub max_cascade: usize,
}

impl DispatcherConfig {
    /// Returns the cascade ceiling as an `Option`.
    ///
    /// - `None` → unlimited
    /// - `Some(n)` → at most `n` events per outer fire call
    #[inline]
    pub fn cascade_limit(&self) -> Option<usize> {
        if self.max_cascade == 0 {
            None
        } else {
            Some(self.max_cascade)
        }
    }
}
