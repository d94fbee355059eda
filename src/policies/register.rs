//! # Duplicate-registration policy.
//!
//! [`RegisterPolicy`] decides what happens when a binding is created for an
//! (owner, method) pair that already has a binding under the same event name.
//!
//! - [`RegisterPolicy::Dedupe`] re-registration is idempotent (default).
//! - [`RegisterPolicy::Append`] every registration appends a binding.
//!
//! ## Choosing the right policy
//!
//! **Components that re-register on state changes** (pause/resume, respawn):
//! ```text
//! RegisterPolicy::Dedupe    → one binding per (owner, method), one
//!                             invocation per fire, no bookkeeping needed
//! ```
//!
//! **Intentional fan-out** (the same listener should run once per
//! registration, e.g. stacking buffs):
//! ```text
//! RegisterPolicy::Append    → N registrations → N invocations per fire;
//!                             unregister_one removes all N at once
//! ```

/// Policy controlling duplicate listener registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterPolicy {
    /// Registering an (owner, method) pair already bound to the same event
    /// is a no-op (default).
    Dedupe,
    /// Every registration appends a binding; duplicates fire once each.
    Append,
}

impl Default for RegisterPolicy {
    /// Returns [`RegisterPolicy::Dedupe`].
    fn default() -> Self {
        RegisterPolicy::Dedupe
    }
}
