//! Error types used by the dispatcher and by listener bodies.
//!
//! This module defines the error enums on both sides of a fire pass:
//!
//! - [`RegisterError`] - errors raised while creating bindings.
//! - [`FireError`] - errors raised by a fire pass and propagated to its caller.
//! - [`ListenerError`] - errors returned by listener bodies themselves.
//! - [`ArgError`] - argument-bundle access failures (missing slot, wrong kind).
//!
//! All types provide `as_label` helpers for logging/metrics.
//!
//! ## What is *not* an error
//! - Firing an event name nobody listens to: silent no-op.
//! - A binding whose owner was removed: pruned during the next fire pass,
//!   no error, no log required.

use std::sync::Arc;
use thiserror::Error;

use crate::components::Handle;

/// # Errors produced while registering listeners.
///
/// Registration fails fast and leaves the subscriber table unmodified.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegisterError {
    /// The owner handle does not resolve to a live component.
    #[error("component handle {handle} is not alive")]
    StaleHandle {
        /// The stale handle that was passed in.
        handle: Handle,
    },

    /// No listener with this method identifier is declared on the owner's type.
    #[error("no listener `{method}` declared on `{component}`")]
    MethodNotFound {
        /// The method identifier that was requested.
        method: String,
        /// Name of the component type that was searched.
        component: &'static str,
    },
}

impl RegisterError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use signalbus::RegisterError;
    ///
    /// let err = RegisterError::MethodNotFound {
    ///     method: "on_hit".into(),
    ///     component: "Player",
    /// };
    /// assert_eq!(err.as_label(), "register_method_not_found");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegisterError::StaleHandle { .. } => "register_stale_handle",
            RegisterError::MethodNotFound { .. } => "register_method_not_found",
        }
    }
}

/// # Argument-bundle access failures.
///
/// Produced by the typed accessors on [`Args`](crate::Args) when a listener
/// reads a slot that is absent or holds a different kind of value. Converts
/// into [`ListenerError`] via `?`, so a shape mismatch surfaces as an
/// invocation fault instead of a silent no-op.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    /// The bundle has no value at this index.
    #[error("argument {index} is missing")]
    Missing {
        /// Zero-based slot index.
        index: usize,
    },

    /// The value at this index has a different kind than requested.
    #[error("argument {index}: expected {expected}, got {actual}")]
    Kind {
        /// Zero-based slot index.
        index: usize,
        /// Kind the accessor asked for.
        expected: &'static str,
        /// Kind actually stored in the slot.
        actual: &'static str,
    },
}

impl ArgError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ArgError::Missing { .. } => "arg_missing",
            ArgError::Kind { .. } => "arg_kind_mismatch",
        }
    }
}

/// # Errors returned by listener bodies.
///
/// A listener returns `Result<(), ListenerError>`. Argument access failures
/// convert automatically; domain failures go through [`ListenerError::failed`].
///
/// # Example
/// ```
/// use signalbus::ListenerError;
///
/// let err = ListenerError::failed("health went negative");
/// assert_eq!(err.as_label(), "listener_failed");
/// ```
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ListenerError {
    /// The fire payload did not match the shape the listener expects.
    #[error(transparent)]
    Arg(#[from] ArgError),

    /// The invocation target was not of the listener's declaring type.
    ///
    /// Listener tables are read from the live component itself, so this is
    /// unreachable through normal dispatcher use.
    #[error("invocation target is not a `{expected}`")]
    TargetMismatch {
        /// The declaring type the thunk expected.
        expected: &'static str,
    },

    /// The listener body itself failed.
    #[error("{message}")]
    Failed {
        /// Human-readable failure message.
        message: String,
    },
}

impl ListenerError {
    /// Creates a domain failure with the given message.
    pub fn failed(message: impl Into<String>) -> Self {
        ListenerError::Failed {
            message: message.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Arg(e) => e.as_label(),
            ListenerError::TargetMismatch { .. } => "listener_target_mismatch",
            ListenerError::Failed { .. } => "listener_failed",
        }
    }
}

/// # Errors propagated out of a fire pass.
///
/// A listener fault is never swallowed: it is wrapped with the event name,
/// the listener method and the declaring type, and re-raised to whoever
/// called [`Dispatcher::fire`](crate::Dispatcher::fire). Listeners ordered
/// after the faulting one in the same pass are not invoked.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum FireError {
    /// A listener faulted while handling the event.
    #[error("listener `{method}` on `{component}` failed for event `{event}`: {source}")]
    Listener {
        /// Event name being fired.
        event: Arc<str>,
        /// Method identifier of the faulting listener.
        method: &'static str,
        /// Name of the listener's declaring type.
        component: &'static str,
        /// The underlying listener fault.
        #[source]
        source: ListenerError,
    },

    /// Cascaded fires exceeded the configured ceiling.
    ///
    /// Raised when deferred `fire` requests keep re-queueing past
    /// [`DispatcherConfig::max_cascade`](crate::DispatcherConfig::max_cascade);
    /// usually a listener re-firing its own event.
    #[error("cascade ceiling {limit} exceeded while firing `{event}`")]
    CascadeOverflow {
        /// Event name that was being fired when the ceiling was hit.
        event: Arc<str>,
        /// The configured ceiling.
        limit: usize,
    },
}

impl FireError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use signalbus::{FireError, ListenerError};
    ///
    /// let err = FireError::Listener {
    ///     event: "Hit".into(),
    ///     method: "on_hit",
    ///     component: "Player",
    ///     source: ListenerError::failed("boom"),
    /// };
    /// assert_eq!(err.as_label(), "fire_listener_fault");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            FireError::Listener { .. } => "fire_listener_fault",
            FireError::CascadeOverflow { .. } => "fire_cascade_overflow",
        }
    }
}
