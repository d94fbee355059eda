//! # Tagged argument bundles for fire payloads.
//!
//! The payload of a fire call is an [`Args`] bundle: an ordered sequence of
//! [`Value`]s drawn from a closed set of kinds. Publishers build a bundle
//! (usually with the [`args!`](crate::args) macro) and every listener for
//! the event receives the same bundle by reference.
//!
//! Listeners read slots through typed accessors. By convention all listeners
//! registered under one event name agree on the bundle shape; the dispatcher
//! does not enforce this structurally, so a misdeclared listener surfaces at
//! invocation time as an [`ArgError`] - loud, not a silent no-op.

use std::sync::Arc;

use crate::components::Handle;
use crate::error::ArgError;

/// One payload slot: a closed tagged union of the kinds events carry.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Shared string.
    Str(Arc<str>),
    /// Reference to another component.
    Handle(Handle),
}

impl Value {
    /// Returns the kind name used in diagnostics ("bool", "int", ...).
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Handle(_) => "handle",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v.into())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v.into())
    }
}

impl From<Handle> for Value {
    fn from(v: Handle) -> Self {
        Value::Handle(v)
    }
}

/// Ordered, variable-length fire payload.
///
/// ### Accessors
/// Every accessor takes a zero-based slot index and returns `Result`:
/// [`ArgError::Missing`] when the slot is absent, [`ArgError::Kind`] when it
/// holds a different kind. Both convert into
/// [`ListenerError`](crate::ListenerError) with `?` inside a listener body.
///
/// # Example
/// ```
/// use signalbus::args;
///
/// let a = args![3, "goblin", true];
/// assert_eq!(a.int(0).unwrap(), 3);
/// assert_eq!(a.str(1).unwrap(), "goblin");
/// assert!(a.bool(2).unwrap());
/// assert!(a.int(3).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    values: Vec<Value>,
}

impl Args {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.values.push(value.into());
    }

    /// Appends a value, builder style.
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.push(value);
        self
    }

    /// Number of slots in the bundle.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the bundle carries no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the raw value at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Reads slot `index` as a bool.
    pub fn bool(&self, index: usize) -> Result<bool, ArgError> {
        match self.slot(index)? {
            Value::Bool(v) => Ok(*v),
            other => Err(self.kind_mismatch(index, "bool", other)),
        }
    }

    /// Reads slot `index` as an integer.
    pub fn int(&self, index: usize) -> Result<i64, ArgError> {
        match self.slot(index)? {
            Value::Int(v) => Ok(*v),
            other => Err(self.kind_mismatch(index, "int", other)),
        }
    }

    /// Reads slot `index` as a float.
    pub fn float(&self, index: usize) -> Result<f64, ArgError> {
        match self.slot(index)? {
            Value::Float(v) => Ok(*v),
            other => Err(self.kind_mismatch(index, "float", other)),
        }
    }

    /// Reads slot `index` as a string.
    pub fn str(&self, index: usize) -> Result<&str, ArgError> {
        match self.slot(index)? {
            Value::Str(v) => Ok(v),
            other => Err(self.kind_mismatch(index, "str", other)),
        }
    }

    /// Reads slot `index` as a component handle.
    pub fn handle(&self, index: usize) -> Result<Handle, ArgError> {
        match self.slot(index)? {
            Value::Handle(v) => Ok(*v),
            other => Err(self.kind_mismatch(index, "handle", other)),
        }
    }

    fn slot(&self, index: usize) -> Result<&Value, ArgError> {
        self.values.get(index).ok_or(ArgError::Missing { index })
    }

    fn kind_mismatch(&self, index: usize, expected: &'static str, actual: &Value) -> ArgError {
        ArgError::Kind {
            index,
            expected,
            actual: actual.kind(),
        }
    }
}

/// Builds an [`Args`] bundle from a list of values.
///
/// ```
/// use signalbus::args;
///
/// let empty = args![];
/// assert!(empty.is_empty());
///
/// let payload = args![42, "west gate", 0.5];
/// assert_eq!(payload.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($value:expr),+ $(,)?) => {{
        let mut bundle = $crate::Args::new();
        $(bundle.push($value);)+
        bundle
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_return_typed_values() {
        let a = Args::new().with(true).with(9i64).with(1.5f64).with("hi");
        assert!(a.bool(0).unwrap());
        assert_eq!(a.int(1).unwrap(), 9);
        assert_eq!(a.float(2).unwrap(), 1.5);
        assert_eq!(a.str(3).unwrap(), "hi");
    }

    #[test]
    fn test_missing_slot_reports_index() {
        let a = Args::new();
        assert_eq!(a.int(0), Err(ArgError::Missing { index: 0 }));
    }

    #[test]
    fn test_kind_mismatch_names_both_kinds() {
        let a = args!["not a number"];
        let err = a.int(0).unwrap_err();
        assert_eq!(
            err,
            ArgError::Kind {
                index: 0,
                expected: "int",
                actual: "str",
            }
        );
    }

    #[test]
    fn test_args_macro_matches_builder() {
        let via_macro = args![1, "x"];
        let via_builder = Args::new().with(1).with("x");
        assert_eq!(via_macro, via_builder);
    }
}
