//! Argument values and caller identity
//!
//! A provider hands out one [`ArgumentValue`] per call. The payload is a small
//! dynamically typed [`Value`] so literal lists from configuration files can mix
//! strings, integers, floats and booleans.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Dynamically typed parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Borrow the text payload, if this is a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload, if this is an integer value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// A resolved parameter: its name and the value handed out for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentValue {
    pub name: String,
    pub value: Value,
}

impl ArgumentValue {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Look up an already resolved value by parameter name
pub fn find_resolved<'a>(resolved: &'a [ArgumentValue], name: &str) -> Option<&'a Value> {
    resolved.iter().find(|arg| arg.name == name).map(|arg| &arg.value)
}

/// Opaque identity of the caller asking for a value
///
/// Per-caller policies key their cursors by this id. Engines that model callers
/// as tasks or actors pass their own ids; thread-based engines can use
/// [`CallerId::current`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallerId(pub u64);

static NEXT_THREAD_CALLER: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_CALLER: Cell<u64> = const { Cell::new(0) };
}

impl CallerId {
    /// Caller id of the current OS thread
    ///
    /// Ids come from a process-wide counter and are never reused, even after
    /// the thread exits.
    pub fn current() -> Self {
        THREAD_CALLER.with(|slot| {
            let mut id = slot.get();
            if id == 0 {
                id = NEXT_THREAD_CALLER.fetch_add(1, Ordering::Relaxed);
                slot.set(id);
            }
            CallerId(id)
        })
    }
}

impl From<u64> for CallerId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "caller-{}", self.0)
    }
}
