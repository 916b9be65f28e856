//! Dot-path resolution into records.

use serde_json::{Map, Value};

/// Outcome of resolving a field path against a record.
///
/// `Missing` is distinct from a present JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Missing,
    Found(&'a Value),
}

impl<'a> Resolved<'a> {
    /// Returns the found value, if any.
    pub fn value(self) -> Option<&'a Value> {
        match self {
            Resolved::Missing => None,
            Resolved::Found(value) => Some(value),
        }
    }

    /// Returns true if resolution failed.
    pub fn is_missing(self) -> bool {
        matches!(self, Resolved::Missing)
    }
}

/// A record filters can be evaluated against.
///
/// Only the first path segment goes through the record; deeper segments
/// descend into the returned JSON value.
pub trait Record {
    /// Returns the top-level member named `key`.
    fn member(&self, key: &str) -> Option<&Value>;
}

impl Record for Value {
    fn member(&self, key: &str) -> Option<&Value> {
        child(self, key)
    }
}

impl Record for Map<String, Value> {
    fn member(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn member(&self, key: &str) -> Option<&Value> {
        (**self).member(key)
    }
}

/// Looks up one level below `value`. Objects are indexed by key, arrays by
/// decimal position; every other value has no members.
fn child<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Resolves a dot-separated `path` against `record`.
///
/// Each step short-circuits to [`Resolved::Missing`] when the level is absent
/// or the current value cannot be indexed (including `null`).
pub fn resolve<'a, R: Record + ?Sized>(record: &'a R, path: &str) -> Resolved<'a> {
    let mut segments = path.split('.');
    let first = segments.next().unwrap_or_default();

    let Some(mut current) = record.member(first) else {
        return Resolved::Missing;
    };

    for segment in segments {
        match child(current, segment) {
            Some(next) => current = next,
            None => return Resolved::Missing,
        }
    }

    Resolved::Found(current)
}
