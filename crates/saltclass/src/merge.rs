//! deterministic deep merge of two trees
//!
//! `merge(a, b)` folds `b` into `a`. For every key of `b`:
//! - both arrays: `a` is extended with `b`, unless `b` starts with the [OVERRIDE_SENTINEL]
//!   in which case the sentinel is dropped and the rest of `b` replaces `a`
//! - both objects: merged recursively
//! - equal values: nothing happens
//! - anything else: `b` wins
use crate::value::{Map, Value};

/// First array element that turns "extend" into "replace"
pub const OVERRIDE_SENTINEL: &str = "^";

/// Merge `b` into `a` in place and return `a`
pub fn merge(a: &mut Map, b: Map) -> &mut Map {
    for (key, new) in b {
        match a.get_mut(&key) {
            Some(existing) => merge_value(existing, new),
            None => {
                a.insert(key, new);
            }
        }
    }

    a
}

fn merge_value(existing: &mut Value, new: Value) {
    match (existing, new) {
        (Value::Array(existing), Value::Array(mut new)) => {
            if is_override(&new) {
                new.remove(0);
                tracing::trace!(len = new.len(), "array replaced");
                *existing = new;
            } else {
                existing.append(&mut new);
            }
        }
        (Value::Object(existing), Value::Object(new)) => {
            merge(existing, new);
        }
        (existing, new) => {
            if *existing != new {
                *existing = new;
            }
        }
    }
}

fn is_override(array: &[Value]) -> bool {
    matches!(array.first(), Some(Value::String(first)) if first == OVERRIDE_SENTINEL)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::yaml;
    use pretty_assertions::assert_eq;

    fn object(value: Value) -> Map {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other.kind()),
        }
    }

    fn merged(a: &str, b: &str) -> Value {
        let mut a = object(yaml!(a));
        merge(&mut a, object(yaml!(b)));
        Value::Object(a)
    }

    #[test]
    fn merging_empty_is_identity() {
        let a = object(yaml!("x: [1, 2]\ny: {z: text}\nw: 3"));
        let mut copy = a.clone();
        merge(&mut copy, Map::new());
        assert_eq!(copy, a);
    }

    #[test]
    fn arrays_extend() {
        assert_eq!(merged("x: [p, q]", "x: [a, b]"), yaml!("x: [p, q, a, b]"));
    }

    #[test]
    fn sentinel_replaces_array() {
        assert_eq!(merged("x: [p, q]", "x: ['^', a, b]"), yaml!("x: [a, b]"));
    }

    #[test]
    fn sentinel_only_clears_array() {
        assert_eq!(merged("x: [p, q]", "x: ['^']"), yaml!("x: []"));
    }

    #[test]
    fn sentinel_kept_on_new_key() {
        assert_eq!(merged("{}", "x: ['^', a]"), yaml!("x: ['^', a]"));
    }

    #[test]
    fn empty_array_extends_with_nothing() {
        assert_eq!(merged("x: [p]", "x: []"), yaml!("x: [p]"));
    }

    #[test]
    fn objects_merge_recursively() {
        assert_eq!(
            merged("a: {b: 1, c: {d: 2}}", "a: {c: {e: 3}, f: 4}"),
            yaml!("a: {b: 1, c: {d: 2, e: 3}, f: 4}")
        );
    }

    #[test]
    fn scalars_and_mismatches_override() {
        assert_eq!(merged("k: 1", "k: 2"), yaml!("k: 2"));
        assert_eq!(merged("k: [1]", "k: text"), yaml!("k: text"));
        assert_eq!(merged("k: {a: 1}", "k: [1]"), yaml!("k: [1]"));
        assert_eq!(merged("k: 1", "k: ~"), yaml!("k: ~"));
    }

    #[test]
    fn key_order_is_kept_and_new_keys_are_appended() {
        let value = merged("b: 1\na: 1", "c: 1\nb: 2");
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }
}
