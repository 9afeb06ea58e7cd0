//! typed view of a class or node document
//!
//! Reserved keys:
//! - `classes`: sequence of class names, glob patterns allowed
//! - `pillars`: mapping of arbitrary data
//! - `states`: sequence of state names
//! - `environment`: name of the environment
//!
//! Any other key is ignored. Reserved keys of an unexpected shape are ignored with a warning.
use crate::value::{Map, Value};

pub const CLASSES_KEY: &str = "classes";
pub const PILLARS_KEY: &str = "pillars";
pub const STATES_KEY: &str = "states";
pub const ENVIRONMENT_KEY: &str = "environment";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub classes: Vec<String>,
    pub pillars: Option<Map>,
    pub states: Vec<String>,
    pub environment: Option<String>,
}

impl Document {
    /// Pick the reserved keys out of a loaded mapping
    ///
    /// `origin` names the document in log messages.
    pub fn from_map(origin: &str, mut map: Map) -> Self {
        Self {
            classes: string_list(origin, CLASSES_KEY, map.shift_remove(CLASSES_KEY)),
            pillars: pillars(origin, map.shift_remove(PILLARS_KEY)),
            states: string_list(origin, STATES_KEY, map.shift_remove(STATES_KEY)),
            environment: environment(origin, map.shift_remove(ENVIRONMENT_KEY)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn string_list(origin: &str, key: &str, value: Option<Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => vec![],
        Some(Value::Array(values)) => values
            .into_iter()
            .filter_map(|value| {
                let text = value.to_text();
                if text.is_none() {
                    tracing::warn!(origin, key, kind = value.kind(), "ignoring list entry");
                }
                text
            })
            .collect(),
        Some(other) => {
            tracing::warn!(origin, key, kind = other.kind(), "expected a list, ignoring");
            vec![]
        }
    }
}

fn pillars(origin: &str, value: Option<Value>) -> Option<Map> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map),
        Some(other) => {
            tracing::warn!(
                origin,
                key = PILLARS_KEY,
                kind = other.kind(),
                "expected a mapping, ignoring"
            );
            None
        }
    }
}

fn environment(origin: &str, value: Option<Value>) -> Option<String> {
    let value = value?;
    let text = value.to_text();
    if text.is_none() && !value.is_null() {
        tracing::warn!(
            origin,
            key = ENVIRONMENT_KEY,
            kind = value.kind(),
            "expected a string, ignoring"
        );
    }
    text
}
