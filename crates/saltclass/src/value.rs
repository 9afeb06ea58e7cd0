//! value representation
//!
//! Class documents, node documents and the resolved pillar tree share one data model
//! - null
//! - boolean (true/false)
//! - integer (signed, i64)
//! - decimal (f64)
//! - string (utf-8)
//! - array ("list" of values)
//! - object (order-preserving "map"/"dictionary", where the key is of type string)
//!
//! Additionally:
//! - yaml mapping keys that are not strings are converted to their string representation
//! - yaml tags are dropped, only the tagged value is kept
//! - integers outside of the i64 range are stored as decimals
//!
use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serializer,
};

/// Order-preserving mapping used for objects
pub type Map = indexmap::IndexMap<String, Value>;

/// All possible value types
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(from = "serde_yaml::Value")]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    /// Parse a yaml document into a [Value]
    pub fn from_yaml_str(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str::<serde_yaml::Value>(source).map(Into::into)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Text form of a scalar, used when a value is spliced into a string
    ///
    /// `null`, arrays and objects have no text form.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Boolean(value) => Some(value.to_string()),
            Value::Integer(value) => Some(value.to_string()),
            Value::Decimal(value) => Some(value.to_string()),
            Value::String(value) => Some(value.clone()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Short name of the variant for log messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Object(Map::new())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl From<serde_yaml::Number> for Value {
    fn from(value: serde_yaml::Number) -> Self {
        if let Some(int) = value.as_i64() {
            return Value::Integer(int);
        }

        // u64 beyond i64::MAX, floats, inf and nan all end up here
        Value::Decimal(value.as_f64().unwrap_or(f64::NAN))
    }
}

impl From<serde_yaml::Mapping> for Value {
    fn from(value: serde_yaml::Mapping) -> Self {
        Value::Object(
            value
                .into_iter()
                .map(|(k, v)| (key_to_string(k), v.into()))
                .collect(),
        )
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Value {
        match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => b.into(),
            serde_yaml::Value::Number(n) => n.into(),
            serde_yaml::Value::String(s) => s.into(),
            serde_yaml::Value::Sequence(seq) => seq.into(),
            serde_yaml::Value::Mapping(map) => map.into(),
            serde_yaml::Value::Tagged(tagged) => tagged.value.into(),
        }
    }
}

fn key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Tagged(tagged) => key_to_string(tagged.value),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl serde::ser::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Boolean(value) => serializer.serialize_bool(*value),
            Value::Integer(value) => serializer.serialize_i64(*value),
            Value::Decimal(value) => serializer.serialize_f64(*value),
            Value::String(value) => serializer.serialize_str(value),
            Value::Array(value) => {
                let mut ser = serializer.serialize_seq(Some(value.len()))?;
                for element in value {
                    ser.serialize_element(element)?;
                }
                ser.end()
            }
            Value::Object(value) => {
                let mut ser = serializer.serialize_map(Some(value.len()))?;
                for (element_key, element_value) in value {
                    ser.serialize_entry(element_key, element_value)?;
                }
                ser.end()
            }
        }
    }
}

/// Utility macro to create a [Value] from yaml source
///
/// ```
/// # use saltclass::yaml;
/// let value = yaml!("pillars: {answer: 42}");
/// assert!(value.as_object().is_some());
/// ```
///
/// # Panic
/// Panics on invalid input
///
/// ```should_panic
/// # use saltclass::yaml;
/// yaml!("not: [valid");
/// ```
#[macro_export]
macro_rules! yaml {
    ($expr:expr) => {
        $crate::value::Value::from_yaml_str($expr).expect("yaml must parse")
    };
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn non_string_keys_become_strings() {
        let value = yaml!("1: one\ntrue: yes\n~: nothing");
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["1", "true", "null"]);
    }

    #[test]
    fn mapping_order_is_kept() {
        let value = yaml!("zeta: 1\nalpha: 2\nmid: 3");
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn tags_are_dropped() {
        assert_eq!(yaml!("!custom 5"), Value::Integer(5));
    }

    #[test]
    fn large_unsigned_becomes_decimal() {
        assert_eq!(
            yaml!("18446744073709551615"),
            Value::Decimal(18446744073709551615u64 as f64)
        );
    }

    #[test]
    fn text_form_of_scalars() {
        assert_eq!(Value::Integer(3).to_text().as_deref(), Some("3"));
        assert_eq!(Value::Boolean(true).to_text().as_deref(), Some("true"));
        assert_eq!(Value::from("x").to_text().as_deref(), Some("x"));
        assert_eq!(Value::Null.to_text(), None);
        assert_eq!(yaml!("[1]").to_text(), None);
    }

    #[test]
    fn serializes_as_yaml() {
        let value = yaml!("b: [1, two]\na: ~");
        assert_eq!(
            serde_yaml::to_string(&value).unwrap(),
            "b:\n- 1\n- two\na: null\n"
        );
    }
}
