use super::{Visit, VisitMut};
use crate::value::{Map, Value};

/// Recursively visit all string values in document order
///
/// Object keys are not visited.
pub trait VisitStrings {
    fn visit_strings(&self, visitor: &mut dyn Visit<str>);
}

/// Recursively visit all [Value::String]s mutably
///
/// The visitor receives the whole [Value] so it can replace the string with any other value.
/// Replacements are not visited again.
pub trait VisitStringsMut {
    fn visit_strings_mut(&mut self, visitor: &mut dyn VisitMut<Value>);
}

impl VisitStrings for Map {
    fn visit_strings(&self, visitor: &mut dyn Visit<str>) {
        for value in self.values() {
            value.visit_strings(visitor);
        }
    }
}

impl VisitStrings for Value {
    fn visit_strings(&self, visitor: &mut dyn Visit<str>) {
        match self {
            Value::String(string) => visitor.visit(string),
            Value::Array(array) => {
                for value in array {
                    value.visit_strings(visitor);
                }
            }
            Value::Object(object) => object.visit_strings(visitor),
            Value::Null | Value::Boolean(_) | Value::Integer(_) | Value::Decimal(_) => {}
        }
    }
}

impl VisitStringsMut for Map {
    fn visit_strings_mut(&mut self, visitor: &mut dyn VisitMut<Value>) {
        for value in self.values_mut() {
            value.visit_strings_mut(visitor);
        }
    }
}

impl VisitStringsMut for Value {
    fn visit_strings_mut(&mut self, visitor: &mut dyn VisitMut<Value>) {
        match self {
            Value::String(_) => visitor.visit_mut(self),
            Value::Array(array) => {
                for value in array {
                    value.visit_strings_mut(visitor);
                }
            }
            Value::Object(object) => object.visit_strings_mut(visitor),
            Value::Null | Value::Boolean(_) | Value::Integer(_) | Value::Decimal(_) => {}
        }
    }
}
