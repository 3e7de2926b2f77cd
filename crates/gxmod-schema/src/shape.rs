//! One-step decode of a raw section value into the shape it was written in.
//!
//! Manifests in the wild carry several legacy layouts for the same section.
//! The validator and normalizer match on [`SectionShape`] instead of probing
//! the JSON ad hoc.

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum SectionShape<'a> {
    /// Null, false, zero, empty string, empty sequence or empty mapping.
    Empty,
    /// Non-empty sequence whose elements are all objects.
    Packs(&'a [Value]),
    /// A single mapping where a sequence of packs was expected.
    LegacyMapping(&'a Map<String, Value>),
    /// Non-empty sequence of bare strings.
    LegacyStringList(Vec<&'a str>),
    /// Non-empty sequence mixing objects, strings and anything else.
    Mixed(&'a [Value]),
    /// A non-empty scalar.
    Malformed(&'a Value),
}

pub fn decode(value: &Value) -> SectionShape<'_> {
    if is_falsy(value) {
        return SectionShape::Empty;
    }
    match value {
        Value::Array(items) => {
            if items.iter().all(Value::is_object) {
                SectionShape::Packs(items)
            } else if let Some(strings) = items.iter().map(Value::as_str).collect::<Option<Vec<_>>>() {
                SectionShape::LegacyStringList(strings)
            } else {
                SectionShape::Mixed(items)
            }
        }
        Value::Object(map) => SectionShape::LegacyMapping(map),
        other => SectionShape::Malformed(other),
    }
}

/// Truthiness as manifest authors expect it: null, false, zero and empty
/// containers all count as "nothing there".
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => {
            n.as_i64() == Some(0)
                || n.as_u64() == Some(0)
                || n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON)
        }
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
