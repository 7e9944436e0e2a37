//! Transformation parameter sets.
//!
//! A [`ParameterSet`] is the ordered list of options handed to the
//! transformation engine: width, height, fit mode, quality, format, and
//! anything else the engine understands. This crate performs no validation
//! beyond pass-through — unknown keys are forwarded verbatim so new engine
//! options work without a crate release.
//!
//! ## Ordering
//!
//! Insertion order is preserved and is part of the contract: the query string
//! produced by [`ParameterSet::to_query`] is byte-identical for identical
//! inputs, which keeps downstream caches (CDN, engine derivative cache) from
//! storing the same derivative under multiple keys.
//!
//! ## Merging
//!
//! [`ParameterSet::set`] replaces an existing key in place (keeping its
//! original position) or appends a new one. [`ParameterSet::merged`] applies
//! one set on top of another the same way, which is how width overrides and
//! format variants (`fm=webp`) are layered onto caller-supplied parameters.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single parameter value: integer, string, or flag.
///
/// Flags serialize to `1`/`0` in query strings, matching what the original
/// engine expects for keys like `crop`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Int(i64),
    Str(String),
    Bool(bool),
}

impl ParamValue {
    /// The integer value, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Render the value as it appears in a query string.
    fn query_value(&self) -> String {
        match self {
            ParamValue::Int(n) => n.to_string(),
            ParamValue::Str(s) => s.clone(),
            ParamValue::Bool(true) => "1".to_string(),
            ParamValue::Bool(false) => "0".to_string(),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Int(n as i64)
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        ParamValue::Int(n as i64)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Int(n) => serializer.serialize_i64(*n),
            ParamValue::Str(s) => serializer.serialize_str(s),
            ParamValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl Visitor<'_> for ValueVisitor {
            type Value = ParamValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an integer, string, or boolean parameter value")
            }

            fn visit_i64<E>(self, n: i64) -> Result<ParamValue, E> {
                Ok(ParamValue::Int(n))
            }

            fn visit_u64<E: serde::de::Error>(self, n: u64) -> Result<ParamValue, E> {
                i64::try_from(n)
                    .map(ParamValue::Int)
                    .map_err(|_| E::custom("parameter value out of range"))
            }

            fn visit_str<E>(self, s: &str) -> Result<ParamValue, E> {
                Ok(ParamValue::Str(s.to_string()))
            }

            fn visit_bool<E>(self, b: bool) -> Result<ParamValue, E> {
                Ok(ParamValue::Bool(b))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

/// An insertion-ordered mapping of transformation keys to values.
///
/// Recognized keys include `w`, `h`, `fit`, `dpr`, `q`, `fm`, and `crop`,
/// but the set is open — anything the engine understands can go in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    entries: Vec<(String, ParamValue)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from key/value pairs, preserving their order.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut set = Self::new();
        for (k, v) in pairs {
            set.set(k, v);
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Set a key: replaces an existing entry in place, otherwise appends.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Return a copy with `other`'s entries merged on top of this set.
    ///
    /// Existing keys keep their position but take `other`'s value; new keys
    /// are appended in `other`'s order.
    pub fn merged(&self, other: &ParameterSet) -> ParameterSet {
        let mut out = self.clone();
        for (k, v) in &other.entries {
            out.set(k.clone(), v.clone());
        }
        out
    }

    /// Convenience: this set with a single extra key applied.
    pub fn with(&self, key: impl Into<String>, value: impl Into<ParamValue>) -> ParameterSet {
        let mut out = self.clone();
        out.set(key, value);
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Serialize as a query string in insertion order.
    ///
    /// Keys and values are percent-encoded; the result contains no leading
    /// `?`. An empty set produces an empty string.
    pub fn to_query(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            if !out.is_empty() {
                out.push('&');
            }
            encode_component(&mut out, key);
            out.push('=');
            encode_component(&mut out, &value.query_value());
        }
        out
    }
}

/// Percent-encode a query component. Unreserved characters (RFC 3986) pass
/// through unchanged.
fn encode_component(out: &mut String, raw: &str) {
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{byte:02X}"));
            }
        }
    }
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ParameterSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = ParameterSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of transformation parameters")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ParameterSet, A::Error> {
                let mut set = ParameterSet::new();
                while let Some((key, value)) = map.next_entry::<String, ParamValue>()? {
                    set.set(key, value);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(SetVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_preserves_insertion_order() {
        let params = ParameterSet::from_pairs([
            ("w", ParamValue::from(300)),
            ("h", ParamValue::from(200)),
            ("fit", ParamValue::from("crop")),
        ]);
        assert_eq!(params.to_query(), "w=300&h=200&fit=crop");
    }

    #[test]
    fn set_replaces_in_place() {
        let mut params = ParameterSet::from_pairs([("w", 300), ("h", 200)]);
        params.set("w", 150);
        assert_eq!(params.to_query(), "w=150&h=200");
    }

    #[test]
    fn merged_overrides_keep_position_new_keys_append() {
        let base = ParameterSet::from_pairs([("w", 300), ("h", 200)]);
        let overlay = ParameterSet::from_pairs([("h", ParamValue::from(400)), ("q", ParamValue::from(80))]);
        assert_eq!(base.merged(&overlay).to_query(), "w=300&h=400&q=80");
    }

    #[test]
    fn bools_serialize_as_digits() {
        let params = ParameterSet::from_pairs([("crop", true), ("trim", false)]);
        assert_eq!(params.to_query(), "crop=1&trim=0");
    }

    #[test]
    fn values_are_percent_encoded() {
        let params = ParameterSet::from_pairs([("mark", "logo & text.png")]);
        assert_eq!(params.to_query(), "mark=logo%20%26%20text.png");
    }

    #[test]
    fn empty_set_yields_empty_query() {
        assert_eq!(ParameterSet::new().to_query(), "");
    }

    #[test]
    fn deserializes_from_toml_in_document_order() {
        let params: ParameterSet = toml::from_str("fit = \"crop\"\nw = 300\nh = 300\n").unwrap();
        assert_eq!(params.to_query(), "fit=crop&w=300&h=300");
    }

    #[test]
    fn deserializes_from_json() {
        let params: ParameterSet =
            serde_json::from_str(r#"{"w": 500, "fit": "crop", "crop": true}"#).unwrap();
        assert_eq!(params.get("w").and_then(ParamValue::as_int), Some(500));
        assert_eq!(params.to_query(), "w=500&fit=crop&crop=1");
    }
}
