use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// A single `server.properties` value.
///
/// The file format has no type information, so the variant is picked by [`PropertyValue::coerce`]
/// when parsing. In JSON the value is untagged: a boolean, an integer or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl PropertyValue {
    /// Picks the variant for a raw (already trimmed) value.
    ///
    /// The checks run in a fixed order: boolean literal (case-insensitive), then the integer grammar
    /// (`-?[0-9]+`), then a verbatim string.
    ///
    /// Integers are bounded to [`i64`]. A value that matches the integer grammar but overflows it is
    /// kept as a string, so it is still written back unchanged.
    pub fn coerce(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("true") {
            return PropertyValue::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return PropertyValue::Bool(false);
        }
        match raw.parse::<i64>() {
            Ok(int) if is_integer(raw) => PropertyValue::Int(int),
            _ => PropertyValue::Str(raw.to_string()),
        }
    }
}

fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
}

impl Display for PropertyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Bool(value) => write!(f, "{value}"),
            PropertyValue::Int(value) => write!(f, "{value}"),
            PropertyValue::Str(value) => f.write_str(value),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(i64::from(value))
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Str(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Str(value.to_string())
    }
}

/// All properties of one server, keyed by property name.
///
/// Entries keep the order they were first inserted in, which is the order [`serialize_properties`]
/// writes them in. Re-inserting a key replaces the value without moving it. Two sets are equal when
/// they hold the same keys with the same values, regardless of order.
#[derive(Debug, Clone, Default)]
pub struct PropertySet {
    entries: Vec<(String, PropertyValue)>,
    index: HashMap<String, usize>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    /// Sets `key` to `value`, returning the previous value if the key was already present.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}

impl PartialEq for PropertySet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl Eq for PropertySet {}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertySet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut set = PropertySet::new();
        set.extend(iter);
        set
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> Extend<(K, V)> for PropertySet {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl Serialize for PropertySet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PropertySet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PropertySetVisitor;

        impl<'de> Visitor<'de> for PropertySetVisitor {
            type Value = PropertySet;

            fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
                f.write_str("a map of property names to booleans, integers or strings")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut set = PropertySet::new();
                while let Some((key, value)) = access.next_entry::<String, PropertyValue>()? {
                    set.insert(key, value);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(PropertySetVisitor)
    }
}

/// Parses the contents of a `server.properties` file.
///
/// Blank lines, `#` comments and lines without a `=` are skipped. Each remaining line is split on its
/// first `=`, both halves are trimmed and the value is typed with [`PropertyValue::coerce`]. When a key
/// appears more than once the last occurrence wins. This never fails.
pub fn parse_properties(file: &str) -> PropertySet {
    let mut properties = PropertySet::new();
    for line in file.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        properties.insert(key.trim(), PropertyValue::coerce(value.trim()));
    }
    properties
}

/// Renders properties as `key=value` lines in the set's order, separated by `\n` with no trailing
/// newline.
pub fn serialize_properties(properties: &PropertySet) -> String {
    properties
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
