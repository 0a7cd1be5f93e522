//! In-memory model for data loaded from YAML, JSON or TOML files.
//!
//! [`DataValue`] is the one tree type every codec reads into and writes from.
//! It implements serde's traits by hand, so any serde format can carry it.

use std::fmt::{self, Formatter};

use indexmap::IndexMap;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Key under which `toml` hands a datetime to a self-describing visitor.
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

/// Keyed children of a [`DataValue::Mapping`], in insertion order.
pub type Mapping = IndexMap<String, DataValue>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DataValue {
    #[default]
    Null,
    Boolean(bool),
    Number(Number),
    String(String),
    Sequence(Vec<DataValue>),
    Mapping(Mapping),
}

impl DataValue {
    pub fn is_scalar(&self) -> bool {
        !matches!(self, DataValue::Sequence(_) | DataValue::Mapping(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            DataValue::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[DataValue]> {
        match self {
            DataValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a key when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.as_mapping().and_then(|mapping| mapping.get(key))
    }
}

/// Deep merges `source` into `destination`.
///
/// Nested mappings are merged key by key; every other value from `source`
/// overwrites the destination entry. A destination entry that is not a
/// mapping is replaced when `source` holds a mapping under the same key.
pub fn merge(source: &Mapping, destination: &mut Mapping) {
    for (key, value) in source {
        match value {
            DataValue::Mapping(inner) => {
                let node = destination
                    .entry(key.clone())
                    .or_insert_with(|| DataValue::Mapping(Mapping::new()));

                if !matches!(node, DataValue::Mapping(_)) {
                    *node = DataValue::Mapping(Mapping::new());
                }

                if let DataValue::Mapping(node) = node {
                    merge(inner, node);
                }
            }
            _ => {
                destination.insert(key.clone(), value.clone());
            }
        }
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Boolean(value)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Number(Number::Integer(value))
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Number(Number::Float(value))
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<Vec<DataValue>> for DataValue {
    fn from(items: Vec<DataValue>) -> Self {
        DataValue::Sequence(items)
    }
}

impl From<Mapping> for DataValue {
    fn from(mapping: Mapping) -> Self {
        DataValue::Mapping(mapping)
    }
}

impl<K: Into<String>, V: Into<DataValue>> FromIterator<(K, V)> for DataValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        DataValue::Mapping(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl Serialize for DataValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DataValue::Null => serializer.serialize_unit(),
            DataValue::Boolean(value) => serializer.serialize_bool(*value),
            DataValue::Number(Number::Integer(value)) => serializer.serialize_i64(*value),
            DataValue::Number(Number::Float(value)) => serializer.serialize_f64(*value),
            DataValue::String(value) => serializer.serialize_str(value),
            DataValue::Sequence(items) => serializer.collect_seq(items),
            DataValue::Mapping(mapping) => serializer.collect_map(mapping),
        }
    }
}

struct DataValueVisitor;

impl<'de> Visitor<'de> for DataValueVisitor {
    type Value = DataValue;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a YAML, JSON or TOML value")
    }

    fn visit_bool<E>(self, value: bool) -> Result<DataValue, E> {
        Ok(DataValue::Boolean(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<DataValue, E> {
        Ok(DataValue::Number(Number::Integer(value)))
    }

    fn visit_u64<E>(self, value: u64) -> Result<DataValue, E> {
        Ok(match i64::try_from(value) {
            Ok(value) => DataValue::Number(Number::Integer(value)),
            Err(_) => DataValue::Number(Number::Float(value as f64)),
        })
    }

    fn visit_f64<E>(self, value: f64) -> Result<DataValue, E> {
        Ok(DataValue::Number(Number::Float(value)))
    }

    fn visit_str<E>(self, value: &str) -> Result<DataValue, E> {
        Ok(DataValue::String(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> Result<DataValue, E> {
        Ok(DataValue::String(value))
    }

    fn visit_unit<E>(self) -> Result<DataValue, E> {
        Ok(DataValue::Null)
    }

    fn visit_none<E>(self) -> Result<DataValue, E> {
        Ok(DataValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<DataValue, D::Error> {
        DataValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<DataValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(DataValue::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<DataValue, A::Error> {
        let mut mapping = Mapping::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, DataValue>()? {
            mapping.insert(key, value);
        }

        if mapping.len() == 1 {
            if let Some(DataValue::String(datetime)) = mapping.get(TOML_DATETIME_KEY) {
                return Ok(DataValue::String(datetime.clone()));
            }
        }
        Ok(DataValue::Mapping(mapping))
    }
}

impl<'de> Deserialize<'de> for DataValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DataValueVisitor)
    }
}
