//! Time-series points and the tags that identify their series.

use std::fmt;

mod tagmap;

pub use self::tagmap::TagMap;

/// A single field value of a `Record`.
///
/// The store keeps integer and float fields apart, so a memory figure in KB
/// stays an integer and a pause in seconds stays a float.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Floating point field
    Float(f64),
    /// Integer field
    Integer(i64),
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> FieldValue {
        FieldValue::Float(f)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> FieldValue {
        FieldValue::Integer(i)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Integer(v) => write!(f, "{}i", v),
        }
    }
}

/// A time-series point.
///
/// Tags identify the series and are indexed by the store; fields carry the
/// values. A `Record` is assembled by value: each builder method consumes
/// self and hands back the extended point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The measurement name, never empty
    pub measurement: String,
    /// Series identifying tags
    pub tags: TagMap,
    /// Field name / value pairs, in insertion order
    pub fields: Vec<(String, FieldValue)>,
    /// Milliseconds since the Unix epoch
    pub time: i64,
}

impl Record {
    /// Make a new, tagless and fieldless, point.
    pub fn new<S>(measurement: S, time: i64) -> Record
    where
        S: Into<String>,
    {
        let measurement = measurement.into();
        debug_assert!(!measurement.is_empty());
        Record {
            measurement: measurement,
            tags: TagMap::default(),
            fields: Vec::new(),
            time: time,
        }
    }

    /// Add or replace a single tag.
    pub fn overlay_tag<K, V>(mut self, key: K, val: V) -> Record
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.tags.insert(key, val);
        self
    }

    /// Add or replace every tag in `map`.
    pub fn overlay_tags_from_map(mut self, map: &TagMap) -> Record {
        self.tags.overlay(map);
        self
    }

    /// Append a field. Setting a field twice replaces the earlier value in
    /// place.
    pub fn field<S, V>(mut self, name: S, value: V) -> Record
    where
        S: Into<String>,
        V: Into<FieldValue>,
    {
        let name = name.into();
        let value = value.into();
        match self.fields.iter().position(|&(ref k, _)| *k == name) {
            Some(idx) => self.fields[idx].1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    /// Look up a field by name.
    pub fn get_field(&self, name: &str) -> Option<FieldValue> {
        self.fields
            .iter()
            .find(|&&(ref k, _)| k == name)
            .map(|&(_, v)| v)
    }
}
