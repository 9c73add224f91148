use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// A single typed field value of a metric.
///
/// # Examples
///
/// ```
/// use oxprobe_common::types::FieldValue;
///
/// assert_eq!(FieldValue::from(12_u64), FieldValue::UInt(12));
/// assert_eq!(FieldValue::from("up"), FieldValue::Str("up".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Int(v) => write!(f, "{v}i"),
            FieldValue::UInt(v) => write!(f, "{v}u"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Str(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(i64::from(v))
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        FieldValue::UInt(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

pub type Tags = BTreeMap<String, String>;
pub type Fields = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub measurement: String,
    pub tags: Tags,
    pub fields: Fields,
    pub timestamp: DateTime<Utc>,
}

impl Metric {
    /// Creates a metric stamped with the current UTC time.
    pub fn new(measurement: &str, fields: Fields, tags: Tags) -> Self {
        Self {
            measurement: measurement.to_string(),
            tags,
            fields,
            timestamp: Utc::now(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }
}

/// Returns a copy of `base` with one extra tag.
///
/// # Examples
///
/// ```
/// use oxprobe_common::types::{tags_with, Tags};
///
/// let mut base = Tags::new();
/// base.insert("server".to_string(), "localhost".to_string());
/// let zone = tags_with(&base, "zone", "api");
/// assert_eq!(zone.len(), 2);
/// assert_eq!(base.len(), 1);
/// ```
pub fn tags_with(base: &Tags, key: &str, value: &str) -> Tags {
    let mut tags = base.clone();
    tags.insert(key.to_string(), value.to_string());
    tags
}

/// Builds a [`Fields`] map from `name => value` pairs.
///
/// # Examples
///
/// ```
/// use oxprobe_common::fields;
/// use oxprobe_common::types::FieldValue;
///
/// let f = fields! { "active" => 3_i64, "state" => "up" };
/// assert_eq!(f["active"], FieldValue::Int(3));
/// ```
#[macro_export]
macro_rules! fields {
    ($($name:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut fields = $crate::types::Fields::new();
        $(
            fields.insert(
                ::std::string::ToString::to_string(&$name),
                $crate::types::FieldValue::from($value),
            );
        )*
        fields
    }};
}
