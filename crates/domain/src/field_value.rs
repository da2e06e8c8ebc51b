use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Open mapping from field name to value carried by every record.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// One value stored in a record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// UTF-8 string value.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
    /// Ordered sequence of strings, such as tags.
    List(Vec<String>),
    /// Nested mapping for structured blobs (layout config, metadata).
    Map(FieldMap),
}

impl FieldValue {
    /// Returns the string payload for text values.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns true when the value is an empty string, list or map.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(value) => value.trim().is_empty(),
            Self::List(values) => values.is_empty(),
            Self::Map(values) => values.is_empty(),
            Self::Number(_) | Self::Boolean(_) => false,
        }
    }

    /// Case-insensitive substring match. `needle` must already be lowercase.
    ///
    /// Lists match when any element matches; maps match when any nested
    /// value matches.
    #[must_use]
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        match self {
            Self::Text(value) => value.to_lowercase().contains(needle),
            Self::Number(_) | Self::Boolean(_) => self.to_string().contains(needle),
            Self::List(values) => values
                .iter()
                .any(|value| value.to_lowercase().contains(needle)),
            Self::Map(values) => values
                .values()
                .any(|value| value.contains_lowercase(needle)),
        }
    }

    /// Orders two values of the same variant; mismatched variants compare equal.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(left), Self::Text(right)) => left
                .to_lowercase()
                .cmp(&right.to_lowercase())
                .then_with(|| left.cmp(right)),
            (Self::Number(left), Self::Number(right)) => {
                left.partial_cmp(right).unwrap_or(Ordering::Equal)
            }
            (Self::Boolean(left), Self::Boolean(right)) => left.cmp(right),
            (Self::List(left), Self::List(right)) => left.cmp(right),
            _ => Ordering::Equal,
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(value) => formatter.write_str(value),
            Self::Number(value) => write!(formatter, "{value}"),
            Self::Boolean(value) => write!(formatter, "{value}"),
            Self::List(values) => formatter.write_str(values.join(", ").as_str()),
            Self::Map(values) => write!(formatter, "{{{} fields}}", values.len()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<FieldMap> for FieldValue {
    fn from(values: FieldMap) -> Self {
        Self::Map(values)
    }
}
