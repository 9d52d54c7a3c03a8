//! Raw, human-entered property attributes
//!
//! Attributes arrive keyed by their logical name (`carpet_area`, `location`, ...),
//! never by training column name. The naming table decides how each one maps
//! onto the feature schema.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Logical names of the canonical attributes
pub mod names {
    pub const CARPET_AREA: &str = "carpet_area";
    pub const SUPER_AREA: &str = "super_area";
    pub const BATHROOM_COUNT: &str = "bathroom_count";
    pub const BALCONY_COUNT: &str = "balcony_count";
    pub const CURRENT_FLOOR: &str = "current_floor";
    pub const TOTAL_FLOOR: &str = "total_floor";
    pub const BHK: &str = "bhk";

    pub const LOCATION: &str = "location";
    pub const TRANSACTION_TYPE: &str = "transaction_type";
    pub const FURNISHING: &str = "furnishing";
    pub const CAR_PARKING: &str = "car_parking";
    pub const OWNERSHIP: &str = "ownership";
    pub const FACING: &str = "facing";
    pub const OVERLOOKING: &str = "overlooking";
    pub const STATUS: &str = "status";

    pub const NUMERIC: [&str; 7] = [
        CARPET_AREA, SUPER_AREA, BATHROOM_COUNT, BALCONY_COUNT,
        CURRENT_FLOOR, TOTAL_FLOOR, BHK,
    ];

    /// Numeric attributes that only make sense as whole numbers
    pub const INTEGER: [&str; 5] = [
        BATHROOM_COUNT, BALCONY_COUNT, CURRENT_FLOOR, TOTAL_FLOOR, BHK,
    ];

    pub const CATEGORICAL: [&str; 8] = [
        LOCATION, TRANSACTION_TYPE, FURNISHING, CAR_PARKING,
        OWNERSHIP, FACING, OVERLOOKING, STATUS,
    ];
}

/// A single attribute value: a number or a category label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Category(String),
}

impl AttributeValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            AttributeValue::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            AttributeValue::Category(s) => Some(s.as_str()),
            AttributeValue::Number(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Number(n) => write!(f, "{}", n),
            AttributeValue::Category(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Number(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::Number(f64::from(v))
    }
}

impl From<u32> for AttributeValue {
    fn from(v: u32) -> Self {
        AttributeValue::Number(f64::from(v))
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Category(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Category(v)
    }
}

/// Request-scoped attribute map
///
/// Ordered so the serialized form is canonical (the API cache keys on it).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAttributes(BTreeMap<String, AttributeValue>);

impl RawAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<AttributeValue>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    /// Numeric value of an attribute; `None` if absent or not a number
    pub fn number(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(AttributeValue::as_number)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, AttributeValue)> for RawAttributes {
    fn from_iter<I: IntoIterator<Item = (K, AttributeValue)>>(iter: I) -> Self {
        RawAttributes(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
