//! Attribute → column naming table
//!
//! Versioned configuration shipped next to the model artifact. It is the only
//! place that knows training column names; nothing is inferred from request
//! shape.

use crate::attributes::names;
use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_SEPARATOR: &str = "_";

/// How one logical attribute lands in the feature schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeEncoding {
    /// Value copied unchanged into `column`
    Numeric { column: String },
    /// One-hot: `prefix + separator + value` set to 1
    Categorical { prefix: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamingTable {
    pub version: String,

    #[serde(default = "default_separator")]
    separator: String,

    attributes: BTreeMap<String, AttributeEncoding>,
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

impl NamingTable {
    pub fn new(
        version: &str,
        separator: &str,
        attributes: BTreeMap<String, AttributeEncoding>,
    ) -> Result<Self, ConfigurationError> {
        let table = Self {
            version: version.to_string(),
            separator: separator.to_string(),
            attributes,
        };
        table.validate()?;
        Ok(table)
    }

    /// Table matching the column names of the reference training notebook
    pub fn standard() -> Self {
        let numeric = [
            (names::BATHROOM_COUNT, "Bathroom"),
            (names::BALCONY_COUNT, "Balcony"),
            (names::CARPET_AREA, "Carpet Area(Sqft)"),
            (names::TOTAL_FLOOR, "Total_Floors"),
            (names::CURRENT_FLOOR, "Current_Floor"),
            (names::BHK, "BHK"),
        ];
        let categorical = [
            (names::LOCATION, "location"),
            (names::STATUS, "Status"),
            (names::TRANSACTION_TYPE, "Transaction"),
            (names::FURNISHING, "Furnishing"),
            (names::CAR_PARKING, "Car Parking"),
            (names::OWNERSHIP, "Ownership"),
        ];

        let mut attributes = BTreeMap::new();
        for (attr, column) in numeric {
            attributes.insert(
                attr.to_string(),
                AttributeEncoding::Numeric { column: column.to_string() },
            );
        }
        for (attr, prefix) in categorical {
            attributes.insert(
                attr.to_string(),
                AttributeEncoding::Categorical { prefix: prefix.to_string() },
            );
        }

        Self {
            version: "standard-v1".to_string(),
            separator: default_separator(),
            attributes,
        }
    }

    /// Reject tables that cannot produce well-formed column names
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.separator.is_empty() {
            return Err(ConfigurationError::EmptySeparator);
        }
        Ok(())
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn get(&self, attribute: &str) -> Option<&AttributeEncoding> {
        self.attributes.get(attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeEncoding)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// (attribute, column) pairs of numeric mappings
    pub fn numeric(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter_map(|(attr, enc)| match enc {
            AttributeEncoding::Numeric { column } => Some((attr, column.as_str())),
            AttributeEncoding::Categorical { .. } => None,
        })
    }

    /// (attribute, prefix) pairs of categorical mappings
    pub fn categorical(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter_map(|(attr, enc)| match enc {
            AttributeEncoding::Categorical { prefix } => Some((attr, prefix.as_str())),
            AttributeEncoding::Numeric { .. } => None,
        })
    }

    /// Full one-hot column name for a category value
    pub fn one_hot_column(&self, prefix: &str, value: &str) -> String {
        format!("{}{}{}", prefix, self.separator, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_naming_table_json() {
        let json = r#"{
            "version": "2024-03",
            "attributes": {
                "bathroom_count": {"kind": "numeric", "column": "Bathroom"},
                "location": {"kind": "categorical", "prefix": "location"}
            }
        }"#;

        let table: NamingTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.separator(), "_");
        assert_eq!(
            table.get("bathroom_count"),
            Some(&AttributeEncoding::Numeric { column: "Bathroom".to_string() })
        );
        assert_eq!(table.categorical().collect::<Vec<_>>(), vec![("location", "location")]);
        assert_eq!(table.one_hot_column("location", "Thane"), "location_Thane");
    }

    #[test]
    fn test_empty_separator_rejected() {
        let err = NamingTable::new("v", "", BTreeMap::new()).unwrap_err();
        assert_eq!(err, ConfigurationError::EmptySeparator);
    }

    #[test]
    fn test_standard_table_covers_training_columns() {
        let table = NamingTable::standard();
        assert_eq!(table.numeric().count(), 6);
        assert_eq!(table.categorical().count(), 6);
        assert_eq!(
            table.get("transaction_type"),
            Some(&AttributeEncoding::Categorical { prefix: "Transaction".to_string() })
        );
    }
}
