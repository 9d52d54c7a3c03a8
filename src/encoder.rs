//! Encoder: raw attributes → sparse column/value map
//!
//! Numeric attributes are copied unchanged under their mapped column.
//! Categorical attributes set a single `prefix + separator + value` key to 1;
//! every sibling in the group stays absent, i.e. zero.

use crate::attributes::{AttributeValue, RawAttributes};
use crate::naming::{AttributeEncoding, NamingTable};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Column name → value; absent columns are implicitly zero
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseFeatures {
    values: FxHashMap<String, f64>,
}

impl SparseFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: String, value: f64) {
        self.values.insert(column, value);
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Non-fatal findings made while turning attributes into features
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EncodingDiagnostic {
    /// Category absent from the schema; its one-hot group stays all zero
    UnknownCategory { attribute: String, value: String },
    /// Value kind does not match the naming table; attribute skipped
    KindMismatch { attribute: String, expected: &'static str },
}

/// Result of encoding one request
#[derive(Debug, Clone, Default)]
pub struct Encoded {
    pub features: SparseFeatures,
    /// Categorical (attribute, value) pairs that were one-hot encoded
    pub categories: Vec<(String, String)>,
    pub diagnostics: Vec<EncodingDiagnostic>,
}

/// Stateless encoder over a naming table
#[derive(Debug, Clone)]
pub struct Encoder {
    naming: NamingTable,
}

impl Encoder {
    pub fn new(naming: NamingTable) -> Self {
        Self { naming }
    }

    pub fn naming(&self) -> &NamingTable {
        &self.naming
    }

    /// Sparse features for `raw`; unmapped attributes are ignored
    pub fn encode(&self, raw: &RawAttributes) -> SparseFeatures {
        self.encode_detailed(raw).features
    }

    /// Sparse features plus the categories used and any kind mismatches
    pub fn encode_detailed(&self, raw: &RawAttributes) -> Encoded {
        let mut encoded = Encoded::default();

        for (attribute, value) in raw.iter() {
            let Some(encoding) = self.naming.get(attribute) else {
                continue;
            };

            match (encoding, value) {
                (AttributeEncoding::Numeric { column }, AttributeValue::Number(n)) => {
                    encoded.features.set(column.clone(), *n);
                }
                (AttributeEncoding::Categorical { prefix }, AttributeValue::Category(c)) => {
                    encoded.features.set(self.naming.one_hot_column(prefix, c), 1.0);
                    encoded.categories.push((attribute.to_string(), c.clone()));
                }
                (AttributeEncoding::Numeric { .. }, AttributeValue::Category(_)) => {
                    encoded.diagnostics.push(EncodingDiagnostic::KindMismatch {
                        attribute: attribute.to_string(),
                        expected: "number",
                    });
                }
                (AttributeEncoding::Categorical { .. }, AttributeValue::Number(_)) => {
                    encoded.diagnostics.push(EncodingDiagnostic::KindMismatch {
                        attribute: attribute.to_string(),
                        expected: "category",
                    });
                }
            }
        }

        encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn table() -> NamingTable {
        let mut attributes = BTreeMap::new();
        attributes.insert(
            "bathroom_count".to_string(),
            AttributeEncoding::Numeric { column: "Bathroom".to_string() },
        );
        attributes.insert(
            "carpet_area".to_string(),
            AttributeEncoding::Numeric { column: "Carpet Area(SQFT)".to_string() },
        );
        attributes.insert(
            "location".to_string(),
            AttributeEncoding::Categorical { prefix: "location".to_string() },
        );
        NamingTable::new("test", "_", attributes).unwrap()
    }

    #[test]
    fn test_numeric_values_copied_unchanged() {
        let raw = RawAttributes::new()
            .with("bathroom_count", 2)
            .with("carpet_area", 1042.5);

        let sparse = Encoder::new(table()).encode(&raw);
        assert_eq!(sparse.get("Bathroom"), Some(2.0));
        assert_eq!(sparse.get("Carpet Area(SQFT)"), Some(1042.5));
        assert_eq!(sparse.len(), 2);
    }

    #[test]
    fn test_category_sets_single_key() {
        let raw = RawAttributes::new().with("location", "Thane West");

        let encoded = Encoder::new(table()).encode_detailed(&raw);
        assert_eq!(encoded.features.get("location_Thane West"), Some(1.0));
        assert_eq!(encoded.features.len(), 1);
        assert_eq!(
            encoded.categories,
            vec![("location".to_string(), "Thane West".to_string())]
        );
    }

    #[test]
    fn test_unmapped_attributes_ignored() {
        let raw = RawAttributes::new()
            .with("bathroom_count", 1)
            .with("swimming_pool", "yes")
            .with("age_years", 12);

        let encoded = Encoder::new(table()).encode_detailed(&raw);
        assert_eq!(encoded.features.len(), 1);
        assert!(encoded.diagnostics.is_empty());
    }

    #[test]
    fn test_kind_mismatch_skipped() {
        let raw = RawAttributes::new()
            .with("bathroom_count", "two")
            .with("location", 7);

        let encoded = Encoder::new(table()).encode_detailed(&raw);
        assert!(encoded.features.is_empty());
        assert_eq!(encoded.diagnostics.len(), 2);
    }
}
