//! Schema Registry
//!
//! Holds the ordered feature columns the model was trained on and derives the
//! category domains of one-hot encoded attributes from them.

use crate::error::ConfigurationError;
use crate::naming::NamingTable;
use rustc_hash::FxHashMap;

/// Immutable, ordered list of training columns
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    columns: Vec<String>,
    positions: FxHashMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema, rejecting empty or duplicated column lists
    pub fn new(columns: Vec<String>) -> Result<Self, ConfigurationError> {
        if columns.is_empty() {
            return Err(ConfigurationError::EmptySchema);
        }

        let mut positions = FxHashMap::default();
        positions.reserve(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            if positions.insert(column.clone(), idx).is_some() {
                return Err(ConfigurationError::DuplicateColumn(column.clone()));
            }
        }

        Ok(Self { columns, positions })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Index of a column in schema order
    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    /// Known categories for a one-hot prefix, sorted ascending
    ///
    /// Selects every column starting with `prefix + separator` and strips that
    /// head. Scans the whole schema; use `CategoryDomains` for repeated lookups.
    pub fn categories_for_prefix(&self, prefix: &str, separator: &str) -> Vec<String> {
        let head = format!("{}{}", prefix, separator);
        let mut categories: Vec<String> = self
            .columns
            .iter()
            .filter_map(|c| c.strip_prefix(head.as_str()))
            .map(|s| s.to_string())
            .collect();
        categories.sort();
        categories
    }
}

/// Precomputed category lists, one per categorical attribute of a naming table
#[derive(Debug, Clone, Default)]
pub struct CategoryDomains {
    by_attribute: FxHashMap<String, Vec<String>>,
}

impl CategoryDomains {
    /// Scan the schema once per categorical attribute
    pub fn build(schema: &FeatureSchema, naming: &NamingTable) -> Self {
        let by_attribute = naming
            .categorical()
            .map(|(attribute, prefix)| {
                let categories = schema.categories_for_prefix(prefix, naming.separator());
                if categories.is_empty() {
                    tracing::warn!(
                        "Categorical attribute '{}' (prefix '{}') has no schema columns",
                        attribute,
                        prefix
                    );
                }
                (attribute.to_string(), categories)
            })
            .collect();

        Self { by_attribute }
    }

    /// Sorted categories for an attribute; `None` if it is not categorical
    pub fn get(&self, attribute: &str) -> Option<&[String]> {
        self.by_attribute.get(attribute).map(|v| v.as_slice())
    }

    pub fn contains(&self, attribute: &str, category: &str) -> bool {
        self.get(attribute)
            .map(|cats| cats.binary_search_by(|c| c.as_str().cmp(category)).is_ok())
            .unwrap_or(false)
    }

    /// Attribute names, sorted
    pub fn attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_attribute.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }
}
