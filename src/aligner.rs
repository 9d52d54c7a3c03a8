//! Aligner: sparse features → dense vector in schema order
//!
//! Fill policy:
//!   - schema column present in the sparse map → its value
//!   - schema column absent → 0.0
//!   - sparse key absent from the schema → dropped silently
//!
//! Dropping unknown keys is what lets an unseen category degrade to an
//! all-zero one-hot group instead of failing the request.

use crate::encoder::SparseFeatures;
use crate::schema::FeatureSchema;

/// Dense feature vector, one value per schema column
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedVector(Vec<f64>);

impl EncodedVector {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for EncodedVector {
    fn from(values: Vec<f64>) -> Self {
        EncodedVector(values)
    }
}

/// Expand `sparse` into schema order, zero-filling absent columns
pub fn align(sparse: &SparseFeatures, schema: &FeatureSchema) -> EncodedVector {
    EncodedVector(
        schema
            .columns()
            .iter()
            .map(|column| sparse.get(column).unwrap_or(0.0))
            .collect(),
    )
}

/// Sparse keys that `align` drops, sorted
pub fn unmatched_keys<'a>(sparse: &'a SparseFeatures, schema: &FeatureSchema) -> Vec<&'a str> {
    let mut keys: Vec<&str> = sparse.keys().filter(|k| !schema.contains(k)).collect();
    keys.sort_unstable();
    keys
}
