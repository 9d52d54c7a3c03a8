//! Scaler: trained standardization of a configured numeric subset
//!
//! `v → (v - center) / spread` for each configured column. One-hot columns
//! are never configured here. Spreads are checked when the scaler is resolved
//! against the schema, so applying it to a request cannot fail.

use crate::aligner::EncodedVector;
use crate::error::ConfigurationError;
use crate::schema::FeatureSchema;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Trained (center, spread) pair for one column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingParams {
    pub center: f64,
    pub spread: f64,
}

pub type ScalingProfile = FxHashMap<String, ScalingParams>;

/// Contents of `scaling.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScalingConfig {
    /// Columns to scale; every profile column when omitted
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    pub profile: ScalingProfile,
}

impl ScalingConfig {
    /// Configured columns, or the profile's columns in schema order
    fn scaled_columns(&self, schema: &FeatureSchema) -> Result<Vec<String>, ConfigurationError> {
        if let Some(columns) = &self.columns {
            return Ok(columns.clone());
        }

        let mut positioned = Vec::with_capacity(self.profile.len());
        for column in self.profile.keys() {
            let pos = schema
                .position(column)
                .ok_or_else(|| ConfigurationError::ScaledColumnNotInSchema(column.clone()))?;
            positioned.push((pos, column.clone()));
        }
        positioned.sort_unstable_by_key(|(pos, _)| *pos);
        Ok(positioned.into_iter().map(|(_, c)| c).collect())
    }
}

#[derive(Debug, Clone, Copy)]
struct ScaleEntry {
    position: usize,
    center: f64,
    spread: f64,
}

/// Scaling resolved against a schema
#[derive(Debug, Clone)]
pub struct Scaler {
    entries: Vec<ScaleEntry>,
    columns: Vec<String>,
}

impl Scaler {
    /// Check every configured column and bind it to its schema position
    pub fn resolve(config: &ScalingConfig, schema: &FeatureSchema) -> Result<Self, ConfigurationError> {
        let columns = config.scaled_columns(schema)?;
        let mut entries = Vec::with_capacity(columns.len());
        let mut seen = FxHashSet::default();

        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(ConfigurationError::DuplicateScaledColumn(column.clone()));
            }
            let position = schema
                .position(column)
                .ok_or_else(|| ConfigurationError::ScaledColumnNotInSchema(column.clone()))?;
            let params = config
                .profile
                .get(column)
                .ok_or_else(|| ConfigurationError::MissingScalingEntry(column.clone()))?;

            if params.spread == 0.0 || !params.spread.is_finite() {
                return Err(ConfigurationError::ZeroSpread {
                    column: column.clone(),
                    spread: params.spread,
                });
            }
            if !params.center.is_finite() {
                return Err(ConfigurationError::NonFiniteCenter { column: column.clone() });
            }

            entries.push(ScaleEntry { position, center: params.center, spread: params.spread });
        }

        Ok(Self { entries, columns })
    }

    /// Scaled column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Standardize the configured columns in place
    pub fn apply(&self, vector: &mut EncodedVector) {
        let values = vector.values_mut();
        for entry in &self.entries {
            if let Some(v) = values.get_mut(entry.position) {
                *v = (*v - entry.center) / entry.spread;
            }
        }
    }
}

/// One-shot scaling of `vector` (laid out per `schema`)
pub fn scale(
    vector: &EncodedVector,
    schema: &FeatureSchema,
    profile: &ScalingProfile,
    columns: &[String],
) -> Result<EncodedVector, ConfigurationError> {
    let config = ScalingConfig {
        columns: Some(columns.to_vec()),
        profile: profile.clone(),
    };
    let scaler = Scaler::resolve(&config, schema)?;
    let mut scaled = vector.clone();
    scaler.apply(&mut scaled);
    Ok(scaled)
}
