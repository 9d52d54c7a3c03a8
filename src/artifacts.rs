//! Trained artifact loading
//!
//! An artifact directory holds the JSON exports of one training run:
//!
//!   columns.json        ordered feature columns (required)
//!   naming_table.json   attribute → column mapping (required)
//!   model.json          linear model coefficients (required)
//!   scaling.json        standardization profile (optional)
//!   rules.json          validation rule parameters (optional)

use crate::engine::{EngineConfig, PriceEngine};
use crate::naming::NamingTable;
use crate::predictor::{LinearModel, LinearModelFile};
use crate::scaler::ScalingConfig;
use crate::schema::FeatureSchema;
use crate::validation::ValidationRules;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub const COLUMNS_FILE: &str = "columns.json";
pub const NAMING_FILE: &str = "naming_table.json";
pub const MODEL_FILE: &str = "model.json";
pub const SCALING_FILE: &str = "scaling.json";
pub const RULES_FILE: &str = "rules.json";

/// Deserialized contents of an artifact directory
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub columns: Vec<String>,
    pub naming: NamingTable,
    pub model: LinearModelFile,
    pub scaling: Option<ScalingConfig>,
    pub rules: ValidationRules,
}

impl ModelArtifacts {
    /// Read every artifact file under `dir`
    pub fn load(dir: &Path) -> Result<Self> {
        tracing::info!("Loading model artifacts from {:?}", dir);

        let columns: Vec<String> = read_json(&dir.join(COLUMNS_FILE))?;
        let naming: NamingTable = read_json(&dir.join(NAMING_FILE))?;
        let model: LinearModelFile = read_json(&dir.join(MODEL_FILE))?;

        let scaling_path = dir.join(SCALING_FILE);
        let scaling = if scaling_path.exists() {
            Some(read_json::<ScalingConfig>(&scaling_path)?)
        } else {
            tracing::info!("No scaling profile found - features passed unscaled");
            None
        };

        let rules_path = dir.join(RULES_FILE);
        let rules = if rules_path.exists() {
            read_json(&rules_path)?
        } else {
            ValidationRules::default()
        };

        tracing::info!("  Columns: {}", columns.len());
        tracing::info!("  Naming table: {}", naming.version);
        tracing::info!("  Coefficients: {}", model.coefficients.len());

        Ok(Self { columns, naming, model, scaling, rules })
    }

    /// Build an engine backed by the bundled linear model
    pub fn into_engine(self) -> Result<PriceEngine> {
        let schema = FeatureSchema::new(self.columns.clone())?;
        let predictor = LinearModel::resolve(&self.model, &schema)?;

        let config = EngineConfig {
            columns: self.columns,
            naming: self.naming,
            scaling: self.scaling,
            rules: self.rules,
            unit: self.model.unit,
        };

        Ok(PriceEngine::new(config, Box::new(predictor))?)
    }
}

impl PriceEngine {
    /// Load artifacts from `dir` and build the engine
    pub fn load(dir: &Path) -> Result<Self> {
        ModelArtifacts::load(dir)?
            .into_engine()
            .with_context(|| format!("Invalid model artifacts in {:?}", dir))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read artifact file: {:?}", path))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse artifact JSON: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn demo_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("artifacts/demo")
    }

    #[test]
    fn test_load_demo_artifacts() {
        let artifacts = ModelArtifacts::load(&demo_dir()).unwrap();
        assert!(!artifacts.columns.is_empty());
        assert!(artifacts.scaling.is_some());

        let engine = artifacts.into_engine().unwrap();
        assert_eq!(engine.schema().len(), engine.schema().columns().len());
    }

    #[test]
    fn test_missing_directory_reports_path() {
        let err = ModelArtifacts::load(Path::new("/nonexistent/artifacts")).unwrap_err();
        assert!(format!("{:#}", err).contains("columns.json"));
    }
}
