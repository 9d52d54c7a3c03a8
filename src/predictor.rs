//! Predictor adapters
//!
//! The model is opaque to the engine: it receives the finished vector in
//! schema order and returns one number. `LinearModel` is the bundled adapter
//! for exported regression coefficients; any closure works too.

use crate::error::ConfigurationError;
use crate::estimate::PriceUnit;
use crate::schema::FeatureSchema;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A trained model that maps a feature vector to a price
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64>;

    fn name(&self) -> &str {
        "predictor"
    }
}

impl<F> Predictor for F
where
    F: Fn(&[f64]) -> Result<f64> + Send + Sync,
{
    fn predict(&self, features: &[f64]) -> Result<f64> {
        self(features)
    }

    fn name(&self) -> &str {
        "closure"
    }
}

/// Contents of `model.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelFile {
    pub intercept: f64,
    /// Column name → weight; schema columns not listed weigh 0
    pub coefficients: BTreeMap<String, f64>,
    #[serde(default)]
    pub unit: PriceUnit,
}

/// Linear regression with weights bound to schema positions
#[derive(Debug, Clone)]
pub struct LinearModel {
    intercept: f64,
    weights: Vec<f64>,
}

impl LinearModel {
    /// Bind coefficients to the schema; every coefficient must name a schema column
    pub fn resolve(file: &LinearModelFile, schema: &FeatureSchema) -> Result<Self, ConfigurationError> {
        let mut weights = vec![0.0; schema.len()];
        for (column, weight) in &file.coefficients {
            let pos = schema
                .position(column)
                .ok_or_else(|| ConfigurationError::UnknownCoefficient(column.clone()))?;
            if !weight.is_finite() {
                return Err(ConfigurationError::NonFiniteCoefficient(column.clone()));
            }
            weights[pos] = *weight;
        }

        Ok(Self { intercept: file.intercept, weights })
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl Predictor for LinearModel {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.weights.len() {
            anyhow::bail!(
                "Linear model expects {} features, got {}",
                self.weights.len(),
                features.len()
            );
        }

        Ok(self.intercept
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>())
    }

    fn name(&self) -> &str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(vec!["BHK".to_string(), "Bathroom".to_string(), "location_A".to_string()])
            .unwrap()
    }

    #[test]
    fn test_linear_model_prediction() {
        let file: LinearModelFile = serde_json::from_str(
            r#"{"intercept": 10.0, "coefficients": {"BHK": 5.0, "location_A": 2.5}}"#,
        )
        .unwrap();
        assert_eq!(file.unit, PriceUnit::Rupees);

        let model = LinearModel::resolve(&file, &schema()).unwrap();
        assert_eq!(model.weights(), &[5.0, 0.0, 2.5]);

        let price = model.predict(&[3.0, 2.0, 1.0]).unwrap();
        assert_relative_eq!(price, 27.5, epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_coefficient_rejected() {
        let file = LinearModelFile {
            intercept: 0.0,
            coefficients: [("Total_Floors".to_string(), 1.0)].into_iter().collect(),
            unit: PriceUnit::Lakhs,
        };
        assert_eq!(
            LinearModel::resolve(&file, &schema()).unwrap_err(),
            ConfigurationError::UnknownCoefficient("Total_Floors".to_string())
        );
    }

    #[test]
    fn test_wrong_length_is_an_error() {
        let file = LinearModelFile {
            intercept: 0.0,
            coefficients: BTreeMap::new(),
            unit: PriceUnit::Rupees,
        };
        let model = LinearModel::resolve(&file, &schema()).unwrap();
        assert!(model.predict(&[1.0]).is_err());
    }

    #[test]
    fn test_closure_predictor() {
        let sum = |xs: &[f64]| -> anyhow::Result<f64> { Ok(xs.iter().sum()) };
        assert_eq!(Predictor::predict(&sum, &[1.0, 2.0]).unwrap(), 3.0);
    }
}
