//! Price Engine - main coordinator for one trained model
//!
//! Built once at startup from the trained artifacts, then shared read-only
//! across requests. Each request runs:
//!
//!   Collecting → Validating → Encoding → Aligning → [Scaling] → Predicting
//!
//! and ends `Rejected` (violations), `Completed` (estimate) or `Failed`
//! (inference error). Includes both single and parallel (Rayon) batch entry
//! points; a single request never runs in parallel internally.

use crate::aligner::{align, unmatched_keys, EncodedVector};
use crate::attributes::RawAttributes;
use crate::encoder::{Encoder, EncodingDiagnostic};
use crate::error::{ConfigurationError, InferenceError, PredictError};
use crate::estimate::{Estimate, PriceUnit};
use crate::naming::NamingTable;
use crate::predictor::Predictor;
use crate::scaler::{Scaler, ScalingConfig};
use crate::schema::{CategoryDomains, FeatureSchema};
use crate::validation::{ValidationRules, Validator, Violation};
use rayon::prelude::*;

/// Pipeline stages a request moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Caller-side: attributes being gathered, and the stage a rejected
    /// request returns to (see `PredictError::resume_stage`)
    Collecting,
    Validating,
    Encoding,
    Aligning,
    Scaling,
    Predicting,
}

/// Everything except the model needed to build an engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub columns: Vec<String>,
    pub naming: NamingTable,
    pub scaling: Option<ScalingConfig>,
    pub rules: ValidationRules,
    pub unit: PriceUnit,
}

/// Model-ready vector plus what was learned while building it
#[derive(Debug, Clone)]
pub struct PreparedFeatures {
    pub vector: EncodedVector,
    pub diagnostics: Vec<EncodingDiagnostic>,
}

/// Immutable inference engine
pub struct PriceEngine {
    schema: FeatureSchema,
    domains: CategoryDomains,
    validator: Validator,
    encoder: Encoder,
    scaler: Option<Scaler>,
    predictor: Box<dyn Predictor>,
    unit: PriceUnit,
}

impl PriceEngine {
    /// Build the engine; every configuration problem surfaces here
    pub fn new(config: EngineConfig, predictor: Box<dyn Predictor>) -> Result<Self, ConfigurationError> {
        config.naming.validate()?;
        let schema = FeatureSchema::new(config.columns)?;

        let scaler = config
            .scaling
            .as_ref()
            .map(|s| Scaler::resolve(s, &schema))
            .transpose()?;

        for (attribute, column) in config.naming.numeric() {
            if !schema.contains(column) {
                tracing::warn!(
                    "Numeric attribute '{}' maps to column '{}' which is not in the schema; it will be ignored",
                    attribute,
                    column
                );
            }
        }

        let domains = CategoryDomains::build(&schema, &config.naming);

        if let Some(scaler) = &scaler {
            check_scaled_columns(scaler, &config.naming, &domains)?;
        }

        tracing::info!(
            "Price engine ready: {} columns, naming table '{}', {} scaled columns, predictor '{}'",
            schema.len(),
            config.naming.version,
            scaler.as_ref().map_or(0, |s| s.columns().len()),
            predictor.name()
        );

        Ok(Self {
            schema,
            domains,
            validator: Validator::new(config.rules),
            encoder: Encoder::new(config.naming),
            scaler,
            predictor,
            unit: config.unit,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn categories(&self) -> &CategoryDomains {
        &self.domains
    }

    pub fn naming(&self) -> &NamingTable {
        self.encoder.naming()
    }

    pub fn unit(&self) -> PriceUnit {
        self.unit
    }

    pub fn validate(&self, raw: &RawAttributes) -> Vec<Violation> {
        self.validator.validate(raw)
    }

    /// Validate, encode, align and scale without calling the model
    pub fn prepare(&self, raw: &RawAttributes) -> Result<PreparedFeatures, Vec<Violation>> {
        tracing::debug!(stage = ?PipelineStage::Validating);
        let violations = self.validator.validate(raw);
        if !violations.is_empty() {
            tracing::debug!("Rejected with {} violation(s)", violations.len());
            return Err(violations);
        }

        tracing::debug!(stage = ?PipelineStage::Encoding);
        let encoded = self.encoder.encode_detailed(raw);
        let mut diagnostics = encoded.diagnostics;

        for (attribute, value) in encoded.categories {
            if !self.domains.contains(&attribute, &value) {
                tracing::warn!(
                    "Unknown category '{}' for attribute '{}'; its one-hot group stays zero",
                    value,
                    attribute
                );
                diagnostics.push(EncodingDiagnostic::UnknownCategory { attribute, value });
            }
        }

        tracing::debug!(stage = ?PipelineStage::Aligning);
        let mut vector = align(&encoded.features, &self.schema);
        let dropped = unmatched_keys(&encoded.features, &self.schema);
        if !dropped.is_empty() {
            tracing::debug!("Dropped features absent from schema: {:?}", dropped);
        }

        if let Some(scaler) = &self.scaler {
            tracing::debug!(stage = ?PipelineStage::Scaling);
            scaler.apply(&mut vector);
        }

        Ok(PreparedFeatures { vector, diagnostics })
    }

    /// Full pipeline for one request
    pub fn predict(&self, raw: &RawAttributes) -> Result<Estimate, PredictError> {
        let prepared = self.prepare(raw).map_err(PredictError::Rejected)?;

        tracing::debug!(stage = ?PipelineStage::Predicting);
        let value = self
            .predictor
            .predict(prepared.vector.values())
            .map_err(InferenceError::Adapter)?;

        if !value.is_finite() {
            return Err(InferenceError::NonFinite(value).into());
        }

        Ok(Estimate {
            value,
            unit: self.unit,
            diagnostics: prepared.diagnostics,
        })
    }

    /// Independent requests in parallel; results keep input order
    pub fn predict_batch(&self, requests: &[RawAttributes]) -> Vec<Result<Estimate, PredictError>> {
        requests.par_iter().map(|raw| self.predict(raw)).collect()
    }
}

/// One-hot indicators stay 0/1; only numeric columns may be scaled
fn check_scaled_columns(
    scaler: &Scaler,
    naming: &NamingTable,
    domains: &CategoryDomains,
) -> Result<(), ConfigurationError> {
    for column in scaler.columns() {
        if naming.numeric().any(|(_, numeric)| numeric == column) {
            continue;
        }
        for (attribute, prefix) in naming.categorical() {
            let head = format!("{}{}", prefix, naming.separator());
            if let Some(category) = column.strip_prefix(head.as_str()) {
                if domains.contains(attribute, category) {
                    return Err(ConfigurationError::OneHotColumnScaled(
                        column.clone(),
                        attribute.to_string(),
                    ));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::AttributeEncoding;
    use crate::scaler::ScalingParams;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn config() -> EngineConfig {
        let mut attributes = BTreeMap::new();
        attributes.insert(
            "bhk".to_string(),
            AttributeEncoding::Numeric { column: "BHK".to_string() },
        );
        attributes.insert(
            "carpet_area".to_string(),
            AttributeEncoding::Numeric { column: "Carpet Area(SQFT)".to_string() },
        );
        attributes.insert(
            "location".to_string(),
            AttributeEncoding::Categorical { prefix: "location".to_string() },
        );

        EngineConfig {
            columns: ["Carpet Area(SQFT)", "BHK", "location_A", "location_B"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            naming: NamingTable::new("test", "_", attributes).unwrap(),
            scaling: None,
            rules: ValidationRules::default(),
            unit: PriceUnit::Lakhs,
        }
    }

    fn echo_first() -> Box<dyn Predictor> {
        Box::new(|xs: &[f64]| -> anyhow::Result<f64> { Ok(xs[0]) })
    }

    #[test]
    fn test_rejection_never_calls_model() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let engine = PriceEngine::new(
            config(),
            Box::new(move |_: &[f64]| -> anyhow::Result<f64> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(1.0)
            }),
        )
        .unwrap();

        let raw = RawAttributes::new().with("bhk", 2).with("carpet_area", 300.0);
        let err = engine.predict(&raw).unwrap_err();

        assert_eq!(err.stage(), PipelineStage::Validating);
        assert_eq!(err.violations().map(|v| v.len()), Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_model_called_once_per_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let engine = PriceEngine::new(
            config(),
            Box::new(move |_: &[f64]| -> anyhow::Result<f64> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(42.0)
            }),
        )
        .unwrap();

        let raw = RawAttributes::new().with("bhk", 2).with("carpet_area", 900.0);
        let estimate = engine.predict(&raw).unwrap();

        assert_eq!(estimate.value, 42.0);
        assert_eq!(estimate.unit, PriceUnit::Lakhs);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_category_is_a_diagnostic() {
        let engine = PriceEngine::new(config(), echo_first()).unwrap();
        let raw = RawAttributes::new().with("location", "Z");

        let prepared = engine.prepare(&raw).unwrap();
        assert_eq!(prepared.vector.values(), &[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(
            prepared.diagnostics,
            vec![EncodingDiagnostic::UnknownCategory {
                attribute: "location".to_string(),
                value: "Z".to_string(),
            }]
        );

        let estimate = engine.predict(&raw).unwrap();
        assert!(estimate.has_unknown_categories());
    }

    #[test]
    fn test_non_finite_prediction_fails() {
        let engine = PriceEngine::new(
            config(),
            Box::new(|_: &[f64]| -> anyhow::Result<f64> { Ok(f64::NAN) }),
        )
        .unwrap();

        let err = engine.predict(&RawAttributes::new()).unwrap_err();
        assert!(matches!(err, PredictError::Inference(InferenceError::NonFinite(_))));
        assert_eq!(err.stage(), PipelineStage::Predicting);
    }

    #[test]
    fn test_adapter_error_propagates() {
        let engine = PriceEngine::new(
            config(),
            Box::new(|_: &[f64]| -> anyhow::Result<f64> { anyhow::bail!("model timed out") }),
        )
        .unwrap();

        let err = engine.predict(&RawAttributes::new()).unwrap_err();
        assert!(err.to_string().contains("model timed out"));
    }

    #[test]
    fn test_zero_spread_fails_construction() {
        let mut cfg = config();
        cfg.scaling = Some(ScalingConfig {
            columns: Some(vec!["BHK".to_string()]),
            profile: [("BHK".to_string(), ScalingParams { center: 2.0, spread: 0.0 })]
                .into_iter()
                .collect(),
        });

        let result = PriceEngine::new(cfg, echo_first());
        assert!(matches!(result, Err(ConfigurationError::ZeroSpread { .. })));
    }

    #[test]
    fn test_scaling_one_hot_column_fails_construction() {
        let mut cfg = config();
        cfg.scaling = Some(ScalingConfig {
            columns: None,
            profile: [
                ("BHK".to_string(), ScalingParams { center: 2.0, spread: 1.0 }),
                ("location_A".to_string(), ScalingParams { center: 0.5, spread: 0.5 }),
            ]
            .into_iter()
            .collect(),
        });

        let result = PriceEngine::new(cfg, echo_first());
        assert_eq!(
            result.err(),
            Some(ConfigurationError::OneHotColumnScaled(
                "location_A".to_string(),
                "location".to_string()
            ))
        );
    }

    #[test]
    fn test_rejected_request_resumes_at_collecting() {
        let engine = PriceEngine::new(config(), echo_first()).unwrap();

        let rejected = engine
            .predict(&RawAttributes::new().with("bhk", 2).with("carpet_area", 300.0))
            .unwrap_err();
        assert_eq!(rejected.resume_stage(), Some(PipelineStage::Collecting));

        let failing = PriceEngine::new(
            config(),
            Box::new(|_: &[f64]| -> anyhow::Result<f64> { Ok(f64::INFINITY) }),
        )
        .unwrap();
        let failed = failing.predict(&RawAttributes::new()).unwrap_err();
        assert_eq!(failed.resume_stage(), None);
    }

    #[test]
    fn test_scaling_applied_before_model() {
        let mut cfg = config();
        cfg.scaling = Some(ScalingConfig {
            columns: None,
            profile: [(
                "Carpet Area(SQFT)".to_string(),
                ScalingParams { center: 1000.0, spread: 500.0 },
            )]
            .into_iter()
            .collect(),
        });

        let engine = PriceEngine::new(cfg, echo_first()).unwrap();
        let raw = RawAttributes::new().with("carpet_area", 2000.0).with("bhk", 3);

        let estimate = engine.predict(&raw).unwrap();
        assert_eq!(estimate.value, 2.0);
    }

    #[test]
    fn test_batch_keeps_order() {
        let engine = PriceEngine::new(config(), echo_first()).unwrap();
        let requests: Vec<RawAttributes> = (1..=20)
            .map(|i| RawAttributes::new().with("bhk", 1).with("carpet_area", 500.0 + f64::from(i)))
            .collect();

        let results = engine.predict_batch(&requests);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.as_ref().unwrap().value, 501.0 + i as f64);
        }
    }
}
