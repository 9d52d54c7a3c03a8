//! Error taxonomy for the pricing pipeline
//!
//! - `ConfigurationError`: fatal, raised while building the engine from artifacts
//! - `InferenceError`: fatal per request, raised by the predictor adapter
//! - `PredictError`: what a single `predict` call can return
//!
//! Unknown categories are not errors; they surface as `EncodingDiagnostic`s
//! on the estimate.

use crate::engine::PipelineStage;
use crate::validation::Violation;
use thiserror::Error;

/// Malformed artifacts detected at engine construction
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Feature schema is empty")]
    EmptySchema,

    #[error("Feature schema contains duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("Naming table separator must not be empty")]
    EmptySeparator,

    #[error("Scaling spread for column '{column}' is {spread}; expected a finite non-zero value")]
    ZeroSpread { column: String, spread: f64 },

    #[error("Scaling center for column '{column}' is not finite")]
    NonFiniteCenter { column: String },

    #[error("Scaled column '{0}' is not part of the feature schema")]
    ScaledColumnNotInSchema(String),

    #[error("Scaled column '{0}' is listed more than once")]
    DuplicateScaledColumn(String),

    #[error("Scaled column '{0}' belongs to the one-hot group of attribute '{1}'")]
    OneHotColumnScaled(String, String),

    #[error("Scaled column '{0}' has no entry in the scaling profile")]
    MissingScalingEntry(String),

    #[error("Model coefficient for column '{0}' does not match any schema column")]
    UnknownCoefficient(String),

    #[error("Model coefficient for column '{0}' is not finite")]
    NonFiniteCoefficient(String),
}

/// Failure reported by (or about) the predictor adapter
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Predictor failed: {0}")]
    Adapter(#[source] anyhow::Error),

    #[error("Predictor returned a non-finite value: {0}")]
    NonFinite(f64),
}

/// Outcome of a rejected or failed `PriceEngine::predict` call
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Input rejected with {} validation violation(s)", .0.len())]
    Rejected(Vec<Violation>),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl PredictError {
    /// Stage at which the pipeline halted
    pub fn stage(&self) -> PipelineStage {
        match self {
            PredictError::Rejected(_) => PipelineStage::Validating,
            PredictError::Inference(_) => PipelineStage::Predicting,
        }
    }

    /// Stage a caller returns to after this error
    ///
    /// A rejected request goes back to `Collecting` for corrected attributes.
    /// Inference failures are terminal for the request.
    pub fn resume_stage(&self) -> Option<PipelineStage> {
        match self {
            PredictError::Rejected(_) => Some(PipelineStage::Collecting),
            PredictError::Inference(_) => None,
        }
    }

    /// Violations, if the input was rejected
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            PredictError::Rejected(v) => Some(v),
            PredictError::Inference(_) => None,
        }
    }
}
