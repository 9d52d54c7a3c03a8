//! House Price Engine
//!
//! Turns loosely structured, human-entered property attributes into the exact
//! fixed-order feature vector a trained regression model expects, gates that
//! translation behind plausibility checks, and runs the model.
//!
//! Module layout (leaves first):
//! - `schema`: Ordered training columns and derived category domains
//! - `validation`: Plausibility rules over raw attributes
//! - `naming` / `encoder`: Attribute → column mapping and sparse encoding
//! - `aligner`: Dense, schema-ordered vectors with zero fill
//! - `scaler`: Trained standardization of numeric columns
//! - `predictor`: Model adapters
//! - `engine`: The request pipeline tying it all together
//! - `artifacts`: Loading a trained model directory

pub mod aligner;
pub mod artifacts;
pub mod attributes;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod estimate;
pub mod naming;
pub mod predictor;
pub mod scaler;
pub mod schema;
pub mod validation;

// API server (Axum + Moka)
#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use aligner::{align, EncodedVector};
pub use artifacts::ModelArtifacts;
pub use attributes::{AttributeValue, RawAttributes};
pub use encoder::{Encoder, EncodingDiagnostic, SparseFeatures};
pub use engine::{EngineConfig, PipelineStage, PreparedFeatures, PriceEngine};
pub use error::{ConfigurationError, InferenceError, PredictError};
pub use estimate::{Estimate, PriceUnit};
pub use naming::{AttributeEncoding, NamingTable};
pub use predictor::{LinearModel, Predictor};
pub use scaler::{scale, Scaler, ScalingConfig, ScalingParams, ScalingProfile};
pub use schema::{CategoryDomains, FeatureSchema};
pub use validation::{summarize, validate, RuleId, ValidationRules, Validator, Violation};

#[cfg(feature = "api")]
pub use api_server::{AppState, create_router};
