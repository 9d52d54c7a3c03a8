// Axum API Server Module
//
// Purpose: REST API over a loaded PriceEngine (prediction, encoding, dropdown categories)

#[cfg(feature = "api")]
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

#[cfg(feature = "api")]
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};

#[cfg(feature = "api")]
use moka::future::Cache;

#[cfg(feature = "api")]
use std::sync::Arc;

#[cfg(feature = "api")]
use std::time::Duration;

#[cfg(feature = "api")]
use crate::attributes::RawAttributes;

#[cfg(feature = "api")]
use crate::engine::PriceEngine;

#[cfg(feature = "api")]
use crate::error::PredictError;

#[cfg(feature = "api")]
use crate::estimate::Estimate;

#[cfg(feature = "api")]
use crate::validation::Violation;

// ============================================================================
// Application State
// ============================================================================

#[cfg(feature = "api")]
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PriceEngine>,
    /// Prediction responses keyed by canonical attribute JSON
    pub cache: Cache<String, serde_json::Value>,
}

#[cfg(feature = "api")]
impl AppState {
    /// Load artifacts from `artifact_dir` and build the shared engine
    pub async fn new(artifact_dir: &str, cache_ttl: Duration) -> anyhow::Result<Self> {
        tracing::info!("Initializing price engine...");
        let dir = std::path::PathBuf::from(artifact_dir);
        let engine = tokio::task::spawn_blocking(move || PriceEngine::load(&dir)).await??;

        Ok(Self::from_engine(engine, cache_ttl))
    }

    pub fn from_engine(engine: PriceEngine, cache_ttl: Duration) -> Self {
        tracing::info!("Initializing Moka cache...");
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(cache_ttl)
            .build();

        Self {
            engine: Arc::new(engine),
            cache,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

#[cfg(feature = "api")]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Model metadata
        .route("/api/schema", get(get_schema))
        .route("/api/categories", get(get_all_categories))
        .route("/api/categories/:attribute", get(get_categories))

        // Inference
        .route("/api/predict/batch", post(predict_batch))
        .route("/api/predict", post(predict))
        .route("/api/encode", post(encode))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[cfg(feature = "api")]
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(feature = "api")]
async fn get_schema(State(state): State<AppState>) -> Json<serde_json::Value> {
    let schema = state.engine.schema();
    Json(serde_json::json!({
        "naming_version": state.engine.naming().version,
        "unit": state.engine.unit(),
        "length": schema.len(),
        "columns": schema.columns(),
    }))
}

/// Dropdown options for every categorical attribute
#[cfg(feature = "api")]
async fn get_all_categories(State(state): State<AppState>) -> Json<serde_json::Value> {
    let domains = state.engine.categories();
    let mut map = serde_json::Map::new();
    for attribute in domains.attributes() {
        if let Some(values) = domains.get(attribute) {
            map.insert(attribute.to_string(), serde_json::json!(values));
        }
    }
    Json(serde_json::Value::Object(map))
}

#[cfg(feature = "api")]
async fn get_categories(
    State(state): State<AppState>,
    Path(attribute): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let values = state
        .engine
        .categories()
        .get(&attribute)
        .ok_or_else(|| AppError::NotFound(format!("'{}' is not a categorical attribute", attribute)))?;

    Ok(Json(serde_json::json!({
        "attribute": attribute,
        "categories": values,
    })))
}

#[cfg(feature = "api")]
async fn predict(
    State(state): State<AppState>,
    Json(raw): Json<RawAttributes>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cache_key = serde_json::to_string(&raw)
        .map_err(|e| AppError::Internal(format!("Cache key error: {}", e)))?;

    if let Some(cached) = state.cache.get(&cache_key).await {
        return Ok(Json(cached));
    }

    // CPU-bound work: run in blocking thread pool
    let engine = state.engine.clone();
    let estimate = tokio::task::spawn_blocking(move || engine.predict(&raw))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    let response = estimate_json(&estimate);
    state.cache.insert(cache_key, response.clone()).await;

    Ok(Json(response))
}

#[cfg(feature = "api")]
#[derive(serde::Deserialize)]
struct BatchPredictRequest {
    requests: Vec<RawAttributes>,
}

/// One entry per request; rejections and failures do not fail the batch
#[cfg(feature = "api")]
async fn predict_batch(
    State(state): State<AppState>,
    Json(payload): Json<BatchPredictRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let engine = state.engine.clone();
    let count = payload.requests.len();

    tracing::info!("Predicting batch of {} requests", count);

    let results = tokio::task::spawn_blocking(move || engine.predict_batch(&payload.requests))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    let entries: Vec<serde_json::Value> = results
        .iter()
        .map(|result| match result {
            Ok(estimate) => serde_json::json!({ "status": "completed", "estimate": estimate_json(estimate) }),
            Err(PredictError::Rejected(violations)) => {
                serde_json::json!({ "status": "rejected", "violations": violations })
            }
            Err(e) => serde_json::json!({ "status": "failed", "error": e.to_string() }),
        })
        .collect();

    Ok(Json(serde_json::json!({
        "count": count,
        "results": entries,
    })))
}

/// Finished feature vector, without calling the model
#[cfg(feature = "api")]
async fn encode(
    State(state): State<AppState>,
    Json(raw): Json<RawAttributes>,
) -> Result<Json<serde_json::Value>, AppError> {
    let prepared = state.engine.prepare(&raw).map_err(AppError::Validation)?;

    Ok(Json(serde_json::json!({
        "columns": state.engine.schema().columns(),
        "vector": prepared.vector.values(),
        "diagnostics": prepared.diagnostics,
    })))
}

#[cfg(feature = "api")]
fn estimate_json(estimate: &Estimate) -> serde_json::Value {
    serde_json::json!({
        "value": estimate.value,
        "unit": estimate.unit,
        "rupees": estimate.in_rupees(),
        "lakhs": estimate.in_lakhs(),
        "hundreds": estimate.in_hundreds(),
        "diagnostics": estimate.diagnostics,
    })
}

// ============================================================================
// Error Handling
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug)]
enum AppError {
    Validation(Vec<Violation>),
    Inference(String),
    Internal(String),
    NotFound(String),
}

#[cfg(feature = "api")]
impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Rejected(violations) => AppError::Validation(violations),
            PredictError::Inference(e) => AppError::Inference(e.to_string()),
        }
    }
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            AppError::Validation(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!({
                    "error": "validation failed",
                    "violations": violations,
                }),
            ),
            AppError::Inference(msg) => {
                tracing::error!("Inference failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, serde_json::json!({ "error": msg }))
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, serde_json::json!({ "error": msg }))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, serde_json::json!({ "error": msg })),
        };

        (status, Json(body)).into_response()
    }
}
