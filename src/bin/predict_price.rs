// Predict the price of one property from a JSON attribute file
//
// Usage: ARTIFACT_DIR=artifacts/demo cargo run --bin predict_price -- artifacts/demo/sample_request.json

use anyhow::{Context, Result};
use house_price_engine::{summarize, PredictError, PriceEngine, RawAttributes};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "house_price_engine=warn".into()),
        )
        .init();

    let request_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("Usage: predict_price <attributes.json>")?;

    let artifact_dir = std::env::var("ARTIFACT_DIR")
        .unwrap_or_else(|_| "artifacts/demo".to_string());

    let engine = PriceEngine::load(&PathBuf::from(&artifact_dir))?;

    let contents = std::fs::read_to_string(&request_path)
        .with_context(|| format!("Failed to read attributes file: {:?}", request_path))?;
    let raw: RawAttributes = serde_json::from_str(&contents)
        .with_context(|| "Failed to parse attributes JSON")?;

    match engine.predict(&raw) {
        Ok(estimate) => {
            println!(
                "Estimated price: {:.2} lakhs (Rs {:.0})",
                estimate.in_lakhs(),
                estimate.in_rupees()
            );
            for diagnostic in &estimate.diagnostics {
                println!("  note: {:?}", diagnostic);
            }
            Ok(())
        }
        Err(PredictError::Rejected(violations)) => {
            anyhow::bail!("Input rejected:\n{}", summarize(&violations))
        }
        Err(e) => Err(e.into()),
    }
}
