// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use apexgov_inspector::{
    api::{start_server, AppState},
    config::InspectionConfig,
    inspection::InspectionOrchestrator,
    vision::{PpeDetectionModel, VlmReasoner},
};

#[derive(Debug, Parser)]
#[command(name = "apexgov-inspector", about = "Construction-site compliance inspection node")]
struct Args {
    /// Port for the HTTP API
    #[arg(long, env = "API_PORT", default_value_t = 8000)]
    api_port: u16,

    /// Path to the PPE detection ONNX model (overrides config file)
    #[arg(long, env = "MODEL_PATH")]
    model_path: Option<String>,

    /// Endpoint of the VLM reasoning sidecar
    #[arg(long, env = "VLM_ENDPOINT", default_value = "http://127.0.0.1:8081")]
    vlm_endpoint: String,

    /// Model name served by the VLM sidecar
    #[arg(long, env = "VLM_MODEL", default_value = "moondream2")]
    vlm_model: String,

    /// Optional TOML config file with inspection rules
    #[arg(long, env = "CONFIG_PATH")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => InspectionConfig::from_file(path)?,
        None => InspectionConfig::default(),
    };
    if let Some(model_path) = &args.model_path {
        config.detector.model_path = model_path.clone();
    }
    config
        .validate()
        .context("Invalid inspection configuration")?;

    tracing::info!("🏗️  Starting inspection node (engine: {})", config.report.engine);

    let detector = PpeDetectionModel::new(&config.detector.model_path, &config.detector)
        .await
        .context("Failed to load PPE detection model")?;

    let reasoner = VlmReasoner::new(&args.vlm_endpoint, &args.vlm_model)
        .context("Failed to configure VLM reasoner")?;
    if reasoner.health_check().await {
        tracing::info!("✅ VLM sidecar healthy at {}", args.vlm_endpoint);
    } else {
        tracing::warn!(
            "⚠️ VLM sidecar unreachable at {}; reports will degrade until it comes up",
            args.vlm_endpoint
        );
    }

    let orchestrator = Arc::new(InspectionOrchestrator::new(
        Arc::new(detector),
        Arc::new(reasoner),
        config,
    ));

    let state = AppState::new(orchestrator);
    let port = args.api_port;

    tokio::select! {
        result = start_server(state, port) => {
            if let Err(e) = result {
                tracing::error!("API server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, stopping");
        }
    }

    Ok(())
}
