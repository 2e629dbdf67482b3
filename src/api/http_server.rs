// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP surface for the inspection node

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};

use super::analyze::analyze_handler;
use crate::inspection::orchestrator::InspectionOrchestrator;

/// Shared request-serving state: the orchestrator with its injected model
/// capabilities. Cloned per request; all heavy resources live behind Arcs.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<InspectionOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<InspectionOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

/// Liveness response for `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub engine: String,
}

/// Build the router; exposed separately from [`start_server`] so tests can
/// drive it with `tower::ServiceExt::oneshot`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/analyze", post(analyze_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Inspection API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(HealthResponse {
        status: "online".to_string(),
        engine: state.orchestrator.config().report.engine.clone(),
    })
}
