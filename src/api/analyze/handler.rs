// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! POST /analyze - run a full inspection over an uploaded image

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::info;

use super::response::AnalyzeResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::image_utils::decode_upload;

/// Accepts a multipart image upload and returns the compliance report.
///
/// The first file field is taken as the evidence image; a request without
/// one is rejected before any model runs.
pub async fn analyze_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let mut upload: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("malformed multipart body: {}", e)))?
    {
        let is_file = field.file_name().is_some() || field.name() == Some("file");
        if is_file {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::InvalidRequest(format!("failed to read upload: {}", e)))?;
            upload = Some(bytes.to_vec());
            break;
        }
    }

    let bytes =
        upload.ok_or_else(|| ApiError::InvalidRequest("missing image file field".to_string()))?;

    let image = decode_upload(&bytes)
        .map_err(|e| ApiError::InvalidRequest(format!("invalid image: {}", e)))?;

    info!(
        size_bytes = image.size_bytes,
        width = image.width(),
        height = image.height(),
        "analyzing uploaded evidence"
    );

    let report = state.orchestrator.inspect(&image).await.map_err(ApiError::from)?;

    Ok(Json(AnalyzeResponse::from_report(
        &report,
        &state.orchestrator.config().report,
    )))
}
