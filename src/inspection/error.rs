// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error taxonomy for the inspection pipeline

use thiserror::Error;

use crate::vision::image_utils::ImageError;

/// Top-level failure kinds for a single inspection request.
///
/// Adapters report failures as `anyhow::Error`; the orchestrator converts
/// them into this taxonomy. `DetectorUnavailable` is always fatal to the
/// request, `ReasonerUnavailable` is recoverable under the degrade policy.
#[derive(Debug, Error)]
pub enum InspectionError {
    #[error("object detector unavailable: {0}")]
    DetectorUnavailable(String),

    #[error("hazard reasoner unavailable: {0}")]
    ReasonerUnavailable(String),

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<ImageError> for InspectionError {
    fn from(e: ImageError) -> Self {
        InspectionError::InvalidImage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InspectionError::DetectorUnavailable("session poisoned".to_string());
        assert_eq!(
            err.to_string(),
            "object detector unavailable: session poisoned"
        );
    }

    #[test]
    fn test_image_error_maps_to_invalid_image() {
        let err: InspectionError = ImageError::EmptyData.into();
        assert!(matches!(err, InspectionError::InvalidImage(_)));
    }
}
