// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Spatial detector capability
//!
//! The orchestrator consumes detection through this trait so the ONNX
//! model can be swapped for a deterministic fake in tests.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::vision::image_utils::DecodedImage;

/// Axis-aligned bounding box in original image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Intersection-over-union with another box
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }
}

/// One labeled, scored region-of-interest output by the spatial detector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRecord {
    /// Object class label (e.g. "person", "no-helmet")
    pub label: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    /// Optional bounding box
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

impl DetectionRecord {
    /// Construct a record with no localization; used by tests and by
    /// detectors that only classify.
    pub fn unlocalized(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
            bounding_box: None,
        }
    }
}

/// Object detection capability.
///
/// An empty result is a valid "nothing found" outcome; adapters must
/// return `Err` when the underlying capability is unavailable rather than
/// an empty sequence the caller could mistake for a clean site.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, image: &DecodedImage) -> Result<Vec<DetectionRecord>>;
}
