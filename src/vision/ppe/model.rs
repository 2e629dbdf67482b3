// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PPE detection model
//!
//! A YOLO-style ONNX model trained on construction-site PPE classes
//! (person, helmet, no-helmet, vest, no-vest). Runs on CPU through ONNX
//! Runtime; the session is mutex-guarded, so concurrent requests serialize
//! on the single inference device.

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::DynamicImage;
use ndarray::{ArrayViewD, IxDyn};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::preprocessing::{preprocess_for_detection, LetterboxInfo, DETECTOR_INPUT_SIZE};
use crate::config::DetectorConfig;
use crate::vision::detector::{BoundingBox, DetectionRecord, Detector};
use crate::vision::image_utils::DecodedImage;

/// Candidate detection in letterbox space, before NMS
struct Candidate {
    class_index: usize,
    confidence: f32,
    // center-x, center-y, width, height
    cx: f32,
    cy: f32,
    w: f32,
    h: f32,
}

/// Pure post-processing of raw model output: thresholding, per-class NMS,
/// and mapping back to original image coordinates. Kept separate from the
/// session so it can be tested without a model file.
#[derive(Debug, Clone)]
struct OutputParser {
    labels: Vec<String>,
    min_confidence: f32,
    iou_threshold: f32,
}

impl OutputParser {
    /// Parse YOLO-style output into detection records.
    ///
    /// Expects `[1, 4 + num_classes, N]` (box coordinates as rows) or the
    /// transposed `[1, N, 4 + num_classes]`.
    fn parse(&self, output: ArrayViewD<f32>, info: &LetterboxInfo) -> Result<Vec<DetectionRecord>> {
        let shape = output.shape();
        if shape.len() != 3 || shape[0] != 1 {
            anyhow::bail!("Unexpected detection output shape: {:?}", shape);
        }

        let attrs = 4 + self.labels.len();
        let channels_first = shape[1] == attrs;
        if !channels_first && shape[2] != attrs {
            anyhow::bail!(
                "Detection output shape {:?} does not match {} classes",
                shape,
                self.labels.len()
            );
        }

        let num_anchors = if channels_first { shape[2] } else { shape[1] };
        let at = |attr: usize, anchor: usize| -> f32 {
            if channels_first {
                output[IxDyn(&[0, attr, anchor])]
            } else {
                output[IxDyn(&[0, anchor, attr])]
            }
        };

        let mut candidates = Vec::new();
        for anchor in 0..num_anchors {
            let mut best_class = 0;
            let mut best_score = 0.0f32;
            for class_index in 0..self.labels.len() {
                let score = at(4 + class_index, anchor);
                if score > best_score {
                    best_score = score;
                    best_class = class_index;
                }
            }

            if best_score < self.min_confidence {
                continue;
            }

            candidates.push(Candidate {
                class_index: best_class,
                confidence: best_score,
                cx: at(0, anchor),
                cy: at(1, anchor),
                w: at(2, anchor),
                h: at(3, anchor),
            });
        }

        Ok(self.suppress_and_map(candidates, info))
    }

    /// Per-class non-maximum suppression, then mapping to original
    /// image coordinates
    fn suppress_and_map(
        &self,
        mut candidates: Vec<Candidate>,
        info: &LetterboxInfo,
    ) -> Vec<DetectionRecord> {
        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let to_box = |c: &Candidate| -> BoundingBox {
            let (x1, y1) = info.map_to_original(c.cx - c.w / 2.0, c.cy - c.h / 2.0);
            let (x2, y2) = info.map_to_original(c.cx + c.w / 2.0, c.cy + c.h / 2.0);
            BoundingBox {
                x: x1,
                y: y1,
                width: (x2 - x1).max(0.0),
                height: (y2 - y1).max(0.0),
            }
        };

        let mut kept: Vec<(usize, f32, BoundingBox)> = Vec::new();
        for candidate in &candidates {
            let bbox = to_box(candidate);
            let suppressed = kept.iter().any(|(class_index, _, kept_box)| {
                *class_index == candidate.class_index && kept_box.iou(&bbox) > self.iou_threshold
            });
            if !suppressed {
                kept.push((candidate.class_index, candidate.confidence, bbox));
            }
        }

        kept.into_iter()
            .map(|(class_index, confidence, bbox)| DetectionRecord {
                label: self
                    .labels
                    .get(class_index)
                    .cloned()
                    .unwrap_or_else(|| format!("class-{}", class_index)),
                confidence,
                bounding_box: Some(bbox),
            })
            .collect()
    }
}

/// PPE object detection model backed by ONNX Runtime
pub struct PpeDetectionModel {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    parser: OutputParser,
}

impl std::fmt::Debug for PpeDetectionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PpeDetectionModel")
            .field("input_name", &self.input_name)
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}

impl PpeDetectionModel {
    /// Load the PPE detection model from an ONNX file
    pub async fn new<P: AsRef<Path>>(model_path: P, config: &DetectorConfig) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("PPE detection model not found: {}", model_path.display());
        }

        info!("Loading PPE detection model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load PPE detection model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "images".to_string());

        debug!("Detection model loaded - input: {}", input_name);
        info!(
            "✅ PPE detection model loaded ({} classes)",
            config.labels.len()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            parser: OutputParser {
                labels: config.labels.clone(),
                min_confidence: config.min_confidence,
                iou_threshold: config.iou_threshold,
            },
        })
    }

    /// Run detection on a decoded image, returning records in original
    /// image coordinates
    pub fn run(&self, image: &DynamicImage) -> Result<Vec<DetectionRecord>> {
        let input = preprocess_for_detection(image);
        let info = LetterboxInfo::new(image, DETECTOR_INPUT_SIZE);

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("detection session lock poisoned"))?;

        let input_value = Value::from_array(input).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Detection inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        let records = self.parser.parse(output_tensor.view(), &info)?;
        debug!("Detected {} objects above threshold", records.len());

        Ok(records)
    }
}

#[async_trait]
impl Detector for PpeDetectionModel {
    async fn detect(&self, image: &DecodedImage) -> Result<Vec<DetectionRecord>> {
        self.run(&image.image)
    }
}
