// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision capabilities for the inspection pipeline
//!
//! This module provides:
//! - Upload decoding into the common [`image_utils::DecodedImage`] unit
//! - The [`detector::Detector`] and [`reasoner::Reasoner`] capability traits
//! - An ONNX PPE object detector (CPU-only)
//! - A VLM sidecar client for hazard reasoning

pub mod detector;
pub mod image_utils;
pub mod ppe;
pub mod reasoner;

pub use detector::{BoundingBox, DetectionRecord, Detector};
pub use image_utils::{decode_upload, detect_format, DecodedImage, ImageError};
pub use ppe::PpeDetectionModel;
pub use reasoner::{Reasoner, VlmReasoner};
