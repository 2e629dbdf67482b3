// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX-backed PPE object detection

pub mod model;
pub mod preprocessing;

pub use model::PpeDetectionModel;
pub use preprocessing::{letterbox, preprocess_for_detection, LetterboxInfo, DETECTOR_INPUT_SIZE};
