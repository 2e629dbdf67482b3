// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared fixtures and deterministic capability fakes
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use apexgov_inspector::vision::{decode_upload, DecodedImage, DetectionRecord, Detector, Reasoner};

/// 1x1 red PNG image (base64)
pub const TINY_PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

pub fn tiny_png_bytes() -> Vec<u8> {
    STANDARD.decode(TINY_PNG_BASE64).unwrap()
}

pub fn tiny_png() -> DecodedImage {
    decode_upload(&tiny_png_bytes()).unwrap()
}

/// Detector that always returns the same records
pub struct FixedDetector(pub Vec<DetectionRecord>);

#[async_trait]
impl Detector for FixedDetector {
    async fn detect(&self, _image: &DecodedImage) -> Result<Vec<DetectionRecord>> {
        Ok(self.0.clone())
    }
}

/// Detector whose capability is down
pub struct FailingDetector;

#[async_trait]
impl Detector for FailingDetector {
    async fn detect(&self, _image: &DecodedImage) -> Result<Vec<DetectionRecord>> {
        Err(anyhow!("inference runtime crashed"))
    }
}

/// Reasoner that always returns the same narrative
pub struct FixedReasoner(pub String);

#[async_trait]
impl Reasoner for FixedReasoner {
    async fn reason(&self, _image: &DecodedImage, _prompt: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Reasoner whose sidecar is down
pub struct FailingReasoner;

#[async_trait]
impl Reasoner for FailingReasoner {
    async fn reason(&self, _image: &DecodedImage, _prompt: &str) -> Result<String> {
        Err(anyhow!("VLM sidecar unreachable"))
    }
}

/// Reasoner that records the prompt it receives (used to verify the
/// configured inspection prompt reaches the capability)
pub struct EchoPromptReasoner;

#[async_trait]
impl Reasoner for EchoPromptReasoner {
    async fn reason(&self, _image: &DecodedImage, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }
}

pub fn detection(label: &str, confidence: f32) -> DetectionRecord {
    DetectionRecord::unlocalized(label, confidence)
}
