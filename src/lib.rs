// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod inspection;
pub mod vision;

// Re-export the main pipeline types
pub use config::{
    ClassifierRules, DetectorConfig, InspectionConfig, ReasonerConfig, ReportConfig, ScoringConfig,
};
pub use inspection::{
    classify, score, ComplianceScore, HazardNarrative, InspectionError, InspectionOrchestrator,
    InspectionReport, Severity, ViolationSummary,
};
pub use vision::{
    decode_upload, BoundingBox, DecodedImage, DetectionRecord, Detector, PpeDetectionModel,
    Reasoner, VlmReasoner,
};
