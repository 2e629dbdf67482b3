// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core inspection pipeline: classification, scoring, orchestration

pub mod classifier;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod scorer;

pub use classifier::{classify, ViolationSummary};
pub use error::InspectionError;
pub use orchestrator::InspectionOrchestrator;
pub use report::{InspectionReport, REPORT_CONFIDENCE_SCORE};
pub use scorer::{score, ComplianceScore, HazardNarrative, Severity};
