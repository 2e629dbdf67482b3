// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Inspection report aggregate

use serde::Serialize;

use crate::inspection::classifier::ViolationSummary;
use crate::inspection::scorer::{ComplianceScore, HazardNarrative};

/// Fixed evidence confidence stamped on every report
pub const REPORT_CONFIDENCE_SCORE: u32 = 92;

/// Complete result of one inspection request.
///
/// Assembled once by the orchestrator, never mutated afterwards, and never
/// persisted; its lifetime is the request/response cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionReport {
    /// Engine identifier
    pub engine: String,
    /// Fixed evidence confidence score
    pub confidence_score: u32,
    /// Authenticity flag for the submitted evidence
    pub authentic_evidence: bool,
    pub summary: ViolationSummary,
    pub narrative: HazardNarrative,
    pub score: ComplianceScore,
    /// True when the reasoning pass failed and the degrade policy
    /// substituted an empty narrative
    pub reasoning_degraded: bool,
}
