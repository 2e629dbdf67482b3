// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analysis response schema
//!
//! Maps the internal [`InspectionReport`] to the external wire format. The
//! field naming is deliberately mixed (`compliance_rate` snake_case, the
//! rest camelCase) to stay byte-compatible with existing report consumers.

use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;
use crate::inspection::report::InspectionReport;
use crate::inspection::scorer::Severity;

/// Narrative excerpt length embedded in the issue description
const NARRATIVE_EXCERPT_CHARS: usize = 200;

/// Caveat embedded when the reasoning pass was degraded
const REASONING_UNAVAILABLE_NOTE: &str = "Hazard reasoning unavailable for this image.";

/// Issue title used for the aggregated site report
const ISSUE_TITLE: &str = "Site-Wide Safety Violation";

/// One compliance issue in the response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceIssue {
    pub title: String,
    /// Violation count plus a truncated narrative excerpt
    pub description: String,
    pub severity: Severity,
    pub regulation_hint: String,
    pub fine_amount: u64,
}

/// Successful response for `POST /analyze`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    pub engine: String,
    pub is_authentic_evidence: bool,
    pub confidence_score: u32,
    #[serde(rename = "compliance_rate")]
    pub compliance_rate: String,
    pub issues: Vec<ComplianceIssue>,
}

impl AnalyzeResponse {
    /// Format an assembled report for the wire
    pub fn from_report(report: &InspectionReport, config: &ReportConfig) -> Self {
        let excerpt = if report.reasoning_degraded {
            REASONING_UNAVAILABLE_NOTE.to_string()
        } else {
            truncate_chars(&report.narrative.text, NARRATIVE_EXCERPT_CHARS)
        };

        let description = format!(
            "Found {} workers without PPE. {}",
            report.summary.violation_count, excerpt
        );

        Self {
            success: true,
            engine: report.engine.clone(),
            is_authentic_evidence: report.authentic_evidence,
            confidence_score: report.confidence_score,
            compliance_rate: format!("{:.1}%", report.score.compliance_rate_percent),
            issues: vec![ComplianceIssue {
                title: ISSUE_TITLE.to_string(),
                description,
                severity: report.score.severity,
                regulation_hint: config.regulation_hint.clone(),
                fine_amount: report.score.fine_amount,
            }],
        }
    }
}

/// Truncate to at most `max_chars` characters on a char boundary
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
