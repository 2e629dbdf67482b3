// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Inspection orchestration
//!
//! Sequences the two vision capabilities over one decoded image, applies
//! per-adapter deadlines and the reasoning degrade policy, and assembles
//! the final report. A request moves through Received → Detecting /
//! Reasoning (concurrent) → Scoring → Assembled; detector failure is
//! terminal, reasoner failure degrades when the policy allows it.

use std::sync::Arc;

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::InspectionConfig;
use crate::inspection::classifier::classify;
use crate::inspection::error::InspectionError;
use crate::inspection::report::{InspectionReport, REPORT_CONFIDENCE_SCORE};
use crate::inspection::scorer::{score, HazardNarrative};
use crate::vision::detector::Detector;
use crate::vision::image_utils::DecodedImage;
use crate::vision::reasoner::Reasoner;

/// Orchestrates one inspection per call over injected capabilities.
///
/// The capabilities are trait objects handed in at construction, never
/// ambient globals, so tests can substitute deterministic fakes. The
/// orchestrator itself is stateless across requests.
pub struct InspectionOrchestrator {
    detector: Arc<dyn Detector>,
    reasoner: Arc<dyn Reasoner>,
    config: InspectionConfig,
}

impl InspectionOrchestrator {
    pub fn new(
        detector: Arc<dyn Detector>,
        reasoner: Arc<dyn Reasoner>,
        config: InspectionConfig,
    ) -> Self {
        Self {
            detector,
            reasoner,
            config,
        }
    }

    pub fn config(&self) -> &InspectionConfig {
        &self.config
    }

    /// Run the full pipeline over a decoded image.
    ///
    /// The detection and reasoning passes have no data dependency and run
    /// concurrently; both must settle before scoring. Deadline expiry is
    /// reported with the same error kinds as outright adapter failure.
    pub async fn inspect(&self, image: &DecodedImage) -> Result<InspectionReport, InspectionError> {
        debug!(
            width = image.width(),
            height = image.height(),
            "starting inspection"
        );

        let detect_pass = timeout(self.config.detector_deadline(), self.detector.detect(image));
        let reason_pass = timeout(
            self.config.reasoner_deadline(),
            self.reasoner
                .reason(image, &self.config.reasoner.inspection_prompt),
        );

        let (detect_result, reason_result) = tokio::join!(detect_pass, reason_pass);

        // No meaningful report exists without the spatial pass
        let detections = match detect_result {
            Ok(Ok(detections)) => detections,
            Ok(Err(e)) => return Err(InspectionError::DetectorUnavailable(e.to_string())),
            Err(_) => {
                return Err(InspectionError::DetectorUnavailable(format!(
                    "deadline of {}s exceeded",
                    self.config.detector.deadline_secs
                )))
            }
        };
        debug!(count = detections.len(), "detection pass complete");

        let (narrative, reasoning_degraded) = match reason_result {
            Ok(Ok(text)) => (HazardNarrative::new(text), false),
            Ok(Err(e)) => self.degrade_or_fail(e.to_string())?,
            Err(_) => self.degrade_or_fail(format!(
                "deadline of {}s exceeded",
                self.config.reasoner.deadline_secs
            ))?,
        };

        let summary = classify(&detections, &self.config.rules);
        let compliance = score(&summary, &narrative, &self.config.scoring);
        debug!(
            violations = summary.violation_count,
            fine = compliance.fine_amount,
            "scoring complete"
        );

        Ok(InspectionReport {
            engine: self.config.report.engine.clone(),
            confidence_score: REPORT_CONFIDENCE_SCORE,
            authentic_evidence: true,
            summary,
            narrative,
            score: compliance,
            reasoning_degraded,
        })
    }

    /// Apply the degrade policy to a failed reasoning pass: substitute an
    /// empty narrative (zero structural penalty) or propagate the failure.
    fn degrade_or_fail(
        &self,
        reason: String,
    ) -> Result<(HazardNarrative, bool), InspectionError> {
        if self.config.reasoner.degrade_on_reasoning_failure {
            warn!(%reason, "reasoning pass failed, degrading report");
            Ok((HazardNarrative::empty(), true))
        } else {
            Err(InspectionError::ReasonerUnavailable(reason))
        }
    }
}
