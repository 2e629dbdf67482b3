// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Inspection node configuration
//!
//! All regulatory business rules (confidence thresholds, fine units,
//! structural-hazard keywords, label predicates) live here rather than as
//! inline literals, so a regulation change is a config change, not a code
//! change. Every field has a reference default; a TOML file can override
//! any subset.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::inspection::error::InspectionError;

/// Reference inspection prompt (Punjab Building Safety Act 2016 regime).
pub const DEFAULT_INSPECTION_PROMPT: &str = "You are a Punjab Building Safety Inspector. \
    Analyze this construction site for any structural hazards or missing fire safety \
    equipment. Focus on the Punjab Building Safety Act 2016.";

/// Spatial detector settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Path to the PPE detection ONNX model
    pub model_path: String,
    /// Detections below this score are discarded
    pub min_confidence: f32,
    /// IoU threshold for non-maximum suppression
    pub iou_threshold: f32,
    /// Class labels, in model output order
    pub labels: Vec<String>,
    /// Per-call deadline; expiry is reported as DetectorUnavailable
    pub deadline_secs: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: "./models/ppe-yolov8n.onnx".to_string(),
            min_confidence: 0.3,
            iou_threshold: 0.45,
            labels: vec![
                "person".to_string(),
                "helmet".to_string(),
                "no-helmet".to_string(),
                "vest".to_string(),
                "no-vest".to_string(),
            ],
            deadline_secs: 30,
        }
    }
}

/// Hazard reasoner settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReasonerConfig {
    /// Jurisdiction-specific inspection instruction sent with every image
    pub inspection_prompt: String,
    /// Per-call deadline; expiry is reported as ReasonerUnavailable
    pub deadline_secs: u64,
    /// When true, a failed reasoning pass degrades the report instead of
    /// failing the request
    pub degrade_on_reasoning_failure: bool,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            inspection_prompt: DEFAULT_INSPECTION_PROMPT.to_string(),
            deadline_secs: 120,
            degrade_on_reasoning_failure: true,
        }
    }
}

/// Label predicates for the violation classifier
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierRules {
    /// A label starting with any of these counts as a violation
    pub violation_prefixes: Vec<String>,
    /// A label containing any of these counts as a person
    pub person_markers: Vec<String>,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            violation_prefixes: vec!["no-".to_string()],
            person_markers: vec!["person".to_string()],
        }
    }
}

/// Fine calculation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Fine per PPE violation (PKR)
    pub ppe_fine_unit: u64,
    /// Flat fine added when the narrative mentions a structural hazard (PKR)
    pub structural_fine_amount: u64,
    /// Structural-hazard keywords, matched case-insensitively against whole
    /// words of the narrative
    pub structural_keywords: BTreeSet<String>,
    /// Fines above this amount are High severity, at or below are Medium
    pub high_severity_threshold: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            ppe_fine_unit: 5_000,
            structural_fine_amount: 25_000,
            structural_keywords: ["crack", "fissure", "collapse", "subsidence"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            high_severity_threshold: 20_000,
        }
    }
}

/// Report metadata settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Engine identifier stamped on every response
    pub engine: String,
    /// Regulation citation attached to every issue
    pub regulation_hint: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            engine: "Apex-Sovereign-Local".to_string(),
            regulation_hint: "Section 12.3: Occupational Safety (Punjab Act)".to_string(),
        }
    }
}

/// Complete configuration for the inspection pipeline
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InspectionConfig {
    pub detector: DetectorConfig,
    pub reasoner: ReasonerConfig,
    pub rules: ClassifierRules,
    pub scoring: ScoringConfig,
    pub report: ReportConfig,
}

impl InspectionConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// any omitted field.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Reject malformed thresholds, empty predicate sets, and empty prompts
    /// at startup, before any request is served.
    pub fn validate(&self) -> Result<(), InspectionError> {
        if !(0.0..=1.0).contains(&self.detector.min_confidence) {
            return Err(InspectionError::Configuration(format!(
                "min_confidence must be in [0, 1], got {}",
                self.detector.min_confidence
            )));
        }
        if !(0.0..=1.0).contains(&self.detector.iou_threshold) {
            return Err(InspectionError::Configuration(format!(
                "iou_threshold must be in [0, 1], got {}",
                self.detector.iou_threshold
            )));
        }
        if self.detector.labels.is_empty() {
            return Err(InspectionError::Configuration(
                "detector label set must not be empty".to_string(),
            ));
        }
        if self.detector.deadline_secs == 0 || self.reasoner.deadline_secs == 0 {
            return Err(InspectionError::Configuration(
                "adapter deadlines must be at least 1 second".to_string(),
            ));
        }
        if self.reasoner.inspection_prompt.trim().is_empty() {
            return Err(InspectionError::Configuration(
                "inspection_prompt must not be empty".to_string(),
            ));
        }
        if self.rules.violation_prefixes.is_empty() {
            return Err(InspectionError::Configuration(
                "violation_prefixes must not be empty".to_string(),
            ));
        }
        if self.scoring.structural_keywords.is_empty()
            || self.scoring.structural_keywords.iter().any(|k| k.trim().is_empty())
        {
            return Err(InspectionError::Configuration(
                "structural_keywords must be a non-empty set of non-empty words".to_string(),
            ));
        }
        Ok(())
    }

    pub fn detector_deadline(&self) -> Duration {
        Duration::from_secs(self.detector.deadline_secs)
    }

    pub fn reasoner_deadline(&self) -> Duration {
        Duration::from_secs(self.reasoner.deadline_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_behavior() {
        let config = InspectionConfig::default();
        assert_eq!(config.detector.min_confidence, 0.3);
        assert_eq!(config.scoring.ppe_fine_unit, 5_000);
        assert_eq!(config.scoring.structural_fine_amount, 25_000);
        assert_eq!(config.scoring.high_severity_threshold, 20_000);
        assert!(config.scoring.structural_keywords.contains("crack"));
        assert!(config.reasoner.degrade_on_reasoning_failure);
        config.validate().expect("defaults must validate");
    }

    #[test]
    fn test_validate_rejects_bad_confidence() {
        let mut config = InspectionConfig::default();
        config.detector.min_confidence = 1.5;
        assert!(matches!(
            config.validate(),
            Err(InspectionError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_keywords() {
        let mut config = InspectionConfig::default();
        config.scoring.structural_keywords.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_prompt() {
        let mut config = InspectionConfig::default();
        config.reasoner.inspection_prompt = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let toml_str = r#"
            [scoring]
            ppe_fine_unit = 7500

            [reasoner]
            degrade_on_reasoning_failure = false
        "#;
        let config: InspectionConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scoring.ppe_fine_unit, 7_500);
        assert!(!config.reasoner.degrade_on_reasoning_failure);
        // Untouched sections keep their defaults
        assert_eq!(config.detector.min_confidence, 0.3);
        assert_eq!(config.report.engine, "Apex-Sovereign-Local");
    }

    #[test]
    fn test_keyword_set_deduplicates() {
        let toml_str = r#"
            [scoring]
            structural_keywords = ["crack", "crack", "collapse"]
        "#;
        let config: InspectionConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scoring.structural_keywords.len(), 2);
    }
}
