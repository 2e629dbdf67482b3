// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Compliance scoring
//!
//! Pure derivation of fine amount, severity, and compliance rate from the
//! violation summary and the hazard narrative. Fully deterministic given
//! its inputs and configuration.

use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::inspection::classifier::ViolationSummary;
use std::collections::BTreeSet;

/// Free-text hazard description from the reasoning pass.
///
/// Always a string; a failed reasoning call substitutes an explicit empty
/// string rather than an absent value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HazardNarrative {
    pub text: String,
}

impl HazardNarrative {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn empty() -> Self {
        Self {
            text: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Report severity. The reference scheme is two-tier: fines above the
/// threshold are High, everything else Medium. Low is part of the enum for
/// wire compatibility but is never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Deterministic penalty derivation for one inspection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceScore {
    /// Total fine (PKR)
    pub fine_amount: u64,
    /// Pure function of `fine_amount`
    pub severity: Severity,
    /// Always within [0, 100]
    pub compliance_rate_percent: f64,
}

/// Compute the compliance score for a violation summary and narrative.
///
/// `fine = violations * ppe_fine_unit + structural_fine` (the latter only
/// when the narrative mentions a structural keyword). The compliance rate
/// divides violations by `max(people, 1)` and clamps to [0, 100]; the
/// clamp closes a gap in the reference behavior, which could report
/// negative rates when violations outnumbered detected people.
pub fn score(
    summary: &ViolationSummary,
    narrative: &HazardNarrative,
    config: &ScoringConfig,
) -> ComplianceScore {
    let mut fine_amount = summary.violation_count as u64 * config.ppe_fine_unit;

    if contains_structural_keyword(&narrative.text, &config.structural_keywords) {
        fine_amount += config.structural_fine_amount;
    }

    let people = summary.people_count.max(1) as f64;
    let compliance_rate_percent =
        ((1.0 - summary.violation_count as f64 / people) * 100.0).clamp(0.0, 100.0);

    ComplianceScore {
        fine_amount,
        severity: severity_for(fine_amount, config.high_severity_threshold),
        compliance_rate_percent,
    }
}

/// Severity mapping: strictly above the threshold is High, otherwise
/// Medium. Low is intentionally unreachable in the two-tier scheme.
pub fn severity_for(fine_amount: u64, high_threshold: u64) -> Severity {
    if fine_amount > high_threshold {
        Severity::High
    } else {
        Severity::Medium
    }
}

/// Case-insensitive whole-word keyword match.
///
/// Matching on word boundaries rather than raw substrings keeps inflected
/// mentions like "no cracks found" from triggering the structural fine for
/// the keyword "crack"; synonyms and plurals belong in the keyword set.
fn contains_structural_keyword(text: &str, keywords: &BTreeSet<String>) -> bool {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .any(|word| keywords.iter().any(|k| k.to_lowercase() == word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(people: usize, violations: &[&str]) -> ViolationSummary {
        ViolationSummary {
            people_count: people,
            violation_labels: violations.iter().map(|s| s.to_string()).collect(),
            violation_count: violations.len(),
        }
    }

    #[test]
    fn test_score_reference_ppe_scene() {
        // One worker, two PPE violations, no structural mention
        let result = score(
            &summary(1, &["no-helmet", "no-vest"]),
            &HazardNarrative::new("minor wear, no cracks found"),
            &ScoringConfig::default(),
        );
        assert_eq!(result.fine_amount, 10_000);
        assert_eq!(result.severity, Severity::Medium);
        assert_eq!(result.compliance_rate_percent, 0.0);
    }

    #[test]
    fn test_score_structural_hazard_only() {
        let result = score(
            &summary(0, &[]),
            &HazardNarrative::new("visible structural crack on east wall"),
            &ScoringConfig::default(),
        );
        assert_eq!(result.fine_amount, 25_000);
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.compliance_rate_percent, 100.0);
    }

    #[test]
    fn test_negated_keyword_does_not_fine() {
        // "no cracks found" must not trigger the structural fine: "cracks"
        // is a different word than the keyword "crack"
        let result = score(
            &summary(1, &[]),
            &HazardNarrative::new("minor wear, no cracks found"),
            &ScoringConfig::default(),
        );
        assert_eq!(result.fine_amount, 0);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let result = score(
            &summary(0, &[]),
            &HazardNarrative::new("Large CRACK across the foundation."),
            &ScoringConfig::default(),
        );
        assert_eq!(result.fine_amount, 25_000);
    }

    #[test]
    fn test_keyword_match_handles_punctuation() {
        let result = score(
            &summary(0, &[]),
            &HazardNarrative::new("hazards observed: crack, loose scaffolding"),
            &ScoringConfig::default(),
        );
        assert_eq!(result.fine_amount, 25_000);
    }

    #[test]
    fn test_empty_narrative_scores_zero_structural() {
        let result = score(
            &summary(2, &["no-vest"]),
            &HazardNarrative::empty(),
            &ScoringConfig::default(),
        );
        assert_eq!(result.fine_amount, 5_000);
        assert_eq!(result.severity, Severity::Medium);
    }

    #[test]
    fn test_compliance_rate_clamped_at_zero() {
        // Three violations against one person would be -200% unclamped
        let result = score(
            &summary(1, &["no-helmet", "no-vest", "no-helmet"]),
            &HazardNarrative::empty(),
            &ScoringConfig::default(),
        );
        assert_eq!(result.compliance_rate_percent, 0.0);
    }

    #[test]
    fn test_compliance_rate_zero_people_guard() {
        // No people, one violation: the max(people, 1) guard plus the
        // clamp keeps the rate in range instead of dividing by zero
        let result = score(
            &summary(0, &["no-helmet"]),
            &HazardNarrative::empty(),
            &ScoringConfig::default(),
        );
        assert!((0.0..=100.0).contains(&result.compliance_rate_percent));
        assert_eq!(result.compliance_rate_percent, 0.0);
    }

    #[test]
    fn test_compliance_rate_partial() {
        let result = score(
            &summary(4, &["no-helmet"]),
            &HazardNarrative::empty(),
            &ScoringConfig::default(),
        );
        assert_eq!(result.compliance_rate_percent, 75.0);
    }

    #[test]
    fn test_severity_boundary_is_strict() {
        // Exactly at the threshold stays Medium
        assert_eq!(severity_for(20_000, 20_000), Severity::Medium);
        assert_eq!(severity_for(20_001, 20_000), Severity::High);
    }

    #[test]
    fn test_score_is_deterministic() {
        let s = summary(2, &["no-helmet", "no-vest"]);
        let n = HazardNarrative::new("cracked beams and exposed wiring");
        let config = ScoringConfig::default();
        assert_eq!(score(&s, &n, &config), score(&s, &n, &config));
    }

    #[test]
    fn test_combined_ppe_and_structural_fines() {
        let result = score(
            &summary(2, &["no-helmet", "no-vest"]),
            &HazardNarrative::new("a crack runs along the support column"),
            &ScoringConfig::default(),
        );
        assert_eq!(result.fine_amount, 35_000);
        assert_eq!(result.severity, Severity::High);
    }

    #[test]
    fn test_severity_serializes_as_plain_string() {
        assert_eq!(serde_json::to_value(Severity::High).unwrap(), "High");
        assert_eq!(serde_json::to_value(Severity::Medium).unwrap(), "Medium");
    }
}
