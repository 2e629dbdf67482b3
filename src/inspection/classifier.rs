// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Violation classification
//!
//! Reduces raw detection records into violation and people counts. The two
//! predicates are independent: a label can contribute to both counts, to
//! one, or to neither.

use serde::Serialize;

use crate::config::ClassifierRules;
use crate::vision::detector::DetectionRecord;

/// Counts derived from one detection pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationSummary {
    /// Number of detections matching a person marker
    pub people_count: usize,
    /// Violation labels, in detection order
    pub violation_labels: Vec<String>,
    /// Always equal to `violation_labels.len()`
    pub violation_count: usize,
}

/// Classify detections into a [`ViolationSummary`].
///
/// Pure and deterministic; `violation_labels` follows detection order so
/// fixtures are reproducible.
pub fn classify(detections: &[DetectionRecord], rules: &ClassifierRules) -> ViolationSummary {
    let mut violation_labels = Vec::new();
    let mut people_count = 0;

    for record in detections {
        if rules
            .violation_prefixes
            .iter()
            .any(|prefix| record.label.starts_with(prefix.as_str()))
        {
            violation_labels.push(record.label.clone());
        }
        if rules
            .person_markers
            .iter()
            .any(|marker| record.label.contains(marker.as_str()))
        {
            people_count += 1;
        }
    }

    ViolationSummary {
        people_count,
        violation_count: violation_labels.len(),
        violation_labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::detector::DetectionRecord;

    fn records(labels: &[&str]) -> Vec<DetectionRecord> {
        labels
            .iter()
            .map(|l| DetectionRecord::unlocalized(*l, 0.9))
            .collect()
    }

    #[test]
    fn test_classify_reference_scene() {
        let summary = classify(
            &records(&["person", "no-helmet", "no-vest"]),
            &ClassifierRules::default(),
        );
        assert_eq!(summary.people_count, 1);
        assert_eq!(summary.violation_count, 2);
        assert_eq!(summary.violation_labels, vec!["no-helmet", "no-vest"]);
    }

    #[test]
    fn test_classify_empty_detections() {
        let summary = classify(&[], &ClassifierRules::default());
        assert_eq!(summary.people_count, 0);
        assert_eq!(summary.violation_count, 0);
        assert!(summary.violation_labels.is_empty());
    }

    #[test]
    fn test_classify_violations_without_people() {
        // A discarded helmet with no visible worker is a valid outcome
        let summary = classify(&records(&["no-helmet"]), &ClassifierRules::default());
        assert_eq!(summary.people_count, 0);
        assert_eq!(summary.violation_count, 1);
    }

    #[test]
    fn test_classify_compliant_labels_ignored() {
        let summary = classify(
            &records(&["helmet", "vest", "excavator"]),
            &ClassifierRules::default(),
        );
        assert_eq!(summary.people_count, 0);
        assert_eq!(summary.violation_count, 0);
    }

    #[test]
    fn test_predicates_are_independent() {
        // A label matching both predicates contributes to both counts
        let rules = ClassifierRules {
            violation_prefixes: vec!["no-".to_string()],
            person_markers: vec!["person".to_string()],
        };
        let summary = classify(&records(&["no-ppe-person"]), &rules);
        assert_eq!(summary.people_count, 1);
        assert_eq!(summary.violation_count, 1);
    }

    #[test]
    fn test_count_matches_label_length() {
        let summary = classify(
            &records(&["no-helmet", "no-vest", "no-helmet", "person", "person"]),
            &ClassifierRules::default(),
        );
        assert_eq!(summary.violation_count, summary.violation_labels.len());
        assert_eq!(summary.people_count, 2);
    }

    #[test]
    fn test_violation_labels_preserve_detection_order() {
        let summary = classify(
            &records(&["no-vest", "no-helmet"]),
            &ClassifierRules::default(),
        );
        assert_eq!(summary.violation_labels, vec!["no-vest", "no-helmet"]);
    }
}
