//! Categorical lookup scorers
//!
//! Both scorers use the same matching policy: a normalized value matches an
//! entry when it CONTAINS the entry's label as a substring. That tolerates
//! the extra text CRM dropdowns tend to carry ("Ready to Apply - Hot Lead").
//! Entries are tried in declaration order and the first match wins, which
//! makes the tie-break deterministic and part of the profile.

use lead_scorer_config::{MatrixConfig, WeightEntry};

/// Ordered substring-match weight table
#[derive(Debug, Clone)]
pub struct CategoricalScorer {
    entries: Vec<WeightEntry>,
}

impl CategoricalScorer {
    pub fn new(entries: Vec<WeightEntry>) -> Self {
        Self { entries }
    }

    /// Score a normalized value. Returns the matched label and its weight,
    /// or `None` when no entry matches.
    pub fn score(&self, value: &str) -> Option<(&str, i32)> {
        if value.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| value.contains(entry.label.as_str()))
            .map(|entry| (entry.label.as_str(), entry.weight))
    }

    /// All labels, in declaration order
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.label.clone()).collect()
    }
}

/// Two-dimensional (readiness, timeline) base-score table
///
/// Pair entries use the same substring-contains policy on both dimensions;
/// the first entry matching both wins.
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    config: MatrixConfig,
}

impl ScoreMatrix {
    pub fn new(config: MatrixConfig) -> Self {
        Self { config }
    }

    /// Base score for a normalized (readiness, timeline) pair, or `None`
    /// when no pair entry matches.
    pub fn base(&self, readiness: &str, timeline: &str) -> Option<i32> {
        self.config
            .entries
            .iter()
            .find(|e| readiness.contains(e.readiness.as_str()) && timeline.contains(e.timeline.as_str()))
            .map(|e| e.base)
    }

    /// Fallback base score when no pair matches (lenient mode)
    pub fn default_base(&self) -> i32 {
        self.config.default_base
    }
}
