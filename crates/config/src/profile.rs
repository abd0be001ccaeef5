//! Scoring profile
//!
//! Defines the config-driven scoring rules for lead readiness. Lookup
//! tables, intent rules, thresholds and the business override are all data,
//! loaded from `profile.yaml`; the engine in `lead-scorer-scoring` is the
//! only interpreter.
//!
//! Matching contract: weight tables are ORDERED lists, a normalized value
//! matches an entry when it contains the entry's label as a substring, and
//! the first matching entry wins. Declaration order is therefore part of the
//! profile, not an implementation detail.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// How the base score is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Sum of independent engagement/timeline/inquiry components
    #[default]
    Additive,
    /// Two-dimensional (readiness, timeline) table plus intent adjustment
    Matrix,
}

/// One ordered weight-table entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntry {
    /// Substring key, matched against the normalized value
    pub label: String,
    pub weight: i32,
}

/// One (readiness, timeline) pair in the matrix table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixEntry {
    pub readiness: String,
    pub timeline: String,
    pub base: i32,
}

/// Matrix-mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixConfig {
    /// Base score when the pair has no entry (lenient mode only)
    #[serde(default = "default_matrix_base")]
    pub default_base: i32,
    #[serde(default = "default_matrix_entries")]
    pub entries: Vec<MatrixEntry>,
}

fn default_matrix_base() -> i32 {
    30
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            default_base: default_matrix_base(),
            entries: default_matrix_entries(),
        }
    }
}

/// Additive scores for the three inquiry strength levels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrengthScores {
    pub strong: i32,
    pub medium: i32,
    pub weak: i32,
}

impl Default for StrengthScores {
    fn default() -> Self {
        Self {
            strong: 20,
            medium: 12,
            weak: 6,
        }
    }
}

/// One free-text intent rule
///
/// Rules are tested in declaration order against the normalized inquiry
/// text; the first rule with any matching pattern wins. Overlapping
/// keywords across rules ("apply" vs "scholarship") resolve by this order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentRule {
    /// Intent label from the closed set
    pub label: String,
    /// Strength level for additive mode ("strong" | "medium" | "weak")
    pub strength: String,
    /// Score adjustment for matrix mode
    pub adjustment: i32,
    /// Regex patterns, any match selects this rule
    pub patterns: Vec<String>,
}

/// Business override rule
///
/// When the combined score lands below `trigger_below` but a structured
/// signal independently indicated strong intent, the final score is forced
/// to exactly `floor`. Deliberate business rule: a weak free-text signal
/// must not contradict strong structured signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideRule {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub trigger_below: i32,
    pub floor: u32,
    /// Substrings of the normalized engagement label that count as strong
    pub engagement_markers: Vec<String>,
    /// Substrings of the normalized timeline label that count as strong
    pub timeline_markers: Vec<String>,
}

impl Default for OverrideRule {
    fn default() -> Self {
        Self {
            enabled: true,
            trigger_below: 40,
            floor: 70,
            engagement_markers: vec!["ready".to_string()],
            timeline_markers: vec!["30".to_string()],
        }
    }
}

/// Bucket thresholds
///
/// `high` alone gives the binary Low/High scheme; setting `medium` switches
/// to the ternary Low/Medium/High scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketThresholds {
    pub high: u32,
    #[serde(default)]
    pub medium: Option<u32>,
}

impl Default for BucketThresholds {
    fn default() -> Self {
        Self {
            high: 70,
            medium: None,
        }
    }
}

/// Scoring profile loaded from profile.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringProfile {
    #[serde(default)]
    pub mode: ScoringMode,

    /// Strict mode: unmatched categorical values are validation errors
    /// instead of scoring zero (or the matrix default base)
    #[serde(default)]
    pub strict: bool,

    /// Engagement/readiness weight table (ordered)
    #[serde(default = "default_engagement_weights")]
    pub engagement: Vec<WeightEntry>,

    /// Enrollment-timeline weight table (ordered)
    #[serde(default = "default_timeline_weights")]
    pub timeline: Vec<WeightEntry>,

    #[serde(default)]
    pub matrix: MatrixConfig,

    #[serde(default)]
    pub strength_scores: StrengthScores,

    /// Free-text intent rules (ordered)
    #[serde(default = "default_intent_rules")]
    pub intent_rules: Vec<IntentRule>,

    /// Label used when no rule matches or the text is too short
    #[serde(default = "default_intent_label")]
    pub default_intent: String,

    /// Inquiries shorter than this (after normalization) skip pattern
    /// matching entirely and take the default intent
    #[serde(default = "default_min_inquiry_chars")]
    pub min_inquiry_chars: usize,

    #[serde(default, rename = "override")]
    pub override_rule: OverrideRule,

    #[serde(default)]
    pub buckets: BucketThresholds,

    /// Generate the template-based reasoning text
    #[serde(default = "default_true")]
    pub reasoning: bool,
}

fn default_true() -> bool {
    true
}

fn default_intent_label() -> String {
    "General Inquiry".to_string()
}

fn default_min_inquiry_chars() -> usize {
    3
}

fn default_engagement_weights() -> Vec<WeightEntry> {
    // "not interested" and "very interested" both contain "interested", so
    // they must be declared before it: first match wins.
    [
        ("ready to apply", 40),
        ("ready to enroll", 40),
        ("not interested", 0),
        ("very interested", 32),
        ("interested", 24),
        ("considering", 20),
        ("exploring", 16),
    ]
    .into_iter()
    .map(|(label, weight)| WeightEntry {
        label: label.to_string(),
        weight,
    })
    .collect()
}

fn default_timeline_weights() -> Vec<WeightEntry> {
    [
        ("immediately", 40),
        ("within 30 days", 40),
        ("within 3 months", 28),
        ("3-6 months", 20),
        ("6-12 months", 14),
        ("next year", 12),
        ("researching", 10),
        ("undecided", 8),
    ]
    .into_iter()
    .map(|(label, weight)| WeightEntry {
        label: label.to_string(),
        weight,
    })
    .collect()
}

fn default_matrix_entries() -> Vec<MatrixEntry> {
    let pairs: [(&str, &str, i32); 9] = [
        ("ready to apply", "within 30 days", 90),
        ("ready to apply", "within 3 months", 78),
        ("ready to apply", "researching", 62),
        ("interested", "within 30 days", 72),
        ("interested", "within 3 months", 58),
        ("interested", "researching", 44),
        ("exploring", "within 30 days", 50),
        ("exploring", "within 3 months", 38),
        ("exploring", "researching", 24),
    ];
    pairs
        .into_iter()
        .map(|(readiness, timeline, base)| MatrixEntry {
            readiness: readiness.to_string(),
            timeline: timeline.to_string(),
            base,
        })
        .collect()
}

fn default_intent_rules() -> Vec<IntentRule> {
    // Priority order matters: admissions signals outrank fees, fees outrank
    // eligibility, and so on down to early-research. A text mentioning both
    // "apply" and "scholarship" classifies as Admissions Inquiry.
    let rules: [(&str, &str, i32, &[&str]); 8] = [
        (
            "Admissions Inquiry",
            "strong",
            8,
            &[r"\b(apply|applying|application|admission|admissions|enroll|enrolling|enrollment|register)\b"],
        ),
        (
            "Fees & Financial Aid",
            "medium",
            4,
            &[r"\b(fee|fees|tuition|cost|price|scholarship|scholarships|financial aid|emi|installment)\b"],
        ),
        (
            "Eligibility Check",
            "medium",
            5,
            &[r"\b(eligible|eligibility|qualify|qualification|criteria|requirement|requirements)\b"],
        ),
        (
            "Program Selection",
            "medium",
            3,
            &[r"\b(program|programs|course|courses|mba|degree|major|specialization|curriculum)\b"],
        ),
        (
            "Career Outcomes",
            "medium",
            2,
            &[r"\b(career|job|jobs|placement|placements|salary|internship|outcome|outcomes)\b"],
        ),
        (
            "Campus & Experience",
            "weak",
            1,
            &[r"\b(campus|hostel|accommodation|housing|facilities|clubs|events)\b"],
        ),
        (
            "Counselling Request",
            "strong",
            6,
            &[r"\b(counsellor|counselor|counselling|counseling|advisor)\b", r"\b(call me|speak to|talk to)\b"],
        ),
        (
            "Early Research",
            "weak",
            -5,
            &[r"\b(just looking|just browsing|curious|someday|not sure yet|window shopping)\b"],
        ),
    ];
    rules
        .into_iter()
        .map(|(label, strength, adjustment, patterns)| IntentRule {
            label: label.to_string(),
            strength: strength.to_string(),
            adjustment,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        })
        .collect()
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self {
            mode: ScoringMode::Additive,
            strict: false,
            engagement: default_engagement_weights(),
            timeline: default_timeline_weights(),
            matrix: MatrixConfig::default(),
            strength_scores: StrengthScores::default(),
            intent_rules: default_intent_rules(),
            default_intent: default_intent_label(),
            min_inquiry_chars: default_min_inquiry_chars(),
            override_rule: OverrideRule::default(),
            buckets: BucketThresholds::default(),
            reasoning: true,
        }
    }
}

impl ScoringProfile {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::FileNotFound(format!("{}: {}", path.as_ref().display(), e))
        })?;

        let profile: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Validate the profile invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engagement.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "engagement".to_string(),
                message: "weight table must not be empty".to_string(),
            });
        }
        if self.timeline.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "timeline".to_string(),
                message: "weight table must not be empty".to_string(),
            });
        }

        for entry in self.engagement.iter().chain(self.timeline.iter()) {
            if entry.label.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "weight entry".to_string(),
                    message: "label must not be empty".to_string(),
                });
            }
        }

        for rule in &self.intent_rules {
            if rule.patterns.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("intent_rules.{}", rule.label),
                    message: "rule must declare at least one pattern".to_string(),
                });
            }
            if !matches!(rule.strength.as_str(), "strong" | "medium" | "weak") {
                return Err(ConfigError::InvalidValue {
                    field: format!("intent_rules.{}", rule.label),
                    message: format!(
                        "strength must be strong|medium|weak, got `{}`",
                        rule.strength
                    ),
                });
            }
        }

        if self.override_rule.floor > 100 {
            return Err(ConfigError::InvalidValue {
                field: "override.floor".to_string(),
                message: format!("must be <= 100, got {}", self.override_rule.floor),
            });
        }

        if self.buckets.high > 100 {
            return Err(ConfigError::InvalidValue {
                field: "buckets.high".to_string(),
                message: format!("must be <= 100, got {}", self.buckets.high),
            });
        }
        if let Some(medium) = self.buckets.medium {
            if medium >= self.buckets.high {
                return Err(ConfigError::InvalidValue {
                    field: "buckets.medium".to_string(),
                    message: format!(
                        "must be below buckets.high ({}), got {}",
                        self.buckets.high, medium
                    ),
                });
            }
        }

        Ok(())
    }

    /// Accepted engagement labels, for validation error messages
    pub fn engagement_labels(&self) -> Vec<String> {
        self.engagement.iter().map(|e| e.label.clone()).collect()
    }

    /// Accepted timeline labels, for validation error messages
    pub fn timeline_labels(&self) -> Vec<String> {
        self.timeline.iter().map(|e| e.label.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        let profile = ScoringProfile::default();
        assert!(profile.validate().is_ok());
        assert_eq!(profile.mode, ScoringMode::Additive);
        assert_eq!(profile.buckets.high, 70);
        assert!(profile.buckets.medium.is_none());
        assert_eq!(profile.override_rule.floor, 70);
    }

    #[test]
    fn test_default_tables_match_canonical_weights() {
        let profile = ScoringProfile::default();
        let ready = profile
            .engagement
            .iter()
            .find(|e| e.label == "ready to apply")
            .unwrap();
        assert_eq!(ready.weight, 40);

        let thirty = profile
            .timeline
            .iter()
            .find(|e| e.label == "within 30 days")
            .unwrap();
        assert_eq!(thirty.weight, 40);
    }

    #[test]
    fn test_intent_rule_priority_order() {
        let profile = ScoringProfile::default();
        let labels: Vec<&str> = profile
            .intent_rules
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        // Admissions must be checked before fees: both can match the same
        // text and the first match wins.
        let admissions = labels.iter().position(|l| *l == "Admissions Inquiry");
        let fees = labels.iter().position(|l| *l == "Fees & Financial Aid");
        assert!(admissions.unwrap() < fees.unwrap());
    }

    #[test]
    fn test_profile_yaml_deserialization() {
        let yaml = r#"
mode: additive
strict: true
engagement:
  - label: ready
    weight: 50
timeline:
  - label: "30"
    weight: 50
override:
  trigger_below: 45
  floor: 75
  engagement_markers: [ready]
  timeline_markers: ["30"]
buckets:
  high: 70
  medium: 40
"#;
        let profile: ScoringProfile = serde_yaml::from_str(yaml).unwrap();
        assert!(profile.strict);
        assert_eq!(profile.engagement.len(), 1);
        assert_eq!(profile.override_rule.floor, 75);
        assert_eq!(profile.buckets.medium, Some(40));
        // Omitted sections fall back to defaults
        assert!(!profile.intent_rules.is_empty());
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_tables() {
        let mut profile = ScoringProfile::default();
        profile.engagement.clear();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_bucket_thresholds() {
        let mut profile = ScoringProfile::default();
        profile.buckets.medium = Some(80);
        assert!(profile.validate().is_err());

        profile.buckets.medium = Some(40);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_strength() {
        let mut profile = ScoringProfile::default();
        profile.intent_rules[0].strength = "huge".to_string();
        assert!(profile.validate().is_err());
    }
}
