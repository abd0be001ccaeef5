//! Free-text inquiry classifier
//!
//! A fixed, ordered list of regex rule groups is tested against the
//! normalized inquiry text; the first rule with any matching pattern wins.
//! Rule order is part of the contract: overlapping keywords exist across
//! rules, so a text mentioning both "apply" and "scholarship" must resolve
//! deterministically to the admissions rule.
//!
//! Patterns are compiled once at engine construction and reused for every
//! request.

use regex::Regex;

use lead_scorer_config::{ConfigError, ScoringProfile};
use lead_scorer_core::Strength;

/// Classification outcome for one inquiry text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InquiryClassification {
    /// Intent label from the closed set
    pub label: String,
    /// Strength level (drives the additive component)
    pub strength: Strength,
    /// Score adjustment (drives the matrix component)
    pub adjustment: i32,
}

struct CompiledRule {
    label: String,
    strength: Strength,
    adjustment: i32,
    patterns: Vec<Regex>,
}

/// Rule-based free-text classifier
pub struct InquiryClassifier {
    rules: Vec<CompiledRule>,
    default_label: String,
    min_chars: usize,
}

impl InquiryClassifier {
    /// Compile the classifier from a scoring profile
    pub fn from_profile(profile: &ScoringProfile) -> Result<Self, ConfigError> {
        let mut rules = Vec::with_capacity(profile.intent_rules.len());

        for rule in &profile.intent_rules {
            let strength = parse_strength(&rule.strength).ok_or_else(|| {
                ConfigError::InvalidValue {
                    field: format!("intent_rules.{}", rule.label),
                    message: format!("unknown strength `{}`", rule.strength),
                }
            })?;

            let mut patterns = Vec::with_capacity(rule.patterns.len());
            for pattern in &rule.patterns {
                let regex = Regex::new(pattern).map_err(|e| ConfigError::InvalidValue {
                    field: format!("intent_rules.{}", rule.label),
                    message: format!("invalid pattern `{}`: {}", pattern, e),
                })?;
                patterns.push(regex);
            }

            rules.push(CompiledRule {
                label: rule.label.clone(),
                strength,
                adjustment: rule.adjustment,
                patterns,
            });
        }

        tracing::debug!(rules = rules.len(), "Compiled inquiry intent rules");

        Ok(Self {
            rules,
            default_label: profile.default_intent.clone(),
            min_chars: profile.min_inquiry_chars,
        })
    }

    /// Classify a normalized inquiry text.
    ///
    /// Text shorter than the configured minimum yields the default
    /// classification without running any pattern.
    pub fn classify(&self, text: &str) -> InquiryClassification {
        if text.chars().count() < self.min_chars {
            return self.default_classification();
        }

        for rule in &self.rules {
            if rule.patterns.iter().any(|p| p.is_match(text)) {
                return InquiryClassification {
                    label: rule.label.clone(),
                    strength: rule.strength,
                    adjustment: rule.adjustment,
                };
            }
        }

        self.default_classification()
    }

    fn default_classification(&self) -> InquiryClassification {
        InquiryClassification {
            label: self.default_label.clone(),
            strength: Strength::Weak,
            adjustment: 0,
        }
    }
}

fn parse_strength(s: &str) -> Option<Strength> {
    match s {
        "strong" => Some(Strength::Strong),
        "medium" => Some(Strength::Medium),
        "weak" => Some(Strength::Weak),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_scorer_core::normalize;

    fn classifier() -> InquiryClassifier {
        InquiryClassifier::from_profile(&ScoringProfile::default()).unwrap()
    }

    #[test]
    fn test_admissions_intent() {
        let c = classifier();
        let result = c.classify("i want to apply for the mba program");
        assert_eq!(result.label, "Admissions Inquiry");
        assert_eq!(result.strength, Strength::Strong);
    }

    #[test]
    fn test_overlapping_keywords_resolve_by_rule_order() {
        let c = classifier();
        // Mentions both an admissions keyword and a fees keyword; the
        // admissions rule is declared first and must win.
        let result = c.classify("can i apply for a scholarship");
        assert_eq!(result.label, "Admissions Inquiry");

        // Fees alone classifies as fees.
        let fees = c.classify("what is the tuition cost");
        assert_eq!(fees.label, "Fees & Financial Aid");
        assert_eq!(fees.strength, Strength::Medium);
    }

    #[test]
    fn test_short_text_skips_patterns() {
        let c = classifier();
        for text in ["", "ok", "a"] {
            let result = c.classify(text);
            assert_eq!(result.label, "General Inquiry");
            assert_eq!(result.strength, Strength::Weak);
            assert_eq!(result.adjustment, 0);
        }
    }

    #[test]
    fn test_no_match_falls_back_to_default() {
        let c = classifier();
        let result = c.classify("hello there good morning");
        assert_eq!(result.label, "General Inquiry");
    }

    #[test]
    fn test_case_insensitive_via_normalization() {
        let c = classifier();
        let upper = c.classify(&normalize(Some("APPLY now")));
        let lower = c.classify(&normalize(Some("apply now")));
        assert_eq!(upper, lower);
        assert_eq!(upper.label, "Admissions Inquiry");
    }

    #[test]
    fn test_idempotent_classification() {
        let c = classifier();
        let text = normalize(Some("what about placements and salary"));
        let first = c.classify(&text);
        let second = c.classify(&text);
        assert_eq!(first, second);
        assert_eq!(first.label, "Career Outcomes");
    }

    #[test]
    fn test_early_research_negative_adjustment() {
        let c = classifier();
        let result = c.classify("just looking around for someday");
        assert_eq!(result.label, "Early Research");
        assert_eq!(result.adjustment, -5);
        assert_eq!(result.strength, Strength::Weak);
    }

    #[test]
    fn test_bad_pattern_rejected_at_compile() {
        let mut profile = ScoringProfile::default();
        profile.intent_rules[0].patterns = vec!["(unclosed".to_string()];
        assert!(InquiryClassifier::from_profile(&profile).is_err());
    }
}
