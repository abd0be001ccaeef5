//! Readiness scoring engine
//!
//! Ties the pieces together for one request:
//! normalize inputs -> categorical/matrix lookup -> inquiry classification
//! -> combine and clamp -> business override -> bucket -> reasoning.
//!
//! The engine is built once at startup from a [`ScoringProfile`] and shared
//! immutably across requests; `score` is a pure function of its input.

use lead_scorer_config::{ConfigError, ScoringMode, ScoringProfile};
use lead_scorer_core::{
    normalize, Error, LeadSignal, ReadinessBucket, ReadinessResult, Result, ScoreBreakdown,
    ScoringTrace,
};

use crate::categorical::{CategoricalScorer, ScoreMatrix};
use crate::inquiry::InquiryClassifier;
use crate::reasoning;

/// Scoring outcome: the wire-facing result plus the full trace
#[derive(Debug, Clone)]
pub struct ScoredLead {
    pub result: ReadinessResult,
    pub trace: ScoringTrace,
}

/// Config-driven readiness scoring engine
pub struct ReadinessEngine {
    profile: ScoringProfile,
    engagement: CategoricalScorer,
    timeline: CategoricalScorer,
    matrix: ScoreMatrix,
    classifier: InquiryClassifier,
}

impl ReadinessEngine {
    /// Build the engine from a profile, compiling the inquiry patterns
    pub fn new(profile: ScoringProfile) -> std::result::Result<Self, ConfigError> {
        profile.validate()?;
        let classifier = InquiryClassifier::from_profile(&profile)?;
        let engagement = CategoricalScorer::new(profile.engagement.clone());
        let timeline = CategoricalScorer::new(profile.timeline.clone());
        let matrix = ScoreMatrix::new(profile.matrix.clone());

        Ok(Self {
            profile,
            engagement,
            timeline,
            matrix,
            classifier,
        })
    }

    /// Accepted engagement labels (for validation messages outside the engine)
    pub fn engagement_labels(&self) -> Vec<String> {
        self.engagement.labels()
    }

    /// Accepted timeline labels (for validation messages outside the engine)
    pub fn timeline_labels(&self) -> Vec<String> {
        self.timeline.labels()
    }

    /// Score one lead signal
    pub fn score(&self, signal: &LeadSignal) -> Result<ScoredLead> {
        let engagement_label = normalize(signal.engagement_readiness.as_deref());
        if engagement_label.is_empty() {
            return Err(Error::MissingField {
                field: "engagement_readiness",
                accepted: self.engagement.labels(),
            });
        }

        let timeline_label = normalize(signal.enrollment_timeline.as_deref());
        if timeline_label.is_empty() {
            return Err(Error::MissingField {
                field: "enrollment_timeline",
                accepted: self.timeline.labels(),
            });
        }

        let inquiry_text = normalize(signal.student_inquiry.as_deref());
        let classification = self.classifier.classify(&inquiry_text);

        let engagement_hit = self.engagement.score(&engagement_label);
        let timeline_hit = self.timeline.score(&timeline_label);

        if self.profile.strict {
            if engagement_hit.is_none() {
                return Err(Error::UnknownCategory {
                    field: "engagement_readiness",
                    value: engagement_label,
                    accepted: self.engagement.labels(),
                });
            }
            if timeline_hit.is_none() {
                return Err(Error::UnknownCategory {
                    field: "enrollment_timeline",
                    value: timeline_label,
                    accepted: self.timeline.labels(),
                });
            }
        }

        let breakdown = match self.profile.mode {
            ScoringMode::Additive => {
                let strengths = &self.profile.strength_scores;
                let inquiry = match classification.strength {
                    lead_scorer_core::Strength::Strong => strengths.strong,
                    lead_scorer_core::Strength::Medium => strengths.medium,
                    lead_scorer_core::Strength::Weak => strengths.weak,
                };
                ScoreBreakdown::Additive {
                    engagement: engagement_hit.map(|(_, w)| w).unwrap_or(0),
                    timeline: timeline_hit.map(|(_, w)| w).unwrap_or(0),
                    inquiry,
                }
            }
            ScoringMode::Matrix => {
                let base = match self.matrix.base(&engagement_label, &timeline_label) {
                    Some(base) => base,
                    None if self.profile.strict => {
                        return Err(Error::UnknownCategory {
                            field: "engagement_readiness/enrollment_timeline",
                            value: format!("{} / {}", engagement_label, timeline_label),
                            accepted: self.engagement.labels(),
                        });
                    }
                    None => self.matrix.default_base(),
                };
                ScoreBreakdown::Matrix {
                    base,
                    adjustment: classification.adjustment,
                }
            }
        };

        let combined = breakdown.combined();
        let clamped = combined.clamp(0, 100) as u32;

        let override_rule = &self.profile.override_rule;
        let strong_structured = override_rule
            .engagement_markers
            .iter()
            .any(|m| engagement_label.contains(m.as_str()))
            || override_rule
                .timeline_markers
                .iter()
                .any(|m| timeline_label.contains(m.as_str()));

        let override_applied = override_rule.enabled
            && (clamped as i32) < override_rule.trigger_below
            && strong_structured;

        let final_score = if override_applied {
            tracing::debug!(
                combined,
                floor = override_rule.floor,
                "Structured-signal override raised low combined score"
            );
            override_rule.floor
        } else {
            clamped
        };

        let bucket = bucket_for(final_score, &self.profile.buckets);

        let trace = ScoringTrace {
            engagement_label,
            timeline_label,
            engagement_matched: engagement_hit.map(|(label, _)| label.to_string()),
            timeline_matched: timeline_hit.map(|(label, _)| label.to_string()),
            breakdown,
            intent: classification.label.clone(),
            strength: classification.strength,
            combined,
            override_applied,
            final_score,
            bucket,
            program_interest: signal
                .program_interest
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        };

        let reasoning = self
            .profile
            .reasoning
            .then(|| reasoning::generate(&trace));

        Ok(ScoredLead {
            result: ReadinessResult {
                detected_intent: classification.label,
                readiness_score: final_score,
                readiness_bucket: bucket,
                reasoning,
            },
            trace,
        })
    }
}

/// Map a final score to its bucket.
///
/// Non-decreasing in the score: `high` alone gives Low/High, a `medium`
/// threshold adds the middle band.
fn bucket_for(score: u32, thresholds: &lead_scorer_config::BucketThresholds) -> ReadinessBucket {
    if score >= thresholds.high {
        ReadinessBucket::High
    } else if thresholds.medium.map_or(false, |m| score >= m) {
        ReadinessBucket::Medium
    } else {
        ReadinessBucket::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_scorer_config::BucketThresholds;

    fn engine() -> ReadinessEngine {
        ReadinessEngine::new(ScoringProfile::default()).unwrap()
    }

    fn signal(engagement: &str, timeline: &str, inquiry: &str) -> LeadSignal {
        LeadSignal {
            engagement_readiness: Some(engagement.to_string()),
            enrollment_timeline: Some(timeline.to_string()),
            student_inquiry: Some(inquiry.to_string()),
            program_interest: None,
        }
    }

    #[test]
    fn test_hot_lead_scores_100_high() {
        let scored = engine()
            .score(&signal(
                "Ready to Apply",
                "within 30 days",
                "I want to apply for the MBA program",
            ))
            .unwrap();

        assert_eq!(
            scored.trace.breakdown,
            ScoreBreakdown::Additive {
                engagement: 40,
                timeline: 40,
                inquiry: 20,
            }
        );
        assert_eq!(scored.result.readiness_score, 100);
        assert_eq!(scored.result.readiness_bucket, ReadinessBucket::High);
        assert_eq!(scored.result.detected_intent, "Admissions Inquiry");
    }

    #[test]
    fn test_cold_lead_scores_32_low() {
        let scored = engine()
            .score(&signal("just exploring options", "just researching", ""))
            .unwrap();

        assert_eq!(
            scored.trace.breakdown,
            ScoreBreakdown::Additive {
                engagement: 16,
                timeline: 10,
                inquiry: 6,
            }
        );
        assert_eq!(scored.trace.combined, 32);
        // Neither label carries a "ready"/"30" marker, so no override.
        assert!(!scored.trace.override_applied);
        assert_eq!(scored.result.readiness_score, 32);
        assert_eq!(scored.result.readiness_bucket, ReadinessBucket::Low);
        assert_eq!(scored.result.detected_intent, "General Inquiry");
    }

    #[test]
    fn test_override_forces_exact_floor() {
        // Strong structured signal ("within 30 days") with nothing else:
        // components sum below the trigger, so the floor applies exactly.
        let mut profile = ScoringProfile::default();
        profile.engagement.push(lead_scorer_config::WeightEntry {
            label: "unsure".to_string(),
            weight: 4,
        });
        let engine = ReadinessEngine::new(profile).unwrap();

        let scored = engine
            .score(&signal("unsure", "within 30 days", ""))
            .unwrap();
        // 4 + 40 + 6 = 50, no override needed
        assert!(!scored.trace.override_applied);
        assert_eq!(scored.result.readiness_score, 50);

        let scored = engine.score(&signal("unsure", "next year", "")).unwrap();
        // 4 + 12 + 6 = 22, below trigger, but no marker either
        assert!(!scored.trace.override_applied);
        assert_eq!(scored.result.readiness_score, 22);

        // Engagement marker "ready" with weak everything else
        let mut profile = ScoringProfile::default();
        profile.engagement.insert(
            0,
            lead_scorer_config::WeightEntry {
                label: "ready but nervous".to_string(),
                weight: 10,
            },
        );
        let engine = ReadinessEngine::new(profile).unwrap();
        let scored = engine
            .score(&signal("ready but nervous", "next year", ""))
            .unwrap();
        // 10 + 12 + 6 = 28 < 40, "ready" marker present -> exactly 70
        assert!(scored.trace.override_applied);
        assert_eq!(scored.result.readiness_score, 70);
        assert_eq!(scored.result.readiness_bucket, ReadinessBucket::High);
    }

    #[test]
    fn test_bucket_threshold_edges() {
        let thresholds = BucketThresholds {
            high: 70,
            medium: None,
        };
        assert_eq!(bucket_for(69, &thresholds), ReadinessBucket::Low);
        assert_eq!(bucket_for(70, &thresholds), ReadinessBucket::High);
        assert_eq!(bucket_for(100, &thresholds), ReadinessBucket::High);

        let ternary = BucketThresholds {
            high: 70,
            medium: Some(40),
        };
        assert_eq!(bucket_for(39, &ternary), ReadinessBucket::Low);
        assert_eq!(bucket_for(40, &ternary), ReadinessBucket::Medium);
        assert_eq!(bucket_for(69, &ternary), ReadinessBucket::Medium);
        assert_eq!(bucket_for(70, &ternary), ReadinessBucket::High);
    }

    #[test]
    fn test_bucket_non_decreasing() {
        let ternary = BucketThresholds {
            high: 70,
            medium: Some(40),
        };
        let rank = |b: ReadinessBucket| match b {
            ReadinessBucket::Low => 0,
            ReadinessBucket::Medium => 1,
            ReadinessBucket::High => 2,
        };
        let mut last = 0;
        for score in 0..=100 {
            let current = rank(bucket_for(score, &ternary));
            assert!(current >= last, "bucket decreased at score {score}");
            last = current;
        }
    }

    #[test]
    fn test_score_always_in_range() {
        let engine = engine();
        let adversarial = [
            signal("not interested", "undecided", "just looking someday"),
            signal("READY TO APPLY!!!", "IMMEDIATELY", &"apply ".repeat(500)),
            signal("??", "???", "\u{0}\u{1}\u{2}"),
            signal("ready to apply", "within 30 days", "💯🚀✨"),
        ];
        for input in &adversarial {
            let scored = engine.score(input).unwrap();
            assert!(scored.result.readiness_score <= 100);
        }
    }

    #[test]
    fn test_missing_engagement_is_validation_error() {
        let input = LeadSignal {
            engagement_readiness: None,
            enrollment_timeline: Some("within 30 days".to_string()),
            student_inquiry: Some("".to_string()),
            program_interest: None,
        };
        let err = engine().score(&input).unwrap_err();
        match err {
            Error::MissingField { field, accepted } => {
                assert_eq!(field, "engagement_readiness");
                assert!(accepted.contains(&"ready to apply".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_whitespace_only_field_counts_as_missing() {
        let input = LeadSignal {
            engagement_readiness: Some("   ".to_string()),
            enrollment_timeline: Some("within 30 days".to_string()),
            student_inquiry: None,
            program_interest: None,
        };
        assert!(engine().score(&input).is_err());
    }

    #[test]
    fn test_lenient_mode_scores_unknown_values_zero() {
        let scored = engine()
            .score(&signal("no idea what this is", "some weird value", ""))
            .unwrap();
        assert_eq!(
            scored.trace.breakdown,
            ScoreBreakdown::Additive {
                engagement: 0,
                timeline: 0,
                inquiry: 6,
            }
        );
    }

    #[test]
    fn test_strict_mode_rejects_unknown_values() {
        let mut profile = ScoringProfile::default();
        profile.strict = true;
        let engine = ReadinessEngine::new(profile).unwrap();

        let err = engine
            .score(&signal("no idea what this is", "within 30 days", ""))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownCategory { field: "engagement_readiness", .. }));
    }

    #[test]
    fn test_matrix_mode() {
        let mut profile = ScoringProfile::default();
        profile.mode = ScoringMode::Matrix;
        let engine = ReadinessEngine::new(profile).unwrap();

        let scored = engine
            .score(&signal(
                "Ready to Apply",
                "within 30 days",
                "I want to apply",
            ))
            .unwrap();
        assert_eq!(
            scored.trace.breakdown,
            ScoreBreakdown::Matrix {
                base: 90,
                adjustment: 8,
            }
        );
        assert_eq!(scored.result.readiness_score, 98);

        // Unmatched pair falls back to the default base in lenient mode
        let scored = engine
            .score(&signal("mystery value", "mystery value", ""))
            .unwrap();
        assert_eq!(
            scored.trace.breakdown,
            ScoreBreakdown::Matrix {
                base: 30,
                adjustment: 0,
            }
        );
    }

    #[test]
    fn test_matrix_strict_rejects_unknown_pair() {
        let mut profile = ScoringProfile::default();
        profile.mode = ScoringMode::Matrix;
        profile.strict = true;
        let engine = ReadinessEngine::new(profile).unwrap();

        // Labels exist in the weight tables but the pair is absent.
        assert!(engine
            .score(&signal("considering", "next year", ""))
            .is_err());
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let engine = engine();
        let input = signal("Ready to Apply", "within 30 days", "fees and scholarship?");
        let first = engine.score(&input).unwrap();
        for _ in 0..5 {
            let again = engine.score(&input).unwrap();
            assert_eq!(again.result.readiness_score, first.result.readiness_score);
            assert_eq!(again.result.detected_intent, first.result.detected_intent);
        }
    }

    #[test]
    fn test_reasoning_toggle() {
        let mut profile = ScoringProfile::default();
        profile.reasoning = false;
        let silent = ReadinessEngine::new(profile).unwrap();
        let scored = silent
            .score(&signal("ready to apply", "within 30 days", ""))
            .unwrap();
        assert!(scored.result.reasoning.is_none());

        let scored = engine()
            .score(&signal("ready to apply", "within 30 days", ""))
            .unwrap();
        assert!(scored.result.reasoning.is_some());
    }
}
