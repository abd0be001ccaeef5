//! Template-based reasoning generator
//!
//! Produces a short human-readable explanation of a scoring trace by
//! filling fixed sentence templates. Purely deterministic; no free-form
//! generation. Sentences for absent optional inputs are omitted.

use lead_scorer_core::{ScoreBreakdown, ScoringTrace};

/// Generate the explanation text for one scoring trace
pub fn generate(trace: &ScoringTrace) -> String {
    let mut sentences = Vec::with_capacity(5);

    match &trace.breakdown {
        ScoreBreakdown::Additive {
            engagement,
            timeline,
            inquiry,
        } => {
            sentences.push(format!(
                "Engagement signal \"{}\" scored {} and enrollment timeline \"{}\" scored {}.",
                trace.engagement_label, engagement, trace.timeline_label, timeline
            ));
            sentences.push(format!(
                "The inquiry was classified as {} ({} signal), adding {} points.",
                trace.intent,
                trace.strength.as_str(),
                inquiry
            ));
        }
        ScoreBreakdown::Matrix { base, adjustment } => {
            sentences.push(format!(
                "The combination of \"{}\" and \"{}\" gave a base score of {}.",
                trace.engagement_label, trace.timeline_label, base
            ));
            sentences.push(format!(
                "The inquiry was classified as {}, adjusting the score by {}.",
                trace.intent, adjustment
            ));
        }
    }

    if let Some(program) = &trace.program_interest {
        sentences.push(format!("The student expressed interest in {}.", program));
    }

    if trace.override_applied {
        sentences.push(format!(
            "Strong structured signals raised the combined score of {} to the floor of {}.",
            trace.combined, trace.final_score
        ));
    }

    sentences.push(format!(
        "Final readiness score is {} which falls in the {} bucket.",
        trace.final_score, trace.bucket
    ));

    sentences.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_scorer_core::{ReadinessBucket, Strength};

    fn trace() -> ScoringTrace {
        ScoringTrace {
            engagement_label: "ready to apply".to_string(),
            timeline_label: "within 30 days".to_string(),
            engagement_matched: Some("ready to apply".to_string()),
            timeline_matched: Some("within 30 days".to_string()),
            breakdown: ScoreBreakdown::Additive {
                engagement: 40,
                timeline: 40,
                inquiry: 20,
            },
            intent: "Admissions Inquiry".to_string(),
            strength: Strength::Strong,
            combined: 100,
            override_applied: false,
            final_score: 100,
            bucket: ReadinessBucket::High,
            program_interest: None,
        }
    }

    #[test]
    fn test_reasoning_mentions_trace_values() {
        let text = generate(&trace());
        assert!(text.contains("ready to apply"));
        assert!(text.contains("Admissions Inquiry"));
        assert!(text.contains("100"));
        assert!(text.contains("High"));
    }

    #[test]
    fn test_program_interest_sentence_omitted_when_absent() {
        let without = generate(&trace());
        assert!(!without.contains("expressed interest"));

        let mut with_program = trace();
        with_program.program_interest = Some("MBA".to_string());
        let text = generate(&with_program);
        assert!(text.contains("expressed interest in MBA"));
    }

    #[test]
    fn test_override_sentence_present_only_when_applied() {
        let mut overridden = trace();
        overridden.combined = 28;
        overridden.override_applied = true;
        overridden.final_score = 70;
        let text = generate(&overridden);
        assert!(text.contains("floor of 70"));

        assert!(!generate(&trace()).contains("floor"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(generate(&trace()), generate(&trace()));
    }

    #[test]
    fn test_matrix_breakdown_wording() {
        let mut t = trace();
        t.breakdown = ScoreBreakdown::Matrix {
            base: 90,
            adjustment: 8,
        };
        let text = generate(&t);
        assert!(text.contains("base score of 90"));
        assert!(text.contains("adjusting the score by 8"));
    }
}
