//! Lead signal input and readiness result types
//!
//! All types here live for a single request: constructed from the inbound
//! payload, scored, serialized into the response, and dropped.

use serde::{Deserialize, Serialize};

/// Raw lead signal as extracted by the payload adapter.
///
/// Fields are optional at this level; the scoring engine decides which ones
/// are required and reports missing ones with the accepted values. Values
/// are raw (un-normalized) - normalization happens inside the engine so the
/// scoring trace can show both forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadSignal {
    /// Categorical self-reported readiness (e.g. "Ready to Apply")
    pub engagement_readiness: Option<String>,
    /// Categorical enrollment timeline (e.g. "within 30 days")
    pub enrollment_timeline: Option<String>,
    /// Free-text inquiry from the student
    pub student_inquiry: Option<String>,
    /// Free-text program of interest
    pub program_interest: Option<String>,
}

/// Inquiry strength from the free-text classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    #[default]
    Weak,
    Medium,
    Strong,
}

impl Strength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::Weak => "weak",
            Strength::Medium => "medium",
            Strength::Strong => "strong",
        }
    }
}

/// Readiness bucket derived from the final score by fixed thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessBucket {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for ReadinessBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadinessBucket::Low => write!(f, "Low"),
            ReadinessBucket::Medium => write!(f, "Medium"),
            ReadinessBucket::High => write!(f, "High"),
        }
    }
}

/// Score components before combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScoreBreakdown {
    /// Independent engagement/timeline/inquiry components summed together
    Additive {
        engagement: i32,
        timeline: i32,
        inquiry: i32,
    },
    /// Pair-matrix base score plus intent adjustment
    Matrix { base: i32, adjustment: i32 },
}

impl ScoreBreakdown {
    /// Sum of the components, before clamping and overrides
    pub fn combined(&self) -> i32 {
        match self {
            ScoreBreakdown::Additive {
                engagement,
                timeline,
                inquiry,
            } => engagement + timeline + inquiry,
            ScoreBreakdown::Matrix { base, adjustment } => base + adjustment,
        }
    }
}

/// Full scoring trace, consumed by the reasoning generator
#[derive(Debug, Clone, Serialize)]
pub struct ScoringTrace {
    /// Normalized engagement label
    pub engagement_label: String,
    /// Normalized timeline label
    pub timeline_label: String,
    /// Table key the engagement label matched, if any
    pub engagement_matched: Option<String>,
    /// Table key the timeline label matched, if any
    pub timeline_matched: Option<String>,
    /// Component scores
    pub breakdown: ScoreBreakdown,
    /// Detected intent label
    pub intent: String,
    /// Inquiry strength
    pub strength: Strength,
    /// Combined score before clamp/override
    pub combined: i32,
    /// Whether the business override forced the score to the floor
    pub override_applied: bool,
    /// Final clamped score
    pub final_score: u32,
    /// Bucket for the final score
    pub bucket: ReadinessBucket,
    /// Program of interest, when provided
    pub program_interest: Option<String>,
}

/// Scoring outcome returned to the HTTP layer
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResult {
    pub detected_intent: String,
    pub readiness_score: u32,
    pub readiness_bucket: ReadinessBucket,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}
