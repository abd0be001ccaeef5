//! Lead readiness rules engine
//!
//! Pure, deterministic, request-scoped scoring:
//! normalization -> table lookup -> free-text classification ->
//! combination/clamping -> business override -> bucketing -> reasoning.
//!
//! Every table, rule and threshold comes from
//! [`lead_scorer_config::ScoringProfile`]; this crate only interprets them.
//! No I/O, no shared mutable state, no suspension points.

pub mod categorical;
pub mod engine;
pub mod inquiry;
pub mod reasoning;

pub use categorical::{CategoricalScorer, ScoreMatrix};
pub use engine::{ReadinessEngine, ScoredLead};
pub use inquiry::{InquiryClassification, InquiryClassifier};
