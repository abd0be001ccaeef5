//! Core types for the lead readiness scorer
//!
//! This crate provides the foundational types used across all other crates:
//! - Lead signal input and readiness result types
//! - Input normalization
//! - Error types
//!
//! Everything here is transient and request-scoped. There is no persistence
//! and no cross-request state anywhere in the scoring path.

pub mod error;
pub mod lead;
pub mod normalize;

pub use error::{Error, Result};
pub use lead::{
    LeadSignal, ReadinessBucket, ReadinessResult, ScoreBreakdown, ScoringTrace, Strength,
};
pub use normalize::normalize;
