//! Configuration for the lead readiness scorer
//!
//! Supports loading configuration from:
//! - YAML files (`config/default.yaml`, `config/{env}.yaml`)
//! - Environment variables (`LEAD_SCORER__` prefix)
//!
//! Two layers:
//! - [`Settings`] - runtime wiring: server, observability, collaborators
//! - [`ScoringProfile`] - the rules-engine data: lookup tables, intent
//!   rules, thresholds, the business override. The many observed scoring
//!   variants are different profiles of one engine, so everything the
//!   variants disagreed on lives here rather than in code.

pub mod profile;
pub mod settings;

pub use profile::{
    BucketThresholds, IntentRule, MatrixConfig, MatrixEntry, OverrideRule, ScoringMode,
    ScoringProfile, StrengthScores, WeightEntry,
};
pub use settings::{
    CrmSettings, ExtractionConfig, LlmSettings, ObservabilityConfig, RateLimitConfig,
    RuntimeEnvironment, ServerConfig, Settings, load_settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
