//! Application state
//!
//! Shared state across all handlers: immutable settings, the compiled
//! scoring engine, and the optional collaborators.

use std::sync::Arc;

use lead_scorer_config::{ConfigError, ScoringProfile, Settings};
use lead_scorer_crm::CrmConnector;
use lead_scorer_llm::LlmClassifier;
use lead_scorer_scoring::ReadinessEngine;

use crate::rate_limit::{SlidingWindowLimiter, SystemClock};

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Runtime settings
    pub config: Arc<Settings>,
    /// Compiled scoring engine
    pub engine: Arc<ReadinessEngine>,
    /// Optional LLM classification collaborator
    pub llm: Option<Arc<LlmClassifier>>,
    /// Optional CRM update collaborator
    pub crm: Option<Arc<dyn CrmConnector>>,
    /// Optional rate limiter
    pub limiter: Option<Arc<SlidingWindowLimiter>>,
}

impl AppState {
    /// Create application state from settings and a scoring profile.
    ///
    /// Collaborators are attached separately with the `with_*` builders so
    /// tests can swap in stubs.
    pub fn new(config: Settings, profile: ScoringProfile) -> Result<Self, ConfigError> {
        let engine = ReadinessEngine::new(profile)?;

        let limiter = config.server.rate_limit.enabled.then(|| {
            Arc::new(SlidingWindowLimiter::new(
                &config.server.rate_limit,
                Arc::new(SystemClock),
            ))
        });

        Ok(Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
            llm: None,
            crm: None,
            limiter,
        })
    }

    /// Attach the LLM classification collaborator
    pub fn with_llm(mut self, llm: Arc<LlmClassifier>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Attach the CRM update collaborator
    pub fn with_crm(mut self, crm: Arc<dyn CrmConnector>) -> Self {
        self.crm = Some(crm);
        self
    }

    /// Attach a custom rate limiter (tests inject a fake clock this way)
    pub fn with_limiter(mut self, limiter: Arc<SlidingWindowLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }
}
