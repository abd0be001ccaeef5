//! HTTP server for the lead readiness scorer
//!
//! Thin boundary around the scoring engine: payload adaptation, request
//! validation mapping, rate limiting, metrics, and the two optional
//! collaborators (LLM classification, CRM update).

pub mod adapter;
pub mod error;
pub mod http;
pub mod metrics;
pub mod rate_limit;
pub mod state;

pub use error::ApiError;
pub use http::create_router;
pub use metrics::init_metrics;
pub use state::AppState;
