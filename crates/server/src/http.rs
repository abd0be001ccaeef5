//! HTTP endpoints
//!
//! REST surface of the scorer: the `/intent-classifier` webhook, liveness
//! probes and the metrics exposition.

use std::collections::HashMap;
use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use lead_scorer_core::{normalize, Error as ScoringError, ReadinessBucket};

use crate::adapter;
use crate::error::ApiError;
use crate::metrics::metrics_handler;
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.config.server.cors_origins,
        state.config.server.cors_enabled,
    );
    let timeout = Duration::from_secs(state.config.server.timeout_seconds);

    Router::new()
        // Webhook endpoint
        .route("/intent-classifier", post(classify))
        // Liveness/readiness
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TimeoutLayer::new(timeout))
        .layer(cors_layer)
        .with_state(state)
}

/// Last-resort handler: a panicking request is logged and answered with the
/// generic 500 body instead of tearing down the connection.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");
    ApiError::Internal.into_response()
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns a permissive layer (for dev)
/// - If cors_origins is empty, defaults to permissive with a warning
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::info!("No CORS origins configured, allowing all origins");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Scoring payload of a successful response
#[derive(Debug, Clone, Serialize)]
pub struct AiOutput {
    pub detected_intent: String,
    pub readiness_score: u32,
    pub readiness_bucket: ReadinessBucket,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    // Extra fields only the LLM path produces
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub propensity_score: Option<u32>,
}

impl AiOutput {
    /// Canonical field/value pairs for the CRM upsert
    fn to_crm_fields(&self) -> HashMap<String, Value> {
        let mut fields = HashMap::new();
        fields.insert(
            "detected_intent".to_string(),
            json!(self.detected_intent),
        );
        fields.insert("readiness_score".to_string(), json!(self.readiness_score));
        fields.insert(
            "readiness_bucket".to_string(),
            json!(self.readiness_bucket.to_string()),
        );
        if let Some(reasoning) = &self.reasoning {
            fields.insert("reasoning".to_string(), json!(reasoning));
        }
        fields
    }
}

/// Webhook handler: extract, score (rules engine or LLM), optionally push
/// the result to the CRM, respond.
async fn classify(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    if let Some(limiter) = &state.limiter {
        if !limiter.try_acquire() {
            metrics::counter!("lead_scorer_rate_limited_total").increment(1);
            return Err(ApiError::RateLimited);
        }
    }

    metrics::counter!("lead_scorer_requests_total").increment(1);

    let extracted = adapter::extract(&body, &state.config.extraction);

    let output = if let Some(llm) = &state.llm {
        classify_with_llm(&state, llm, &extracted).await?
    } else {
        let scored = state.engine.score(&extracted.signal)?;
        AiOutput {
            detected_intent: scored.result.detected_intent,
            readiness_score: scored.result.readiness_score,
            readiness_bucket: scored.result.readiness_bucket,
            reasoning: scored.result.reasoning,
            risk_category: None,
            propensity_score: None,
        }
    };

    metrics::counter!(
        "lead_scorer_scored_total",
        "bucket" => output.readiness_bucket.to_string()
    )
    .increment(1);

    if let (Some(crm), Some(lead_id)) = (&state.crm, &extracted.lead_id) {
        crm.upsert_lead(lead_id, &output.to_crm_fields())
            .await
            .map_err(|e| {
                tracing::error!(lead_id = %lead_id, error = %e, "CRM update failed");
                ApiError::Collaborator(format!("CRM update failed: {}", e))
            })?;
    }

    Ok(Json(json!({
        "success": true,
        "ai_output": output,
    })))
}

/// LLM classification path
///
/// The required-field contract is the same as the rules path, so missing
/// categorical fields still return 400 before any network call.
async fn classify_with_llm(
    state: &AppState,
    llm: &lead_scorer_llm::LlmClassifier,
    extracted: &adapter::ExtractedLead,
) -> Result<AiOutput, ApiError> {
    if normalize(extracted.signal.engagement_readiness.as_deref()).is_empty() {
        return Err(ApiError::Validation(ScoringError::MissingField {
            field: "engagement_readiness",
            accepted: state.engine.engagement_labels(),
        }));
    }
    if normalize(extracted.signal.enrollment_timeline.as_deref()).is_empty() {
        return Err(ApiError::Validation(ScoringError::MissingField {
            field: "enrollment_timeline",
            accepted: state.engine.timeline_labels(),
        }));
    }

    let classification = llm.classify(&extracted.signal).await.map_err(|e| {
        tracing::error!(error = %e, "LLM classification failed");
        ApiError::Collaborator(format!("AI classification failed: {}", e))
    })?;

    let bucket = if classification.readiness_score >= state.config.llm.high_threshold {
        ReadinessBucket::High
    } else {
        ReadinessBucket::Low
    };

    Ok(AiOutput {
        detected_intent: classification.intent,
        readiness_score: (classification.readiness_score * 100.0).round() as u32,
        readiness_bucket: bucket,
        reasoning: Some(classification.decision_summary),
        risk_category: Some(classification.risk_category),
        propensity_score: Some(classification.propensity_score),
    })
}

/// Liveness payload
async fn root() -> impl IntoResponse {
    Json(json!({
        "service": "lead-readiness-scorer",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
    }))
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "llm_enabled": state.llm.is_some(),
            "crm_enabled": state.crm.is_some(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_scorer_config::{ScoringProfile, Settings};

    #[test]
    fn test_router_creation() {
        let state = AppState::new(Settings::default(), ScoringProfile::default()).unwrap();
        let _ = create_router(state);
    }

    #[test]
    fn test_ai_output_crm_fields() {
        let output = AiOutput {
            detected_intent: "Admissions Inquiry".to_string(),
            readiness_score: 100,
            readiness_bucket: ReadinessBucket::High,
            reasoning: Some("strong signals".to_string()),
            risk_category: None,
            propensity_score: None,
        };
        let fields = output.to_crm_fields();
        assert_eq!(fields["readiness_bucket"], json!("High"));
        assert_eq!(fields["readiness_score"], json!(100));
        assert!(fields.contains_key("reasoning"));
    }

    #[test]
    fn test_ai_output_serialization_omits_llm_extras() {
        let output = AiOutput {
            detected_intent: "General Inquiry".to_string(),
            readiness_score: 32,
            readiness_bucket: ReadinessBucket::Low,
            reasoning: None,
            risk_category: None,
            propensity_score: None,
        };
        let json = serde_json::to_value(&output).unwrap();
        assert!(json.get("risk_category").is_none());
        assert!(json.get("propensity_score").is_none());
        assert!(json.get("reasoning").is_none());
    }
}
