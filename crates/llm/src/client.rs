//! OpenAI-compatible classification client
//!
//! One chat-completions call per request with JSON response format and low
//! temperature. The model is instructed to answer with a single JSON object
//! matching [`LlmClassification`]; anything else is an
//! [`LlmError::InvalidResponse`].

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use lead_scorer_config::LlmSettings;
use lead_scorer_core::LeadSignal;

use crate::LlmError;

/// Strict-JSON classification returned by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmClassification {
    /// Intent label (e.g. "schedule", "explore", "nurture")
    pub intent: String,
    /// Readiness as a 0-1 float
    pub readiness_score: f32,
    /// Risk category ("low", "medium", "high")
    pub risk_category: String,
    /// Propensity as a 0-100 integer
    pub propensity_score: u32,
    /// One-paragraph decision summary
    pub decision_summary: String,
}

/// LLM classification client
pub struct LlmClassifier {
    settings: LlmSettings,
    client: Client,
}

impl LlmClassifier {
    /// Create a new classifier from settings
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        if settings.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(LlmError::Configuration(
                "LLM API key not set. Set it via LEAD_SCORER__LLM__API_KEY.".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self { settings, client })
    }

    /// Classify one lead signal
    pub async fn classify(&self, signal: &LeadSignal) -> Result<LlmClassification, LlmError> {
        let request = ChatRequest {
            model: self.settings.model.clone(),
            temperature: self.settings.temperature,
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "You are an intent classifier for student enrollment leads. \
                              Respond with valid JSON only."
                        .to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(signal),
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.settings.endpoint))
            .bearer_auth(self.settings.api_key.as_deref().unwrap_or(""))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let content = body
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| LlmError::InvalidResponse("response had no choices".to_string()))?;

        parse_classification(content)
    }

    /// Model the classifier is configured for
    pub fn model(&self) -> &str {
        &self.settings.model
    }
}

/// Build the fixed classification prompt from the raw signal fields
fn build_prompt(signal: &LeadSignal) -> String {
    format!(
        "Classify the student intent.\n\n\
         Inputs:\n\
         - engagement_readiness: {}\n\
         - enrollment_timeline: {}\n\
         - student_inquiry: {}\n\
         - program_interest: {}\n\n\
         Return JSON in this exact structure:\n\
         {{\n\
           \"intent\": \"schedule | explore | nurture\",\n\
           \"readiness_score\": number between 0 and 1,\n\
           \"risk_category\": \"low | medium | high\",\n\
           \"propensity_score\": number between 0 and 100,\n\
           \"decision_summary\": string\n\
         }}",
        signal.engagement_readiness.as_deref().unwrap_or(""),
        signal.enrollment_timeline.as_deref().unwrap_or(""),
        signal.student_inquiry.as_deref().unwrap_or(""),
        signal.program_interest.as_deref().unwrap_or(""),
    )
}

/// Parse and range-check the model's JSON reply
fn parse_classification(content: &str) -> Result<LlmClassification, LlmError> {
    let classification: LlmClassification = serde_json::from_str(content)
        .map_err(|e| LlmError::InvalidResponse(format!("not valid JSON: {}", e)))?;

    if !(0.0..=1.0).contains(&classification.readiness_score) {
        return Err(LlmError::InvalidResponse(format!(
            "readiness_score out of range: {}",
            classification.readiness_score
        )));
    }
    if classification.propensity_score > 100 {
        return Err(LlmError::InvalidResponse(format!(
            "propensity_score out of range: {}",
            classification.propensity_score
        )));
    }

    Ok(classification)
}

// =============================================================================
// Chat completions API types
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    temperature: f32,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
