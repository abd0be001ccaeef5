//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ConfigError;

/// Runtime environment enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// LLM classification collaborator (disabled by default)
    #[serde(default)]
    pub llm: LlmSettings,

    /// CRM update collaborator (disabled by default)
    #[serde(default)]
    pub crm: CrmSettings,

    /// Inbound payload field extraction
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Path to the scoring profile YAML
    #[serde(default = "default_profile_path")]
    pub profile_path: String,
}

fn default_profile_path() -> String {
    "config/profile.yaml".to_string()
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_llm()?;
        self.validate_crm()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        let rate_limit = &server.rate_limit;
        if rate_limit.enabled {
            if rate_limit.max_requests == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "server.rate_limit.max_requests".to_string(),
                    message: "Must be at least 1 when rate limiting is enabled".to_string(),
                });
            }
            if rate_limit.window_seconds == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "server.rate_limit.window_seconds".to_string(),
                    message: "Window must be at least 1 second".to_string(),
                });
            }
        }

        if self.environment.is_production() && server.cors_enabled && server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 This may block legitimate requests."
            );
        }

        Ok(())
    }

    fn validate_llm(&self) -> Result<(), ConfigError> {
        let llm = &self.llm;
        if !llm.enabled {
            return Ok(());
        }

        if self.environment.is_strict() && llm.api_key.is_none() {
            return Err(ConfigError::InvalidValue {
                field: "llm.api_key".to_string(),
                message: "API key must be set when the LLM classifier is enabled".to_string(),
            });
        }

        if !(0.0..=2.0).contains(&llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", llm.temperature),
            });
        }

        if !(0.0..=1.0).contains(&llm.high_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "llm.high_threshold".to_string(),
                message: format!("Must be between 0.0 and 1.0, got {}", llm.high_threshold),
            });
        }

        Ok(())
    }

    fn validate_crm(&self) -> Result<(), ConfigError> {
        let crm = &self.crm;
        if !crm.enabled {
            return Ok(());
        }

        if crm.endpoint.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "crm.endpoint".to_string(),
                message: "Endpoint must be set when the CRM update is enabled".to_string(),
            });
        }

        if crm.field_map.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "crm.field_map".to_string(),
                message: "Field map must not be empty when the CRM update is enabled".to_string(),
            });
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: default_true(),
            // Empty by default - must be explicitly configured for production
            cors_origins: Vec::new(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Rate limiting configuration
///
/// A sliding window over recent request timestamps, kept at the server
/// boundary. The scoring engine itself never rate limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default)]
    pub enabled: bool,

    /// Maximum requests per window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
}

fn default_max_requests() -> u32 {
    60
}
fn default_window_seconds() -> u64 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_requests: default_max_requests(),
            window_seconds: default_window_seconds(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Enable metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// LLM classification collaborator settings
///
/// Points at an OpenAI-compatible chat-completions endpoint. When enabled,
/// the LLM replaces the rules engine for the classification itself; the
/// response contract stays the same.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub enabled: bool,

    /// API endpoint base (e.g. https://api.openai.com/v1)
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// API key (set via LEAD_SCORER__LLM__API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,

    /// Readiness score (0-1) at or above which the bucket is High
    #[serde(default = "default_llm_high_threshold")]
    pub high_threshold: f32,
}

fn default_llm_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_llm_temperature() -> f32 {
    0.2
}
fn default_llm_timeout() -> u64 {
    30
}
fn default_llm_high_threshold() -> f32 {
    0.75
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_llm_endpoint(),
            api_key: None,
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            timeout_seconds: default_llm_timeout(),
            high_threshold: default_llm_high_threshold(),
        }
    }
}

/// CRM update collaborator settings
///
/// One upsert call per scored lead: the endpoint receives an
/// attribute/value list built from `field_map`, authenticated with a
/// key pair sent as query parameters (the common CRM REST convention).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmSettings {
    #[serde(default)]
    pub enabled: bool,

    /// Upsert endpoint URL
    #[serde(default)]
    pub endpoint: String,

    /// Access key (set via LEAD_SCORER__CRM__ACCESS_KEY)
    #[serde(default)]
    pub access_key: Option<String>,

    /// Secret key (set via LEAD_SCORER__CRM__SECRET_KEY)
    #[serde(default)]
    pub secret_key: Option<String>,

    /// Query parameter names for the key pair
    #[serde(default = "default_access_key_param")]
    pub access_key_param: String,
    #[serde(default = "default_secret_key_param")]
    pub secret_key_param: String,

    /// Query parameter name carrying the lead identifier
    #[serde(default = "default_lead_id_param")]
    pub lead_id_param: String,

    /// Result field -> CRM schema field name
    #[serde(default = "default_crm_field_map")]
    pub field_map: HashMap<String, String>,

    /// Request timeout in seconds
    #[serde(default = "default_crm_timeout")]
    pub timeout_seconds: u64,
}

fn default_access_key_param() -> String {
    "accessKey".to_string()
}
fn default_secret_key_param() -> String {
    "secretKey".to_string()
}
fn default_lead_id_param() -> String {
    "leadId".to_string()
}
fn default_crm_timeout() -> u64 {
    15
}

fn default_crm_field_map() -> HashMap<String, String> {
    [
        ("detected_intent", "mx_Detected_Intent"),
        ("readiness_score", "mx_Readiness_Score"),
        ("readiness_bucket", "mx_Readiness_Bucket"),
        ("reasoning", "mx_Score_Reasoning"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for CrmSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            access_key: None,
            secret_key: None,
            access_key_param: default_access_key_param(),
            secret_key_param: default_secret_key_param(),
            lead_id_param: default_lead_id_param(),
            field_map: default_crm_field_map(),
            timeout_seconds: default_crm_timeout(),
        }
    }
}

/// Inbound payload field extraction
///
/// Upstream senders disagree on field names and nesting, so each canonical
/// field resolves from an ordered list of candidate keys, first flat on the
/// body, then nested one level under each wrapper key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Wrapper keys tried in order for nested payloads
    #[serde(default = "default_wrappers")]
    pub wrappers: Vec<String>,

    #[serde(default = "default_engagement_keys")]
    pub engagement_keys: Vec<String>,

    #[serde(default = "default_timeline_keys")]
    pub timeline_keys: Vec<String>,

    #[serde(default = "default_inquiry_keys")]
    pub inquiry_keys: Vec<String>,

    #[serde(default = "default_program_keys")]
    pub program_keys: Vec<String>,

    /// Keys carrying the CRM lead identifier, when present
    #[serde(default = "default_lead_id_keys")]
    pub lead_id_keys: Vec<String>,
}

fn default_wrappers() -> Vec<String> {
    vec![
        "Current".to_string(),
        "After".to_string(),
        "Before".to_string(),
    ]
}

fn default_engagement_keys() -> Vec<String> {
    vec!["engagement_readiness".to_string(), "ready_now".to_string()]
}

fn default_timeline_keys() -> Vec<String> {
    vec!["enrollment_timeline".to_string()]
}

fn default_inquiry_keys() -> Vec<String> {
    vec!["student_inquiry".to_string(), "free_text".to_string()]
}

fn default_program_keys() -> Vec<String> {
    vec!["program_interest".to_string()]
}

fn default_lead_id_keys() -> Vec<String> {
    vec!["lead_id".to_string(), "ProspectID".to_string()]
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            wrappers: default_wrappers(),
            engagement_keys: default_engagement_keys(),
            timeline_keys: default_timeline_keys(),
            inquiry_keys: default_inquiry_keys(),
            program_keys: default_program_keys(),
            lead_id_keys: default_lead_id_keys(),
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (LEAD_SCORER__ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("LEAD_SCORER")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
