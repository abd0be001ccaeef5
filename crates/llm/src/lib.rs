//! LLM classification collaborator
//!
//! Optional replacement for the rules engine: sends the raw signal fields
//! to an OpenAI-compatible chat-completions endpoint and requires a
//! strict-JSON reply. Malformed output is a hard failure of the call - the
//! caller surfaces it, nothing retries here.

pub mod client;

pub use client::{LlmClassification, LlmClassifier};

use thiserror::Error;

/// LLM call errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}
