//! Payload field extraction
//!
//! Upstream senders (CRM automations, chatbots) disagree on field names and
//! nesting: some send flat bodies, some wrap the record under `Current`,
//! `After` or `Before`. Each canonical field resolves from an ordered list
//! of candidate keys - flat keys first, then each wrapper in order - all of
//! it driven by [`ExtractionConfig`] so a new sender shape is a config
//! change, not a code change.

use serde_json::Value;

use lead_scorer_config::ExtractionConfig;
use lead_scorer_core::LeadSignal;

/// Extraction outcome: the canonical signal plus the lead id, when present
#[derive(Debug, Clone)]
pub struct ExtractedLead {
    pub signal: LeadSignal,
    pub lead_id: Option<String>,
}

/// Extract the canonical fields from an inbound JSON body
pub fn extract(body: &Value, config: &ExtractionConfig) -> ExtractedLead {
    ExtractedLead {
        signal: LeadSignal {
            engagement_readiness: find(body, &config.engagement_keys, &config.wrappers),
            enrollment_timeline: find(body, &config.timeline_keys, &config.wrappers),
            student_inquiry: find(body, &config.inquiry_keys, &config.wrappers),
            program_interest: find(body, &config.program_keys, &config.wrappers),
        },
        lead_id: find(body, &config.lead_id_keys, &config.wrappers),
    }
}

/// Resolve one canonical field: candidate keys flat on the body first, then
/// nested one level under each wrapper key.
fn find(body: &Value, keys: &[String], wrappers: &[String]) -> Option<String> {
    for key in keys {
        if let Some(value) = scalar(body.get(key)) {
            return Some(value);
        }
    }
    for wrapper in wrappers {
        if let Some(nested) = body.get(wrapper) {
            for key in keys {
                if let Some(value) = scalar(nested.get(key)) {
                    return Some(value);
                }
            }
        }
    }
    None
}

/// Coerce a scalar JSON value to a string field; objects, arrays and nulls
/// don't count as present.
fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
