//! CRM update collaborator
//!
//! The scoring core exposes a plain result object; pushing it back into a
//! CRM is one upsert call behind the [`CrmConnector`] trait. The HTTP
//! implementation covers the common CRM REST convention (endpoint plus a
//! query-string key pair, attribute/value body); a stub implementation
//! records calls for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use lead_scorer_config::CrmSettings;

/// CRM call errors
#[derive(Error, Debug)]
pub enum CrmError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("CRM rejected the update (HTTP {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for CrmError {
    fn from(err: reqwest::Error) -> Self {
        CrmError::ConnectionFailed(err.to_string())
    }
}

/// One attribute/value pair in the upsert body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldValue {
    #[serde(rename = "Attribute")]
    pub attribute: String,
    #[serde(rename = "Value")]
    pub value: Value,
}

/// CRM connector trait
///
/// Implement this to integrate with a specific CRM. Exactly one upsert per
/// scored lead; a non-2xx response is a hard failure and nothing here
/// retries.
#[async_trait]
pub trait CrmConnector: Send + Sync {
    /// Upsert the given fields onto the lead record
    async fn upsert_lead(
        &self,
        lead_id: &str,
        fields: &HashMap<String, Value>,
    ) -> Result<(), CrmError>;
}

/// HTTP CRM connector
pub struct HttpCrmConnector {
    settings: CrmSettings,
    client: reqwest::Client,
}

impl HttpCrmConnector {
    pub fn new(settings: CrmSettings) -> Result<Self, CrmError> {
        if settings.endpoint.is_empty() {
            return Err(CrmError::InvalidRequest(
                "CRM endpoint not configured".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| CrmError::ConnectionFailed(e.to_string()))?;

        Ok(Self { settings, client })
    }

    /// Map canonical result fields to the CRM's schema names
    fn to_field_values(&self, fields: &HashMap<String, Value>) -> Vec<FieldValue> {
        let mut values: Vec<FieldValue> = fields
            .iter()
            .filter_map(|(name, value)| {
                self.settings.field_map.get(name).map(|schema_name| FieldValue {
                    attribute: schema_name.clone(),
                    value: value.clone(),
                })
            })
            .collect();
        // HashMap iteration order is arbitrary; keep the wire payload stable.
        values.sort_by(|a, b| a.attribute.cmp(&b.attribute));
        values
    }
}

#[async_trait]
impl CrmConnector for HttpCrmConnector {
    async fn upsert_lead(
        &self,
        lead_id: &str,
        fields: &HashMap<String, Value>,
    ) -> Result<(), CrmError> {
        if lead_id.trim().is_empty() {
            return Err(CrmError::InvalidRequest("lead id is empty".to_string()));
        }

        let body = self.to_field_values(fields);
        if body.is_empty() {
            return Err(CrmError::InvalidRequest(
                "no mapped fields to update".to_string(),
            ));
        }

        let mut query: Vec<(&str, &str)> =
            vec![(self.settings.lead_id_param.as_str(), lead_id)];
        if let Some(access_key) = self.settings.access_key.as_deref() {
            query.push((self.settings.access_key_param.as_str(), access_key));
        }
        if let Some(secret_key) = self.settings.secret_key.as_deref() {
            query.push((self.settings.secret_key_param.as_str(), secret_key));
        }

        let response = self
            .client
            .post(&self.settings.endpoint)
            .query(&query)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CrmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(lead_id = %lead_id, fields = body.len(), "CRM lead updated");
        Ok(())
    }
}

/// Recorded call on the stub connector
#[derive(Debug, Clone)]
pub struct RecordedUpsert {
    pub lead_id: String,
    pub fields: HashMap<String, Value>,
}

/// Stub CRM connector for development and tests
///
/// Records every upsert instead of talking to a real CRM.
#[derive(Default)]
pub struct StubCrmConnector {
    calls: Mutex<Vec<RecordedUpsert>>,
    fail: bool,
}

impl StubCrmConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stub that fails every call, for error-path tests
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Calls recorded so far
    pub fn calls(&self) -> Vec<RecordedUpsert> {
        self.calls.lock().clone()
    }

    /// Generate a lead id in the CRM's format (handy for examples/tests)
    pub fn new_lead_id() -> String {
        format!("LEAD-{}", &uuid::Uuid::new_v4().to_string()[..8])
    }
}

#[async_trait]
impl CrmConnector for StubCrmConnector {
    async fn upsert_lead(
        &self,
        lead_id: &str,
        fields: &HashMap<String, Value>,
    ) -> Result<(), CrmError> {
        if self.fail {
            return Err(CrmError::Status {
                status: 502,
                body: "stub failure".to_string(),
            });
        }
        tracing::info!(lead_id = %lead_id, "Stub CRM: recorded lead update");
        self.calls.lock().push(RecordedUpsert {
            lead_id: lead_id.to_string(),
            fields: fields.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> HashMap<String, Value> {
        [
            ("detected_intent".to_string(), json!("Admissions Inquiry")),
            ("readiness_score".to_string(), json!(100)),
            ("readiness_bucket".to_string(), json!("High")),
            ("unmapped_extra".to_string(), json!("dropped")),
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn test_stub_records_upserts() {
        let stub = StubCrmConnector::new();
        stub.upsert_lead("LEAD-1234", &fields()).await.unwrap();

        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].lead_id, "LEAD-1234");
        assert_eq!(calls[0].fields["readiness_score"], json!(100));
    }

    #[tokio::test]
    async fn test_failing_stub_surfaces_status_error() {
        let stub = StubCrmConnector::failing();
        let err = stub.upsert_lead("LEAD-1234", &fields()).await.unwrap_err();
        assert!(matches!(err, CrmError::Status { status: 502, .. }));
    }

    #[test]
    fn test_http_connector_requires_endpoint() {
        let settings = CrmSettings::default();
        assert!(HttpCrmConnector::new(settings).is_err());
    }

    #[test]
    fn test_field_mapping_drops_unmapped_and_sorts() {
        let settings = CrmSettings {
            endpoint: "https://crm.example.com/Lead.Update".to_string(),
            ..CrmSettings::default()
        };
        let connector = HttpCrmConnector::new(settings).unwrap();

        let values = connector.to_field_values(&fields());
        let attributes: Vec<&str> = values.iter().map(|v| v.attribute.as_str()).collect();
        assert_eq!(
            attributes,
            vec![
                "mx_Detected_Intent",
                "mx_Readiness_Bucket",
                "mx_Readiness_Score"
            ]
        );
    }

    #[test]
    fn test_field_value_wire_shape() {
        let value = FieldValue {
            attribute: "mx_Readiness_Score".to_string(),
            value: json!(70),
        };
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["Attribute"], "mx_Readiness_Score");
        assert_eq!(json["Value"], 70);
    }

    #[test]
    fn test_stub_lead_id_format() {
        let id = StubCrmConnector::new_lead_id();
        assert!(id.starts_with("LEAD-"));
        assert_eq!(id.len(), "LEAD-".len() + 8);
    }
}
