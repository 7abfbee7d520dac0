//! Field service client over HTTP
//!
//! `GET {base}/fields` lists records, `POST {base}/fields` creates one.
//! Requests are not retried; failures surface as [`PersistenceError`].

use std::time::Duration;

use field_core::{FieldPayload, FieldRecord};

use super::{FieldStore, PersistenceError};

/// JSON client for the field service
pub struct HttpStore {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpStore {
    /// Create a client for the service rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();

        Self {
            agent: ureq::Agent::new_with_config(config),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the fields collection
    pub fn fields_url(&self) -> String {
        format!("{}/fields", self.base_url)
    }
}

impl FieldStore for HttpStore {
    fn list_fields(&mut self) -> Result<Vec<FieldRecord>, PersistenceError> {
        let url = self.fields_url();
        let mut response = self
            .agent
            .get(url.as_str())
            .call()
            .map_err(|e| PersistenceError::Transport(e.to_string()))?;

        let fields: Vec<FieldRecord> = response
            .body_mut()
            .read_json()
            .map_err(|e| PersistenceError::Decode(e.to_string()))?;
        tracing::debug!("Fetched {} fields from {}", fields.len(), url);
        Ok(fields)
    }

    fn create_field(&mut self, payload: &FieldPayload) -> Result<FieldRecord, PersistenceError> {
        payload.validate()?;

        let url = self.fields_url();
        let mut response = self
            .agent
            .post(url.as_str())
            .send_json(payload)
            .map_err(|e| PersistenceError::Transport(e.to_string()))?;

        let record: FieldRecord = response
            .body_mut()
            .read_json()
            .map_err(|e| PersistenceError::Decode(e.to_string()))?;
        tracing::info!("Field service created field {}", record.id);
        Ok(record)
    }
}
