//! Review/enrollment submission to the sheet-backed form sink.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

/// Write sink for form submissions.
///
/// Payloads are form-encoded key/value pairs including an `action`
/// discriminator; the response carries only a boolean success flag.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, fields: &[(String, String)]) -> Result<bool>;
}

pub struct FormSubmissionClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SinkResponse {
    success: bool,
}

impl FormSubmissionClient {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl SubmissionSink for FormSubmissionClient {
    async fn submit(&self, fields: &[(String, String)]) -> Result<bool> {
        // The sheet endpoint caches aggressively; a throwaway timestamp
        // query parameter forces a fresh execution.
        let nocache = Utc::now().timestamp_millis().to_string();

        let response = self
            .http
            .post(&self.base_url)
            .query(&[("nocache", nocache.as_str())])
            .form(fields)
            .send()
            .await
            .context("submission request failed")?
            .error_for_status()
            .context("submission backend returned an error status")?
            .json::<SinkResponse>()
            .await
            .context("failed to parse submission response")?;

        info!("submission sink answered success={}", response.success);
        Ok(response.success)
    }
}
