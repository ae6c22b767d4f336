//! Certificate lookup against the sheet-backed API.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use shared::ChildRecord;
use tracing::info;

/// Free-text search over the certificate registry.
///
/// An empty result set signals no match, not an error.
#[async_trait]
pub trait CertificateLookup: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<ChildRecord>>;
}

/// Lookup client for the Apps-Script style sheet API: a GET with an
/// `action` discriminator, answered with `{success, data}`.
pub struct SheetLookupClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    success: bool,
    #[serde(default)]
    data: Vec<ChildRecord>,
}

impl SheetLookupClient {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl CertificateLookup for SheetLookupClient {
    async fn search(&self, query: &str) -> Result<Vec<ChildRecord>> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("action", "search"), ("query", query)])
            .send()
            .await
            .context("lookup request failed")?
            .error_for_status()
            .context("lookup backend returned an error status")?
            .json::<LookupResponse>()
            .await
            .context("failed to parse lookup response")?;

        if !response.success {
            bail!("lookup backend reported failure");
        }

        info!("lookup returned {} matches", response.data.len());
        Ok(response.data)
    }
}
