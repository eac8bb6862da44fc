//! HTTP client for the animal API
//!
//! One `reqwest::Client` shared across the run, with a per-request timeout
//! and a stable User-Agent. Methods perform exactly one attempt and map
//! failures into the shared taxonomy: connection-level problems become
//! `Transport`, non-2xx statuses become `HttpStatus`, and undecodable bodies
//! become `Decode`.

use crate::api::endpoints;
use crate::api::types::AnimalPage;
use crate::model::{Animal, RawRecord};
use homeward_common::{HomewardError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("homeward/", env!("CARGO_PKG_VERSION"));

/// API client for the animal service
#[derive(Debug, Clone)]
pub struct AnimalApiClient {
    client: Client,
    base_url: String,
}

impl AnimalApiClient {
    /// Create a new API client
    ///
    /// `timeout` bounds each individual request; slow responses surface as a
    /// transient transport error.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HomewardError::transport(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of the animal listing
    pub async fn get_page(&self, page: u32) -> Result<AnimalPage> {
        let url = endpoints::animals_page_url(&self.base_url, page);
        self.get_json(&url).await
    }

    /// Fetch the full record for one animal
    pub async fn get_detail(&self, id: u64) -> Result<RawRecord> {
        let url = endpoints::animal_detail_url(&self.base_url, id);
        self.get_json(&url).await
    }

    /// Submit one batch of canonical records to the home endpoint
    ///
    /// Any 2xx counts as success; the body is not inspected.
    pub async fn submit_batch(&self, batch: &[Animal]) -> Result<()> {
        let url = endpoints::home_url(&self.base_url);
        debug!(url = %url, records = batch.len(), "POST batch");

        let response = self
            .client
            .post(&url)
            .json(batch)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HomewardError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HomewardError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| HomewardError::decode(url, e.to_string()))
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> HomewardError {
    if err.is_timeout() {
        HomewardError::transport(format!("request timeout for {url}"))
    } else {
        HomewardError::transport(format!("{err} ({url})"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_strips_trailing_slash() {
        let client =
            AnimalApiClient::new("http://localhost:3123/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3123");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client =
            AnimalApiClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
        let err = client.get_page(1).await.unwrap_err();
        assert!(matches!(err, HomewardError::Transport(_)));
        assert!(err.is_transient());
    }
}
