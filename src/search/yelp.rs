//! Yelp business search over HTTP.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::search::{Business, BusinessSearch, SearchRequest};

const PROVIDER: &str = "yelp";

/// Provider response envelope.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    businesses: Vec<Business>,
}

/// Yelp search client.
pub struct YelpClient {
    endpoint: String,
    api_key: SecretString,
    timeout: std::time::Duration,
    client: reqwest::Client,
}

impl YelpClient {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
            client: reqwest::Client::new(),
        }
    }

    fn query_params(request: &SearchRequest) -> [(&'static str, String); 3] {
        [
            ("term", request.terms.clone()),
            ("location", request.location.clone()),
            ("limit", request.limit.to_string()),
        ]
    }
}

#[async_trait]
impl BusinessSearch for YelpClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<Business>, SearchError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .query(&Self::query_params(request))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        provider: PROVIDER.into(),
                        timeout: self.timeout,
                    }
                } else {
                    SearchError::RequestFailed {
                        provider: PROVIDER.into(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %body, "Yelp search rejected");
            return Err(SearchError::Status {
                provider: PROVIDER.into(),
                status: status.as_u16(),
            });
        }

        let data: SearchResponse =
            resp.json()
                .await
                .map_err(|e| SearchError::InvalidResponse {
                    provider: PROVIDER.into(),
                    reason: e.to_string(),
                })?;

        Ok(data.businesses)
    }
}
