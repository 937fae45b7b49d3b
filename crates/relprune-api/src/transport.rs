//! HTTP transport seam and its reqwest implementation.

use async_trait::async_trait;
use relprune_common::{PruneError, RelationshipId, Result};
use relprune_config::DiscordConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// API paths relative to the base URL.
pub mod endpoints {
    use super::RelationshipId;

    /// The authenticated user's profile.
    pub const ME: &str = "/users/@me";
    /// The authenticated user's relationship list.
    pub const RELATIONSHIPS: &str = "/users/@me/relationships";

    /// A single relationship.
    pub fn relationship(id: RelationshipId) -> String {
        format!("{RELATIONSHIPS}/{id}")
    }
}

/// Authenticated HTTP access to the API.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET `path` and decode the body as JSON.
    async fn get_json(&self, path: &str) -> Result<Value>;

    /// DELETE `path`, succeeding on any 2xx status.
    async fn delete(&self, path: &str) -> Result<()>;
}

/// reqwest-backed transport with fixed auth and user-agent headers.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a transport for `base_url` authenticating with `token`.
    pub fn new(
        base_url: impl Into<String>,
        token: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let mut auth = HeaderValue::from_str(token)
            .map_err(|_| PruneError::auth("token contains characters not allowed in a header"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|_| PruneError::config_field("invalid user agent", "user_agent"))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| PruneError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build a transport from the Discord section of the configuration.
    pub fn from_config(config: &DiscordConfig, user_agent: &str) -> Result<Self> {
        Self::new(
            config.api_base_url.clone(),
            &config.token,
            user_agent,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-2xx response into a status error, keeping Discord's message.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "unexpected status".to_string());

    Err(PruneError::status(status.as_u16(), message))
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self))]
    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = check_status(self.client.get(&url).send().await?).await?;
        Ok(response.json::<Value>().await?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        debug!("DELETE {}", url);
        check_status(self.client.delete(&url).send().await?).await?;
        Ok(())
    }
}
