//! Provider API client
//!
//! Thin GET-only adapter over the sports odds provider's REST API.

use crate::config::ProviderConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use sports_core::SportsError;
use tracing::{debug, instrument};
use url::form_urlencoded;

/// Query string parameters, in the order they are sent
pub type Query<'a> = [(&'a str, String)];

/// The upstream the aggregator reads from
///
/// Implemented by [`ProviderClient`] for the real provider and by test
/// doubles in the service layer.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Issue `GET {base}{path}?{query}` and return the decoded body
    async fn get(&self, path: &str, query: &Query<'_>) -> Result<Value, SportsError>;
}

/// Provider API client
#[derive(Clone)]
pub struct ProviderClient {
    client: Client,
    base_url: String,
}

impl ProviderClient {
    /// Create a new client from explicit settings
    pub fn new(config: ProviderConfig) -> Result<Self, SportsError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SportsError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    /// Create a client configured from the environment
    pub fn from_env() -> Result<Self, SportsError> {
        Self::new(ProviderConfig::from_env()?)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Join base URL, path and query. Keys and values are form-encoded; the
/// commas separating ID lists stay literal.
pub fn build_url(base_url: &str, path: &str, query: &Query<'_>) -> String {
    let mut url = format!("{}{}", base_url, path);

    if !query.is_empty() {
        let params: Vec<String> = query
            .iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_id_list(v)))
            .collect();
        url.push('?');
        url.push_str(&params.join("&"));
    }

    url
}

fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn encode_id_list(value: &str) -> String {
    value
        .split(',')
        .map(encode_component)
        .collect::<Vec<_>>()
        .join(",")
}

/// Bodies are JSON when the provider behaves; anything else is handed back
/// as a JSON string so callers can treat it as an unexpected shape.
fn decode_body(body: String) -> Value {
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}

#[async_trait]
impl Upstream for ProviderClient {
    #[instrument(skip(self, query))]
    async fn get(&self, path: &str, query: &Query<'_>) -> Result<Value, SportsError> {
        let url = build_url(&self.base_url, path, query);

        debug!("Fetching provider data from: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SportsError::network(format!("Request to {} timed out: {}", path, e))
            } else {
                SportsError::network(format!("Failed to fetch {}: {}", path, e))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SportsError::api(format!(
                "Provider API error ({}) on {}: {}",
                status, path, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SportsError::network(format!("Failed to read {} body: {}", path, e)))?;

        Ok(decode_body(body))
    }
}

impl std::fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
