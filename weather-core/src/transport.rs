use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::config::HttpConfig;

pub mod cache;
pub mod retry;

pub use cache::ResponseCache;
pub use retry::{RetryPolicy, with_retry};

const USER_AGENT: &str = concat!("weather-core/", env!("CARGO_PKG_VERSION"));

/// Outbound GET client with a transparent response cache and retry on
/// transient failures. Shared by every request; holds no per-request state.
#[derive(Debug)]
pub struct HttpClient {
    http: Client,
    cache: ResponseCache,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            cache: ResponseCache::new(config.cache_expire()),
            retry: RetryPolicy::new(config.retries, config.backoff_factor),
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// GET `base?query` and return the body of a successful response.
    ///
    /// `what` names the upstream in error messages.
    pub async fn get_text(
        &self,
        base: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<Arc<str>> {
        let url = Url::parse_with_params(base, query)
            .with_context(|| format!("Invalid {what} URL: {base}"))?;

        if let Some(body) = self.cache.get(url.as_str()).await {
            tracing::debug!("{} cache hit: {}", what, url);
            return Ok(body);
        }

        tracing::debug!("{} request: {}", what, url);
        let res = with_retry(&self.retry, || self.http.get(url.clone()).send())
            .await
            .with_context(|| format!("Failed to send request to {what}"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "{} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        let body: Arc<str> = Arc::from(body);
        self.cache.insert(url.as_str(), Arc::clone(&body)).await;
        Ok(body)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        base: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T> {
        let body = self.get_text(base, query, what).await?;
        serde_json::from_str(&body).with_context(|| format!("Failed to parse {what} JSON"))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(cache_expire_secs: u64) -> HttpConfig {
        HttpConfig { cache_expire_secs, retries: 0, backoff_factor: 0.0, timeout_secs: None }
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);

        assert_eq!(truncate_body("short"), "short");
    }

    #[tokio::test]
    async fn identical_requests_are_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Oslo"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"n\":1}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&config(3600)).unwrap();
        let base = format!("{}/v1/search", server.uri());
        let query = [("name", "Oslo".to_string())];

        let first = client.get_text(&base, &query, "geocoding API").await.unwrap();
        let second = client.get_text(&base, &query, "geocoding API").await.unwrap();

        assert_eq!(&*first, "{\"n\":1}");
        assert_eq!(first, second);
        assert_eq!(client.cache().len().await, 1);
    }

    #[tokio::test]
    async fn failed_responses_are_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .expect(2)
            .mount(&server)
            .await;

        let client = HttpClient::new(&config(3600)).unwrap();
        let base = format!("{}/v1/forecast", server.uri());

        for _ in 0..2 {
            let err = client.get_text(&base, &[], "forecast API").await.unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains("forecast API request failed with status 400"));
            assert!(msg.contains("bad request"));
        }
        assert_eq!(client.cache().len().await, 0);
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new(&config(0)).unwrap();
        let base = format!("{}/x", server.uri());

        let err =
            client.get_json::<serde_json::Value>(&base, &[], "forecast API").await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse forecast API JSON"));
    }
}
