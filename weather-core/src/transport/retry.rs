//! Exponential backoff around outbound HTTP requests.
//!
//! Retried: timeouts, connection failures, 5xx, 408 and 429.
//! Not retried: any other 4xx, request-building errors, decode errors.

use std::future::Future;
use std::time::Duration;

use reqwest::{Response, StatusCode};

/// Upper bound on a single backoff sleep.
pub const MAX_BACKOFF: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Re-attempts after the first request.
    pub retries: u32,
    /// Seconds; delay before retry `n` is `backoff_factor * 2^(n-1)`.
    pub backoff_factor: f64,
}

impl RetryPolicy {
    pub fn new(retries: u32, backoff_factor: f64) -> Self {
        Self { retries, backoff_factor }
    }

    /// Sleep before retry number `retry` (1-based). The first retry is immediate.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
        let secs = self.backoff_factor * 2f64.powi(exponent);
        if !secs.is_finite() {
            return if secs.is_nan() { Duration::ZERO } else { MAX_BACKOFF };
        }
        if secs <= 0.0 {
            return Duration::ZERO;
        }

        Duration::from_secs_f64(secs.min(MAX_BACKOFF.as_secs_f64()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    NoRetry,
}

pub fn is_retryable_error(error: &reqwest::Error) -> RetryDecision {
    if error.is_timeout() || error.is_connect() {
        return RetryDecision::Retry;
    }

    match error.status() {
        Some(status) => is_retryable_status(status),
        None => RetryDecision::NoRetry,
    }
}

pub fn is_retryable_status(status: StatusCode) -> RetryDecision {
    if status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
    {
        RetryDecision::Retry
    } else {
        RetryDecision::NoRetry
    }
}

/// Run `operation` until it yields a non-retryable outcome or retries run out.
///
/// Once retries are exhausted the last response is returned as-is, even when
/// its status is retryable; the caller decides what a non-success status means.
pub async fn with_retry<F, Fut>(
    policy: &RetryPolicy,
    operation: F,
) -> Result<Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let mut attempt: u32 = 0;

    loop {
        let exhausted = attempt >= policy.retries;

        match operation().await {
            Ok(response) => {
                let status = response.status();
                if exhausted || is_retryable_status(status) == RetryDecision::NoRetry {
                    if attempt > 0 && status.is_success() {
                        tracing::info!("Request succeeded after {} retries", attempt);
                    }
                    return Ok(response);
                }

                tracing::warn!(
                    "Request returned retryable status {}, attempt {} of {}",
                    status,
                    attempt + 1,
                    policy.retries + 1
                );
            }
            Err(e) => {
                if exhausted || is_retryable_error(&e) == RetryDecision::NoRetry {
                    if exhausted && attempt > 0 {
                        tracing::error!("All {} attempts exhausted", policy.retries + 1);
                    }
                    return Err(e);
                }

                tracing::warn!(
                    "Retryable error on attempt {} of {}: {}",
                    attempt + 1,
                    policy.retries + 1,
                    e
                );
            }
        }

        attempt += 1;
        let delay = policy.delay_for_retry(attempt);
        if !delay.is_zero() {
            tracing::debug!("Backing off {:?} before retry {}", delay, attempt);
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn backoff_doubles_after_first_retry() {
        let policy = RetryPolicy::new(5, 0.2);

        assert_eq!(policy.delay_for_retry(1), Duration::ZERO);
        assert_eq!(policy.delay_for_retry(2), Duration::from_secs_f64(0.4));
        assert_eq!(policy.delay_for_retry(3), Duration::from_secs_f64(0.8));
        assert_eq!(policy.delay_for_retry(4), Duration::from_secs_f64(1.6));
    }

    #[test]
    fn backoff_is_capped() {
        let policy = RetryPolicy::new(50, 1.0);
        assert_eq!(policy.delay_for_retry(10), MAX_BACKOFF);
        assert_eq!(policy.delay_for_retry(u32::MAX), MAX_BACKOFF);
    }

    #[test]
    fn zero_factor_never_sleeps() {
        let policy = RetryPolicy::new(3, 0.0);
        assert_eq!(policy.delay_for_retry(3), Duration::ZERO);
    }

    #[test]
    fn retryable_status_codes() {
        assert_eq!(is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR), RetryDecision::Retry);
        assert_eq!(is_retryable_status(StatusCode::BAD_GATEWAY), RetryDecision::Retry);
        assert_eq!(is_retryable_status(StatusCode::GATEWAY_TIMEOUT), RetryDecision::Retry);
        assert_eq!(is_retryable_status(StatusCode::TOO_MANY_REQUESTS), RetryDecision::Retry);

        assert_eq!(is_retryable_status(StatusCode::BAD_REQUEST), RetryDecision::NoRetry);
        assert_eq!(is_retryable_status(StatusCode::NOT_FOUND), RetryDecision::NoRetry);
        assert_eq!(is_retryable_status(StatusCode::OK), RetryDecision::NoRetry);
    }

    #[tokio::test]
    async fn retries_server_error_then_succeeds() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/flaky", server.uri());
        let policy = RetryPolicy::new(2, 0.0);

        let response = with_retry(&policy, || client.get(&url).send()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/missing", server.uri());
        let policy = RetryPolicy::new(3, 0.0);

        let response = with_retry(&policy, || client.get(&url).send()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn exhausted_retries_return_last_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/down", server.uri());
        let policy = RetryPolicy::new(2, 0.0);

        let response = with_retry(&policy, || client.get(&url).send()).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
