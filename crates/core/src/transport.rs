use std::{future::Future, sync::Arc, time::Duration};

use reqwest::{Client, Method, StatusCode, Url, header::CONTENT_TYPE};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    error::{CaptionError, Result},
    retry::{Clock, RetryPolicy},
};

/// Everything needed to (re)issue one request.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub url: Url,
    pub json_body: Option<Vec<u8>>,
}

impl RequestSpec {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            json_body: None,
        }
    }

    pub fn post_json(url: Url, body: Vec<u8>) -> Self {
        Self {
            method: Method::POST,
            url,
            json_body: Some(body),
        }
    }
}

/// Body of a 200 response plus how many attempts it took.
#[derive(Debug, Clone)]
pub struct Response {
    pub body: Vec<u8>,
    pub attempts: u32,
}

/// Sends requests and retries transient failures until success, a terminal
/// failure, budget exhaustion, cancellation or the deadline.
pub struct ResilientTransport {
    client: Client,
    policy: RetryPolicy,
    clock: Arc<dyn Clock>,
    deadline: tokio::time::Instant,
    timeout: Duration,
    cancel: CancellationToken,
}

impl ResilientTransport {
    /// `timeout` bounds every request and sleep issued through this
    /// transport, counted from construction.
    pub fn new(
        client: Client,
        policy: RetryPolicy,
        clock: Arc<dyn Clock>,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            policy,
            clock,
            deadline: deadline_after(timeout),
            timeout,
            cancel,
        }
    }

    pub async fn execute(&self, spec: &RequestSpec) -> Result<Response> {
        let mut backoff = self.policy.start(self.clock.as_ref());
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            debug!(method = %spec.method, url = %spec.url, attempt = attempts, "sending request");

            let err = match self.guard(self.attempt(spec)).await? {
                Ok(body) => return Ok(Response { body, attempts }),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => err,
            };

            let Some(delay) = backoff.next_delay() else {
                warn!(attempts, error = %err, "retry budget exhausted");
                return Err(CaptionError::Exhausted {
                    attempts,
                    last: Box::new(err),
                });
            };

            warn!(
                attempt = attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "transient failure, backing off"
            );
            self.guard(self.clock.sleep(delay)).await?;
        }
    }

    /// One round trip, classified.
    async fn attempt(&self, spec: &RequestSpec) -> Result<Vec<u8>> {
        let mut request = self.client.request(spec.method.clone(), spec.url.clone());
        if let Some(body) = &spec.json_body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = request.send().await.map_err(CaptionError::NetworkError)?;
        classify(response.status())?;

        let body = response.bytes().await.map_err(CaptionError::NetworkError)?;
        Ok(body.to_vec())
    }

    /// Races `fut` against cancellation and the deadline; either of those
    /// wins over whatever `fut` would have produced.
    async fn guard<F: Future>(&self, fut: F) -> Result<F::Output> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(CaptionError::Canceled),
            _ = tokio::time::sleep_until(self.deadline) => Err(CaptionError::Timeout(self.timeout)),
            out = fut => Ok(out),
        }
    }
}

/// Stands in for "no deadline" when `timeout` is too large to add to now.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn deadline_after(timeout: Duration) -> tokio::time::Instant {
    let now = tokio::time::Instant::now();
    now.checked_add(timeout).unwrap_or_else(|| now + FAR_FUTURE)
}

/// Maps an HTTP status to the outcome of one attempt.
pub fn classify(status: StatusCode) -> Result<()> {
    match status {
        StatusCode::OK => Ok(()),
        StatusCode::TOO_MANY_REQUESTS => Err(CaptionError::RateLimited),
        StatusCode::NOT_FOUND => Err(CaptionError::not_found("HTTP 404")),
        s if s.is_server_error() => Err(CaptionError::ServerError { status: s.as_u16() }),
        s => Err(CaptionError::RequestError { status: s.as_u16() }),
    }
}
