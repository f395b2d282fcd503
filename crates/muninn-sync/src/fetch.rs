//! Bounded HTTP fetch with policy-driven retries
//!
//! `FetchClient::execute` is the single-attempt primitive: one GET raced
//! against a deadline. `fetch_with_retry` drives it through the core
//! retry executor with a tracing observer, so every attempt, wait, and
//! terminal outcome is logged.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use muninn_core::retry::{RetryError, SimpleRetryExecutor, TracingObserver};
use muninn_core::types::{NetworkConfig, RetryPolicy};
use serde_json::Value;

use crate::error::FetchError;

/// Abstraction over the retrying fetch, so the orchestrator can be
/// exercised without a network.
pub trait Fetcher: Send + Sync {
    /// Fetch a JSON payload from `endpoint` under the given policy
    fn fetch<'a>(
        &'a self,
        endpoint: &'a str,
        policy: &'a RetryPolicy,
    ) -> Pin<Box<dyn Future<Output = Result<Value, RetryError<FetchError>>> + Send + 'a>>;
}

/// HTTP fetch client for JSON endpoints
pub struct FetchClient {
    client: reqwest::Client,
}

impl FetchClient {
    /// Build a client from the network configuration
    ///
    /// The client-level timeout is a transport safety net; the per-attempt
    /// deadline enforced in `execute` is the one that matters for retry
    /// pacing.
    pub fn new(network: &NetworkConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(network.user_agent.as_str())
            .timeout(Duration::from_secs(network.http_timeout_secs))
            .build()?;

        Ok(Self { client })
    }

    /// Perform one bounded fetch attempt
    ///
    /// Issues a single GET and races it against `timeout`. If the deadline
    /// fires first, the in-flight request future is dropped (a socket that
    /// completes later is discarded with it) and the attempt fails with
    /// `FetchError::Timeout`. A non-2xx response fails with `Http`, an
    /// undecodable body with `Decode`. The timer is dropped on every exit
    /// path.
    pub async fn execute(&self, endpoint: &str, timeout: Duration) -> Result<Value, FetchError> {
        match tokio::time::timeout(timeout, self.attempt(endpoint)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::timeout(endpoint, timeout)),
        }
    }

    async fn attempt(&self, endpoint: &str) -> Result<Value, FetchError> {
        let response = self.client.get(endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                endpoint: endpoint.to_owned(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode { source })
    }

    /// Fetch with the policy's full retry budget
    ///
    /// Every attempt is bounded by `policy.attempt_timeout()`; failures of
    /// any kind are retried until the budget is spent, with the strategy
    /// delay between attempts. The terminal failure carries the attempt
    /// count and total elapsed time.
    pub async fn fetch_with_retry(
        &self,
        endpoint: &str,
        policy: &RetryPolicy,
    ) -> Result<Value, RetryError<FetchError>> {
        let observer = Arc::new(TracingObserver::new("fetch"));
        let timeout = policy.attempt_timeout();

        SimpleRetryExecutor::<FetchError, _, _>::new(policy.clone())
            .with_observer(observer)
            .execute(|| self.execute(endpoint, timeout))
            .await
    }
}

impl Fetcher for FetchClient {
    fn fetch<'a>(
        &'a self,
        endpoint: &'a str,
        policy: &'a RetryPolicy,
    ) -> Pin<Box<dyn Future<Output = Result<Value, RetryError<FetchError>>> + Send + 'a>> {
        Box::pin(self.fetch_with_retry(endpoint, policy))
    }
}
