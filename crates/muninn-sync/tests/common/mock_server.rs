//! Mock server helpers for fetch and sync testing
//!
//! Thin wrappers over wiremock for the response patterns the tests
//! need: healthy JSON endpoints, endpoints that fail N times before
//! recovering, endpoints that always fail, and slow endpoints for
//! deadline tests.

use std::time::Duration;

use muninn_core::types::{RetryPolicy, RetryStrategy};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mount a GET endpoint returning `body` as JSON
pub async fn mock_json_endpoint(server: &MockServer, route: &str, body: &Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a GET endpoint that returns 500 for the first `fail_count`
/// requests and `body` afterwards
pub async fn mock_flaky_endpoint(server: &MockServer, route: &str, fail_count: u64, body: &Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(fail_count)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a GET endpoint that always fails with `status`
pub async fn mock_failing_endpoint(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mount a GET endpoint that answers with `body` after `delay`
pub async fn mock_slow_endpoint(server: &MockServer, route: &str, delay: Duration, body: &Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Mount a GET endpoint returning a body that is not JSON
pub async fn mock_garbage_endpoint(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(server)
        .await;
}

/// A retry policy with short delays, suitable for tests
pub fn quick_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        strategy: RetryStrategy::FixedDelay,
        backoff_multiplier: 2.0,
        initial_delay_ms: 10,
        max_delay_ms: 100,
        attempt_timeout_ms: 1000,
    }
}

/// Count the GET requests the server has seen on `route`
pub async fn requests_seen(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .iter()
        .filter(|r| r.url.path() == route)
        .count()
}
