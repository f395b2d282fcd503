//! End-to-end sync tests: fetch client, transforms, file sink, and the
//! orchestrator against wiremock servers and a temp directory.

mod common;

use std::collections::BTreeMap;
use std::fs;

use camino::Utf8PathBuf;
use common::*;
use muninn_core::types::{NetworkConfig, SourceSpec, TransformSpec};
use muninn_sync::{FetchClient, JsonFileSink, SyncError, SyncOrchestrator};
use serde_json::{json, Value};
use wiremock::MockServer;

struct Workspace {
    _dir: tempfile::TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        Self { _dir: dir, root }
    }

    fn destination(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    fn read_records(&self, name: &str) -> Vec<Value> {
        let content = fs::read_to_string(self.destination(name)).unwrap();
        serde_json::from_str(&content).unwrap()
    }
}

fn source(name: &str, endpoint: String, destination: Utf8PathBuf) -> SourceSpec {
    SourceSpec {
        name: name.to_string(),
        endpoint,
        destination,
        transform: TransformSpec::Identity,
        retry: None,
    }
}

fn client() -> FetchClient {
    FetchClient::new(&NetworkConfig::default()).unwrap()
}

#[tokio::test]
async fn test_batch_persists_successes_and_isolates_failure() {
    let server = MockServer::start().await;
    mock_json_endpoint(&server, "/one", &json!([{"id": 1}])).await;
    mock_failing_endpoint(&server, "/two", 500).await;
    mock_json_endpoint(&server, "/three", &json!([{"id": 3}])).await;

    let workspace = Workspace::new();
    let sources = [
        source(
            "one",
            format!("{}/one", server.uri()),
            workspace.destination("one.json"),
        ),
        source(
            "two",
            format!("{}/two", server.uri()),
            workspace.destination("two.json"),
        ),
        source(
            "three",
            format!("{}/three", server.uri()),
            workspace.destination("three.json"),
        ),
    ];

    let fetcher = client();
    let sink = JsonFileSink::new();
    let report = SyncOrchestrator::new(&fetcher, &sink, quick_policy(2))
        .run(&sources)
        .await;

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);

    assert_eq!(workspace.read_records("one.json"), vec![json!({"id": 1})]);
    assert_eq!(workspace.read_records("three.json"), vec![json!({"id": 3})]);
    assert!(!workspace.destination("two.json").exists());

    // The failing source spent its full retry budget
    assert_eq!(requests_seen(&server, "/two").await, 2);
    assert!(matches!(
        report.outcomes[1].failure(),
        Some(SyncError::Fetch(e)) if e.is_exhausted()
    ));
}

#[tokio::test]
async fn test_flaky_source_recovers_and_is_transformed() {
    let server = MockServer::start().await;
    // Two failures, then the canonical payload
    mock_flaky_endpoint(
        &server,
        "/users",
        2,
        &json!([{"id": 1, "name": "A", "email": "a@x.com"}]),
    )
    .await;

    let workspace = Workspace::new();
    let mut fields = BTreeMap::new();
    fields.insert("name".to_string(), "nombre".to_string());

    let mut spec = source(
        "users",
        format!("{}/users", server.uri()),
        workspace.destination("users.json"),
    );
    spec.transform = TransformSpec::FieldMap { fields };

    let fetcher = client();
    let sink = JsonFileSink::new();
    let report = SyncOrchestrator::new(&fetcher, &sink, quick_policy(3))
        .run(std::slice::from_ref(&spec))
        .await;

    assert_eq!(report.succeeded(), 1);
    assert_eq!(requests_seen(&server, "/users").await, 3);
    assert_eq!(
        workspace.read_records("users.json"),
        vec![json!({"id": 1, "nombre": "A", "email": "a@x.com"})]
    );
}

#[tokio::test]
async fn test_per_source_override_limits_the_budget() {
    let server = MockServer::start().await;
    mock_failing_endpoint(&server, "/impatient", 500).await;

    let workspace = Workspace::new();
    let mut spec = source(
        "impatient",
        format!("{}/impatient", server.uri()),
        workspace.destination("impatient.json"),
    );
    spec.retry = Some(quick_policy(1));

    let fetcher = client();
    let sink = JsonFileSink::new();
    let report = SyncOrchestrator::new(&fetcher, &sink, quick_policy(5))
        .run(std::slice::from_ref(&spec))
        .await;

    assert_eq!(report.failed(), 1);
    // The override's single attempt wins over the batch default of 5
    assert_eq!(requests_seen(&server, "/impatient").await, 1);
}

#[tokio::test]
async fn test_dry_run_fetches_but_writes_nothing() {
    let server = MockServer::start().await;
    mock_json_endpoint(&server, "/users", &json!([{"id": 1}])).await;

    let workspace = Workspace::new();
    let spec = source(
        "users",
        format!("{}/users", server.uri()),
        workspace.destination("users.json"),
    );

    let fetcher = client();
    let sink = JsonFileSink::new();
    let report = SyncOrchestrator::new(&fetcher, &sink, quick_policy(2))
        .with_dry_run(true)
        .run(std::slice::from_ref(&spec))
        .await;

    assert_eq!(report.succeeded(), 1);
    assert_eq!(requests_seen(&server, "/users").await, 1);
    assert!(!workspace.destination("users.json").exists());
}

#[tokio::test]
async fn test_undecodable_payload_is_a_source_failure() {
    let server = MockServer::start().await;
    mock_garbage_endpoint(&server, "/html").await;

    let workspace = Workspace::new();
    let spec = source(
        "html",
        format!("{}/html", server.uri()),
        workspace.destination("html.json"),
    );

    let fetcher = client();
    let sink = JsonFileSink::new();
    let report = SyncOrchestrator::new(&fetcher, &sink, quick_policy(2))
        .run(std::slice::from_ref(&spec))
        .await;

    assert_eq!(report.failed(), 1);
    assert!(!workspace.destination("html.json").exists());
    // Decode failures are retried like any other failure kind
    assert_eq!(requests_seen(&server, "/html").await, 2);
}
