//! End-to-end tests for the homeward binary
//!
//! These drive the real binary against a mocked animal API and validate:
//! - exit status mapping (success, failed loads, aborted extraction)
//! - dry-run submission suppression
//! - configuration validation at the CLI boundary
//! - the probe command

#![allow(clippy::unwrap_used, clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_single_page(server: &MockServer, animals: &[(u64, &str)]) {
    let items: Vec<serde_json::Value> = animals
        .iter()
        .map(|(id, name)| json!({"id": id, "name": name}))
        .collect();

    Mock::given(method("GET"))
        .and(path("/animals/v1/animals"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "total_pages": 1,
            "total_items": animals.len(),
            "items": items,
        })))
        .mount(server)
        .await;

    for (id, name) in animals {
        Mock::given(method("GET"))
            .and(path(format!("/animals/v1/animals/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "name": name,
                "friends": "Rex,Luna",
                "born_at": "2021-05-01T00:00:00Z",
            })))
            .mount(server)
            .await;
    }
}

fn homeward() -> Command {
    let mut cmd = Command::cargo_bin("homeward").unwrap();
    // Keep backoff fast; some scenarios exhaust retries.
    cmd.env("HOMEWARD_RETRY_DELAY_SECS", "0.01");
    cmd.env("HOMEWARD_MAX_RETRY_DELAY_SECS", "0.05");
    cmd
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_success_exits_zero() {
    let server = MockServer::start().await;
    mount_single_page(&server, &[(1, "Rex"), (2, "Luna"), (3, "Mochi")]).await;

    Mock::given(method("POST"))
        .and(path("/animals/v1/home"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    homeward()
        .arg("run")
        .arg("--base-url")
        .arg(server.uri())
        .arg("--batch-size")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("ETL summary"))
        .stdout(predicate::str::contains("extracted:    3"))
        .stdout(predicate::str::contains("Run completed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_loads_exit_nonzero() {
    let server = MockServer::start().await;
    mount_single_page(&server, &[(1, "Rex"), (2, "Luna")]).await;

    Mock::given(method("POST"))
        .and(path("/animals/v1/home"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    homeward()
        .arg("run")
        .arg("--base-url")
        .arg(server.uri())
        .arg("--max-retries")
        .arg("1")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Run finished with failures"))
        .stderr(predicate::str::contains("failed to load"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_aborted_extraction_exits_nonzero() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/animals/v1/animals"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    homeward()
        .arg("run")
        .arg("--base-url")
        .arg(server.uri())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Extraction aborted"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dry_run_submits_nothing() {
    let server = MockServer::start().await;
    mount_single_page(&server, &[(1, "Rex"), (2, "Luna")]).await;

    Mock::given(method("POST"))
        .and(path("/animals/v1/home"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    homeward()
        .arg("run")
        .arg("--base-url")
        .arg(server.uri())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("loaded:       2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_batch_size_rejected() {
    homeward()
        .arg("run")
        .arg("--base-url")
        .arg("http://localhost:1")
        .arg("--batch-size")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("batch size"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_probe_reports_pagination() {
    let server = MockServer::start().await;
    mount_single_page(&server, &[(1, "Rex")]).await;

    homeward()
        .arg("probe")
        .arg("--base-url")
        .arg(server.uri())
        .assert()
        .success()
        .stdout(predicate::str::contains("Source reachable"))
        .stdout(predicate::str::contains("pages:   1"));
}
