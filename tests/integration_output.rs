//! Integration tests for creating outputs and waiting on them
//!
//! The status endpoint is scripted so that consecutive queries walk through
//! the job states the way the server reports them.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use ind::{
    api::actions::{CreateOutput, GetDownloadUrl, ListOutputs, OutputSettings},
    error::JobError,
    job::{JobHandle, JobPoller, PollOptions},
};
use mockito::Matcher;
use serde_json::json;
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio_util::sync::CancellationToken;

fn fast_poll(max_attempts: u32) -> PollOptions {
    PollOptions {
        max_attempts,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        multiplier: 2,
    }
}

// each query returns the next status, the last one repeats
fn scripted(
    statuses: &'static [&'static str],
) -> impl Fn(&mockito::Request) -> Vec<u8> + Send + Sync + 'static {
    let calls = Arc::new(AtomicUsize::new(0));
    move |_: &mockito::Request| {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        let status = statuses.get(n).or_else(|| statuses.last()).unwrap();
        json!({"id": "o-1", "status": status}).to_string().into_bytes()
    }
}

#[tokio::test]
async fn test_create_output() {
    let mut server = mockito::Server::new_async().await;
    let api = common::api(&server.url());

    let create = server
        .mock("POST", "/v1/outputs")
        .match_query(common::access_query(&[]))
        .match_header("authorization", common::bearer(&api).as_str())
        .match_body(Matcher::Json(json!({
            "variantId": "v-1",
            "outputs": [{"type": "RFA", "settings": {"version": "2025"}}]
        })))
        .with_status(200)
        .with_body(r#"{"outputs": [{"id": "o-1", "status": "PENDING"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let settings = OutputSettings {
        representation: None,
        version: Some("2025".to_string()),
    };
    let output_id = CreateOutput::new("v-1", "RFA", &settings)
        .request(&api)
        .await
        .unwrap();

    assert_eq!(output_id, "o-1");
    create.assert_async().await;
}

#[tokio::test]
async fn test_wait_until_success() {
    let mut server = mockito::Server::new_async().await;
    let api = common::api(&server.url());

    let status = server
        .mock("GET", "/v1/outputs/o-1")
        .match_query(common::access_query(&[]))
        .match_header("authorization", common::bearer(&api).as_str())
        .with_status(200)
        .with_body_from_request(scripted(&["PENDING", "PENDING", "SUCCESS"]))
        .expect(3)
        .create_async()
        .await;

    let mut attempts = Vec::new();
    let rs = JobPoller::new(&api, fast_poll(10))
        .wait_for(&JobHandle::new("o-1"), &CancellationToken::new(), |p| {
            attempts.push(p.attempt);
        })
        .await
        .unwrap();

    assert_eq!(rs.attempts, 3);
    assert_eq!(rs.payload["status"], "SUCCESS");
    assert_eq!(attempts, vec![1, 2, 3]);
    status.assert_async().await;
}

#[tokio::test]
async fn test_wait_failed() {
    let mut server = mockito::Server::new_async().await;
    let api = common::api(&server.url());

    let status = server
        .mock("GET", "/v1/outputs/o-1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body_from_request(scripted(&["PENDING", "FAILED"]))
        .expect(2)
        .create_async()
        .await;

    let err = JobPoller::new(&api, fast_poll(10))
        .wait_for(&JobHandle::new("o-1"), &CancellationToken::new(), |_| {})
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        JobError::Failed { ref status, attempts: 2 } if status == "FAILED"
    ));
    status.assert_async().await;
}

#[tokio::test]
async fn test_wait_times_out_at_ceiling() {
    let mut server = mockito::Server::new_async().await;
    let api = common::api(&server.url());

    let status = server
        .mock("GET", "/v1/outputs/o-1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body_from_request(scripted(&["PENDING"]))
        .expect(4)
        .create_async()
        .await;

    let err = JobPoller::new(&api, fast_poll(4))
        .wait_for(&JobHandle::new("o-1"), &CancellationToken::new(), |_| {})
        .await
        .unwrap_err();

    match err {
        JobError::TimedOut {
            last_status,
            attempts,
        } => {
            assert_eq!(last_status, "PENDING");
            assert_eq!(attempts, 4);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    status.assert_async().await;
}

#[tokio::test]
async fn test_wait_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    let api = common::api(&server.url());

    server
        .mock("GET", "/v1/outputs/o-1")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"developerMessage": "The token is not valid"}"#)
        .create_async()
        .await;

    let err = JobPoller::new(&api, fast_poll(10))
        .wait_for(&JobHandle::new("o-1"), &CancellationToken::new(), |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, JobError::Transport { attempt: 1, .. }));
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_download_url() {
    let mut server = mockito::Server::new_async().await;
    let api = common::api(&server.url());

    let downloads = server
        .mock("GET", "/v1/downloads")
        .match_query(common::access_query(&[("outputIds", "o-1")]))
        .match_header("authorization", common::bearer(&api).as_str())
        .with_status(200)
        .with_body(r#"{"results": [{"url": "https://cdn.example.com/o-1.rfa"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let url = GetDownloadUrl::new("o-1").request(&api).await.unwrap();
    assert_eq!(url, "https://cdn.example.com/o-1.rfa");
    downloads.assert_async().await;
}

#[tokio::test]
async fn test_download_url_empty() {
    let mut server = mockito::Server::new_async().await;
    let api = common::api(&server.url());

    server
        .mock("GET", "/v1/downloads")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    assert!(GetDownloadUrl::new("o-1").request(&api).await.is_err());
}

#[tokio::test]
async fn test_list_outputs_of_variant() {
    let mut server = mockito::Server::new_async().await;
    let api = common::api(&server.url());

    let list = server
        .mock("GET", "/v1/outputs")
        .match_query(common::access_query(&[("filter[variantId]", "v-1")]))
        .match_header("authorization", common::bearer(&api).as_str())
        .with_status(200)
        .with_body(
            json!({"results": [
                {"id": "o-1", "type": "RFA", "status": "SUCCESS"},
                {"id": "o-2", "type": "IFC", "status": "PENDING"}
            ]})
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let outputs = ListOutputs::new("v-1").request(&api).await.unwrap();

    let ids: Vec<&str> = outputs.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["o-1", "o-2"]);
    assert_eq!(outputs[1].status, "PENDING");
    list.assert_async().await;
}
