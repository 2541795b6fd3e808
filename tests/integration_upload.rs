//! Integration tests for the chunked upload flow
//!
//! These tests run an `UploadSession` against a mock API and check what goes
//! over the wire: the reservation and commit calls carry the bearer token and
//! the access context, chunk PUTs carry neither.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use chrono::{Duration, Utc};
use ind::{
    api::{Credentials, limits::ChunkLimits},
    error::{UploadError, UploadPhase},
    transport::ProductUploads,
    upload::{UploadOptions, UploadSession, UploadTarget},
};
use mockito::Matcher;
use secrecy::SecretString;
use serde_json::json;

// 4 byte chunks: a 10 byte file goes up in 3 parts
fn options() -> UploadOptions {
    UploadOptions {
        limits: ChunkLimits::new(25, 4),
        max_concurrency: 1,
    }
}

fn reservation(server_url: &str, parts: usize) -> String {
    let urls: Vec<String> = (0..parts)
        .map(|i| format!("{server_url}/bucket/part{i}?X-Amz-Signature=sig{i}"))
        .collect();
    json!({"urls": urls, "objectKey": "urn:obj:1", "uploadKey": "upl-1"}).to_string()
}

#[tokio::test]
async fn test_upload_sends_every_chunk_then_commits() {
    let mut server = mockito::Server::new_async().await;
    let api = common::api(&server.url());
    let tmp_file = common::create_test_file(b"0123456789");
    let target = UploadTarget::open(tmp_file.path()).await.unwrap();

    let reserve = server
        .mock("POST", "/v1/products/p-1/upload-urls")
        .match_query(common::access_query(&[]))
        .match_header("authorization", common::bearer(&api).as_str())
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(
            json!({"fileName": target.name(), "parts": 3}),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(reservation(&server.url(), 3))
        .expect(1)
        .create_async()
        .await;

    let mut parts = Vec::new();
    for (i, body) in ["0123", "4567", "89"].iter().enumerate() {
        parts.push(
            server
                .mock("PUT", format!("/bucket/part{i}").as_str())
                .match_query(Matcher::UrlEncoded(
                    "X-Amz-Signature".into(),
                    format!("sig{i}"),
                ))
                .match_header("authorization", Matcher::Missing)
                .match_header("content-type", "application/octet-stream")
                .match_body(*body)
                .with_status(200)
                .expect(1)
                .create_async()
                .await,
        );
    }

    let commit = server
        .mock("POST", "/v1/products/p-1/complete-upload")
        .match_query(common::access_query(&[]))
        .match_header("authorization", common::bearer(&api).as_str())
        .match_body(Matcher::Json(json!({
            "objectKey": "urn:obj:1",
            "uploadKey": "upl-1",
            "fileName": target.name(),
            "fileSize": 10,
            "contentType": "application/octet-stream"
        })))
        .with_status(200)
        .with_body(r#"{"objectKey": "urn:obj:1", "fileSize": 10}"#)
        .expect(1)
        .create_async()
        .await;

    let transport = ProductUploads::new(&api, "p-1");
    let object_key = UploadSession::new(&transport, options())
        .upload(&target)
        .await
        .unwrap();

    assert_eq!(object_key, "urn:obj:1");

    reserve.assert_async().await;
    for part in &parts {
        part.assert_async().await;
    }
    commit.assert_async().await;
}

#[tokio::test]
async fn test_failed_chunk_is_not_committed() {
    let mut server = mockito::Server::new_async().await;
    let api = common::api(&server.url());
    let tmp_file = common::create_test_file(b"0123456789");
    let target = UploadTarget::open(tmp_file.path()).await.unwrap();

    server
        .mock("POST", "/v1/products/p-1/upload-urls")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(reservation(&server.url(), 3))
        .create_async()
        .await;

    let part0 = server
        .mock("PUT", "/bucket/part0")
        .match_query(Matcher::Any)
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let part1 = server
        .mock("PUT", "/bucket/part1")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("<Error><Code>InternalError</Code></Error>")
        .expect(1)
        .create_async()
        .await;

    let part2 = server
        .mock("PUT", "/bucket/part2")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let commit = server
        .mock("POST", "/v1/products/p-1/complete-upload")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let transport = ProductUploads::new(&api, "p-1");
    let err = UploadSession::new(&transport, options())
        .upload(&target)
        .await
        .unwrap_err();

    match &err {
        UploadError::Transfer {
            chunk_index,
            completed,
            source,
        } => {
            assert_eq!(*chunk_index, 1);
            assert_eq!(completed, &vec![0]);
            let failure = source.http_failure().unwrap();
            assert_eq!(failure.status, 500);
            assert!(failure.body.contains("InternalError"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.phase(), UploadPhase::Transfer);

    part0.assert_async().await;
    part1.assert_async().await;
    part2.assert_async().await;
    commit.assert_async().await;
}

#[tokio::test]
async fn test_reservation_error_keeps_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    let api = common::api(&server.url());
    let tmp_file = common::create_test_file(b"0123");
    let target = UploadTarget::open(tmp_file.path()).await.unwrap();

    server
        .mock("POST", "/v1/products/p-1/upload-urls")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"detail": "invalid parts"}"#)
        .create_async()
        .await;

    let transport = ProductUploads::new(&api, "p-1");
    let err = UploadSession::new(&transport, options())
        .upload(&target)
        .await
        .unwrap_err();

    match &err {
        UploadError::Reservation(source) => {
            let failure = source.http_failure().unwrap();
            assert_eq!(failure.status, 400);
            assert!(failure.body.contains("invalid parts"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("invalid parts"));
}

#[tokio::test]
async fn test_unauthorized_commit() {
    let mut server = mockito::Server::new_async().await;
    let api = common::api(&server.url());
    let tmp_file = common::create_test_file(b"");
    let target = UploadTarget::open(tmp_file.path()).await.unwrap();

    server
        .mock("POST", "/v1/products/p-1/upload-urls")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"parts": 1})))
        .with_status(200)
        .with_body(reservation(&server.url(), 1))
        .create_async()
        .await;

    let part0 = server
        .mock("PUT", "/bucket/part0")
        .match_query(Matcher::Any)
        .match_body("")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    server
        .mock("POST", "/v1/products/p-1/complete-upload")
        .match_query(Matcher::Any)
        .with_status(401)
        .create_async()
        .await;

    let transport = ProductUploads::new(&api, "p-1");
    let err = UploadSession::new(&transport, options())
        .upload(&target)
        .await
        .unwrap_err();

    assert_eq!(err.phase(), UploadPhase::Finalize);
    assert!(err.is_unauthorized());
    part0.assert_async().await;
}

#[tokio::test]
async fn test_expired_credential_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let credentials = Credentials::new(
        &SecretString::new("token".into()),
        Some(Utc::now() - Duration::minutes(5)),
    );
    let api = common::api_with_credentials(&server.url(), &credentials);
    let tmp_file = common::create_test_file(b"0123");
    let target = UploadTarget::open(tmp_file.path()).await.unwrap();

    let reserve = server
        .mock("POST", "/v1/products/p-1/upload-urls")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let transport = ProductUploads::new(&api, "p-1");
    let err = UploadSession::new(&transport, options())
        .upload(&target)
        .await
        .unwrap_err();

    assert_eq!(err.phase(), UploadPhase::Reserve);
    assert!(err.is_unauthorized());
    reserve.assert_async().await;
}

#[tokio::test]
async fn test_commit_without_object_key_keeps_reserved_key() {
    let mut server = mockito::Server::new_async().await;
    let api = common::api(&server.url());
    let tmp_file = common::create_test_file(b"0123");
    let target = UploadTarget::open(tmp_file.path()).await.unwrap();

    server
        .mock("POST", "/v1/products/p-1/upload-urls")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(reservation(&server.url(), 1))
        .create_async()
        .await;

    server
        .mock("PUT", "/bucket/part0")
        .match_query(Matcher::Any)
        .with_status(200)
        .create_async()
        .await;

    let commit = server
        .mock("POST", "/v1/products/p-1/complete-upload")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({"fileSize": 4}).to_string())
        .expect(1)
        .create_async()
        .await;

    let transport = ProductUploads::new(&api, "p-1");
    let object_key = UploadSession::new(&transport, options())
        .upload(&target)
        .await
        .unwrap();

    assert_eq!(object_key, "urn:obj:1");
    commit.assert_async().await;
}
