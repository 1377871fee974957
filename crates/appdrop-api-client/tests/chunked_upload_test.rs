use std::io::Write;
use std::path::{Path, PathBuf};

use appdrop_api_client::chunked::ChunkedTransfer;
use appdrop_api_client::ApiClient;
use appdrop_core::{Credentials, IngestError};
use mockito::{Matcher, Server};
use serde_json::json;

const CHUNK_PATH: &str = "/API/mam/apps/internal/uploadchunk";

fn client(server: &Server) -> ApiClient {
    ApiClient::new(
        &server.url(),
        "tenant-key",
        &Credentials::new("admin", "secret"),
    )
    .unwrap()
}

fn create_test_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(data).unwrap();
    path
}

#[tokio::test]
async fn forwards_previous_transaction_id_on_each_chunk() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let path = create_test_file(dir.path(), "AcmeAgent.MSI", b"0123456789ABCDEFGHIJKLMNO");

    // Each response hands out a new id; the next request must echo it.
    let first = server
        .mock("POST", CHUNK_PATH)
        .match_header("aw-tenant-code", "tenant-key")
        .match_header("authorization", "Basic YWRtaW46c2VjcmV0")
        .match_body(Matcher::PartialJson(json!({
            "TransactionId": "",
            "ChunkSequenceNumber": 1,
            "TotalApplicationSize": 25,
            "ChunkSize": 10,
            "ChunkData": "MDEyMzQ1Njc4OQ=="
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"TranscationId": "tx-1", "UploadSuccess": true}"#)
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("POST", CHUNK_PATH)
        .match_body(Matcher::PartialJson(json!({
            "TransactionId": "tx-1",
            "ChunkSequenceNumber": 2,
            "ChunkSize": 10
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"TranscationId": "tx-2", "UploadSuccess": true}"#)
        .expect(1)
        .create_async()
        .await;
    let third = server
        .mock("POST", CHUNK_PATH)
        .match_body(Matcher::PartialJson(json!({
            "TransactionId": "tx-2",
            "ChunkSequenceNumber": 3,
            "ChunkSize": 5,
            "ChunkData": "S0xNTk8="
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"TransactionId": "tx-3", "UploadSuccess": true}"#)
        .expect(1)
        .create_async()
        .await;

    let api = client(&server);
    let upload = ChunkedTransfer::new(&api, 10).upload(&path).await.unwrap();

    assert_eq!(upload.transaction_id, "tx-3");
    assert_eq!(upload.chunks, 3);
    assert_eq!(upload.bytes, 25);
    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
}

#[tokio::test]
async fn exact_multiple_sends_no_trailing_chunk() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let path = create_test_file(dir.path(), "AcmeAgent.MSI", &[1u8; 20]);

    let full_chunks = server
        .mock("POST", CHUNK_PATH)
        .match_body(Matcher::PartialJson(json!({"ChunkSize": 10})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"TranscationId": "tx", "UploadSuccess": true}"#)
        .expect(2)
        .create_async()
        .await;
    let empty_chunk = server
        .mock("POST", CHUNK_PATH)
        .match_body(Matcher::PartialJson(json!({"ChunkSize": 0})))
        .with_status(200)
        .with_body(r#"{"TranscationId": "tx"}"#)
        .expect(0)
        .create_async()
        .await;

    let api = client(&server);
    let upload = ChunkedTransfer::new(&api, 10).upload(&path).await.unwrap();

    assert_eq!(upload.chunks, 2);
    assert_eq!(upload.bytes, 20);
    full_chunks.assert_async().await;
    empty_chunk.assert_async().await;
}

#[tokio::test]
async fn failed_chunk_aborts_the_transfer() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let path = create_test_file(dir.path(), "AcmeAgent.MSI", &[2u8; 30]);

    server
        .mock("POST", CHUNK_PATH)
        .match_body(Matcher::PartialJson(json!({"ChunkSequenceNumber": 1})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"TranscationId": "tx-1", "UploadSuccess": true}"#)
        .create_async()
        .await;
    server
        .mock("POST", CHUNK_PATH)
        .match_body(Matcher::PartialJson(json!({"ChunkSequenceNumber": 2})))
        .with_status(500)
        .with_body(r#"{"errorCode": 500, "message": "Chunk storage unavailable"}"#)
        .create_async()
        .await;
    let third = server
        .mock("POST", CHUNK_PATH)
        .match_body(Matcher::PartialJson(json!({"ChunkSequenceNumber": 3})))
        .with_status(200)
        .with_body(r#"{"TranscationId": "tx-3"}"#)
        .expect(0)
        .create_async()
        .await;

    let api = client(&server);
    let err = ChunkedTransfer::new(&api, 10)
        .upload(&path)
        .await
        .unwrap_err();

    match &err {
        IngestError::Transfer { sequence, message } => {
            assert_eq!(*sequence, 2);
            assert!(message.contains("Chunk storage unavailable"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!err.is_fatal());
    third.assert_async().await;
}

#[tokio::test]
async fn upload_success_false_is_a_chunk_failure() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let path = create_test_file(dir.path(), "AcmeAgent.MSI", b"payload");

    server
        .mock("POST", CHUNK_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"TranscationId": "tx-1", "UploadSuccess": false}"#)
        .create_async()
        .await;

    let api = client(&server);
    let err = ChunkedTransfer::new(&api, 10)
        .upload(&path)
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::Transfer { sequence: 1, .. }));
}

#[tokio::test]
async fn missing_final_transaction_id_is_a_protocol_error() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let path = create_test_file(dir.path(), "AcmeAgent.MSI", b"payload");

    server
        .mock("POST", CHUNK_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"UploadSuccess": true}"#)
        .create_async()
        .await;

    let api = client(&server);
    let err = ChunkedTransfer::new(&api, 10)
        .upload(&path)
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::Protocol(_)), "{err}");
}

#[tokio::test]
async fn empty_and_missing_files_send_nothing() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let empty = create_test_file(dir.path(), "Empty.MSI", b"");

    let any_chunk = server
        .mock("POST", CHUNK_PATH)
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    let api = client(&server);
    let transfer = ChunkedTransfer::new(&api, 10);

    let err = transfer.upload(&empty).await.unwrap_err();
    assert!(matches!(err, IngestError::EmptyFile(_)));

    let err = transfer
        .upload(&dir.path().join("Missing.MSI"))
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::LocalFile { .. }));

    any_chunk.assert_async().await;
}
