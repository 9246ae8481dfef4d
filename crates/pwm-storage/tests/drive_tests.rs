// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Drive backend tests against a mock Drive API.

use pwm_config::DriveStorageConfig;
use pwm_core::{PwmError, StorageBackend};
use pwm_storage::DriveStorage;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_bytes, body_partial_json, header, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Matches list requests whose `q` parameter contains the given fragment.
struct QueryContains(String);

impl Match for QueryContains {
    fn matches(&self, request: &Request) -> bool {
        request
            .url
            .query_pairs()
            .any(|(key, value)| key == "q" && value.contains(&self.0))
    }
}

fn folder_query() -> QueryContains {
    QueryContains(format!("mimeType = '{FOLDER_MIME}'"))
}

fn file_query(name: &str) -> QueryContains {
    QueryContains(format!("name = '{name}' and 'dir1' in parents"))
}

async fn storage(server: &MockServer) -> (DriveStorage, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("token.json");
    std::fs::write(&token_file, r#"{"access_token":"test-token"}"#).unwrap();

    let config = DriveStorageConfig {
        directory: "pwm".to_string(),
        db_file: "passwordDB".to_string(),
        token_file: token_file.display().to_string(),
        api_base: format!("{}/drive/v3", server.uri()),
        upload_base: format!("{}/upload/drive/v3", server.uri()),
    };
    (DriveStorage::new(&config).unwrap(), dir)
}

async fn mount_list(server: &MockServer, matcher: QueryContains, ids: &[&str]) {
    let files: Vec<_> = ids.iter().map(|id| json!({ "id": id, "name": id })).collect();
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(matcher)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": files })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn load_downloads_the_database_object() {
    let server = MockServer::start().await;
    mount_list(&server, folder_query(), &["dir1"]).await;
    mount_list(&server, file_query("passwordDB"), &["file1"]).await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files/file1"))
        .and(query_param("alt", "media"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"sealed".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let (storage, _dir) = storage(&server).await;
    assert_eq!(storage.load().await.unwrap(), b"sealed");
}

#[tokio::test]
async fn load_without_directory_is_empty() {
    let server = MockServer::start().await;
    mount_list(&server, folder_query(), &[]).await;

    let (storage, _dir) = storage(&server).await;
    assert!(storage.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_directories_are_a_config_error() {
    let server = MockServer::start().await;
    mount_list(&server, folder_query(), &["dir1", "dir2"]).await;

    let (storage, _dir) = storage(&server).await;
    let err = storage.load().await.unwrap_err();
    assert!(matches!(err, PwmError::Config(ref m) if m.contains("more than one directory")));
}

#[tokio::test]
async fn duplicate_files_are_a_config_error() {
    let server = MockServer::start().await;
    mount_list(&server, folder_query(), &["dir1"]).await;
    mount_list(&server, file_query("passwordDB"), &["file1", "file2"]).await;

    let (storage, _dir) = storage(&server).await;
    let err = storage.store(b"x").await.unwrap_err();
    assert!(matches!(err, PwmError::Config(ref m) if m.contains("more than one file")));
}

#[tokio::test]
async fn init_creates_directory_and_file() {
    let server = MockServer::start().await;
    mount_list(&server, folder_query(), &[]).await;
    mount_list(&server, file_query("passwordDB"), &[]).await;

    Mock::given(method("POST"))
        .and(path("/drive/v3/files"))
        .and(body_partial_json(json!({ "name": "pwm", "mimeType": FOLDER_MIME })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "dir1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/drive/v3/files"))
        .and(body_partial_json(json!({ "name": "passwordDB", "parents": ["dir1"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "file1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/upload/drive/v3/files/file1"))
        .and(query_param("uploadType", "media"))
        .and(body_bytes(b"initial".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "file1" })))
        .expect(1)
        .mount(&server)
        .await;

    let (storage, _dir) = storage(&server).await;
    storage.init_for_first_time(b"initial").await.unwrap();
}

async fn mount_download(server: &MockServer, id: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/drive/v3/files/{id}")))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn init_over_existing_file_is_rejected() {
    let server = MockServer::start().await;
    mount_list(&server, folder_query(), &["dir1"]).await;
    mount_list(&server, file_query("passwordDB"), &["file1"]).await;
    mount_download(&server, "file1", b"sealed").await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (storage, _dir) = storage(&server).await;
    assert!(matches!(
        storage.init_for_first_time(b"initial").await.unwrap_err(),
        PwmError::AlreadyInitialized
    ));
}

#[tokio::test]
async fn init_over_empty_file_fills_it() {
    let server = MockServer::start().await;
    mount_list(&server, folder_query(), &["dir1"]).await;
    mount_list(&server, file_query("passwordDB"), &["file1"]).await;
    mount_download(&server, "file1", b"").await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "other" })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/upload/drive/v3/files/file1"))
        .and(body_bytes(b"initial".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "file1" })))
        .expect(1)
        .mount(&server)
        .await;

    let (storage, _dir) = storage(&server).await;
    assert!(storage.load().await.unwrap().is_empty());
    storage.init_for_first_time(b"initial").await.unwrap();
}

#[tokio::test]
async fn failed_upload_deletes_the_new_file() {
    let server = MockServer::start().await;
    mount_list(&server, folder_query(), &["dir1"]).await;
    mount_list(&server, file_query("passwordDB"), &[]).await;
    Mock::given(method("POST"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "file1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/upload/drive/v3/files/file1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/drive/v3/files/file1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (storage, _dir) = storage(&server).await;
    match storage.init_for_first_time(b"initial").await.unwrap_err() {
        PwmError::Storage { message, .. } => assert!(message.contains("500"), "{message}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn store_uploads_new_content() {
    let server = MockServer::start().await;
    mount_list(&server, folder_query(), &["dir1"]).await;
    mount_list(&server, file_query("passwordDB"), &["file1"]).await;
    Mock::given(method("PATCH"))
        .and(path("/upload/drive/v3/files/file1"))
        .and(body_bytes(b"updated".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "file1" })))
        .expect(1)
        .mount(&server)
        .await;

    let (storage, _dir) = storage(&server).await;
    storage.store(b"updated").await.unwrap();
}

#[tokio::test]
async fn store_without_database_is_not_initialized() {
    let server = MockServer::start().await;
    mount_list(&server, folder_query(), &["dir1"]).await;
    mount_list(&server, file_query("passwordDB"), &[]).await;

    let (storage, _dir) = storage(&server).await;
    assert!(matches!(
        storage.store(b"x").await.unwrap_err(),
        PwmError::NotInitialized
    ));
}

#[tokio::test]
async fn backup_copies_server_side() {
    let server = MockServer::start().await;
    let backup = pwm_storage::backup_name("passwordDB", chrono::Local::now().date_naive());
    mount_list(&server, folder_query(), &["dir1"]).await;
    mount_list(&server, file_query("passwordDB"), &["file1"]).await;
    mount_list(&server, file_query(&backup), &[]).await;
    Mock::given(method("POST"))
        .and(path("/drive/v3/files/file1/copy"))
        .and(body_partial_json(json!({ "name": backup, "parents": ["dir1"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "copy1" })))
        .expect(1)
        .mount(&server)
        .await;

    let (storage, _dir) = storage(&server).await;
    assert_eq!(storage.backup().await.unwrap(), backup);
}

#[tokio::test]
async fn backup_refuses_to_overwrite() {
    let server = MockServer::start().await;
    let backup = pwm_storage::backup_name("passwordDB", chrono::Local::now().date_naive());
    mount_list(&server, folder_query(), &["dir1"]).await;
    mount_list(&server, file_query("passwordDB"), &["file1"]).await;
    mount_list(&server, file_query(&backup), &["old"]).await;

    let (storage, _dir) = storage(&server).await;
    assert!(matches!(
        storage.backup().await.unwrap_err(),
        PwmError::BackupExists(_)
    ));
}

#[tokio::test]
async fn http_errors_surface_as_storage_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .mount(&server)
        .await;

    let (storage, _dir) = storage(&server).await;
    match storage.load().await.unwrap_err() {
        PwmError::Storage { message, .. } => {
            assert!(message.contains("401"), "{message}");
            assert!(message.contains("invalid credentials"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}
