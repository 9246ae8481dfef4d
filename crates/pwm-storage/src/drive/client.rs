// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal Drive v3 REST client.
//!
//! Covers exactly what the storage backend needs: name lookups, folder and
//! file creation and deletion, media download and upload, and server-side
//! copy.

use std::time::Duration;

use pwm_core::PwmError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Response, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

/// MIME type Drive uses for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

const OCTET_STREAM: &str = "application/octet-stream";

/// A file or folder returned by a lookup.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DriveFile {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

/// HTTP client bound to one OAuth token and a pair of API base URLs.
#[derive(Debug, Clone)]
pub struct DriveClient {
    client: reqwest::Client,
    api_base: String,
    upload_base: String,
}

impl DriveClient {
    pub fn new(token: &SecretString, api_base: &str, upload_base: &str) -> Result<Self, PwmError> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| PwmError::Config(format!("invalid Drive access token: {e}")))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| PwmError::storage("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            upload_base: upload_base.trim_end_matches('/').to_string(),
        })
    }

    /// List non-trashed folders called `name` anywhere in the drive.
    pub async fn find_folders(&self, name: &str) -> Result<Vec<DriveFile>, PwmError> {
        let query = format!(
            "name = '{}' and mimeType = '{FOLDER_MIME_TYPE}' and trashed = false",
            escape_query(name)
        );
        self.list(&query).await
    }

    /// List non-trashed files called `name` directly under `parent_id`.
    pub async fn find_files(&self, name: &str, parent_id: &str) -> Result<Vec<DriveFile>, PwmError> {
        let query = format!(
            "name = '{}' and '{}' in parents and mimeType != '{FOLDER_MIME_TYPE}' and trashed = false",
            escape_query(name),
            escape_query(parent_id)
        );
        self.list(&query).await
    }

    async fn list(&self, query: &str) -> Result<Vec<DriveFile>, PwmError> {
        let url = Url::parse_with_params(
            &format!("{}/files", self.api_base),
            &[
                ("q", query),
                ("fields", "files(id,name)"),
                ("spaces", "drive"),
            ],
        )
        .map_err(|e| PwmError::Config(format!("invalid Drive API base URL: {e}")))?;

        debug!(query, "Drive API: list files");
        let response = self.send(self.client.get(url)).await?;
        let list: FileList = response
            .json()
            .await
            .map_err(|e| PwmError::storage("invalid Drive file list response", e))?;
        Ok(list.files)
    }

    /// Create a folder under `parent_id` and return its ID.
    pub async fn create_folder(&self, name: &str, parent_id: &str) -> Result<String, PwmError> {
        let body = json!({
            "name": name,
            "mimeType": FOLDER_MIME_TYPE,
            "parents": [parent_id],
        });
        debug!(name, "Drive API: create folder");
        self.create(body).await
    }

    /// Create a file under `parent_id` holding `content`, returning its ID.
    ///
    /// Metadata and content go in two requests: the object is created
    /// empty and then filled with a media upload. When the upload fails the
    /// empty object is deleted again.
    pub async fn create_file(
        &self,
        name: &str,
        parent_id: &str,
        content: &[u8],
    ) -> Result<String, PwmError> {
        let body = json!({
            "name": name,
            "mimeType": OCTET_STREAM,
            "parents": [parent_id],
        });
        debug!(name, "Drive API: create file");
        let id = self.create(body).await?;
        if let Err(e) = self.update_content(&id, content).await {
            if let Err(cleanup) = self.delete(&id).await {
                warn!(file_id = %id, error = %cleanup, "failed to delete empty Drive file");
            }
            return Err(e);
        }
        Ok(id)
    }

    /// Permanently delete `file_id`.
    pub async fn delete(&self, file_id: &str) -> Result<(), PwmError> {
        debug!(file_id, "Drive API: delete");
        let request = self
            .client
            .delete(format!("{}/files/{file_id}", self.api_base));
        self.send(request).await?;
        Ok(())
    }

    async fn create(&self, metadata: serde_json::Value) -> Result<String, PwmError> {
        let request = self
            .client
            .post(format!("{}/files", self.api_base))
            .json(&metadata);
        let created: DriveFile = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| PwmError::storage("invalid Drive create response", e))?;
        Ok(created.id)
    }

    /// Download the content of `file_id`.
    pub async fn download(&self, file_id: &str) -> Result<Vec<u8>, PwmError> {
        debug!(file_id, "Drive API: download");
        let request = self
            .client
            .get(format!("{}/files/{file_id}?alt=media", self.api_base));
        let bytes = self
            .send(request)
            .await?
            .bytes()
            .await
            .map_err(|e| PwmError::storage("failed to read Drive download", e))?;
        Ok(bytes.to_vec())
    }

    /// Replace the content of `file_id`.
    pub async fn update_content(&self, file_id: &str, content: &[u8]) -> Result<(), PwmError> {
        debug!(file_id, bytes = content.len(), "Drive API: upload");
        let request = self
            .client
            .patch(format!(
                "{}/files/{file_id}?uploadType=media",
                self.upload_base
            ))
            .header(CONTENT_TYPE, OCTET_STREAM)
            .body(content.to_vec());
        self.send(request).await?;
        Ok(())
    }

    /// Copy `file_id` server side into `parent_id` under `name`.
    pub async fn copy(&self, file_id: &str, name: &str, parent_id: &str) -> Result<String, PwmError> {
        debug!(file_id, name, "Drive API: copy");
        let request = self
            .client
            .post(format!("{}/files/{file_id}/copy", self.api_base))
            .json(&json!({ "name": name, "parents": [parent_id] }));
        let copied: DriveFile = self
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| PwmError::storage("invalid Drive copy response", e))?;
        Ok(copied.id)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, PwmError> {
        let response = request
            .send()
            .await
            .map_err(|e| PwmError::storage(format!("Drive request failed: {e}"), e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(PwmError::Storage {
            message: format!("Drive API returned {status}: {body}"),
            source: None,
        })
    }
}

/// Escape a value for use inside a single-quoted Drive query literal.
fn escape_query(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(escape_query("it's"), "it\\'s");
        assert_eq!(escape_query(r"a\b"), r"a\\b");
        assert_eq!(escape_query("plain"), "plain");
    }

    #[test]
    fn trailing_slashes_are_trimmed_from_bases() {
        let client = DriveClient::new(
            &SecretString::from("t".to_string()),
            "http://localhost/drive/v3/",
            "http://localhost/upload/drive/v3/",
        )
        .unwrap();
        assert_eq!(client.api_base, "http://localhost/drive/v3");
        assert_eq!(client.upload_base, "http://localhost/upload/drive/v3");
    }
}
