// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote Drive storage backend.
//!
//! The vault is a single object named `db_file` inside a folder named
//! `directory`. Both are looked up by name on every operation; finding more
//! than one candidate for either name is a configuration error, since the
//! backend cannot tell which one holds the vault.

pub mod client;
pub mod token;

use async_trait::async_trait;
use pwm_config::{expand_path, DriveStorageConfig};
use pwm_core::{PwmError, StorageBackend};
use tracing::info;

pub use client::{DriveClient, DriveFile};

/// Parent ID Drive uses for the user's root folder.
const ROOT_FOLDER: &str = "root";

/// Storage backend that keeps the encrypted vault on Drive.
#[derive(Debug, Clone)]
pub struct DriveStorage {
    directory: String,
    db_file: String,
    client: DriveClient,
}

impl DriveStorage {
    /// Build a Drive backend, reading the cached OAuth token from disk.
    pub fn new(config: &DriveStorageConfig) -> Result<Self, PwmError> {
        if config.directory.trim().is_empty() {
            return Err(PwmError::Config(
                "Drive directory name cannot be empty".to_string(),
            ));
        }
        if config.db_file.trim().is_empty() {
            return Err(PwmError::Config(
                "Drive password DB file name cannot be empty".to_string(),
            ));
        }

        let token = token::read_token_file(&expand_path(&config.token_file))?;
        let client = DriveClient::new(&token, &config.api_base, &config.upload_base)?;
        Ok(Self::with_client(client, &config.directory, &config.db_file))
    }

    /// Build a Drive backend around an existing client.
    pub fn with_client(client: DriveClient, directory: &str, db_file: &str) -> Self {
        Self {
            directory: directory.to_string(),
            db_file: db_file.to_string(),
            client,
        }
    }

    async fn directory_id(&self) -> Result<Option<String>, PwmError> {
        let found = self.client.find_folders(&self.directory).await?;
        single("directory", &self.directory, found)
    }

    async fn file_id(&self, directory_id: &str, name: &str) -> Result<Option<String>, PwmError> {
        let found = self.client.find_files(name, directory_id).await?;
        single("file", name, found)
    }

    /// Resolve `(directory_id, file_id)`, failing when the vault is absent.
    async fn locate(&self) -> Result<(String, String), PwmError> {
        let directory_id = self
            .directory_id()
            .await?
            .ok_or(PwmError::NotInitialized)?;
        let file_id = self
            .file_id(&directory_id, &self.db_file)
            .await?
            .ok_or(PwmError::NotInitialized)?;
        Ok((directory_id, file_id))
    }
}

/// Reduce a lookup to at most one ID.
fn single(kind: &str, name: &str, found: Vec<DriveFile>) -> Result<Option<String>, PwmError> {
    match found.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some(only.id.clone())),
        _ => Err(PwmError::Config(format!(
            "more than one {kind} named `{name}` exists on Drive ({} found)",
            found.len()
        ))),
    }
}

#[async_trait]
impl StorageBackend for DriveStorage {
    fn name(&self) -> &str {
        "drive"
    }

    async fn init_for_first_time(&self, initial: &[u8]) -> Result<(), PwmError> {
        let directory_id = match self.directory_id().await? {
            Some(id) => id,
            None => {
                let id = self.client.create_folder(&self.directory, ROOT_FOLDER).await?;
                info!(directory = %self.directory, "Drive directory created");
                id
            }
        };

        match self.file_id(&directory_id, &self.db_file).await? {
            // A zero-length object holds no vault and is overwritten.
            Some(file_id) => {
                if !self.client.download(&file_id).await?.is_empty() {
                    return Err(PwmError::AlreadyInitialized);
                }
                self.client.update_content(&file_id, initial).await?;
            }
            None => {
                self.client
                    .create_file(&self.db_file, &directory_id, initial)
                    .await?;
            }
        }
        info!(
            directory = %self.directory,
            file = %self.db_file,
            "password database created on Drive"
        );
        Ok(())
    }

    async fn load(&self) -> Result<Vec<u8>, PwmError> {
        match self.locate().await {
            Ok((_, file_id)) => self.client.download(&file_id).await,
            Err(PwmError::NotInitialized) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn store(&self, blob: &[u8]) -> Result<(), PwmError> {
        let (_, file_id) = self.locate().await?;
        self.client.update_content(&file_id, blob).await
    }

    async fn backup(&self) -> Result<String, PwmError> {
        let (directory_id, file_id) = self.locate().await?;
        let name = crate::backup_name(&self.db_file, chrono::Local::now().date_naive());

        if self.file_id(&directory_id, &name).await?.is_some() {
            return Err(PwmError::BackupExists(name));
        }

        self.client.copy(&file_id, &name, &directory_id).await?;
        info!(backup = %name, "password database backed up on Drive");
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(id: &str) -> DriveFile {
        DriveFile {
            id: id.to_string(),
            name: "x".to_string(),
        }
    }

    #[test]
    fn single_accepts_zero_or_one_match() {
        assert_eq!(single("file", "db", vec![]).unwrap(), None);
        assert_eq!(
            single("file", "db", vec![file("a")]).unwrap(),
            Some("a".to_string())
        );
    }

    #[test]
    fn single_rejects_ambiguous_names() {
        let err = single("directory", "pwm", vec![file("a"), file("b")]).unwrap_err();
        match err {
            PwmError::Config(msg) => assert!(msg.contains("more than one directory")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_names_are_rejected() {
        let config = DriveStorageConfig {
            directory: String::new(),
            ..DriveStorageConfig::default()
        };
        assert!(matches!(
            DriveStorage::new(&config).unwrap_err(),
            PwmError::Config(_)
        ));
    }
}
