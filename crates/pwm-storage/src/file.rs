// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local file storage backend.
//!
//! The vault lives in a single file. Writes go to a sibling temp file which
//! is then renamed over the target, so a crash mid-write leaves the previous
//! ciphertext intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pwm_config::{expand_path, parse_file_permission, FileStorageConfig};
use pwm_core::{PwmError, StorageBackend};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Mode applied when the configuration leaves the permission blank.
pub const DEFAULT_PERMISSION: u32 = 0o640;

/// Storage backend that keeps the encrypted vault in a local file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    permission: u32,
}

impl FileStorage {
    /// Build a file backend from configuration.
    ///
    /// Fails with [`PwmError::Config`] when the path is empty or the
    /// permission string is not a valid 4-digit octal mode.
    pub fn new(config: &FileStorageConfig) -> Result<Self, PwmError> {
        if config.path.trim().is_empty() {
            return Err(PwmError::Config(
                "invalid path -- the password DB path cannot be empty".to_string(),
            ));
        }

        let permission = if config.permission.trim().is_empty() {
            DEFAULT_PERMISSION
        } else {
            parse_file_permission(config.permission.trim())
                .map_err(|e| PwmError::Config(e.to_string()))?
        };

        Ok(Self {
            path: expand_path(&config.path),
            permission,
        })
    }

    /// Path of the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mode applied to the vault file on every write.
    pub fn permission(&self) -> u32 {
        self.permission
    }

    async fn existing_len(&self) -> Result<Option<u64>, PwmError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PwmError::storage(
                format!("cannot stat {}", self.path.display()),
                e,
            )),
        }
    }

    async fn write_atomic(&self, blob: &[u8]) -> Result<(), PwmError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                PwmError::storage(format!("cannot create {}", parent.display()), e)
            })?;
        }

        let tmp = temp_path(&self.path);
        tokio::fs::write(&tmp, blob)
            .await
            .map_err(|e| PwmError::storage(format!("cannot write {}", tmp.display()), e))?;
        apply_permission(&tmp, self.permission).await?;

        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(PwmError::storage(
                format!("cannot replace {}", self.path.display()),
                e,
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FileStorage {
    fn name(&self) -> &str {
        "file"
    }

    async fn init_for_first_time(&self, initial: &[u8]) -> Result<(), PwmError> {
        if self.existing_len().await?.is_some_and(|len| len > 0) {
            return Err(PwmError::AlreadyInitialized);
        }
        self.write_atomic(initial).await?;
        info!(path = %self.path.display(), "password database created");
        Ok(())
    }

    async fn load(&self) -> Result<Vec<u8>, PwmError> {
        match tokio::fs::read(&self.path).await {
            Ok(blob) => {
                debug!(path = %self.path.display(), bytes = blob.len(), "password database loaded");
                Ok(blob)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(PwmError::storage(
                format!("cannot read {}", self.path.display()),
                e,
            )),
        }
    }

    async fn store(&self, blob: &[u8]) -> Result<(), PwmError> {
        self.write_atomic(blob).await?;
        debug!(path = %self.path.display(), bytes = blob.len(), "password database stored");
        Ok(())
    }

    async fn backup(&self) -> Result<String, PwmError> {
        let blob = self.load().await?;
        if blob.is_empty() {
            return Err(PwmError::NotInitialized);
        }

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                PwmError::Config(format!("{} has no file name", self.path.display()))
            })?;
        let target = self
            .path
            .with_file_name(crate::backup_name(&file_name, chrono::Local::now().date_naive()));

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(PwmError::BackupExists(target.display().to_string()));
            }
            Err(e) => {
                return Err(PwmError::storage(
                    format!("cannot create {}", target.display()),
                    e,
                ));
            }
        };

        file.write_all(&blob)
            .await
            .map_err(|e| PwmError::storage(format!("cannot write {}", target.display()), e))?;
        file.flush()
            .await
            .map_err(|e| PwmError::storage(format!("cannot write {}", target.display()), e))?;
        apply_permission(&target, self.permission).await?;

        info!(backup = %target.display(), "password database backed up");
        Ok(target.display().to_string())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(unix)]
async fn apply_permission(path: &Path, mode: u32) -> Result<(), PwmError> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .await
        .map_err(|e| PwmError::storage(format!("cannot chmod {}", path.display()), e))
}

#[cfg(not(unix))]
async fn apply_permission(_path: &Path, _mode: u32) -> Result<(), PwmError> {
    Ok(())
}
