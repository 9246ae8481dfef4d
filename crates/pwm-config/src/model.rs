// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the pwm password manager.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use pwm_core::{CipherKind, StorageKind};
use serde::{Deserialize, Serialize};

/// Top-level pwm configuration.
///
/// Built once at process start and passed by reference to whatever needs
/// it. There is no global configuration state.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PwmConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Cipher settings.
    #[serde(default)]
    pub cipher: CipherConfig,

    /// Command-line presentation settings.
    #[serde(default)]
    pub cli: CliConfig,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            storage: StorageConfig::default(),
            cipher: CipherConfig::default(),
            cli: CliConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend selection and per-backend settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Which backend holds the vault.
    #[serde(default)]
    pub backend: StorageKind,

    /// Local file backend settings.
    #[serde(default)]
    pub file: FileStorageConfig,

    /// Remote Drive backend settings.
    #[serde(default)]
    pub drive: DriveStorageConfig,
}

/// Local file backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileStorageConfig {
    /// Path of the encrypted password database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Four-digit octal permission applied to the file, e.g. `0640`.
    #[serde(default = "default_permission")]
    pub permission: String,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            permission: default_permission(),
        }
    }
}

fn default_db_path() -> String {
    data_dir().join("passwordDB").display().to_string()
}

fn default_permission() -> String {
    "0640".to_string()
}

/// Remote Drive backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DriveStorageConfig {
    /// Name of the remote directory holding the database object.
    #[serde(default = "default_drive_directory")]
    pub directory: String,

    /// Name of the database object inside `directory`.
    #[serde(default = "default_drive_db_file")]
    pub db_file: String,

    /// Local path of the cached OAuth token (JSON with `access_token`).
    #[serde(default = "default_token_file")]
    pub token_file: String,

    /// Metadata API base URL.
    #[serde(default = "default_drive_api_base")]
    pub api_base: String,

    /// Media upload API base URL.
    #[serde(default = "default_drive_upload_base")]
    pub upload_base: String,
}

impl Default for DriveStorageConfig {
    fn default() -> Self {
        Self {
            directory: default_drive_directory(),
            db_file: default_drive_db_file(),
            token_file: default_token_file(),
            api_base: default_drive_api_base(),
            upload_base: default_drive_upload_base(),
        }
    }
}

fn default_drive_directory() -> String {
    "pwm".to_string()
}

fn default_drive_db_file() -> String {
    "passwordDB".to_string()
}

fn default_token_file() -> String {
    data_dir().join("drive-token.json").display().to_string()
}

fn default_drive_api_base() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}

fn default_drive_upload_base() -> String {
    "https://www.googleapis.com/upload/drive/v3".to_string()
}

/// Cipher selection and KDF parameters.
///
/// The KDF parameters only apply to [`CipherKind::AesGcmArgon2`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CipherConfig {
    /// Which cipher seals the database.
    #[serde(default)]
    pub kind: CipherKind,

    /// Argon2id memory cost in KiB (default: 65536 = 64 MiB).
    #[serde(default = "default_kdf_memory_cost")]
    pub kdf_memory_cost: u32,

    /// Argon2id iteration count (default: 3).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id parallelism lanes (default: 4).
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            kind: CipherKind::default(),
            kdf_memory_cost: default_kdf_memory_cost(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
        }
    }
}

fn default_kdf_memory_cost() -> u32 {
    65536 // 64 MiB per OWASP recommendation
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    4
}

/// Command-line presentation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Number of search results listed before the rest are elided.
    #[serde(default = "default_select_list_size")]
    pub select_list_size: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            select_list_size: default_select_list_size(),
        }
    }
}

fn default_select_list_size() -> usize {
    5
}

/// Per-user data directory: `~/.pwm`, or `./.pwm` when no home is known.
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".pwm"))
        .unwrap_or_else(|| PathBuf::from(".pwm"))
}
