// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the repository, storage and interchange layers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One credential record.
///
/// Debug output masks the password.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub description: String,
}

impl Entry {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            password: password.into(),
            description: description.into(),
        }
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("description", &self.description)
            .finish()
    }
}

/// A flat row exchanged with importers and exporters: an entry plus the
/// labels that reference it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportExportEntry {
    pub entry: Entry,
    pub labels: Vec<String>,
}

/// Storage backend selector.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum StorageKind {
    /// Local file.
    #[default]
    File,
    /// Remote Drive-like object store.
    Drive,
    /// In-process blob, lost on exit.
    Memory,
}

/// Cipher selector.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum CipherKind {
    /// AES-256-GCM keyed by a SHA-256 digest of the passphrase.
    #[default]
    AesGcm,
    /// AES-256-GCM keyed by Argon2id over the passphrase and a random salt.
    AesGcmArgon2,
}

/// Import/export medium selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum MediumKind {
    Csv,
    Html,
}
