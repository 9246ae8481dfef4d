// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the pwm password manager.

use thiserror::Error;

/// The primary error type used across the cipher, storage, repository and
/// interchange layers.
///
/// Wrong passphrases and tampered ciphertext both map to
/// [`PwmError::AuthenticationFailed`] with the same message, so callers
/// cannot tell them apart.
#[derive(Debug, Error)]
pub enum PwmError {
    /// The backing store holds no vault yet (missing or zero-length blob).
    #[error("password repository is not initialized -- run `pwm init` first")]
    NotInitialized,

    /// The backing store already holds a vault.
    #[error("password repository is already initialized")]
    AlreadyInitialized,

    /// Decryption failed: wrong master password or corrupted data.
    #[error("authentication failed -- invalid master password or corrupted password database")]
    AuthenticationFailed,

    /// No entry exists under the given ID.
    #[error("invalid ID: {0}")]
    InvalidId(String),

    /// An entry already exists under the given ID.
    #[error("ID: {0} is already there")]
    DuplicateId(String),

    /// Entry IDs must be non-empty.
    #[error("ID cannot be empty")]
    EmptyId,

    /// The database holds no entries.
    #[error("no passwords are available -- add one")]
    NoPasswordsAvailable,

    /// A search found nothing.
    #[error("cannot find any match for: {0}")]
    NoMatch(String),

    /// Unknown or unsupported import/export/storage medium.
    #[error("unsupported medium: {0}")]
    UnsupportedMedium(String),

    /// Storage backend I/O or transport failure.
    #[error("storage error: {message}")]
    Storage {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (empty path, bad permission string, ambiguous remote lookup).
    #[error("configuration error: {0}")]
    Config(String),

    /// The passphrase handed to the cipher was empty.
    #[error("invalid passphrase -- passphrase cannot be empty")]
    InvalidPassphrase,

    /// The plaintext handed to the cipher was empty.
    #[error("invalid plaintext -- content cannot be empty")]
    InvalidPlaintext,

    /// The ciphertext handed to the cipher was empty.
    #[error("invalid ciphertext -- content cannot be empty")]
    InvalidCiphertext,

    /// A mutation could not be persisted.
    #[error("cannot save password database: {source}")]
    CannotSavePasswordDb { source: Box<PwmError> },

    /// JSON (de)serialization of the password database failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Import/export adapter failure.
    #[error("interchange error: {message}")]
    Interchange {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A backup with the same name already exists.
    #[error("backup already exists: {0}")]
    BackupExists(String),

    /// Clipboard access failed.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PwmError {
    /// Build a [`PwmError::Storage`] wrapping an underlying error.
    pub fn storage<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Build a [`PwmError::Interchange`] wrapping an underlying error.
    pub fn interchange<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Interchange {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
