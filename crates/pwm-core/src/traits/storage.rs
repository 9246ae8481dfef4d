// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage backend trait for durable blob persistence (local file, remote object store).

use async_trait::async_trait;

use crate::error::PwmError;

/// Durable storage for the encrypted password database blob.
///
/// Constructing a backend from its configuration is the "init" step and
/// validates the configuration. Every `store` rewrites the whole blob.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Returns the backend identifier used in log output.
    fn name(&self) -> &str;

    /// Creates the backing object with `initial` as its content.
    ///
    /// Fails with [`PwmError::AlreadyInitialized`] if the object already
    /// holds data. Never overwrites an existing vault.
    async fn init_for_first_time(&self, initial: &[u8]) -> Result<(), PwmError>;

    /// Returns the raw (still encrypted) bytes. A missing object yields an
    /// empty vector.
    async fn load(&self) -> Result<Vec<u8>, PwmError>;

    /// Overwrites the backing object with `blob` in full.
    async fn store(&self, blob: &[u8]) -> Result<(), PwmError>;

    /// Copies the current blob to a dated backup next to it and returns the
    /// backup location. Refuses to overwrite an existing same-day backup.
    async fn backup(&self) -> Result<String, PwmError>;
}
