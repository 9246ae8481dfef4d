// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory storage backend.
//!
//! Clones share the same underlying blob, so a test can hand one clone to a
//! repository and inspect or reopen through another. Never persists across
//! process restarts.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use pwm_core::{PwmError, StorageBackend};

#[derive(Debug, Default)]
struct Shared {
    blob: Mutex<Vec<u8>>,
    backups: Mutex<BTreeMap<String, Vec<u8>>>,
    fail_stores: AtomicBool,
}

/// Storage backend holding the encrypted vault in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    shared: Arc<Shared>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `store` fail with a storage error.
    ///
    /// Used to exercise rollback paths in the repository engine.
    pub fn set_fail_stores(&self, fail: bool) {
        self.shared.fail_stores.store(fail, Ordering::SeqCst);
    }

    /// Current raw blob.
    pub fn snapshot(&self) -> Result<Vec<u8>, PwmError> {
        Ok(lock(&self.shared.blob)?.clone())
    }

    /// Names of the backups taken so far.
    pub fn backup_names(&self) -> Result<Vec<String>, PwmError> {
        Ok(lock(&self.shared.backups)?.keys().cloned().collect())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, PwmError> {
    mutex
        .lock()
        .map_err(|_| PwmError::Internal("memory storage lock poisoned".to_string()))
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    async fn init_for_first_time(&self, initial: &[u8]) -> Result<(), PwmError> {
        let mut blob = lock(&self.shared.blob)?;
        if !blob.is_empty() {
            return Err(PwmError::AlreadyInitialized);
        }
        *blob = initial.to_vec();
        Ok(())
    }

    async fn load(&self) -> Result<Vec<u8>, PwmError> {
        self.snapshot()
    }

    async fn store(&self, blob: &[u8]) -> Result<(), PwmError> {
        if self.shared.fail_stores.load(Ordering::SeqCst) {
            return Err(PwmError::Storage {
                message: "memory storage is configured to fail writes".to_string(),
                source: None,
            });
        }
        *lock(&self.shared.blob)? = blob.to_vec();
        Ok(())
    }

    async fn backup(&self) -> Result<String, PwmError> {
        let blob = self.snapshot()?;
        if blob.is_empty() {
            return Err(PwmError::NotInitialized);
        }
        let name = crate::backup_name("memory", chrono::Local::now().date_naive());
        let mut backups = lock(&self.shared.backups)?;
        if backups.contains_key(&name) {
            return Err(PwmError::BackupExists(name));
        }
        backups.insert(name.clone(), blob);
        Ok(name)
    }
}
