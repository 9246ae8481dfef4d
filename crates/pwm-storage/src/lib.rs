// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage backends for the pwm password manager.
//!
//! Every backend implements [`pwm_core::StorageBackend`] and moves opaque
//! encrypted blobs; none of them ever sees plaintext. [`open_backend`] picks
//! the implementation named in configuration.

pub mod drive;
pub mod file;
pub mod memory;

use chrono::NaiveDate;
use pwm_config::StorageConfig;
use pwm_core::{PwmError, StorageBackend, StorageKind};

pub use drive::DriveStorage;
pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Construct the backend selected by `config.backend`.
pub fn open_backend(config: &StorageConfig) -> Result<Box<dyn StorageBackend>, PwmError> {
    let backend: Box<dyn StorageBackend> = match config.backend {
        StorageKind::File => Box::new(FileStorage::new(&config.file)?),
        StorageKind::Drive => Box::new(DriveStorage::new(&config.drive)?),
        StorageKind::Memory => Box::new(MemoryStorage::new()),
    };
    tracing::debug!(backend = backend.name(), "storage backend opened");
    Ok(backend)
}

/// Name of the backup taken on `date`: `<name>_backup_<YYYY-MM-DD>`.
pub fn backup_name(name: &str, date: NaiveDate) -> String {
    format!("{name}_backup_{}", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_name_appends_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(backup_name("passwordDB", date), "passwordDB_backup_2026-03-07");
    }

    #[test]
    fn memory_backend_is_selectable() {
        let config = StorageConfig {
            backend: StorageKind::Memory,
            ..StorageConfig::default()
        };
        assert_eq!(open_backend(&config).unwrap().name(), "memory");
    }

    #[test]
    fn file_backend_rejects_bad_permission() {
        let mut config = StorageConfig::default();
        config.file.permission = "0999".to_string();
        assert!(matches!(
            open_backend(&config).err(),
            Some(PwmError::Config(_))
        ));
    }
}
