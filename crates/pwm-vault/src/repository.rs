// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The encrypted repository engine.
//!
//! A [`Repository`] pairs a decrypted [`Database`] with the cipher, master
//! password and storage backend needed to write it back. Every mutation is
//! applied to a clone of the database, which is serialized, encrypted and
//! stored as a whole; the live database is replaced only once the backend
//! accepted the new blob. In-memory state therefore never runs ahead of
//! what is persisted.

use std::io::Write;

use pwm_core::{Cipher, Clipboard, Entry, MediumKind, PwmError, StorageBackend};
use pwm_interchange::{InterchangeConfig, exporter_for, importer_for};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use crate::database::Database;

/// A loaded, decrypted password repository.
pub struct Repository {
    cipher: Box<dyn Cipher>,
    storage: Box<dyn StorageBackend>,
    master_password: SecretString,
    db: Database,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("storage", &self.storage.name())
            .field("master_password", &"[REDACTED]")
            .field("entries", &self.db.entries.len())
            .field("labels", &self.db.labels.len())
            .finish()
    }
}

fn seal(cipher: &dyn Cipher, db: &Database, passphrase: &str) -> Result<Vec<u8>, PwmError> {
    let json = db.to_json()?;
    cipher.encrypt(&json, passphrase)
}

fn output_error(e: std::io::Error) -> PwmError {
    PwmError::Internal(format!("cannot write output: {e}"))
}

impl Repository {
    /// Create a new, empty repository on `storage`.
    ///
    /// Fails with [`PwmError::AlreadyInitialized`] when the backend already
    /// holds a vault.
    pub async fn init_repo(
        storage: Box<dyn StorageBackend>,
        cipher: Box<dyn Cipher>,
        master_password: SecretString,
    ) -> Result<Self, PwmError> {
        let db = Database::default();
        let blob = seal(cipher.as_ref(), &db, master_password.expose_secret())?;
        storage.init_for_first_time(&blob).await?;

        info!(backend = storage.name(), "password repository initialized");
        Ok(Self {
            cipher,
            storage,
            master_password,
            db,
        })
    }

    /// Load and decrypt the repository held by `storage`.
    pub async fn load_repo(
        storage: Box<dyn StorageBackend>,
        cipher: Box<dyn Cipher>,
        master_password: SecretString,
    ) -> Result<Self, PwmError> {
        let blob = storage.load().await?;
        if blob.is_empty() {
            return Err(PwmError::NotInitialized);
        }
        let plaintext = cipher.decrypt(&blob, master_password.expose_secret())?;
        let db = Database::from_json(&plaintext)?;

        debug!(
            backend = storage.name(),
            bytes = blob.len(),
            entries = db.entries.len(),
            "password repository loaded"
        );
        Ok(Self {
            cipher,
            storage,
            master_password,
            db,
        })
    }

    /// Encrypt and store `shadow`, then make it the live database.
    async fn commit(&mut self, shadow: Database) -> Result<(), PwmError> {
        let save_error = |source: PwmError| PwmError::CannotSavePasswordDb {
            source: Box::new(source),
        };

        let blob = seal(
            self.cipher.as_ref(),
            &shadow,
            self.master_password.expose_secret(),
        )
        .map_err(save_error)?;
        self.storage.store(&blob).await.map_err(save_error)?;

        debug!(
            bytes = blob.len(),
            entries = shadow.entries.len(),
            "password repository stored"
        );
        self.db = shadow;
        Ok(())
    }

    fn ensure_not_empty(&self) -> Result<(), PwmError> {
        if self.db.is_empty() {
            return Err(PwmError::NoPasswordsAvailable);
        }
        Ok(())
    }

    /// Add a new entry and register it under `labels`.
    pub async fn add(
        &mut self,
        id: &str,
        username: &str,
        password: &str,
        description: &str,
        labels: &[String],
    ) -> Result<(), PwmError> {
        let mut shadow = self.db.clone();
        shadow.insert(Entry::new(id, username, password, description), labels)?;
        self.commit(shadow).await?;
        debug!(id, labels = labels.len(), "entry added");
        Ok(())
    }

    /// Return a copy of the entry stored under `id`.
    pub fn get_password_entry(&self, id: &str) -> Result<Entry, PwmError> {
        self.db.get(id).cloned()
    }

    /// Print the username of `id` to `out` and hand over the password.
    ///
    /// With `show_password` the password is printed as well; otherwise it is
    /// placed on `clipboard` and never written to `out`.
    pub fn get_username_password(
        &self,
        id: &str,
        show_password: bool,
        clipboard: &mut dyn Clipboard,
        out: &mut dyn Write,
    ) -> Result<(), PwmError> {
        let entry = self.db.get(id)?;
        writeln!(out, "Username: {}", entry.username).map_err(output_error)?;
        if show_password {
            writeln!(out, "Password: {}", entry.password).map_err(output_error)?;
        } else {
            clipboard.set_text(&entry.password)?;
            writeln!(out, "Password copied to the clipboard").map_err(output_error)?;
        }
        Ok(())
    }

    /// Replace the entry stored under `id`, creating it when absent.
    ///
    /// The stored entry's ID is always `id`, whatever `entry.id` says.
    /// Labels are left untouched.
    pub async fn change_password_entry(&mut self, id: &str, entry: Entry) -> Result<(), PwmError> {
        self.ensure_not_empty()?;
        let mut shadow = self.db.clone();
        shadow.entries.insert(
            id.to_string(),
            Entry {
                id: id.to_string(),
                ..entry
            },
        );
        self.commit(shadow).await?;
        debug!(id, "entry changed");
        Ok(())
    }

    /// Re-encrypt the whole database under `new_password`.
    ///
    /// The in-memory passphrase changes only after the new blob is stored.
    pub async fn change_master_password(&mut self, new_password: SecretString) -> Result<(), PwmError> {
        if new_password.expose_secret().is_empty() {
            return Err(PwmError::InvalidPassphrase);
        }
        let blob = seal(self.cipher.as_ref(), &self.db, new_password.expose_secret())
            .map_err(|source| PwmError::CannotSavePasswordDb {
                source: Box::new(source),
            })?;
        self.storage
            .store(&blob)
            .await
            .map_err(|source| PwmError::CannotSavePasswordDb {
                source: Box::new(source),
            })?;

        self.master_password = new_password;
        info!(backend = self.storage.name(), "master password changed");
        Ok(())
    }

    /// Delete the entry stored under `id`.
    pub async fn remove(&mut self, id: &str) -> Result<(), PwmError> {
        self.ensure_not_empty()?;
        let mut shadow = self.db.clone();
        shadow.remove(id)?;
        self.commit(shadow).await?;
        debug!(id, "entry removed");
        Ok(())
    }

    /// Entries whose ID contains `needle`, ordered by ID.
    ///
    /// An empty needle returns every entry. Finding nothing is an error.
    pub fn search_entries_by_id(&self, needle: &str) -> Result<Vec<Entry>, PwmError> {
        self.ensure_not_empty()?;
        let found = self.db.search_ids(needle);
        if found.is_empty() {
            return Err(PwmError::NoMatch(needle.to_string()));
        }
        Ok(found)
    }

    /// Entries carrying a label whose name contains `needle`, ordered by ID.
    ///
    /// Unlike [`Self::search_entries_by_id`], finding nothing is not an
    /// error.
    pub fn search_label(&self, needle: &str) -> Result<Vec<Entry>, PwmError> {
        self.ensure_not_empty()?;
        Ok(self.db.search_labels(needle))
    }

    /// Labels that reference `id`, sorted.
    pub fn labels_for_id(&self, id: &str) -> Vec<String> {
        self.db.labels_for(id)
    }

    /// Every entry ID, sorted.
    pub fn list_ids(&self) -> Vec<String> {
        self.db.entries.keys().cloned().collect()
    }

    /// Import every row from `medium` in one persisted step.
    ///
    /// An empty or duplicate ID anywhere in the input aborts the import
    /// before anything is stored. Returns the number of imported entries.
    pub async fn import(
        &mut self,
        medium: MediumKind,
        config: &InterchangeConfig,
    ) -> Result<usize, PwmError> {
        let importer = importer_for(medium, config)?;
        let rows = importer.import()?;

        let mut shadow = self.db.clone();
        for row in &rows {
            shadow.insert(row.entry.clone(), &row.labels)?;
        }
        self.commit(shadow).await?;

        info!(%medium, path = %config.path.display(), entries = rows.len(), "entries imported");
        Ok(rows.len())
    }

    /// Export every entry with its labels to `medium`. Returns the number of
    /// exported entries.
    pub fn export(&self, medium: MediumKind, config: &InterchangeConfig) -> Result<usize, PwmError> {
        let exporter = exporter_for(medium, config)?;
        let rows = self.db.rows();
        exporter.export(&rows)?;
        Ok(rows.len())
    }

    /// Name of the backend holding this repository.
    pub fn storage_name(&self) -> &str {
        self.storage.name()
    }
}
