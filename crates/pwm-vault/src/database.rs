// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The decrypted password database and its label index.

use std::collections::{BTreeMap, BTreeSet};

use pwm_core::{Entry, ImportExportEntry, PwmError};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// All entries plus the label index, serialized as one JSON document.
///
/// `labels` is a secondary index from label name to entry IDs. It may hold
/// duplicate IDs, and vaults written by older tools may hold IDs with no
/// entry; readers deduplicate and skip those.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub entries: BTreeMap<String, Entry>,
    #[serde(default)]
    pub labels: BTreeMap<String, Vec<String>>,
}

impl Database {
    pub fn from_json(bytes: &[u8]) -> Result<Self, PwmError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, PwmError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a new entry and register it under each label.
    pub fn insert(&mut self, entry: Entry, labels: &[String]) -> Result<(), PwmError> {
        if entry.id.is_empty() {
            return Err(PwmError::EmptyId);
        }
        if self.entries.contains_key(&entry.id) {
            return Err(PwmError::DuplicateId(entry.id));
        }
        for label in labels {
            self.labels
                .entry(label.clone())
                .or_default()
                .push(entry.id.clone());
        }
        self.entries.insert(entry.id.clone(), entry);
        Ok(())
    }

    /// Delete an entry and prune it from the label index, dropping labels
    /// left with no IDs.
    pub fn remove(&mut self, id: &str) -> Result<Entry, PwmError> {
        let entry = self
            .entries
            .remove(id)
            .ok_or_else(|| PwmError::InvalidId(id.to_string()))?;
        self.labels.retain(|_, ids| {
            ids.retain(|candidate| candidate != id);
            !ids.is_empty()
        });
        Ok(entry)
    }

    pub fn get(&self, id: &str) -> Result<&Entry, PwmError> {
        if self.is_empty() {
            return Err(PwmError::NoPasswordsAvailable);
        }
        self.entries
            .get(id)
            .ok_or_else(|| PwmError::InvalidId(id.to_string()))
    }

    /// Entries whose ID contains `needle`, ordered by ID.
    pub fn search_ids(&self, needle: &str) -> Vec<Entry> {
        self.entries
            .values()
            .filter(|entry| entry.id.contains(needle))
            .cloned()
            .collect()
    }

    /// Entries referenced by any label whose name contains `needle`,
    /// deduplicated and ordered by ID.
    pub fn search_labels(&self, needle: &str) -> Vec<Entry> {
        let ids: BTreeSet<&str> = self
            .labels
            .iter()
            .filter(|(label, _)| label.contains(needle))
            .flat_map(|(_, ids)| ids.iter().map(String::as_str))
            .collect();

        ids.into_iter()
            .filter_map(|id| {
                let entry = self.entries.get(id);
                if entry.is_none() {
                    warn!(id, "label index references a missing entry, skipping");
                }
                entry.cloned()
            })
            .collect()
    }

    /// Labels that reference `id`, sorted.
    pub fn labels_for(&self, id: &str) -> Vec<String> {
        self.labels
            .iter()
            .filter(|(_, ids)| ids.iter().any(|candidate| candidate == id))
            .map(|(label, _)| label.clone())
            .collect()
    }

    /// Flat rows for exporters, ordered by ID.
    pub fn rows(&self) -> Vec<ImportExportEntry> {
        self.entries
            .values()
            .map(|entry| ImportExportEntry {
                entry: entry.clone(),
                labels: self.labels_for(&entry.id),
            })
            .collect()
    }
}
