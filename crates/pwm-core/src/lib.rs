// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the pwm password manager.
//!
//! This crate provides the error taxonomy, the shared entry types, and the
//! capability traits that ciphers, storage backends, interchange adapters
//! and clipboards implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PwmError;
pub use types::{CipherKind, Entry, ImportExportEntry, MediumKind, StorageKind};

pub use traits::{Cipher, Clipboard, Exporter, Importer, StorageBackend};
