// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted password repository engine for the pwm password manager.
//!
//! The whole database (entries plus label index) is serialized to JSON and
//! sealed with AES-256-GCM under a key derived from the master password.
//! Storage backends only ever see the sealed blob.

pub mod cipher;
pub mod clipboard;
pub mod crypto;
pub mod database;
pub mod generator;
pub mod kdf;
pub mod prompt;
pub mod repository;

pub use cipher::{AesGcmCipher, Argon2AesGcmCipher, cipher_for};
pub use clipboard::SystemClipboard;
pub use database::Database;
pub use generator::{DEFAULT_PASSWORD_LENGTH, generate_password};
pub use prompt::{get_master_password, get_master_password_with_confirm};
pub use repository::Repository;
