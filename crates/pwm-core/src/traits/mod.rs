// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits implemented by ciphers, storage backends, interchange
//! adapters and clipboards.

pub mod cipher;
pub mod clipboard;
pub mod interchange;
pub mod storage;

pub use cipher::Cipher;
pub use clipboard::Clipboard;
pub use interchange::{Exporter, Importer};
pub use storage::StorageBackend;
