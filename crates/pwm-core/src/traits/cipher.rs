// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Symmetric authenticated encryption of opaque blobs under a passphrase.

use crate::error::PwmError;

/// Passphrase-keyed AEAD cipher.
///
/// Implementations must fail closed: a wrong passphrase or any modification
/// of the ciphertext yields [`PwmError::AuthenticationFailed`] and no
/// plaintext.
pub trait Cipher: Send + Sync {
    /// Encrypts `plaintext` under a key derived from `passphrase`.
    ///
    /// Fails with [`PwmError::InvalidPassphrase`] or
    /// [`PwmError::InvalidPlaintext`] when either input is empty.
    fn encrypt(&self, plaintext: &[u8], passphrase: &str) -> Result<Vec<u8>, PwmError>;

    /// Decrypts a blob produced by [`Cipher::encrypt`].
    ///
    /// Fails with [`PwmError::InvalidPassphrase`] or
    /// [`PwmError::InvalidCiphertext`] when either input is empty.
    fn decrypt(&self, ciphertext: &[u8], passphrase: &str) -> Result<Vec<u8>, PwmError>;
}
