// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase to key derivation.
//!
//! Two derivations are offered:
//!
//! - [`digest_key`]: a single unsalted SHA-256 of the passphrase. This is
//!   what existing vaults use. It is fast and cheap to brute-force offline.
//! - [`derive_key`]: Argon2id (Algorithm::Argon2id, Version::V0x13) over the
//!   passphrase and a random salt, with parameters from `[cipher]` config.

use pwm_core::PwmError;
use ring::digest::{SHA256, digest};
use zeroize::Zeroizing;

use crate::crypto::random_bytes;

/// Derive a 32-byte key as the SHA-256 digest of `passphrase`.
pub fn digest_key(passphrase: &[u8]) -> Zeroizing<[u8; 32]> {
    let mut key = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(digest(&SHA256, passphrase).as_ref());
    key
}

/// Derive a 32-byte key from passphrase using Argon2id.
///
/// The returned key is wrapped in [`Zeroizing`] for automatic memory zeroing
/// on drop.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8; 16],
    memory_cost: u32,
    iterations: u32,
    parallelism: u32,
) -> Result<Zeroizing<[u8; 32]>, PwmError> {
    let params = argon2::Params::new(memory_cost, iterations, parallelism, Some(32))
        .map_err(|e| PwmError::Config(format!("invalid Argon2id parameters: {e}")))?;

    let argon2 = argon2::Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut output = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(passphrase, salt, output.as_mut())
        .map_err(|e| PwmError::Internal(format!("Argon2id key derivation failed: {e}")))?;

    Ok(output)
}

/// Generate a random 16-byte salt for Argon2id.
pub fn generate_salt() -> Result<[u8; 16], PwmError> {
    random_bytes::<16>()
}
