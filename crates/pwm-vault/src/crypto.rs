// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the system
//! CSPRNG and prepends it to the output. Nonce reuse would be catastrophic for
//! GCM security.

use pwm_core::PwmError;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};

/// Length of the GCM authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Smallest well-formed sealed blob: a nonce and an empty-message tag.
pub const MIN_SEALED_LEN: usize = NONCE_LEN + TAG_LEN;

fn key(key: &[u8; 32]) -> Result<LessSafeKey, PwmError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| PwmError::Internal("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Fill a buffer of `N` bytes from the system CSPRNG.
pub fn random_bytes<const N: usize>() -> Result<[u8; N], PwmError> {
    let mut bytes = [0u8; N];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| PwmError::Internal("system random source failed".to_string()))?;
    Ok(bytes)
}

/// Encrypt plaintext with AES-256-GCM under a random nonce.
///
/// Returns `nonce || ciphertext || tag`.
pub fn seal(key_bytes: &[u8; 32], plaintext: &[u8]) -> Result<Vec<u8>, PwmError> {
    let sealing_key = key(key_bytes)?;
    let nonce_bytes = random_bytes::<NONCE_LEN>()?;

    // Seal in place: plaintext buffer is extended with the authentication tag.
    let mut in_out = plaintext.to_vec();
    sealing_key
        .seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::empty(),
            &mut in_out,
        )
        .map_err(|_| PwmError::Internal("AES-256-GCM encryption failed".to_string()))?;

    let mut out = Vec::with_capacity(NONCE_LEN + in_out.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&in_out);
    Ok(out)
}

/// Decrypt a `nonce || ciphertext || tag` blob produced by [`seal`].
///
/// Truncated input, a wrong key and tampered bytes all fail the same way,
/// with [`PwmError::AuthenticationFailed`].
pub fn open(key_bytes: &[u8; 32], sealed: &[u8]) -> Result<Vec<u8>, PwmError> {
    if sealed.len() < MIN_SEALED_LEN {
        return Err(PwmError::AuthenticationFailed);
    }
    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
    let nonce =
        Nonce::try_assume_unique_for_key(nonce_bytes).map_err(|_| PwmError::AuthenticationFailed)?;

    let opening_key = key(key_bytes)?;
    let mut in_out = ciphertext.to_vec();
    let plaintext = opening_key
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| PwmError::AuthenticationFailed)?;

    Ok(plaintext.to_vec())
}
