// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase-based ciphers for the vault blob.
//!
//! Blob layouts:
//!
//! - [`AesGcmCipher`]: `nonce(12) || ciphertext || tag(16)`
//! - [`Argon2AesGcmCipher`]: `salt(16) || nonce(12) || ciphertext || tag(16)`

use pwm_config::CipherConfig;
use pwm_core::{Cipher, CipherKind, PwmError};

use crate::crypto;
use crate::kdf;

const SALT_LEN: usize = 16;

fn check_passphrase(passphrase: &str) -> Result<(), PwmError> {
    if passphrase.is_empty() {
        return Err(PwmError::InvalidPassphrase);
    }
    Ok(())
}

/// AES-256-GCM keyed by the SHA-256 digest of the passphrase.
///
/// The key derivation is a single fast hash with no salt. See
/// [`kdf::digest_key`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AesGcmCipher;

impl Cipher for AesGcmCipher {
    fn encrypt(&self, plaintext: &[u8], passphrase: &str) -> Result<Vec<u8>, PwmError> {
        check_passphrase(passphrase)?;
        if plaintext.is_empty() {
            return Err(PwmError::InvalidPlaintext);
        }
        let key = kdf::digest_key(passphrase.as_bytes());
        crypto::seal(&key, plaintext)
    }

    fn decrypt(&self, ciphertext: &[u8], passphrase: &str) -> Result<Vec<u8>, PwmError> {
        check_passphrase(passphrase)?;
        if ciphertext.is_empty() {
            return Err(PwmError::InvalidCiphertext);
        }
        let key = kdf::digest_key(passphrase.as_bytes());
        crypto::open(&key, ciphertext)
    }
}

/// AES-256-GCM keyed by Argon2id over the passphrase and a per-blob salt.
#[derive(Debug, Clone, Copy)]
pub struct Argon2AesGcmCipher {
    memory_cost: u32,
    iterations: u32,
    parallelism: u32,
}

impl Argon2AesGcmCipher {
    pub fn new(config: &CipherConfig) -> Self {
        Self {
            memory_cost: config.kdf_memory_cost,
            iterations: config.kdf_iterations,
            parallelism: config.kdf_parallelism,
        }
    }

    fn key(&self, passphrase: &str, salt: &[u8; SALT_LEN]) -> Result<zeroize::Zeroizing<[u8; 32]>, PwmError> {
        kdf::derive_key(
            passphrase.as_bytes(),
            salt,
            self.memory_cost,
            self.iterations,
            self.parallelism,
        )
    }
}

impl Cipher for Argon2AesGcmCipher {
    fn encrypt(&self, plaintext: &[u8], passphrase: &str) -> Result<Vec<u8>, PwmError> {
        check_passphrase(passphrase)?;
        if plaintext.is_empty() {
            return Err(PwmError::InvalidPlaintext);
        }
        let salt = kdf::generate_salt()?;
        let key = self.key(passphrase, &salt)?;
        let sealed = crypto::seal(&key, plaintext)?;

        let mut out = Vec::with_capacity(SALT_LEN + sealed.len());
        out.extend_from_slice(&salt);
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    fn decrypt(&self, ciphertext: &[u8], passphrase: &str) -> Result<Vec<u8>, PwmError> {
        check_passphrase(passphrase)?;
        if ciphertext.is_empty() {
            return Err(PwmError::InvalidCiphertext);
        }
        if ciphertext.len() < SALT_LEN + crypto::MIN_SEALED_LEN {
            return Err(PwmError::AuthenticationFailed);
        }
        let (salt, sealed) = ciphertext.split_at(SALT_LEN);
        let salt: [u8; SALT_LEN] = salt
            .try_into()
            .map_err(|_| PwmError::AuthenticationFailed)?;
        let key = self.key(passphrase, &salt)?;
        crypto::open(&key, sealed)
    }
}

/// Build the cipher selected in configuration.
pub fn cipher_for(kind: CipherKind, config: &CipherConfig) -> Box<dyn Cipher> {
    match kind {
        CipherKind::AesGcm => Box::new(AesGcmCipher),
        CipherKind::AesGcmArgon2 => Box::new(Argon2AesGcmCipher::new(config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fast_argon2() -> Argon2AesGcmCipher {
        Argon2AesGcmCipher {
            memory_cost: 8,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let cipher = AesGcmCipher;
        assert!(matches!(
            cipher.encrypt(b"x", "").unwrap_err(),
            PwmError::InvalidPassphrase
        ));
        assert!(matches!(
            cipher.encrypt(b"", "p").unwrap_err(),
            PwmError::InvalidPlaintext
        ));
        assert!(matches!(
            cipher.decrypt(b"x", "").unwrap_err(),
            PwmError::InvalidPassphrase
        ));
        assert!(matches!(
            cipher.decrypt(b"", "p").unwrap_err(),
            PwmError::InvalidCiphertext
        ));
    }

    #[test]
    fn short_ciphertext_is_an_authentication_failure() {
        assert!(matches!(
            AesGcmCipher.decrypt(&[7u8; 10], "p").unwrap_err(),
            PwmError::AuthenticationFailed
        ));
        assert!(matches!(
            fast_argon2().decrypt(&[7u8; 20], "p").unwrap_err(),
            PwmError::AuthenticationFailed
        ));
    }

    #[test]
    fn argon2_blob_carries_salt_prefix() {
        let cipher = fast_argon2();
        let a = cipher.encrypt(b"data", "pass").unwrap();
        let b = cipher.encrypt(b"data", "pass").unwrap();
        assert_eq!(a.len(), SALT_LEN + crypto::MIN_SEALED_LEN + 4);
        assert_ne!(a[..SALT_LEN], b[..SALT_LEN]);
        assert_eq!(cipher.decrypt(&a, "pass").unwrap(), b"data");
        assert!(matches!(
            cipher.decrypt(&a, "other").unwrap_err(),
            PwmError::AuthenticationFailed
        ));
    }

    #[test]
    fn ciphers_do_not_read_each_others_blobs() {
        let blob = AesGcmCipher.encrypt(b"data", "pass").unwrap();
        assert!(fast_argon2().decrypt(&blob, "pass").is_err());
    }

    #[test]
    fn cipher_for_selects_by_kind() {
        let config = CipherConfig::default();
        let cipher = cipher_for(CipherKind::AesGcm, &config);
        let blob = cipher.encrypt(b"x", "p").unwrap();
        assert_eq!(AesGcmCipher.decrypt(&blob, "p").unwrap(), b"x");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn decrypt_inverts_encrypt(
            plaintext in proptest::collection::vec(any::<u8>(), 1..512),
            passphrase in ".{1,40}",
        ) {
            let blob = AesGcmCipher.encrypt(&plaintext, &passphrase).unwrap();
            prop_assert_eq!(AesGcmCipher.decrypt(&blob, &passphrase).unwrap(), plaintext);
        }

        #[test]
        fn wrong_passphrase_fails_authentication(
            plaintext in proptest::collection::vec(any::<u8>(), 1..256),
            p1 in "[a-z]{1,20}",
            p2 in "[A-Z]{1,20}",
        ) {
            let blob = AesGcmCipher.encrypt(&plaintext, &p1).unwrap();
            prop_assert!(matches!(
                AesGcmCipher.decrypt(&blob, &p2),
                Err(PwmError::AuthenticationFailed)
            ));
        }

        #[test]
        fn any_bit_flip_fails_authentication(
            plaintext in proptest::collection::vec(any::<u8>(), 1..128),
            bit in any::<proptest::sample::Index>(),
        ) {
            let mut blob = AesGcmCipher.encrypt(&plaintext, "master1").unwrap();
            let position = bit.index(blob.len() * 8);
            blob[position / 8] ^= 1 << (position % 8);
            prop_assert!(matches!(
                AesGcmCipher.decrypt(&blob, "master1"),
                Err(PwmError::AuthenticationFailed)
            ));
        }
    }
}
