// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random password generation.

use pwm_core::PwmError;
use rand::Rng;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;

/// Length used when the caller does not ask for one.
pub const DEFAULT_PASSWORD_LENGTH: usize = 12;

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

const CLASSES: [&[u8]; 4] = [LOWER, UPPER, DIGITS, SYMBOLS];

/// Generate a password of `length` characters containing at least one
/// lowercase letter, uppercase letter, digit and symbol.
pub fn generate_password(length: usize) -> Result<String, PwmError> {
    if length < CLASSES.len() {
        return Err(PwmError::Config(format!(
            "password length must be at least {}, got {length}",
            CLASSES.len()
        )));
    }

    let mut rng = OsRng;
    let alphabet: Vec<u8> = CLASSES.concat();

    let mut chars: Vec<u8> = CLASSES
        .iter()
        .map(|class| class[rng.gen_range(0..class.len())])
        .collect();
    chars.extend((CLASSES.len()..length).map(|_| alphabet[rng.gen_range(0..alphabet.len())]));
    chars.shuffle(&mut rng);

    Ok(chars.into_iter().map(char::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_length() {
        for length in [4, DEFAULT_PASSWORD_LENGTH, 64] {
            assert_eq!(generate_password(length).unwrap().len(), length);
        }
    }

    #[test]
    fn every_class_is_present() {
        for _ in 0..50 {
            let password = generate_password(4).unwrap();
            for class in CLASSES {
                assert!(
                    password.bytes().any(|b| class.contains(&b)),
                    "{password} lacks a class"
                );
            }
        }
    }

    #[test]
    fn short_lengths_are_rejected() {
        assert!(matches!(
            generate_password(3).unwrap_err(),
            PwmError::Config(_)
        ));
    }

    #[test]
    fn passwords_differ() {
        assert_ne!(generate_password(32).unwrap(), generate_password(32).unwrap());
    }
}
