// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty paths and the octal file permission format.

use std::sync::LazyLock;

use pwm_core::{CipherKind, StorageKind};
use regex::Regex;

use crate::diagnostic::ConfigError;
use crate::model::PwmConfig;

/// Accepted file permission strings: a 4-digit octal mode whose leading
/// digit is one of 0, 2, 4, 6.
static FILE_PERMISSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0246][0-7]{3}$").expect("static regex is valid"));

/// Parse a 4-digit octal permission string such as `0640` into a mode.
///
/// Returns a validation error for anything not matching
/// `[0,2,4,6][0-7][0-7][0-7]`.
pub fn parse_file_permission(permission: &str) -> Result<u32, ConfigError> {
    if !FILE_PERMISSION_PATTERN.is_match(permission) {
        return Err(ConfigError::Validation {
            message: format!(
                "storage.file.permission `{permission}` must be 4 octal digits starting with 0, 2, 4 or 6 (e.g. 0640)"
            ),
        });
    }
    u32::from_str_radix(permission, 8).map_err(|e| ConfigError::Validation {
        message: format!("storage.file.permission `{permission}` is not octal: {e}"),
    })
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &PwmConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.backend == StorageKind::File {
        if config.storage.file.path.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "storage.file.path must not be empty".to_string(),
            });
        }
        // Blank falls back to the backend default.
        let permission = &config.storage.file.permission;
        if !permission.trim().is_empty() {
            if let Err(e) = parse_file_permission(permission) {
                errors.push(e);
            }
        }
    }

    if config.storage.backend == StorageKind::Drive {
        let drive = &config.storage.drive;
        for (key, value) in [
            ("directory", &drive.directory),
            ("db_file", &drive.db_file),
            ("token_file", &drive.token_file),
            ("api_base", &drive.api_base),
            ("upload_base", &drive.upload_base),
        ] {
            if value.trim().is_empty() {
                errors.push(ConfigError::Validation {
                    message: format!("storage.drive.{key} must not be empty"),
                });
            }
        }
    }

    if config.cipher.kind == CipherKind::AesGcmArgon2 {
        if config.cipher.kdf_memory_cost < 32768 {
            errors.push(ConfigError::Validation {
                message: format!(
                    "cipher.kdf_memory_cost must be at least 32768 (32 MiB), got {}",
                    config.cipher.kdf_memory_cost
                ),
            });
        }
        if config.cipher.kdf_iterations < 2 {
            errors.push(ConfigError::Validation {
                message: format!(
                    "cipher.kdf_iterations must be at least 2, got {}",
                    config.cipher.kdf_iterations
                ),
            });
        }
        if config.cipher.kdf_parallelism < 1 {
            errors.push(ConfigError::Validation {
                message: format!(
                    "cipher.kdf_parallelism must be at least 1, got {}",
                    config.cipher.kdf_parallelism
                ),
            });
        }
    }

    if config.cli.select_list_size == 0 {
        errors.push(ConfigError::Validation {
            message: "cli.select_list_size must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&PwmConfig::default()).is_ok());
    }

    #[test]
    fn permission_parses_as_octal() {
        assert_eq!(parse_file_permission("0640").unwrap(), 0o640);
        assert_eq!(parse_file_permission("0600").unwrap(), 0o600);
        assert_eq!(parse_file_permission("2755").unwrap(), 0o2755);
    }

    #[test]
    fn invalid_permissions_are_rejected() {
        for bad in ["640", "1640", "0680", "06400", "rw-r", ""] {
            assert!(parse_file_permission(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn empty_file_path_fails_validation() {
        let mut config = PwmConfig::default();
        config.storage.file.path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "storage.file.path"));
    }

    #[test]
    fn bad_permission_fails_validation() {
        let mut config = PwmConfig::default();
        config.storage.file.permission = "0999".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "storage.file.permission"));
    }

    #[test]
    fn file_settings_are_ignored_for_drive_backend() {
        let mut config = PwmConfig::default();
        config.storage.backend = StorageKind::Drive;
        config.storage.file.path = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_drive_token_file_fails_validation() {
        let mut config = PwmConfig::default();
        config.storage.backend = StorageKind::Drive;
        config.storage.drive.token_file = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "storage.drive.token_file"));
    }

    #[test]
    fn weak_argon2_parameters_fail_only_when_selected() {
        let mut config = PwmConfig::default();
        config.cipher.kdf_memory_cost = 1024;
        config.cipher.kdf_iterations = 1;
        assert!(validate_config(&config).is_ok());

        config.cipher.kind = CipherKind::AesGcmArgon2;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "kdf_memory_cost"));
        assert!(has_message(&errors, "kdf_iterations"));
    }

    #[test]
    fn zero_select_list_size_fails_validation() {
        let mut config = PwmConfig::default();
        config.cli.select_list_size = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "select_list_size"));
    }
}
