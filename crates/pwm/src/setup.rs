// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repository lifecycle commands: `pwm init`, `pwm change-master-password`,
//! and the shared helper that opens an existing repository.

use std::io::Write;

use pwm_config::PwmConfig;
use pwm_core::PwmError;
use pwm_storage::open_backend;
use pwm_vault::prompt::{MASTER_PASSWORD_ENV_VAR, NEW_MASTER_PASSWORD_ENV_VAR};
use pwm_vault::{Repository, cipher_for, get_master_password, get_master_password_with_confirm};
use secrecy::SecretString;

/// Use the `--master-password` flag when given, otherwise ask.
pub fn master_password(flag: Option<&str>) -> Result<SecretString, PwmError> {
    match flag {
        Some(password) if !password.is_empty() => Ok(SecretString::from(password.to_string())),
        _ => get_master_password(),
    }
}

/// Open and decrypt the configured repository.
pub async fn open_repository(
    config: &PwmConfig,
    master_password: SecretString,
) -> Result<Repository, PwmError> {
    let storage = open_backend(&config.storage)?;
    let cipher = cipher_for(config.cipher.kind, &config.cipher);
    Repository::load_repo(storage, cipher, master_password).await
}

/// Run `pwm init`.
pub async fn run_init(
    config: &PwmConfig,
    flag: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), PwmError> {
    let password = match flag {
        Some(password) if !password.is_empty() => SecretString::from(password.to_string()),
        _ => get_master_password_with_confirm(MASTER_PASSWORD_ENV_VAR)?,
    };

    let storage = open_backend(&config.storage)?;
    let cipher = cipher_for(config.cipher.kind, &config.cipher);
    let repo = Repository::init_repo(storage, cipher, password).await?;

    writeln!(
        out,
        "Initialized an empty password repository ({} backend)",
        repo.storage_name()
    )
    .map_err(crate::output_error)
}

/// Run `pwm change-master-password`.
pub async fn run_change_master_password(
    repo: &mut Repository,
    new_flag: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), PwmError> {
    let new_password = match new_flag {
        Some(password) if !password.is_empty() => SecretString::from(password.to_string()),
        _ => get_master_password_with_confirm(NEW_MASTER_PASSWORD_ENV_VAR)?,
    };
    repo.change_master_password(new_password).await?;
    writeln!(out, "Master password changed").map_err(crate::output_error)
}
