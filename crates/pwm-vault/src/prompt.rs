// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master password acquisition via TTY prompt or environment variables.

use pwm_core::PwmError;
use secrecy::SecretString;

/// The environment variable name for providing the master password.
pub const MASTER_PASSWORD_ENV_VAR: &str = "PWM_MASTER_PASSWORD";

/// The environment variable name for providing a new master password.
pub const NEW_MASTER_PASSWORD_ENV_VAR: &str = "PWM_NEW_MASTER_PASSWORD";

fn from_env(var: &str) -> Option<SecretString> {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}

fn read_hidden(prompt: &str) -> Result<String, PwmError> {
    eprint!("{prompt}");
    rpassword::read_password()
        .map_err(|e| PwmError::Internal(format!("failed to read password: {e}")))
}

fn no_tty_error(var: &str) -> PwmError {
    PwmError::Config(format!(
        "no master password provided -- pass --master-password, set {var} or run interactively"
    ))
}

/// Get the master password from `PWM_MASTER_PASSWORD` or an interactive
/// TTY prompt.
///
/// Returns an error if neither source is available.
pub fn get_master_password() -> Result<SecretString, PwmError> {
    if let Some(password) = from_env(MASTER_PASSWORD_ENV_VAR) {
        return Ok(password);
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let password = read_hidden("Master password: ")?;
        if password.is_empty() {
            return Err(PwmError::InvalidPassphrase);
        }
        return Ok(SecretString::from(password));
    }

    Err(no_tty_error(MASTER_PASSWORD_ENV_VAR))
}

/// Get a master password with a confirmation prompt, for vault creation
/// and re-keying.
///
/// `env_var` is consulted first and needs no confirmation.
pub fn get_master_password_with_confirm(env_var: &str) -> Result<SecretString, PwmError> {
    if let Some(password) = from_env(env_var) {
        return Ok(password);
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let first = read_hidden("New master password: ")?;
        let second = read_hidden("Confirm master password: ")?;

        if first != second {
            return Err(PwmError::Config("passwords do not match".to_string()));
        }
        if first.is_empty() {
            return Err(PwmError::InvalidPassphrase);
        }
        return Ok(SecretString::from(first));
    }

    Err(no_tty_error(env_var))
}
