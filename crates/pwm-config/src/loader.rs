// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports `./pwm.toml` > `~/.config/pwm/pwm.toml` with an optional explicit
//! file on top and environment variable overrides via the `PWM_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PwmConfig;

/// Environment variables under the `PWM_` prefix that are not config keys.
const NON_CONFIG_ENV_KEYS: &[&str] = &["MASTER_PASSWORD", "NEW_MASTER_PASSWORD"];

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `~/.config/pwm/pwm.toml` (user XDG config)
/// 3. `./pwm.toml` (local directory)
/// 4. `explicit` file, when given (`--config`)
/// 5. `PWM_*` environment variables
pub fn load_config(explicit: Option<&Path>) -> Result<PwmConfig, figment::Error> {
    build_figment(explicit).extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<PwmConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PwmConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment(explicit: Option<&Path>) -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(PwmConfig::default()))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("pwm/pwm.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("pwm.toml"));
    if let Some(path) = explicit {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Create the environment variable provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `PWM_STORAGE_DRIVE_TOKEN_FILE` must map to
/// `storage.drive.token_file`, not `storage.drive.token.file`.
fn env_provider() -> Env {
    Env::prefixed("PWM_")
        .ignore(NON_CONFIG_ENV_KEYS)
        .map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
pub fn map_env_key(key: &str) -> String {
    const SECTIONS: &[(&str, &str)] = &[
        ("storage_file_", "storage.file."),
        ("storage_drive_", "storage.drive."),
        ("storage_", "storage."),
        ("cipher_", "cipher."),
        ("cli_", "cli."),
    ];
    for (prefix, dotted) in SECTIONS {
        if let Some(rest) = key.strip_prefix(prefix) {
            return format!("{dotted}{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_nested_sections() {
        assert_eq!(map_env_key("storage_file_path"), "storage.file.path");
        assert_eq!(
            map_env_key("storage_drive_token_file"),
            "storage.drive.token_file"
        );
        assert_eq!(map_env_key("storage_backend"), "storage.backend");
        assert_eq!(map_env_key("cipher_kdf_memory_cost"), "cipher.kdf_memory_cost");
        assert_eq!(map_env_key("cli_select_list_size"), "cli.select_list_size");
        assert_eq!(map_env_key("log_level"), "log_level");
    }

    #[test]
    fn env_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("pwm.toml", "[storage.file]\npath = \"/from/file\"\n")?;
            jail.set_env("PWM_STORAGE_FILE_PATH", "/from/env");
            jail.set_env("PWM_MASTER_PASSWORD", "not-a-config-key");

            let config = load_config(None)?;
            assert_eq!(config.storage.file.path, "/from/env");
            Ok(())
        });
    }

    #[test]
    fn explicit_file_overrides_local_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("pwm.toml", "log_level = \"warn\"\n")?;
            jail.create_file("custom.toml", "log_level = \"debug\"\n")?;

            let config = load_config(Some(Path::new("custom.toml")))?;
            assert_eq!(config.log_level, "debug");
            Ok(())
        });
    }
}
