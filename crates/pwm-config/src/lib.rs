// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the pwm password manager.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file lookup, `PWM_*` environment variable overrides, and miette
//! diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use pwm_config::load_and_validate;
//!
//! let config = load_and_validate(None).expect("config errors");
//! println!("database: {}", config.storage.file.path);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_str};
pub use model::{
    CipherConfig, CliConfig, DriveStorageConfig, FileStorageConfig, PwmConfig, StorageConfig,
};
pub use validation::parse_file_permission;

/// Load configuration from the file hierarchy and env, then validate it.
///
/// On a Figment error the TOML sources are re-read so diagnostics can point
/// at the offending line.
pub fn load_and_validate(explicit: Option<&Path>) -> Result<PwmConfig, Vec<ConfigError>> {
    match loader::load_config(explicit) {
        Ok(config) => {
            validation::validate_config(&config)?;
            tracing::debug!(
                backend = %config.storage.backend,
                cipher = %config.cipher.kind,
                "configuration loaded"
            );
            Ok(config)
        }
        Err(err) => {
            let toml_sources = collect_toml_sources(explicit);
            Err(diagnostic::figment_to_config_errors(err, &toml_sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<PwmConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_path(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

fn collect_toml_sources(explicit: Option<&Path>) -> Vec<(String, String)> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("pwm/pwm.toml"));
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join("pwm.toml"));
    }
    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
    }

    candidates
        .into_iter()
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
