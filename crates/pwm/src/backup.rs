// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pwm backup` command implementation.
//!
//! Backups copy the sealed blob as-is, so no master password is needed.
//! One backup per backend per calendar day.

use std::io::Write;

use pwm_config::StorageConfig;
use pwm_core::PwmError;
use pwm_storage::open_backend;
use tracing::info;

use crate::output_error;

/// Back up the configured repository and print where the copy went.
pub async fn run_backup(config: &StorageConfig, out: &mut dyn Write) -> Result<(), PwmError> {
    let storage = open_backend(config)?;
    let location = storage.backup().await?;
    info!(backend = storage.name(), %location, "backup created");
    writeln!(out, "Backup created: {location}").map_err(output_error)
}
