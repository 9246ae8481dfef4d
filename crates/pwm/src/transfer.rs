// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pwm import` and `pwm export` command implementation.

use std::io::Write;
use std::path::Path;

use pwm_core::{MediumKind, PwmError};
use pwm_interchange::InterchangeConfig;
use pwm_vault::Repository;

use crate::output_error;

pub async fn run_import(
    repo: &mut Repository,
    medium: MediumKind,
    path: &Path,
    out: &mut dyn Write,
) -> Result<(), PwmError> {
    let count = repo.import(medium, &InterchangeConfig::new(path)).await?;
    writeln!(out, "Imported {count} entries from {}", path.display()).map_err(output_error)
}

pub fn run_export(
    repo: &Repository,
    medium: MediumKind,
    path: &Path,
    out: &mut dyn Write,
) -> Result<(), PwmError> {
    let count = repo.export(medium, &InterchangeConfig::new(path))?;
    writeln!(out, "Exported {count} entries to {}", path.display()).map_err(output_error)
}
