// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Import/export adapter traits for flat tabular and markup formats.

use crate::error::PwmError;
use crate::types::ImportExportEntry;

/// Reads entries from an external medium.
pub trait Importer {
    fn import(&self) -> Result<Vec<ImportExportEntry>, PwmError>;
}

/// Writes entries to an external medium.
///
/// Exporters must never overwrite an existing destination.
pub trait Exporter {
    fn export(&self, entries: &[ImportExportEntry]) -> Result<(), PwmError>;
}
