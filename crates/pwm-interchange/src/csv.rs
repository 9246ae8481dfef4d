// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV importer and exporter.
//!
//! Layout: `id,username,password,description,labels`, one entry per row,
//! labels joined with `,` inside a single quoted field. Files written by
//! older releases omit the description column; the importer locates columns
//! by header name so both layouts load.

use std::path::{Path, PathBuf};

use csv::StringRecord;
use pwm_core::{Entry, Exporter, ImportExportEntry, Importer, PwmError};
use tracing::{debug, info};

use crate::{LABEL_SEPARATOR, write_new_file};

/// Header written by the exporter.
pub const CSV_HEADER: [&str; 5] = ["id", "username", "password", "description", "labels"];

/// Reads entries from a CSV file.
#[derive(Debug, Clone)]
pub struct CsvImporter {
    path: PathBuf,
}

impl CsvImporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Column positions resolved from the header row.
#[derive(Debug)]
struct Columns {
    id: usize,
    username: usize,
    password: usize,
    description: Option<usize>,
    labels: Option<usize>,
}

impl Columns {
    fn from_header(header: &StringRecord, path: &Path) -> Result<Self, PwmError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|column| column.trim().eq_ignore_ascii_case(name))
        };
        let required = |name: &str| {
            find(name).ok_or_else(|| PwmError::Interchange {
                message: format!(
                    "CSV file {} has no `{name}` column (expected header: {})",
                    path.display(),
                    CSV_HEADER.join(",")
                ),
                source: None,
            })
        };

        Ok(Self {
            id: required("id")?,
            username: required("username")?,
            password: required("password")?,
            description: find("description"),
            labels: find("labels"),
        })
    }

    fn entry(&self, record: &StringRecord, row: usize) -> Result<ImportExportEntry, PwmError> {
        let field = |index: usize| {
            record.get(index).ok_or_else(|| PwmError::Interchange {
                message: format!(
                    "CSV row {row} has {} fields, column {} is missing",
                    record.len(),
                    index + 1
                ),
                source: None,
            })
        };
        let optional = |index: Option<usize>| index.and_then(|i| record.get(i)).unwrap_or("");

        Ok(ImportExportEntry {
            entry: Entry::new(
                field(self.id)?,
                field(self.username)?,
                field(self.password)?,
                optional(self.description),
            ),
            labels: split_labels(optional(self.labels)),
        })
    }
}

fn split_labels(field: &str) -> Vec<String> {
    field
        .split(LABEL_SEPARATOR)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

impl Importer for CsvImporter {
    fn import(&self) -> Result<Vec<ImportExportEntry>, PwmError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| {
                PwmError::interchange(format!("cannot open CSV file {}", self.path.display()), e)
            })?;

        let header = reader
            .headers()
            .map_err(|e| {
                PwmError::interchange(format!("cannot read CSV header of {}", self.path.display()), e)
            })?
            .clone();
        let columns = Columns::from_header(&header, &self.path)?;

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            // Row numbers are 1-based and count the header.
            let row = index + 2;
            let record = record
                .map_err(|e| PwmError::interchange(format!("cannot read CSV row {row}"), e))?;
            rows.push(columns.entry(&record, row)?);
        }

        debug!(path = %self.path.display(), rows = rows.len(), "CSV file read");
        Ok(rows)
    }
}

/// Writes entries to a new CSV file.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Exporter for CsvExporter {
    fn export(&self, entries: &[ImportExportEntry]) -> Result<(), PwmError> {
        write_new_file(&self.path, "CSV", |file| {
            let mut writer = csv::Writer::from_writer(file);
            let write_err =
                |e: csv::Error| PwmError::interchange("couldn't write to the CSV file", e);

            writer.write_record(CSV_HEADER).map_err(write_err)?;
            for row in entries {
                let labels = row.labels.join(LABEL_SEPARATOR);
                writer
                    .write_record([
                        row.entry.id.as_str(),
                        row.entry.username.as_str(),
                        row.entry.password.as_str(),
                        row.entry.description.as_str(),
                        labels.as_str(),
                    ])
                    .map_err(write_err)?;
            }
            writer
                .flush()
                .map_err(|e| PwmError::interchange("couldn't flush the CSV file", e))
        })?;

        info!(path = %self.path.display(), rows = entries.len(), "entries exported to CSV");
        Ok(())
    }
}
