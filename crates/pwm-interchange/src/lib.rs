// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Import/export adapters for the pwm password manager.
//!
//! Adapters are built per operation from an [`InterchangeConfig`] and
//! resolved by [`MediumKind`] through [`importer_for`] and [`exporter_for`].

pub mod csv;
pub mod html;

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pwm_core::{Exporter, Importer, MediumKind, PwmError};
use tracing::warn;

pub use self::csv::{CSV_HEADER, CsvExporter, CsvImporter};
pub use self::html::HtmlExporter;

/// Separator used to join labels into a single field.
pub const LABEL_SEPARATOR: &str = ",";

/// Settings handed to an adapter when it is constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterchangeConfig {
    /// Source file for imports, destination file for exports.
    pub path: PathBuf,
}

impl InterchangeConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn checked_path(&self) -> Result<&Path, PwmError> {
        if self.path.as_os_str().is_empty() {
            return Err(PwmError::Config(
                "a file path is required for import/export".to_string(),
            ));
        }
        Ok(&self.path)
    }
}

/// Resolve the importer for `medium`.
pub fn importer_for(
    medium: MediumKind,
    config: &InterchangeConfig,
) -> Result<Box<dyn Importer>, PwmError> {
    let path = config.checked_path()?;
    match medium {
        MediumKind::Csv => Ok(Box::new(CsvImporter::new(path))),
        MediumKind::Html => Err(PwmError::UnsupportedMedium(format!(
            "{medium} cannot be imported"
        ))),
    }
}

/// Resolve the exporter for `medium`.
pub fn exporter_for(
    medium: MediumKind,
    config: &InterchangeConfig,
) -> Result<Box<dyn Exporter>, PwmError> {
    let path = config.checked_path()?;
    Ok(match medium {
        MediumKind::Csv => Box::new(CsvExporter::new(path)),
        MediumKind::Html => Box::new(HtmlExporter::new(path)),
    })
}

/// Create `path`, failing if anything already exists there, and fill it
/// with `write`.
///
/// A failed write removes the partial file so the export can be retried.
pub(crate) fn write_new_file<F>(path: &Path, format: &str, write: F) -> Result<(), PwmError>
where
    F: FnOnce(File) -> Result<(), PwmError>,
{
    let file = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(PwmError::Interchange {
                message: format!("given {format} file {} already exists", path.display()),
                source: Some(Box::new(e)),
            });
        }
        Err(e) => {
            return Err(PwmError::interchange(
                format!("unable to create the {format} file {}", path.display()),
                e,
            ));
        }
    };

    write(file).inspect_err(|_| {
        if let Err(e) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "failed to remove partial export");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_has_no_importer() {
        let err = importer_for(MediumKind::Html, &InterchangeConfig::new("x.html")).err();
        assert!(matches!(err, Some(PwmError::UnsupportedMedium(_))));
    }

    #[test]
    fn empty_path_is_rejected() {
        let config = InterchangeConfig::default();
        assert!(matches!(
            importer_for(MediumKind::Csv, &config).err(),
            Some(PwmError::Config(_))
        ));
        assert!(matches!(
            exporter_for(MediumKind::Html, &config).err(),
            Some(PwmError::Config(_))
        ));
    }

    #[test]
    fn failed_write_removes_the_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let err = write_new_file(&path, "CSV", |mut file| {
            std::io::Write::write_all(&mut file, b"id,username\n").unwrap();
            Err(PwmError::Interchange {
                message: "disk full".to_string(),
                source: None,
            })
        })
        .unwrap_err();
        assert!(matches!(err, PwmError::Interchange { ref message, .. } if message == "disk full"));
        assert!(!path.exists());

        write_new_file(&path, "CSV", |_| Ok(())).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn existing_destination_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        std::fs::write(&path, "keep me").unwrap();

        let err = write_new_file(&path, "HTML", |_| Ok(())).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn every_medium_has_an_exporter() {
        let dir = tempfile::tempdir().unwrap();
        for (medium, name) in [(MediumKind::Csv, "a.csv"), (MediumKind::Html, "a.html")] {
            let exporter = exporter_for(medium, &InterchangeConfig::new(dir.path().join(name)));
            exporter.unwrap().export(&[]).unwrap();
            assert!(dir.path().join(name).exists());
        }
    }
}
