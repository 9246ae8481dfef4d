// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only HTML table export.

use std::io::Write as _;
use std::path::PathBuf;

use pwm_core::{Exporter, ImportExportEntry, PwmError};
use tracing::info;

use crate::{LABEL_SEPARATOR, write_new_file};

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Password Manager</title>
  <style>
    table, th, td {
      border: 1px solid black;
      text-align: center;
    }
  </style>
</head>
<body>
  <h1>Password Manager database</h1>
  <table>
    <tr>
      <th>ID</th>
      <th>Username</th>
      <th>Password</th>
      <th>Description</th>
      <th>Labels</th>
    </tr>
"#;

const PAGE_TAIL: &str = "  </table>\n</body>\n</html>\n";

/// Writes entries as a static HTML table.
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    path: PathBuf,
}

impl HtmlExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Render the full page for `entries`.
pub fn render(entries: &[ImportExportEntry]) -> String {
    let mut page = String::from(PAGE_HEAD);
    for row in entries {
        let labels = row.labels.join(LABEL_SEPARATOR);
        page.push_str("    <tr>\n");
        for value in [
            &row.entry.id,
            &row.entry.username,
            &row.entry.password,
            &row.entry.description,
            &labels,
        ] {
            page.push_str(&format!("      <td>{}</td>\n", escape(value)));
        }
        page.push_str("    </tr>\n");
    }
    page.push_str(PAGE_TAIL);
    page
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl Exporter for HtmlExporter {
    fn export(&self, entries: &[ImportExportEntry]) -> Result<(), PwmError> {
        let page = render(entries);
        write_new_file(&self.path, "HTML", |mut file| {
            file.write_all(page.as_bytes())
                .and_then(|()| file.flush())
                .map_err(|e| PwmError::interchange("couldn't write to the HTML file", e))
        })?;

        info!(path = %self.path.display(), rows = entries.len(), "entries exported to HTML");
        Ok(())
    }
}
