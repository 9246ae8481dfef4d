// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entry commands: `pwm add`, `get`, `search`, `change`, `remove` and `list`.

use std::io::{IsTerminal, Write};

use pwm_core::{Clipboard, Entry, PwmError};
use pwm_vault::{Repository, generate_password};

use crate::output_error;
use crate::prompts::{self, Prompter};

/// Where the password for a new entry comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordSource {
    Given(String),
    Generate(usize),
    Prompt,
}

impl PasswordSource {
    fn resolve(self, id: &str) -> Result<String, PwmError> {
        match self {
            Self::Given(password) => Ok(password),
            Self::Generate(length) => generate_password(length),
            Self::Prompt => {
                if !std::io::stdin().is_terminal() {
                    return Err(PwmError::Config(format!(
                        "no password given for {id} -- pass --password or --generate"
                    )));
                }
                rpassword::prompt_password(format!("Password for {id}: "))
                    .map_err(|e| PwmError::Internal(format!("failed to read password: {e}")))
            }
        }
    }
}

/// Fields for `pwm add`.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub id: String,
    pub username: String,
    pub password: PasswordSource,
    pub description: String,
    pub labels: Vec<String>,
}

pub async fn run_add(
    repo: &mut Repository,
    new: NewEntry,
    out: &mut dyn Write,
) -> Result<(), PwmError> {
    let generated = matches!(new.password, PasswordSource::Generate(_));
    let password = new.password.resolve(&new.id)?;
    repo.add(&new.id, &new.username, &password, &new.description, &new.labels)
        .await?;

    writeln!(out, "Added {}", new.id).map_err(output_error)?;
    if generated {
        writeln!(out, "Generated password: {password}").map_err(output_error)?;
    }
    Ok(())
}

pub fn run_get(
    repo: &Repository,
    id: &str,
    show_password: bool,
    clipboard: &mut dyn Clipboard,
    out: &mut dyn Write,
) -> Result<(), PwmError> {
    repo.get_username_password(id, show_password, clipboard, out)
}

/// Options for `pwm search`.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub by_label: bool,
    pub show_password: bool,
    pub list_size: usize,
}

/// Search by ID or label.
///
/// A single hit is handled like `pwm get`. Several hits open `picker`, which
/// shows `list_size` of them at a time; without a picker they are listed so
/// the user can run `pwm get` on one.
pub fn run_search(
    repo: &Repository,
    needle: &str,
    options: SearchOptions,
    clipboard: &mut dyn Clipboard,
    picker: Option<&mut dyn Prompter>,
    out: &mut dyn Write,
) -> Result<(), PwmError> {
    let found = if options.by_label {
        repo.search_label(needle)?
    } else {
        repo.search_entries_by_id(needle)?
    };

    let chosen = match (found.as_slice(), picker) {
        ([], _) => return writeln!(out, "No entries labelled {needle}").map_err(output_error),
        ([only], _) => only,
        (many, Some(picker)) => {
            let items: Vec<String> = many.iter().map(|e| describe(repo, e)).collect();
            &many[prompts::select(picker, out, &items, options.list_size)?]
        }
        (many, None) => return write_matches(repo, many, options.list_size, out),
    };

    writeln!(out, "ID: {}", chosen.id).map_err(output_error)?;
    repo.get_username_password(&chosen.id, options.show_password, clipboard, out)
}

/// One-line summary of an entry: ID, username and labels.
fn describe(repo: &Repository, entry: &Entry) -> String {
    let labels = repo.labels_for_id(&entry.id);
    if labels.is_empty() {
        format!("{} ({})", entry.id, entry.username)
    } else {
        format!("{} ({}) [{}]", entry.id, entry.username, labels.join(", "))
    }
}

fn write_matches(
    repo: &Repository,
    entries: &[Entry],
    list_size: usize,
    out: &mut dyn Write,
) -> Result<(), PwmError> {
    writeln!(out, "{} matches:", entries.len()).map_err(output_error)?;
    let shown = list_size.max(1);
    for entry in entries.iter().take(shown) {
        writeln!(out, "  {}", describe(repo, entry)).map_err(output_error)?;
    }
    if entries.len() > shown {
        writeln!(out, "  ... and {} more", entries.len() - shown).map_err(output_error)?;
    }
    writeln!(out, "Run `pwm get <ID>` for one of them").map_err(output_error)
}

fn non_empty(field: &'static str) -> impl Fn(&str) -> Result<(), String> {
    move |value| {
        if value.is_empty() {
            Err(format!("{field} cannot be empty"))
        } else {
            Ok(())
        }
    }
}

/// Ask for every field of a new entry.
pub fn prompt_new_entry(id: &str, prompter: &mut dyn Prompter) -> Result<NewEntry, PwmError> {
    let username = prompts::ask_line(prompter, "Username: ", "", non_empty("username"))?;
    let password = prompts::ask_password(prompter, false)?.unwrap_or_default();
    let description = prompts::ask_line(prompter, "Description: ", "", |_| Ok(()))?;
    let labels = prompts::ask_line(prompter, "Labels (comma separated): ", "", |_| Ok(()))?;

    Ok(NewEntry {
        id: id.to_string(),
        username,
        password: PasswordSource::Given(password),
        description,
        labels: labels
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

/// Ask for new values of `current`, offering the stored ones as defaults.
pub fn prompt_changes(
    current: &Entry,
    prompter: &mut dyn Prompter,
) -> Result<EntryChanges, PwmError> {
    let username =
        prompts::ask_line(prompter, "Username: ", &current.username, non_empty("username"))?;
    let password = prompts::ask_password(prompter, true)?;
    let description = prompts::ask_line(prompter, "Description: ", &current.description, |_| {
        Ok(())
    })?;

    Ok(EntryChanges {
        username: Some(username),
        password: password.map(PasswordSource::Given),
        description: Some(description),
    })
}

/// Field overrides for `pwm change`. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct EntryChanges {
    pub username: Option<String>,
    pub password: Option<PasswordSource>,
    pub description: Option<String>,
}

pub async fn run_change(
    repo: &mut Repository,
    id: &str,
    changes: EntryChanges,
    out: &mut dyn Write,
) -> Result<(), PwmError> {
    let current = repo.get_password_entry(id)?;
    let password = match changes.password {
        Some(source) => source.resolve(id)?,
        None => current.password,
    };
    let updated = Entry::new(
        id,
        changes.username.unwrap_or(current.username),
        password,
        changes.description.unwrap_or(current.description),
    );
    repo.change_password_entry(id, updated).await?;
    writeln!(out, "Changed {id}").map_err(output_error)
}

pub async fn run_remove(
    repo: &mut Repository,
    id: &str,
    out: &mut dyn Write,
) -> Result<(), PwmError> {
    repo.remove(id).await?;
    writeln!(out, "Removed {id}").map_err(output_error)
}

pub fn run_list(repo: &Repository, out: &mut dyn Write) -> Result<(), PwmError> {
    for id in repo.list_ids() {
        writeln!(out, "{id}").map_err(output_error)?;
    }
    Ok(())
}
