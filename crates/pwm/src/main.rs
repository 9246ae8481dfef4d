// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! pwm - a local password manager.
//!
//! This is the binary entry point. Every command loads the configuration,
//! opens the configured storage backend and, for commands that touch
//! entries, decrypts the repository with the master password.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod backup;
mod entries;
mod prompts;
mod setup;
mod transfer;

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pwm_config::PwmConfig;
use pwm_core::{MediumKind, PwmError};
use pwm_vault::{DEFAULT_PASSWORD_LENGTH, SystemClipboard, generate_password};

use entries::{EntryChanges, NewEntry, PasswordSource, SearchOptions};
use prompts::{Prompter, TerminalPrompter};

/// pwm - a local password manager with an encrypted vault.
#[derive(Parser, Debug)]
#[command(name = "pwm", version, about, long_about = None)]
struct Cli {
    /// Explicit configuration file, layered over the default locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Master password. Falls back to PWM_MASTER_PASSWORD, then a prompt.
    #[arg(short = 'm', long, global = true, value_name = "PASSWORD")]
    master_password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty password repository.
    Init,
    /// Add a new entry.
    Add {
        id: String,
        #[arg(short, long, default_value = "")]
        username: String,
        /// Password to store. Prompted for when neither this nor --generate is given.
        #[arg(short, long, conflicts_with = "generate")]
        password: Option<String>,
        /// Generate a random password of this length.
        #[arg(short, long, value_name = "LENGTH", num_args = 0..=1,
              default_missing_value = "12")]
        generate: Option<usize>,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Label to attach. Repeat for several labels.
        #[arg(short, long = "label")]
        labels: Vec<String>,
        /// Ask for every field at the terminal.
        #[arg(short, long,
              conflicts_with_all = ["username", "password", "generate", "description", "labels"])]
        interactive: bool,
    },
    /// Print the username and copy the password of an entry.
    Get {
        id: String,
        /// Print the password instead of copying it to the clipboard.
        #[arg(short, long)]
        show: bool,
    },
    /// Search entries by ID substring, or by label with --label.
    Search {
        query: String,
        #[arg(short, long)]
        label: bool,
        /// Print the password of a single match instead of copying it.
        #[arg(short, long)]
        show: bool,
    },
    /// List every entry ID.
    List,
    /// Change fields of an existing entry. Omitted fields are kept.
    Change {
        id: String,
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long, conflicts_with = "generate")]
        password: Option<String>,
        #[arg(short, long, value_name = "LENGTH", num_args = 0..=1,
              default_missing_value = "12")]
        generate: Option<usize>,
        #[arg(short, long)]
        description: Option<String>,
        /// Ask for each field at the terminal, offering the current values.
        #[arg(short, long,
              conflicts_with_all = ["username", "password", "generate", "description"])]
        interactive: bool,
    },
    /// Remove an entry.
    Remove { id: String },
    /// Re-encrypt the repository under a new master password.
    ChangeMasterPassword {
        /// New master password. Falls back to PWM_NEW_MASTER_PASSWORD, then a prompt.
        #[arg(short, long, value_name = "PASSWORD")]
        new_password: Option<String>,
    },
    /// Import entries from a file.
    Import(MediumArgs),
    /// Export every entry to a new file.
    Export(MediumArgs),
    /// Create a dated copy of the encrypted repository.
    Backup,
    /// Print a random password.
    GeneratePassword {
        #[arg(short, long, default_value_t = DEFAULT_PASSWORD_LENGTH)]
        length: usize,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct MediumArgs {
    /// CSV file.
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,
    /// HTML file.
    #[arg(long, value_name = "PATH")]
    html: Option<PathBuf>,
}

impl MediumArgs {
    fn medium(&self) -> Result<(MediumKind, PathBuf), PwmError> {
        match (&self.csv, &self.html) {
            (Some(path), None) => Ok((MediumKind::Csv, path.clone())),
            (None, Some(path)) => Ok((MediumKind::Html, path.clone())),
            _ => Err(PwmError::Config(
                "exactly one of --csv or --html is required".to_string(),
            )),
        }
    }
}

fn password_source(given: Option<String>, generate: Option<usize>) -> Option<PasswordSource> {
    match (given, generate) {
        (Some(password), _) => Some(PasswordSource::Given(password)),
        (None, Some(length)) => Some(PasswordSource::Generate(length)),
        (None, None) => None,
    }
}

pub(crate) fn output_error(e: std::io::Error) -> PwmError {
    PwmError::Internal(format!("cannot write output: {e}"))
}

/// Initialize the tracing subscriber. Logs go to stderr so command output
/// on stdout stays scriptable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pwm={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli, config: &PwmConfig, out: &mut dyn Write) -> Result<(), PwmError> {
    let flag = cli.master_password.as_deref();

    // Commands that never decrypt the repository.
    match &cli.command {
        Commands::Init => return setup::run_init(config, flag, out).await,
        Commands::Backup => return backup::run_backup(&config.storage, out).await,
        Commands::GeneratePassword { length } => {
            let password = generate_password(*length)?;
            return writeln!(out, "{password}").map_err(output_error);
        }
        _ => {}
    }

    let password = setup::master_password(flag)?;
    let mut repo = setup::open_repository(config, password).await?;
    let mut clipboard = SystemClipboard::new();

    match cli.command {
        Commands::Add {
            id,
            username,
            password,
            generate,
            description,
            labels,
            interactive,
        } => {
            let new = if interactive {
                entries::prompt_new_entry(&id, &mut TerminalPrompter::new()?)?
            } else {
                NewEntry {
                    id,
                    username,
                    password: password_source(password, generate)
                        .unwrap_or(PasswordSource::Prompt),
                    description,
                    labels,
                }
            };
            entries::run_add(&mut repo, new, out).await
        }
        Commands::Get { id, show } => entries::run_get(&repo, &id, show, &mut clipboard, out),
        Commands::Search { query, label, show } => {
            let options = SearchOptions {
                by_label: label,
                show_password: show,
                list_size: config.cli.select_list_size,
            };
            // Without a terminal, several matches are listed instead.
            let mut terminal = TerminalPrompter::new().ok();
            let picker = terminal.as_mut().map(|t| t as &mut dyn Prompter);
            entries::run_search(&repo, &query, options, &mut clipboard, picker, out)
        }
        Commands::List => entries::run_list(&repo, out),
        Commands::Change {
            id,
            username,
            password,
            generate,
            description,
            interactive,
        } => {
            let changes = if interactive {
                let current = repo.get_password_entry(&id)?;
                entries::prompt_changes(&current, &mut TerminalPrompter::new()?)?
            } else {
                EntryChanges {
                    username,
                    password: password_source(password, generate),
                    description,
                }
            };
            entries::run_change(&mut repo, &id, changes, out).await
        }
        Commands::Remove { id } => entries::run_remove(&mut repo, &id, out).await,
        Commands::ChangeMasterPassword { new_password } => {
            setup::run_change_master_password(&mut repo, new_password.as_deref(), out).await
        }
        Commands::Import(args) => {
            let (medium, path) = args.medium()?;
            transfer::run_import(&mut repo, medium, &path, out).await
        }
        Commands::Export(args) => {
            let (medium, path) = args.medium()?;
            transfer::run_export(&repo, medium, &path, out)
        }
        Commands::Init | Commands::Backup | Commands::GeneratePassword { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match pwm_config::load_and_validate(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            pwm_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.log_level);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run(cli, &config, &mut out).await {
        eprintln!("pwm: {e}");
        std::process::exit(1);
    }
}
