// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal prompts for interactive entry editing and for choosing one of
//! several search matches.

use std::io::{IsTerminal, Write};

use pwm_core::PwmError;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::output_error;

/// Shortest password accepted at an interactive prompt.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Invalid answers tolerated before a prompt gives up.
const MAX_ATTEMPTS: usize = 3;

/// Source of interactive answers.
pub trait Prompter {
    /// Read one line, pre-filled with `initial`.
    fn line(&mut self, prompt: &str, initial: &str) -> Result<String, PwmError>;

    /// Read one line without echoing it.
    fn secret(&mut self, prompt: &str) -> Result<String, PwmError>;

    /// Tell the user why an answer was rejected.
    fn notify(&mut self, message: &str);
}

/// Prompts on the controlling terminal.
pub struct TerminalPrompter {
    editor: DefaultEditor,
}

impl TerminalPrompter {
    /// Fails when stdin is not a terminal.
    pub fn new() -> Result<Self, PwmError> {
        if !std::io::stdin().is_terminal() {
            return Err(PwmError::Config(
                "interactive mode needs a terminal".to_string(),
            ));
        }
        let editor = DefaultEditor::new()
            .map_err(|e| PwmError::Internal(format!("failed to initialize readline: {e}")))?;
        Ok(Self { editor })
    }
}

impl Prompter for TerminalPrompter {
    fn line(&mut self, prompt: &str, initial: &str) -> Result<String, PwmError> {
        match self.editor.readline_with_initial(prompt, (initial, "")) {
            Ok(line) => Ok(line),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                Err(PwmError::Config("prompt cancelled".to_string()))
            }
            Err(e) => Err(PwmError::Internal(format!("failed to read input: {e}"))),
        }
    }

    fn secret(&mut self, prompt: &str) -> Result<String, PwmError> {
        rpassword::prompt_password(prompt)
            .map_err(|e| PwmError::Internal(format!("failed to read password: {e}")))
    }

    fn notify(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Ask until `validate` accepts the answer.
pub fn ask_line(
    prompter: &mut dyn Prompter,
    prompt: &str,
    initial: &str,
    validate: impl Fn(&str) -> Result<(), String>,
) -> Result<String, PwmError> {
    for _ in 0..MAX_ATTEMPTS {
        let answer = prompter.line(prompt, initial)?;
        match validate(answer.trim()) {
            Ok(()) => return Ok(answer.trim().to_string()),
            Err(reason) => prompter.notify(&reason),
        }
    }
    Err(PwmError::Config(format!("no valid answer for `{}`", prompt.trim_end())))
}

/// Ask for a password twice.
///
/// With `keep_blank` an empty first answer returns `None`, meaning "keep the
/// current password".
pub fn ask_password(
    prompter: &mut dyn Prompter,
    keep_blank: bool,
) -> Result<Option<String>, PwmError> {
    let prompt = if keep_blank {
        "Password (blank keeps the current one): "
    } else {
        "Password: "
    };
    for _ in 0..MAX_ATTEMPTS {
        let first = prompter.secret(prompt)?;
        if first.is_empty() && keep_blank {
            return Ok(None);
        }
        if first.chars().count() < MIN_PASSWORD_LEN {
            prompter.notify(&format!(
                "password must have at least {MIN_PASSWORD_LEN} characters"
            ));
            continue;
        }
        if prompter.secret("Enter the password again: ")? != first {
            prompter.notify("passwords do not match");
            continue;
        }
        return Ok(Some(first));
    }
    Err(PwmError::Config("no valid password entered".to_string()))
}

/// Let the user pick one of `items`, `page_size` at a time.
///
/// Returns the index of the chosen item. An empty answer shows the next
/// page; `q` cancels.
pub fn select(
    prompter: &mut dyn Prompter,
    out: &mut dyn Write,
    items: &[String],
    page_size: usize,
) -> Result<usize, PwmError> {
    if items.is_empty() {
        return Err(PwmError::Internal("nothing to choose from".to_string()));
    }
    let page_size = page_size.max(1);
    let pages = items.len().div_ceil(page_size);
    let mut page = 0;
    let mut invalid = 0;

    loop {
        let start = page * page_size;
        for (i, item) in items.iter().enumerate().skip(start).take(page_size) {
            writeln!(out, "{:>3}) {item}", i + 1).map_err(output_error)?;
        }
        let prompt = if pages > 1 {
            format!(
                "Choose [1-{}] (page {}/{pages}, Enter for more, q to quit): ",
                items.len(),
                page + 1
            )
        } else {
            format!("Choose [1-{}] (q to quit): ", items.len())
        };

        let answer = prompter.line(&prompt, "")?;
        let answer = answer.trim();
        if answer.eq_ignore_ascii_case("q") {
            return Err(PwmError::Config("selection cancelled".to_string()));
        }
        if answer.is_empty() {
            page = (page + 1) % pages;
            continue;
        }
        match answer.parse::<usize>() {
            Ok(n) if (1..=items.len()).contains(&n) => return Ok(n - 1),
            _ => {
                invalid += 1;
                if invalid >= MAX_ATTEMPTS {
                    return Err(PwmError::Config(format!("invalid choice: {answer}")));
                }
                prompter.notify(&format!("invalid choice: {answer}"));
            }
        }
    }
}

/// Prompter fed from canned answers.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct ScriptedPrompter {
    pub lines: std::collections::VecDeque<String>,
    pub secrets: std::collections::VecDeque<String>,
    pub prompts: Vec<(String, String)>,
    pub notices: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(lines: &[&str], secrets: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            secrets: secrets.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn line(&mut self, prompt: &str, initial: &str) -> Result<String, PwmError> {
        self.prompts.push((prompt.to_string(), initial.to_string()));
        self.lines
            .pop_front()
            .ok_or_else(|| PwmError::Config("prompt cancelled".to_string()))
    }

    fn secret(&mut self, prompt: &str) -> Result<String, PwmError> {
        self.prompts.push((prompt.to_string(), String::new()));
        self.secrets
            .pop_front()
            .ok_or_else(|| PwmError::Config("prompt cancelled".to_string()))
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("entry-{i}")).collect()
    }

    #[test]
    fn select_returns_chosen_index() {
        let mut prompter = ScriptedPrompter::new(&["2"], &[]);
        let mut out = Vec::new();
        assert_eq!(select(&mut prompter, &mut out, &items(3), 5).unwrap(), 1);

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("  1) entry-1\n  2) entry-2\n  3) entry-3\n"));
        assert_eq!(prompter.prompts[0].0, "Choose [1-3] (q to quit): ");
    }

    #[test]
    fn select_pages_through_long_lists() {
        let mut prompter = ScriptedPrompter::new(&["", "5"], &[]);
        let mut out = Vec::new();
        assert_eq!(select(&mut prompter, &mut out, &items(5), 2).unwrap(), 4);

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.starts_with("  1) entry-1\n  2) entry-2\n  3) entry-3\n"));
        assert!(!shown.contains("entry-5"));
        assert!(prompter.prompts[1].0.contains("page 2/3"));
    }

    #[test]
    fn select_can_be_cancelled() {
        let mut prompter = ScriptedPrompter::new(&["q"], &[]);
        let err = select(&mut prompter, &mut Vec::new(), &items(3), 5).unwrap_err();
        assert!(matches!(err, PwmError::Config(ref m) if m.contains("cancelled")));
    }

    #[test]
    fn select_gives_up_after_repeated_invalid_choices() {
        let mut prompter = ScriptedPrompter::new(&["0", "9", "x"], &[]);
        let err = select(&mut prompter, &mut Vec::new(), &items(3), 5).unwrap_err();
        assert!(matches!(err, PwmError::Config(ref m) if m.contains("invalid choice")));
        assert_eq!(prompter.notices.len(), 2);
    }

    #[test]
    fn password_must_be_confirmed() {
        let mut prompter = ScriptedPrompter::new(&[], &["secret1", "secret2", "secret1", "secret1"]);
        assert_eq!(
            ask_password(&mut prompter, false).unwrap().as_deref(),
            Some("secret1")
        );
        assert_eq!(prompter.notices, vec!["passwords do not match"]);
    }

    #[test]
    fn short_password_is_rejected() {
        let mut prompter = ScriptedPrompter::new(&[], &["abc", "abcdef", "abcdef"]);
        assert_eq!(
            ask_password(&mut prompter, false).unwrap().as_deref(),
            Some("abcdef")
        );
        assert_eq!(prompter.notices.len(), 1);
    }

    #[test]
    fn blank_password_keeps_current_when_allowed() {
        let mut prompter = ScriptedPrompter::new(&[], &[""]);
        assert_eq!(ask_password(&mut prompter, true).unwrap(), None);
    }

    #[test]
    fn ask_line_retries_until_valid() {
        let mut prompter = ScriptedPrompter::new(&["  ", " alice "], &[]);
        let answer = ask_line(&mut prompter, "Username: ", "", |v| {
            if v.is_empty() {
                Err("username cannot be empty".to_string())
            } else {
                Ok(())
            }
        })
        .unwrap();
        assert_eq!(answer, "alice");
        assert_eq!(prompter.notices, vec!["username cannot be empty"]);
    }
}
