// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System clipboard access.

use pwm_core::{Clipboard, PwmError};

/// The desktop clipboard, opened lazily on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), PwmError> {
        if self.inner.is_none() {
            let opened = arboard::Clipboard::new()
                .map_err(|e| PwmError::Clipboard(format!("cannot open clipboard: {e}")))?;
            self.inner = Some(opened);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            return Err(PwmError::Clipboard("clipboard unavailable".to_string()));
        };
        clipboard
            .set_text(text.to_owned())
            .map_err(|e| PwmError::Clipboard(format!("cannot write to clipboard: {e}")))
    }
}
