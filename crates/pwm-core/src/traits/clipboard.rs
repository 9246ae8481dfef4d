// SPDX-FileCopyrightText: 2026 pwm Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::error::PwmError;

/// Destination for passwords that should not be printed.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), PwmError>;
}
