use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::output;
use crate::cli::shell_context::CliMode;
use crate::core::Confirmation;

/// Print an informational message via the standard CLI output helpers.
pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

/// Print a warning message via the standard CLI output helpers.
pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

/// Print an error message via the standard CLI output helpers.
pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

/// Print a success message via the standard CLI output helpers.
pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

pub fn print_hint(message: impl fmt::Display) {
    output::hint(message);
}

/// Confirmation backed by a dialoguer yes/no prompt. Script mode answers yes.
pub struct DialogConfirm<'a> {
    mode: CliMode,
    theme: &'a ColorfulTheme,
}

impl<'a> DialogConfirm<'a> {
    pub fn new(mode: CliMode, theme: &'a ColorfulTheme) -> Self {
        Self { mode, theme }
    }
}

impl Confirmation for DialogConfirm<'_> {
    fn confirm(&self, prompt: &str) -> bool {
        if self.mode == CliMode::Script {
            return true;
        }
        match Confirm::with_theme(self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!(error = %err, "confirmation prompt failed; treating as no");
                false
            }
        }
    }
}
