//! Confirmation prompts for destructive commands.

use crate::error::VrgError;
use std::io::IsTerminal;

/// Asks the user to confirm an action.
pub trait Prompter: Send + Sync {
    fn confirm(&self, message: &str) -> Result<bool, VrgError>;
}

/// Interactive terminal prompt via dialoguer. Refuses to block on a
/// non-interactive stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn confirm(&self, message: &str) -> Result<bool, VrgError> {
        if !std::io::stdin().is_terminal() {
            return Err(VrgError::Validation(
                "confirmation required but stdin is not a terminal; pass --yes to proceed"
                    .to_string(),
            ));
        }
        use dialoguer::Confirm;
        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .map_err(|e| VrgError::Prompt(e.to_string()))
    }
}
