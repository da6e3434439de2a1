//! Terminal implementation of the interaction seam

use crate::cli::style::{caution, check, cross};
use anstream::{eprintln, println};
use async_trait::async_trait;
use dialoguer::Confirm;
use marksflow::error::{Error, Result};
use marksflow::surface::{Interaction, Notice};

/// Prompts with dialoguer and prints notices
///
/// With `assume_yes` the confirmation is taken from the command line
/// (`--yes`) and the prompt is only echoed.
pub struct CliInteraction {
    /// Treat every confirmation as accepted
    pub assume_yes: bool,
}

impl CliInteraction {
    /// Create the interaction
    pub const fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl Interaction for CliInteraction {
    async fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.assume_yes {
            println!("{prompt} yes (--yes)");
            return Ok(true);
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))
    }

    async fn notify(&self, notice: &Notice) {
        match notice {
            Notice::Failed { .. } => eprintln!("{} {notice}", cross()),
            Notice::Transitioned(outcome) if outcome.is_partial() => {
                println!("{} {notice}", caution());
            }
            _ => println!("{} {notice}", check()),
        }
    }
}
