//! Interaction trait for interface-agnostic prompts and notices
//!
//! Surfaces ask for confirmation and raise blocking notices through this
//! trait, so the same workflow runs behind the CLI or a test double.

use crate::error::Result;
use crate::types::BulkOutcome;
use async_trait::async_trait;
use std::fmt;

/// Blocking, user-facing notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Draft batch created
    DraftsSaved {
        /// Records the backend reports as created
        total_records: u64,
    },
    /// Bulk transition completed
    Transitioned(BulkOutcome),
    /// Action failed
    Failed {
        /// Reason shown to the user
        reason: String,
    },
}

impl Notice {
    /// Failure notices
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DraftsSaved { total_records } => {
                write!(f, "{total_records} marks saved as draft")
            }
            Self::Transitioned(outcome) if outcome.is_partial() => write!(
                f,
                "{} {} of {} marks; {} were not {}, list reloaded",
                capitalize(outcome.action.past_tense()),
                outcome.succeeded,
                outcome.requested,
                outcome.unconfirmed(),
                outcome.action.past_tense()
            ),
            Self::Transitioned(outcome) => write!(
                f,
                "Successfully {} {} marks",
                outcome.action.past_tense(),
                outcome.succeeded
            ),
            Self::Failed { reason } => f.write_str(reason),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Interaction trait
///
/// Implement this trait to drive a surface from a particular interface.
/// - CLI implementations prompt on the terminal
/// - Tests script answers and record notices
#[async_trait]
pub trait Interaction: Send + Sync {
    /// Ask the user to confirm an irreversible action
    async fn confirm(&self, prompt: &str) -> Result<bool>;

    /// Show a blocking notice
    async fn notify(&self, notice: &Notice);
}

/// Confirms everything and shows nothing
///
/// For non-interactive callers that already obtained consent.
pub struct AssumeYes;

#[async_trait]
impl Interaction for AssumeYes {
    async fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
    async fn notify(&self, _notice: &Notice) {}
}
