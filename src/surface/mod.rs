//! Workflow surfaces
//!
//! Each surface owns its state (loaded page, status counts, selection, busy
//! flag) and resets it on well-defined triggers:
//! - [`FacultyDesk`]: enter marks as drafts, submit drafts (draft → submitted)
//! - [`LockPanel`]: lock submitted marks, publish locked marks
//!
//! Surfaces never patch loaded records after a mutation; they reload from
//! the repository so status counts stay truthful.

mod admin;
mod faculty;
mod interaction;
mod selection;

pub use admin::LockPanel;
pub use faculty::{EntryForm, EntryInput, FacultyDesk};
pub use interaction::{AssumeYes, Interaction, Notice};
pub use selection::Selection;

use crate::error::Error;
use crate::types::BulkOutcome;
use tracing::warn;

/// Result of a user-triggered action on a surface
#[derive(Debug)]
pub enum ActionOutcome {
    /// Draft batch created
    Saved {
        /// Records the backend reports as created
        total_records: u64,
    },
    /// Bulk transition completed (possibly partially)
    Transitioned(BulkOutcome),
    /// User declined the confirmation; nothing was sent
    Cancelled,
    /// Action failed and was reported; the surface is back in its prior state
    Failed(Error),
}

impl ActionOutcome {
    /// The action failed
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The user cancelled at the confirmation prompt
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Raise a failure notice and wrap the error
async fn report_failure(interaction: &dyn Interaction, fallback: &str, error: Error) -> ActionOutcome {
    warn!(%error, "action failed");
    interaction
        .notify(&Notice::Failed {
            reason: error.user_message(fallback),
        })
        .await;
    ActionOutcome::Failed(error)
}

/// Holds a surface's busy flag while a request is in flight.
///
/// The flag is released on drop, so an abandoned action future leaves the
/// surface usable.
struct BusyGuard<'a>(&'a mut bool);

impl<'a> BusyGuard<'a> {
    fn hold(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
