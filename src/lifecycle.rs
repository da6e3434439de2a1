//! Status transition table for internal marks
//!
//! The lifecycle is a linear chain with no branching and no way back:
//!
//! | Current   | Action  | Target    | Actor   |
//! |-----------|---------|-----------|---------|
//! | draft     | submit  | submitted | faculty |
//! | submitted | lock    | locked    | admin   |
//! | locked    | publish | published | admin   |
//! | published | -       | -         | -       |

use crate::error::{Error, Result};
use crate::types::{InternalMark, MarkAction, MarkId, MarkStatus};
use std::collections::HashSet;
use std::fmt;

/// Role performing a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actor {
    /// Faculty member entering marks
    Faculty,
    /// Institute or university administrator
    Admin,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Faculty => write!(f, "faculty"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl MarkStatus {
    /// The only action that advances a record out of this status
    pub const fn next_action(self) -> Option<MarkAction> {
        match self {
            Self::Draft => Some(MarkAction::Submit),
            Self::Submitted => Some(MarkAction::Lock),
            Self::Locked => Some(MarkAction::Publish),
            Self::Published => None,
        }
    }

    /// The status that follows this one
    pub const fn successor(self) -> Option<Self> {
        match self.next_action() {
            Some(action) => Some(action.target()),
            None => None,
        }
    }

    /// Terminal statuses have no outgoing transition
    pub const fn is_terminal(self) -> bool {
        self.next_action().is_none()
    }
}

impl MarkAction {
    /// Status a record must be in for this action
    pub const fn source(self) -> MarkStatus {
        match self {
            Self::Submit => MarkStatus::Draft,
            Self::Lock => MarkStatus::Submitted,
            Self::Publish => MarkStatus::Locked,
        }
    }

    /// Status a record ends up in
    pub const fn target(self) -> MarkStatus {
        match self {
            Self::Submit => MarkStatus::Submitted,
            Self::Lock => MarkStatus::Locked,
            Self::Publish => MarkStatus::Published,
        }
    }

    /// Role that owns this transition
    pub const fn actor(self) -> Actor {
        match self {
            Self::Submit => Actor::Faculty,
            Self::Lock | Self::Publish => Actor::Admin,
        }
    }

    /// Irreversible from the acting surface and needs an explicit yes
    pub const fn requires_confirmation(self) -> bool {
        matches!(self, Self::Submit | Self::Publish)
    }

    /// Past tense used in notices
    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Submit => "submitted",
            Self::Lock => "locked",
            Self::Publish => "published",
        }
    }
}

/// Decide whether `actor` may apply `action` to a record in `current`.
///
/// Returns the target status on success.
pub fn authorize(current: MarkStatus, action: MarkAction, actor: Actor) -> Result<MarkStatus> {
    if action.actor() != actor {
        return Err(Error::Forbidden { actor, action });
    }
    if current != action.source() {
        return Err(Error::IllegalTransition {
            id: None,
            action,
            current,
            expected: action.source(),
        });
    }
    Ok(action.target())
}

/// Client-side precondition check for a bulk transition.
///
/// Every id must be among `records` and in the action's source status.
/// Duplicate ids are dropped, first occurrence wins.
pub fn check_batch(records: &[InternalMark], ids: &[MarkId], action: MarkAction) -> Result<Vec<MarkId>> {
    if ids.is_empty() {
        return Err(Error::Validation(format!(
            "Please select marks to {action}"
        )));
    }

    let mut seen = HashSet::with_capacity(ids.len());
    let mut checked = Vec::with_capacity(ids.len());
    for &id in ids {
        if !seen.insert(id) {
            continue;
        }
        let record = records.iter().find(|r| r.id == id).ok_or_else(|| {
            Error::Validation(format!("mark {id} is not in the loaded list; reload and retry"))
        })?;
        if record.status != action.source() {
            return Err(Error::IllegalTransition {
                id: Some(id),
                action,
                current: record.status,
                expected: action.source(),
            });
        }
        checked.push(id);
    }
    Ok(checked)
}
