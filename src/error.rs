//! Error types for marksflow

use crate::lifecycle::Actor;
use crate::types::{MarkAction, MarkId, MarkStatus};
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the repository client, lifecycle checks and surfaces
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before any request was issued
    #[error("{0}")]
    Validation(String),

    /// Backend answered with a non-success status
    #[error("request rejected ({status}): {reason}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Reason string reported by the backend
        reason: String,
    },

    /// Network failure talking to the backend
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Missing or rejected bearer token
    #[error("authentication error: {0}")]
    Auth(String),

    /// Action requested against a record in the wrong status
    #[error(
        "cannot {action} {}: status is {current}, expected {expected}",
        mark_label(.id)
    )]
    IllegalTransition {
        /// Offending mark, when the check concerned a loaded record
        id: Option<MarkId>,
        /// Requested action
        action: MarkAction,
        /// Status the record is actually in
        current: MarkStatus,
        /// Status the action requires
        expected: MarkStatus,
    },

    /// Action attempted by the wrong role
    #[error("{actor} may not {action} marks")]
    Forbidden {
        /// Role that attempted the action
        actor: Actor,
        /// Requested action
        action: MarkAction,
    },

    /// Another action is still in flight on this surface
    #[error("another action is already in progress")]
    Busy,

    /// Malformed data from the backend or the command line
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error (config and token files)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected internal failure
    #[error("internal error: {0}")]
    Internal(String),
}

#[allow(clippy::ref_option)]
fn mark_label(id: &Option<MarkId>) -> String {
    id.map_or_else(|| "a mark".to_string(), |id| format!("mark {id}"))
}

impl Error {
    /// Message shown to the user in a blocking notice.
    ///
    /// Backend reasons and validation messages are shown verbatim; transport
    /// failures collapse to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Rejected { reason, .. } => reason.clone(),
            Self::Transport(_) => fallback.to_string(),
            other => other.to_string(),
        }
    }
}
