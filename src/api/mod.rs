//! Marks repository client
//!
//! The backend owns persistence and authorization; this layer fetches,
//! creates and transitions marks and normalizes every response into the
//! canonical types in [`crate::types`].

mod factory;
mod http;

pub use factory::create_repository;
pub use http::HttpMarksRepository;

use crate::error::Result;
use crate::lifecycle::Actor;
use crate::types::{BulkOutcome, MarkAction, MarkId, MarksPage, MarksQuery, NewMarkEntry, Student};
use async_trait::async_trait;

/// Repository trait for internal marks
///
/// Implemented over HTTP by [`HttpMarksRepository`]; surfaces only see this
/// trait so they can be driven against an in-memory double in tests.
#[async_trait]
pub trait MarksRepository: Send + Sync {
    /// List one page of marks.
    ///
    /// `scope` picks the admin listing (all institute marks) or the faculty
    /// listing (marks entered by the caller).
    async fn list_marks(&self, scope: Actor, query: &MarksQuery) -> Result<MarksPage>;

    /// Create a batch of draft marks.
    ///
    /// The batch is validated as a whole first: one invalid entry rejects
    /// it without a request. Returns the backend's `total_records`.
    async fn create_draft_batch(&self, entries: &[NewMarkEntry]) -> Result<u64>;

    /// Apply the same transition to every id.
    ///
    /// The outcome carries the backend-reported success count, which may be
    /// lower than the number of ids sent.
    async fn bulk_transition(&self, ids: &[MarkId], action: MarkAction) -> Result<BulkOutcome>;

    /// List the students the calling faculty can enter marks for
    async fn list_students(&self) -> Result<Vec<Student>>;
}

/// Reject an empty or invalid draft batch before it is sent
pub fn validate_draft_batch(entries: &[NewMarkEntry]) -> Result<()> {
    if entries.is_empty() {
        return Err(crate::error::Error::Validation(
            "Please enter marks for at least one student".to_string(),
        ));
    }
    entries.iter().try_for_each(NewMarkEntry::validate)
}
