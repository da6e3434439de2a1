//! Admin lock/publish panel (submitted → locked → published)

use crate::api::MarksRepository;
use crate::error::{Error, Result};
use crate::lifecycle::{Actor, authorize, check_batch};
use crate::surface::{ActionOutcome, BusyGuard, Interaction, Notice, Selection, report_failure};
use crate::types::{InternalMark, MarkAction, MarkId, MarkStatus, MarksQuery, StatusCounts};
use tracing::debug;

/// One status bucket at a time, multi-select, advance the selection.
///
/// The action offered depends only on the active filter: `submitted`
/// offers lock, `locked` offers publish, anything else offers nothing.
pub struct LockPanel<'a> {
    repo: &'a dyn MarksRepository,
    filter: MarkStatus,
    page: u32,
    page_size: u32,
    records: Vec<InternalMark>,
    status_counts: StatusCounts,
    total_pages: u32,
    selection: Selection,
    busy: bool,
}

impl<'a> LockPanel<'a> {
    /// Create a panel filtered on `submitted`. Call [`reload`](Self::reload) to fetch.
    pub fn new(repo: &'a dyn MarksRepository, page_size: u32) -> Self {
        Self {
            repo,
            filter: MarkStatus::Submitted,
            page: 1,
            page_size: page_size.max(1),
            records: Vec::new(),
            status_counts: StatusCounts::default(),
            total_pages: 1,
            selection: Selection::new(),
            busy: false,
        }
    }

    /// Active status filter
    pub const fn filter(&self) -> MarkStatus {
        self.filter
    }

    /// Current 1-based page
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Pages available for the active filter
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Records on the loaded page
    pub fn records(&self) -> &[InternalMark] {
        &self.records
    }

    /// Badge counts per status
    pub const fn status_counts(&self) -> &StatusCounts {
        &self.status_counts
    }

    /// Current selection
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// An action is in flight; controls should be disabled
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Fetch the active page again.
    ///
    /// Selected ids that are no longer on the page in the filtered status
    /// are dropped.
    pub async fn reload(&mut self) -> Result<()> {
        let query = MarksQuery {
            page: self.page,
            ..MarksQuery::for_status(self.filter, self.page_size)
        };
        let page = self.repo.list_marks(Actor::Admin, &query).await?;
        debug!(
            filter = %self.filter,
            page = self.page,
            count = page.records.len(),
            "reloaded lock panel"
        );

        self.records = page.records;
        self.status_counts = page.status_counts;
        self.total_pages = page.total_pages;

        let filter = self.filter;
        let records = &self.records;
        self.selection
            .retain(|id| records.iter().any(|r| r.id == id && r.status == filter));
        Ok(())
    }

    /// Switch the status bucket. Clears the selection and returns to page 1.
    pub async fn set_filter(&mut self, status: MarkStatus) -> Result<()> {
        if status != self.filter {
            self.selection.clear();
        }
        self.filter = status;
        self.page = 1;
        self.reload().await
    }

    /// Move to another page. The page boundary is a selection boundary.
    ///
    /// A page outside `1..=total_pages` is refused and nothing changes.
    pub async fn set_page(&mut self, page: u32) -> Result<()> {
        let last = self.total_pages.max(1);
        if !(1..=last).contains(&page) {
            return Err(Error::Validation(format!(
                "page {page} is out of range (1..={last})"
            )));
        }
        if page != self.page {
            self.selection.clear();
        }
        self.page = page;
        self.reload().await
    }

    /// Flip selection of a row on the loaded page
    pub fn toggle(&mut self, id: MarkId) -> Result<bool> {
        if !self.records.iter().any(|r| r.id == id) {
            return Err(Error::Validation(format!(
                "mark {id} is not on the loaded {} page",
                self.filter
            )));
        }
        Ok(self.selection.toggle(id))
    }

    /// Select every loaded row, or none if all are selected
    pub fn toggle_all(&mut self) {
        let ids: Vec<MarkId> = self.records.iter().map(|r| r.id).collect();
        self.selection.toggle_all(&ids);
    }

    /// Action offered for the active filter
    pub fn offered_action(&self) -> Option<MarkAction> {
        self.filter
            .next_action()
            .filter(|&action| authorize(self.filter, action, Actor::Admin).is_ok())
    }

    /// Apply the offered action to the selection.
    ///
    /// Publish asks for confirmation first; declining sends nothing and
    /// keeps the selection. Any completed request, full or partial, clears
    /// the selection and reloads the page.
    pub async fn apply_offered_action(&mut self, interaction: &dyn Interaction) -> ActionOutcome {
        let Some(action) = self.offered_action() else {
            let err = Error::Validation(format!(
                "No bulk action is available for {} marks",
                self.filter
            ));
            return report_failure(interaction, "Action failed", err).await;
        };
        let fallback = format!("Failed to {action} marks");

        if self.busy {
            return report_failure(interaction, &fallback, Error::Busy).await;
        }

        let ids = match check_batch(&self.records, self.selection.ids(), action) {
            Ok(ids) => ids,
            Err(e) => return report_failure(interaction, &fallback, e).await,
        };

        if action.requires_confirmation() {
            let prompt = format!(
                "Publish {} selected results? Students will be able to view them.",
                ids.len()
            );
            match interaction.confirm(&prompt).await {
                Ok(true) => {}
                Ok(false) => {
                    debug!(%action, "confirmation declined");
                    return ActionOutcome::Cancelled;
                }
                Err(e) => return report_failure(interaction, &fallback, e).await,
            }
        }

        let repo = self.repo;
        let result = {
            let _busy = BusyGuard::hold(&mut self.busy);
            repo.bulk_transition(&ids, action).await
        };

        match result {
            Ok(outcome) => {
                interaction.notify(&Notice::Transitioned(outcome)).await;
                self.selection.clear();
                if let Err(e) = self.reload().await {
                    report_failure(interaction, "Failed to reload marks", e).await;
                }
                ActionOutcome::Transitioned(outcome)
            }
            Err(e) => report_failure(interaction, &fallback, e).await,
        }
    }
}
