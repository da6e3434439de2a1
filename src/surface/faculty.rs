//! Faculty marks entry (draft) and submission (draft → submitted)

use crate::api::MarksRepository;
use crate::error::{Error, Result};
use crate::lifecycle::{Actor, check_batch};
use crate::surface::{ActionOutcome, BusyGuard, Interaction, Notice, report_failure};
use crate::types::{
    DEFAULT_MAX_MARKS, InternalMark, MAX_SEMESTER, MarkAction, MarkId, MarkStatus, MarkType,
    MarksQuery, NewMarkEntry, StatusCounts, Student,
};
use std::collections::BTreeMap;
use tracing::debug;

/// What happened to one keyed-in value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryInput {
    /// Value within `[0, max_marks]`, stored
    Stored(f64),
    /// Blank input, entry removed
    Cleared,
    /// Non-numeric or out of range, entry removed
    Discarded,
}

/// Marks being keyed in for one (semester, subject, mark type) combination.
///
/// A student without a stored value is absent from the batch; that means
/// "no opinion yet" and is distinct from a zero score.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryForm {
    semester: u8,
    subject_code: String,
    mark_type: MarkType,
    max_marks: f64,
    entries: BTreeMap<i64, f64>,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self {
            semester: 1,
            subject_code: String::new(),
            mark_type: MarkType::Mse1,
            max_marks: DEFAULT_MAX_MARKS,
            entries: BTreeMap::new(),
        }
    }
}

impl EntryForm {
    /// Semester (1..=8)
    pub const fn semester(&self) -> u8 {
        self.semester
    }

    /// Subject code
    pub fn subject_code(&self) -> &str {
        &self.subject_code
    }

    /// Assessment kind
    pub const fn mark_type(&self) -> MarkType {
        self.mark_type
    }

    /// Maximum score
    pub const fn max_marks(&self) -> f64 {
        self.max_marks
    }

    /// Stored values by enrollment number
    pub const fn entries(&self) -> &BTreeMap<i64, f64> {
        &self.entries
    }

    /// Set the semester
    pub fn set_semester(&mut self, semester: u8) -> Result<()> {
        if !(1..=MAX_SEMESTER).contains(&semester) {
            return Err(Error::Validation(format!(
                "semester must be between 1 and {MAX_SEMESTER}"
            )));
        }
        self.semester = semester;
        Ok(())
    }

    /// Set the subject code (trimmed)
    pub fn set_subject_code(&mut self, subject_code: &str) {
        self.subject_code = subject_code.trim().to_string();
    }

    /// Set the assessment kind
    pub const fn set_mark_type(&mut self, mark_type: MarkType) {
        self.mark_type = mark_type;
    }

    /// Set the maximum score. Stored values above the new maximum are dropped.
    pub fn set_max_marks(&mut self, max_marks: f64) -> Result<()> {
        if !max_marks.is_finite() || max_marks <= 0.0 {
            return Err(Error::Validation(format!(
                "max marks must be positive, got {max_marks}"
            )));
        }
        self.max_marks = max_marks;
        self.entries.retain(|_, v| *v <= max_marks);
        Ok(())
    }

    /// Key in a value for one student.
    ///
    /// Input outside `[0, max_marks]` or not a number is not stored and
    /// leaves the student absent; it is never clamped.
    pub fn set_mark(&mut self, enrollment_number: i64, raw: &str) -> EntryInput {
        let raw = raw.trim();
        if raw.is_empty() {
            self.entries.remove(&enrollment_number);
            return EntryInput::Cleared;
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() && (0.0..=self.max_marks).contains(&value) => {
                self.entries.insert(enrollment_number, value);
                EntryInput::Stored(value)
            }
            _ => {
                debug!(enrollment_number, raw, "discarding out-of-range input");
                self.entries.remove(&enrollment_number);
                EntryInput::Discarded
            }
        }
    }

    /// Forget every keyed-in value, keeping the header fields
    pub fn clear_marks(&mut self) {
        self.entries.clear();
    }

    /// Creation payload for the stored values
    pub fn batch(&self) -> Vec<NewMarkEntry> {
        self.entries
            .iter()
            .map(|(&enrollment_number, &marks_obtained)| NewMarkEntry {
                enrollment_number,
                semester: self.semester,
                subject_code: self.subject_code.clone(),
                mark_type: self.mark_type,
                marks_obtained,
                max_marks: self.max_marks,
            })
            .collect()
    }
}

/// Faculty workspace: entry form plus the faculty's own marks listing
pub struct FacultyDesk<'a> {
    repo: &'a dyn MarksRepository,
    form: EntryForm,
    filter: Option<MarkStatus>,
    page_size: u32,
    records: Vec<InternalMark>,
    status_counts: StatusCounts,
    students: Vec<Student>,
    busy: bool,
}

impl<'a> FacultyDesk<'a> {
    /// Create a desk listing every status. Call [`load`](Self::load) to fetch.
    pub fn new(repo: &'a dyn MarksRepository, page_size: u32) -> Self {
        Self {
            repo,
            form: EntryForm::default(),
            filter: None,
            page_size: page_size.max(1),
            records: Vec::new(),
            status_counts: StatusCounts::default(),
            students: Vec::new(),
            busy: false,
        }
    }

    /// Entry form
    pub const fn form(&self) -> &EntryForm {
        &self.form
    }

    /// Entry form, for editing
    pub const fn form_mut(&mut self) -> &mut EntryForm {
        &mut self.form
    }

    /// Active status filter (`None` = all)
    pub const fn filter(&self) -> Option<MarkStatus> {
        self.filter
    }

    /// Loaded marks
    pub fn records(&self) -> &[InternalMark] {
        &self.records
    }

    /// Badge counts per status
    pub const fn status_counts(&self) -> &StatusCounts {
        &self.status_counts
    }

    /// Loaded cohort
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// An action is in flight; controls should be disabled
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Ids of loaded records still in draft
    pub fn loaded_drafts(&self) -> Vec<MarkId> {
        self.records
            .iter()
            .filter(|r| r.status == MarkStatus::Draft)
            .map(|r| r.id)
            .collect()
    }

    /// Fetch the faculty's marks for the active filter
    pub async fn load(&mut self) -> Result<()> {
        let query = MarksQuery {
            status: self.filter,
            page: 1,
            page_size: self.page_size,
            semester: None,
            subject_code: None,
        };
        let page = self.repo.list_marks(Actor::Faculty, &query).await?;
        debug!(filter = ?self.filter, count = page.records.len(), "loaded faculty marks");
        self.records = page.records;
        self.status_counts = page.status_counts;
        Ok(())
    }

    /// Switch the status filter and reload
    pub async fn set_filter(&mut self, status: Option<MarkStatus>) -> Result<()> {
        self.filter = status;
        self.load().await
    }

    /// Fetch the students marks can be entered for
    pub async fn load_students(&mut self) -> Result<&[Student]> {
        self.students = self.repo.list_students().await?;
        Ok(&self.students)
    }

    /// Save the entry form as a draft batch.
    ///
    /// Needs a subject code and at least one stored value; otherwise nothing
    /// is sent and the reason is reported.
    pub async fn save_as_draft(&mut self, interaction: &dyn Interaction) -> ActionOutcome {
        const FALLBACK: &str = "Failed to save marks";

        if self.busy {
            return report_failure(interaction, FALLBACK, Error::Busy).await;
        }
        if self.form.subject_code.is_empty() {
            let err = Error::Validation("Please enter subject code".to_string());
            return report_failure(interaction, FALLBACK, err).await;
        }
        if self.form.entries.is_empty() {
            let err = Error::Validation("Please enter marks for at least one student".to_string());
            return report_failure(interaction, FALLBACK, err).await;
        }

        let batch = self.form.batch();
        let repo = self.repo;
        let result = {
            let _busy = BusyGuard::hold(&mut self.busy);
            repo.create_draft_batch(&batch).await
        };

        match result {
            Ok(total_records) => {
                interaction
                    .notify(&Notice::DraftsSaved { total_records })
                    .await;
                self.form.clear_marks();
                if let Err(e) = self.load().await {
                    report_failure(interaction, "Failed to reload marks", e).await;
                }
                ActionOutcome::Saved { total_records }
            }
            Err(e) => report_failure(interaction, FALLBACK, e).await,
        }
    }

    /// Submit every loaded draft for review.
    ///
    /// Works on the loaded listing, not on the entry form. Asks for
    /// confirmation; declining sends nothing.
    pub async fn submit_drafts(&mut self, interaction: &dyn Interaction) -> ActionOutcome {
        const FALLBACK: &str = "Failed to submit marks";

        if self.busy {
            return report_failure(interaction, FALLBACK, Error::Busy).await;
        }
        let drafts = self.loaded_drafts();
        if drafts.is_empty() {
            let err = Error::Validation("No draft marks to submit".to_string());
            return report_failure(interaction, FALLBACK, err).await;
        }
        let ids = match check_batch(&self.records, &drafts, MarkAction::Submit) {
            Ok(ids) => ids,
            Err(e) => return report_failure(interaction, FALLBACK, e).await,
        };

        let prompt = format!(
            "Submit {} draft marks for university approval?",
            ids.len()
        );
        match interaction.confirm(&prompt).await {
            Ok(true) => {}
            Ok(false) => {
                debug!("submit confirmation declined");
                return ActionOutcome::Cancelled;
            }
            Err(e) => return report_failure(interaction, FALLBACK, e).await,
        }

        let repo = self.repo;
        let result = {
            let _busy = BusyGuard::hold(&mut self.busy);
            repo.bulk_transition(&ids, MarkAction::Submit).await
        };

        match result {
            Ok(outcome) => {
                interaction.notify(&Notice::Transitioned(outcome)).await;
                if let Err(e) = self.load().await {
                    report_failure(interaction, "Failed to reload marks", e).await;
                }
                ActionOutcome::Transitioned(outcome)
            }
            Err(e) => report_failure(interaction, FALLBACK, e).await,
        }
    }
}
