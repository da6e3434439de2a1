//! In-memory marks repository
//!
//! Applies transitions the way the backend does: only ids in the action's
//! source status move, and the reported count is what actually moved.

#![allow(dead_code)]

use async_trait::async_trait;
use marksflow::api::{MarksRepository, validate_draft_batch};
use marksflow::error::{Error, Result};
use marksflow::lifecycle::Actor;
use marksflow::types::{
    BulkOutcome, InternalMark, MarkAction, MarkId, MarkStatus, MarkType, MarksPage, MarksQuery,
    NewMarkEntry, StatusCounts, Student,
};
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

/// Recorded repository call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(Actor, MarksQuery),
    Create(Vec<NewMarkEntry>),
    Transition(Vec<MarkId>, MarkAction),
    Students,
}

#[derive(Default)]
struct State {
    marks: Vec<InternalMark>,
    students: Vec<Student>,
    calls: Vec<Call>,
    next_id: MarkId,
    refused: HashSet<MarkId>,
    reject_next: Option<String>,
    delay: Option<Duration>,
}

/// Mock repository
#[derive(Default)]
pub struct MockMarksRepository {
    state: Mutex<State>,
}

impl MockMarksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` marks in `status`, returning their ids
    pub fn seed(&self, status: MarkStatus, count: usize) -> Vec<MarkId> {
        let mut state = self.state.lock().unwrap();
        (0..count)
            .map(|_| {
                state.next_id += 1;
                let id = state.next_id;
                state.marks.push(mark(id, 2300 + id, status));
                id
            })
            .collect()
    }

    pub fn set_students(&self, students: Vec<Student>) {
        self.state.lock().unwrap().students = students;
    }

    /// The backend will not transition these ids (concurrent change)
    pub fn refuse(&self, ids: &[MarkId]) {
        self.state.lock().unwrap().refused.extend(ids);
    }

    /// The next request fails with this backend reason
    pub fn reject_next(&self, reason: &str) {
        self.state.lock().unwrap().reject_next = Some(reason.to_string());
    }

    /// Mutating requests wait this long before touching the store
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.state.lock().unwrap().delay = delay;
    }

    async fn wait(&self) {
        let delay = self.state.lock().unwrap().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    /// Move a mark behind the surface's back
    pub fn force_status(&self, id: MarkId, status: MarkStatus) {
        let mut state = self.state.lock().unwrap();
        if let Some(m) = state.marks.iter_mut().find(|m| m.id == id) {
            m.status = status;
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn transition_calls(&self) -> Vec<(Vec<MarkId>, MarkAction)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Transition(ids, action) => Some((ids, action)),
                _ => None,
            })
            .collect()
    }

    pub fn create_calls(&self) -> Vec<Vec<NewMarkEntry>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create(entries) => Some(entries),
                _ => None,
            })
            .collect()
    }

    pub fn list_call_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::List(..)))
            .count()
    }

    pub fn count(&self, status: MarkStatus) -> usize {
        self.state
            .lock()
            .unwrap()
            .marks
            .iter()
            .filter(|m| m.status == status)
            .count()
    }

    pub fn status_of(&self, id: MarkId) -> Option<MarkStatus> {
        self.state
            .lock()
            .unwrap()
            .marks
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.status)
    }

    fn take_rejection(state: &mut State) -> Result<()> {
        match state.reject_next.take() {
            Some(reason) => Err(Error::Rejected {
                status: 400,
                reason,
            }),
            None => Ok(()),
        }
    }
}

pub fn mark(id: MarkId, enrollment_number: i64, status: MarkStatus) -> InternalMark {
    InternalMark {
        id,
        enrollment_number,
        institute_id: Some(1),
        semester: 3,
        subject_code: "CS101".to_string(),
        subject_name: "Programming".to_string(),
        mark_type: MarkType::Mse1,
        marks_obtained: 40.0,
        max_marks: 50.0,
        status,
        entered_by: Some(7),
        created_at: None,
    }
}

#[async_trait]
impl MarksRepository for MockMarksRepository {
    async fn list_marks(&self, scope: Actor, query: &MarksQuery) -> Result<MarksPage> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::List(scope, query.clone()));
        Self::take_rejection(&mut state)?;

        let filtered: Vec<&InternalMark> = state
            .marks
            .iter()
            .filter(|m| query.status.is_none_or(|s| m.status == s))
            .collect();
        let page_size = query.page_size.max(1) as usize;
        let total_pages = filtered.len().div_ceil(page_size).max(1) as u32;
        let start = (query.page.max(1) as usize - 1) * page_size;
        let records = filtered
            .into_iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect();
        let status_counts: StatusCounts = state.marks.iter().map(|m| (m.status, 1)).collect();

        Ok(MarksPage {
            records,
            status_counts,
            total_pages,
        })
    }

    async fn create_draft_batch(&self, entries: &[NewMarkEntry]) -> Result<u64> {
        self.wait().await;
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create(entries.to_vec()));
        validate_draft_batch(entries)?;
        Self::take_rejection(&mut state)?;

        for entry in entries {
            state.next_id += 1;
            let id = state.next_id;
            state.marks.push(InternalMark {
                id,
                enrollment_number: entry.enrollment_number,
                institute_id: Some(1),
                semester: entry.semester,
                subject_code: entry.subject_code.clone(),
                subject_name: String::new(),
                mark_type: entry.mark_type,
                marks_obtained: entry.marks_obtained,
                max_marks: entry.max_marks,
                status: MarkStatus::Draft,
                entered_by: Some(7),
                created_at: None,
            });
        }
        Ok(entries.len() as u64)
    }

    async fn bulk_transition(&self, ids: &[MarkId], action: MarkAction) -> Result<BulkOutcome> {
        self.wait().await;
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Transition(ids.to_vec(), action));
        Self::take_rejection(&mut state)?;

        let refused = state.refused.clone();
        let mut succeeded = 0;
        for m in &mut state.marks {
            if ids.contains(&m.id) && m.status == action.source() && !refused.contains(&m.id) {
                m.status = action.target();
                succeeded += 1;
            }
        }
        Ok(BulkOutcome {
            action,
            requested: ids.len(),
            succeeded,
        })
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Students);
        Self::take_rejection(&mut state)?;
        Ok(state.students.clone())
    }
}
