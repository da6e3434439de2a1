//! Faculty entry and submission tests against an in-memory repository

mod common;

use common::{MockMarksRepository, ScriptedInteraction};
use marksflow::error::Error;
use marksflow::surface::{ActionOutcome, EntryInput, FacultyDesk, Notice};
use marksflow::types::{MarkAction, MarkStatus, MarkType, Student};
use std::time::Duration;
use tokio::time::timeout;

fn desk_with_cs101(repo: &MockMarksRepository) -> FacultyDesk<'_> {
    let mut desk = FacultyDesk::new(repo, 50);
    let form = desk.form_mut();
    form.set_semester(3).unwrap();
    form.set_subject_code("CS101");
    form.set_mark_type(MarkType::Mse1);
    form.set_max_marks(100.0).unwrap();
    desk
}

#[tokio::test]
async fn test_out_of_range_value_is_left_out_of_the_batch() {
    let repo = MockMarksRepository::new();
    let ui = ScriptedInteraction::accepting();
    let mut desk = desk_with_cs101(&repo);

    assert_eq!(desk.form_mut().set_mark(2301, "85"), EntryInput::Stored(85.0));
    assert_eq!(desk.form_mut().set_mark(2302, "92"), EntryInput::Stored(92.0));
    assert_eq!(desk.form_mut().set_mark(2303, "150"), EntryInput::Discarded);

    let outcome = desk.save_as_draft(&ui).await;
    assert!(matches!(outcome, ActionOutcome::Saved { total_records: 2 }));

    let batches = repo.create_calls();
    assert_eq!(batches.len(), 1);
    let enrollments: Vec<i64> = batches[0].iter().map(|e| e.enrollment_number).collect();
    assert_eq!(enrollments, vec![2301, 2302]);
    assert!(batches[0].iter().all(|e| e.semester == 3
        && e.subject_code == "CS101"
        && e.mark_type == MarkType::Mse1
        && (e.max_marks - 100.0).abs() < f64::EPSILON));
    assert_eq!(ui.notices(), vec![Notice::DraftsSaved { total_records: 2 }]);
}

#[tokio::test]
async fn test_save_clears_entries_and_reloads_listing() {
    let repo = MockMarksRepository::new();
    let ui = ScriptedInteraction::accepting();
    let mut desk = desk_with_cs101(&repo);
    desk.form_mut().set_mark(2301, "40");

    desk.save_as_draft(&ui).await;

    assert!(desk.form().entries().is_empty());
    assert_eq!(desk.form().subject_code(), "CS101");
    assert_eq!(desk.records().len(), 1);
    assert_eq!(desk.records()[0].status, MarkStatus::Draft);
    assert_eq!(desk.status_counts().get(MarkStatus::Draft), 1);
}

#[tokio::test]
async fn test_save_requires_subject_code() {
    let repo = MockMarksRepository::new();
    let ui = ScriptedInteraction::accepting();
    let mut desk = FacultyDesk::new(&repo, 50);
    desk.form_mut().set_subject_code("   ");
    desk.form_mut().set_mark(2301, "40");

    let outcome = desk.save_as_draft(&ui).await;
    assert!(matches!(outcome, ActionOutcome::Failed(Error::Validation(_))));
    assert_eq!(ui.failures(), vec!["Please enter subject code"]);
    assert!(repo.create_calls().is_empty());
    assert_eq!(desk.form().entries().len(), 1);
}

#[tokio::test]
async fn test_save_requires_at_least_one_mark() {
    let repo = MockMarksRepository::new();
    let ui = ScriptedInteraction::accepting();
    let mut desk = desk_with_cs101(&repo);
    desk.form_mut().set_mark(2301, "abc");

    let outcome = desk.save_as_draft(&ui).await;
    assert!(outcome.is_failed());
    assert_eq!(
        ui.failures(),
        vec!["Please enter marks for at least one student"]
    );
    assert!(repo.create_calls().is_empty());
}

#[tokio::test]
async fn test_rejected_batch_keeps_entries() {
    let repo = MockMarksRepository::new();
    let ui = ScriptedInteraction::accepting();
    let mut desk = desk_with_cs101(&repo);
    desk.form_mut().set_mark(2301, "40");
    repo.reject_next("Student not found in your institute");

    let outcome = desk.save_as_draft(&ui).await;
    assert!(matches!(outcome, ActionOutcome::Failed(Error::Rejected { .. })));
    assert_eq!(ui.failures(), vec!["Student not found in your institute"]);
    assert_eq!(desk.form().entries().len(), 1);
    assert_eq!(repo.count(MarkStatus::Draft), 0);
}

#[tokio::test]
async fn test_submit_drafts_asks_first() {
    let repo = MockMarksRepository::new();
    repo.seed(MarkStatus::Draft, 3);
    let ui = ScriptedInteraction::declining();

    let mut desk = FacultyDesk::new(&repo, 50);
    desk.load().await.unwrap();

    let outcome = desk.submit_drafts(&ui).await;
    assert!(outcome.is_cancelled());
    assert_eq!(
        ui.prompts(),
        vec!["Submit 3 draft marks for university approval?"]
    );
    assert!(repo.transition_calls().is_empty());
    assert_eq!(repo.count(MarkStatus::Draft), 3);
}

#[tokio::test]
async fn test_submit_drafts_moves_only_drafts() {
    let repo = MockMarksRepository::new();
    let drafts = repo.seed(MarkStatus::Draft, 2);
    repo.seed(MarkStatus::Locked, 1);
    let ui = ScriptedInteraction::accepting();

    let mut desk = FacultyDesk::new(&repo, 50);
    desk.load().await.unwrap();

    let outcome = desk.submit_drafts(&ui).await;
    assert!(matches!(outcome, ActionOutcome::Transitioned(o) if o.succeeded == 2));
    assert_eq!(repo.transition_calls(), vec![(drafts, MarkAction::Submit)]);
    assert_eq!(repo.count(MarkStatus::Submitted), 2);
    assert_eq!(repo.count(MarkStatus::Locked), 1);

    // listing reflects the new state
    assert!(desk.loaded_drafts().is_empty());
    assert_eq!(desk.status_counts().get(MarkStatus::Submitted), 2);
    assert_eq!(ui.notices()[0].to_string(), "Successfully submitted 2 marks");
}

#[tokio::test]
async fn test_submit_without_loaded_drafts_fails_locally() {
    let repo = MockMarksRepository::new();
    repo.seed(MarkStatus::Draft, 2);
    let ui = ScriptedInteraction::accepting();

    let mut desk = FacultyDesk::new(&repo, 50);
    desk.set_filter(Some(MarkStatus::Submitted)).await.unwrap();

    let outcome = desk.submit_drafts(&ui).await;
    assert!(outcome.is_failed());
    assert_eq!(ui.failures(), vec!["No draft marks to submit"]);
    assert!(ui.prompts().is_empty());
    assert!(repo.transition_calls().is_empty());
}

#[tokio::test]
async fn test_full_lifecycle_from_entry_to_submission() {
    let repo = MockMarksRepository::new();
    let ui = ScriptedInteraction::accepting();
    let mut desk = desk_with_cs101(&repo);

    desk.form_mut().set_mark(2301, "85");
    desk.form_mut().set_mark(2302, "92");
    desk.save_as_draft(&ui).await;
    assert_eq!(desk.loaded_drafts().len(), 2);

    desk.submit_drafts(&ui).await;
    assert_eq!(repo.count(MarkStatus::Draft), 0);
    assert_eq!(repo.count(MarkStatus::Submitted), 2);
    assert!(ui.failures().is_empty());
}

#[tokio::test]
async fn test_load_students() {
    let repo = MockMarksRepository::new();
    repo.set_students(vec![
        Student {
            enrollment_number: 2301,
            student_name: "Asha Rao".to_string(),
        },
        Student {
            enrollment_number: 2302,
            student_name: "Vikram Nair".to_string(),
        },
    ]);

    let mut desk = FacultyDesk::new(&repo, 50);
    let students = desk.load_students().await.unwrap();
    assert_eq!(students.len(), 2);
    assert_eq!(desk.students()[1].student_name, "Vikram Nair");
}

#[tokio::test]
async fn test_abandoned_save_and_submit_release_busy_flag() {
    let repo = MockMarksRepository::new();
    repo.seed(MarkStatus::Draft, 2);
    repo.set_delay(Some(Duration::from_secs(5)));
    let ui = ScriptedInteraction::accepting();
    let mut desk = desk_with_cs101(&repo);
    desk.load().await.unwrap();
    desk.form_mut().set_mark(2301, "85");

    let abandoned = timeout(Duration::from_millis(50), desk.save_as_draft(&ui)).await;
    assert!(abandoned.is_err());
    assert!(!desk.is_busy());
    assert_eq!(desk.form().entries().len(), 1);

    let abandoned = timeout(Duration::from_millis(50), desk.submit_drafts(&ui)).await;
    assert!(abandoned.is_err());
    assert!(!desk.is_busy());

    repo.set_delay(None);
    let outcome = desk.submit_drafts(&ui).await;
    assert!(matches!(outcome, ActionOutcome::Transitioned(o) if o.succeeded == 2));
}
