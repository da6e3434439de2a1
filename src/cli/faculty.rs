//! Faculty commands - enter marks as drafts and submit them

use crate::cli::style::{Stylize, caution, spinner_style};
use crate::cli::{CliInteraction, print_marks, print_status_tabs};
use anstream::println;
use dialoguer::Input;
use indicatif::ProgressBar;
use marksflow::api::MarksRepository;
use marksflow::error::{Error, Result};
use marksflow::surface::{EntryInput, FacultyDesk};
use marksflow::types::{MarkStatus, MarkType};
use std::time::Duration;

/// Options for `faculty enter`
#[derive(Debug, Clone)]
pub struct EntryOptions {
    /// Semester (1..=8)
    pub semester: u8,
    /// Subject code
    pub subject_code: String,
    /// Assessment kind
    pub mark_type: MarkType,
    /// Maximum score
    pub max_marks: f64,
    /// `(enrollment, raw value)` pairs from `--mark`; empty means prompt per student
    pub marks: Vec<(i64, String)>,
}

/// Parse a `--mark ENROLLMENT=VALUE` argument
pub fn parse_mark_arg(arg: &str) -> std::result::Result<(i64, String), String> {
    let (enrollment, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected ENROLLMENT=VALUE, got '{arg}'"))?;
    let enrollment = enrollment
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid enrollment number '{enrollment}': {e}"))?;
    Ok((enrollment, value.trim().to_string()))
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn print_desk(desk: &FacultyDesk<'_>) {
    print_status_tabs(desk.status_counts(), desk.filter(), &MarkStatus::ALL);
    if desk.records().is_empty() {
        println!("{}", "No marks found".muted());
    } else {
        print_marks(desk.records(), None);
    }
}

/// Run `faculty list`
pub async fn run_faculty_list(
    repo: &dyn MarksRepository,
    page_size: u32,
    status: Option<MarkStatus>,
) -> Result<bool> {
    let mut desk = FacultyDesk::new(repo, page_size);
    let sp = spinner("Loading marks...");
    let loaded = desk.set_filter(status).await;
    sp.finish_and_clear();
    loaded?;

    print_desk(&desk);
    let drafts = desk.status_counts().get(MarkStatus::Draft);
    if drafts > 0 {
        println!();
        println!(
            "{}",
            format!("{drafts} drafts can be submitted with: marksflow faculty submit").muted()
        );
    }
    Ok(true)
}

/// Run `faculty students`
pub async fn run_faculty_students(repo: &dyn MarksRepository, page_size: u32) -> Result<bool> {
    let mut desk = FacultyDesk::new(repo, page_size);
    let sp = spinner("Loading students...");
    let loaded = desk.load_students().await.map(<[_]>::len);
    sp.finish_and_clear();
    let count = loaded?;

    if count == 0 {
        println!("{}", "No students found".muted());
        return Ok(true);
    }
    for student in desk.students() {
        println!("{:>12}  {}", student.enrollment_number, student.student_name);
    }
    Ok(true)
}

/// Run `faculty enter`
pub async fn run_faculty_enter(
    repo: &dyn MarksRepository,
    page_size: u32,
    options: EntryOptions,
) -> Result<bool> {
    let mut desk = FacultyDesk::new(repo, page_size);
    {
        let form = desk.form_mut();
        form.set_semester(options.semester)?;
        form.set_subject_code(&options.subject_code);
        form.set_mark_type(options.mark_type);
        form.set_max_marks(options.max_marks)?;
    }

    println!(
        "{} semester {}, {} {}, out of {}",
        "Entering".emphasis(),
        desk.form().semester(),
        desk.form().subject_code().accent(),
        desk.form().mark_type(),
        desk.form().max_marks()
    );

    if options.marks.is_empty() {
        prompt_for_cohort(&mut desk).await?;
    } else {
        for (enrollment, raw) in &options.marks {
            report_input(*enrollment, raw, desk.form_mut().set_mark(*enrollment, raw));
        }
    }

    println!(
        "{} marks ready to save as draft",
        desk.form().entries().len().accent()
    );
    let outcome = desk.save_as_draft(&CliInteraction::new(true)).await;
    Ok(!outcome.is_failed())
}

/// Prompt for every student in the cohort; blank skips the student
async fn prompt_for_cohort(desk: &mut FacultyDesk<'_>) -> Result<()> {
    let sp = spinner("Loading students...");
    let loaded = desk.load_students().await.map(<[_]>::to_vec);
    sp.finish_and_clear();
    let students = loaded?;

    if students.is_empty() {
        println!("{}", "No students found".muted());
        return Ok(());
    }

    let max = desk.form().max_marks();
    for student in students {
        let raw: String = Input::new()
            .with_prompt(format!(
                "{} {} (0-{max}, blank to skip)",
                student.enrollment_number, student.student_name
            ))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::Internal(format!("Failed to read input: {e}")))?;
        let result = desk.form_mut().set_mark(student.enrollment_number, &raw);
        report_input(student.enrollment_number, &raw, result);
    }
    Ok(())
}

fn report_input(enrollment: i64, raw: &str, result: EntryInput) {
    if result == EntryInput::Discarded {
        println!(
            "{} {enrollment}: '{raw}' ignored (not a number within range)",
            caution()
        );
    }
}

/// Run `faculty submit`
pub async fn run_faculty_submit(
    repo: &dyn MarksRepository,
    page_size: u32,
    assume_yes: bool,
) -> Result<bool> {
    let mut desk = FacultyDesk::new(repo, page_size);
    let sp = spinner("Loading drafts...");
    let loaded = desk.set_filter(Some(MarkStatus::Draft)).await;
    sp.finish_and_clear();
    loaded?;

    print_desk(&desk);
    println!();

    let loaded = desk.loaded_drafts().len() as u64;
    let remaining = desk
        .status_counts()
        .get(MarkStatus::Draft)
        .saturating_sub(loaded);
    if loaded > 0 && remaining > 0 {
        println!(
            "{}",
            format!("Only the first {loaded} drafts are loaded; run again for the other {remaining}")
                .muted()
        );
    }

    let outcome = desk.submit_drafts(&CliInteraction::new(assume_yes)).await;
    if outcome.is_cancelled() {
        println!("Aborted");
    }
    Ok(!outcome.is_failed())
}
