//! CLI command implementations

mod admin;
mod auth;
mod faculty;
mod interaction;
mod style;

pub use admin::{AdminSelection, run_admin_action, run_admin_list};
pub use auth::run_auth;
pub use faculty::{
    EntryOptions, parse_mark_arg, run_faculty_enter, run_faculty_list, run_faculty_students,
    run_faculty_submit,
};
pub use interaction::CliInteraction;

use anstream::println;
use marksflow::types::{InternalMark, MarkStatus, StatusCounts};
use style::Stylize;

/// Print filter tabs with their badge counts, highlighting the active one
fn print_status_tabs(counts: &StatusCounts, active: Option<MarkStatus>, order: &[MarkStatus]) {
    let tabs: Vec<String> = order
        .iter()
        .map(|&status| {
            let label = format!("{status} ({})", counts.get(status));
            if Some(status) == active {
                format!("[{}]", label.emphasis())
            } else {
                label.muted()
            }
        })
        .collect();
    println!("{}", tabs.join("  "));
    println!();
}

/// Print marks as a table, with a selection column when `selected` is given
fn print_marks(records: &[InternalMark], selected: Option<&dyn Fn(i64) -> bool>) {
    println!(
        "{}",
        format!(
            "{:>3} {:>8} {:>12} {:>4} {:<10} {:<11} {:>11} {:<10}",
            "", "ID", "ENROLLMENT", "SEM", "SUBJECT", "TYPE", "MARKS", "STATUS"
        )
        .muted()
    );
    for mark in records {
        let marker = match selected {
            Some(is_selected) if is_selected(mark.id) => "[x]",
            Some(_) => "[ ]",
            None => "",
        };
        println!(
            "{:>3} {:>8} {:>12} {:>4} {:<10} {:<11} {:>11} {:<10}",
            marker,
            mark.id,
            mark.enrollment_number,
            mark.semester,
            mark.subject_code,
            mark.mark_type,
            format!("{} / {}", mark.marks_obtained, mark.max_marks),
            mark.status
        );
    }
}
