//! Admin commands - review, lock and publish marks

use crate::cli::style::{Stylize, spinner_style};
use crate::cli::{CliInteraction, print_marks, print_status_tabs};
use anstream::println;
use dialoguer::MultiSelect;
use indicatif::ProgressBar;
use marksflow::api::MarksRepository;
use marksflow::error::{Error, Result};
use marksflow::surface::LockPanel;
use marksflow::types::{MarkAction, MarkId, MarkStatus};
use std::time::Duration;

/// Filter tab order in the admin panel
const ADMIN_TABS: [MarkStatus; 4] = [
    MarkStatus::Submitted,
    MarkStatus::Locked,
    MarkStatus::Published,
    MarkStatus::Draft,
];

/// How rows get selected for a bulk action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminSelection {
    /// Every row on the loaded page
    All,
    /// Explicit ids, all of which must be on the loaded page
    Ids(Vec<MarkId>),
    /// Pick rows in a checklist
    Interactive,
}

async fn open_panel<'a>(
    repo: &'a dyn MarksRepository,
    page_size: u32,
    status: MarkStatus,
    page: u32,
) -> Result<LockPanel<'a>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!("Loading {status} marks..."));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let mut panel = LockPanel::new(repo, page_size);
    let loaded = async {
        panel.set_filter(status).await?;
        if page != 1 {
            panel.set_page(page).await?;
        }
        Ok::<_, Error>(())
    }
    .await;
    spinner.finish_and_clear();
    loaded?;
    Ok(panel)
}

fn print_panel(panel: &LockPanel<'_>) {
    print_status_tabs(panel.status_counts(), Some(panel.filter()), &ADMIN_TABS);
    if panel.records().is_empty() {
        println!("{}", format!("No {} marks found", panel.filter()).muted());
        return;
    }
    let selection = panel.selection();
    let is_selected: &dyn Fn(MarkId) -> bool = &|id| selection.contains(id);
    print_marks(panel.records(), Some(is_selected));
    println!();
    println!(
        "{}",
        format!("Page {} of {}", panel.page(), panel.total_pages()).muted()
    );
}

/// Run `admin list`
pub async fn run_admin_list(
    repo: &dyn MarksRepository,
    page_size: u32,
    status: MarkStatus,
    page: u32,
) -> Result<bool> {
    let panel = open_panel(repo, page_size, status, page).await?;
    print_panel(&panel);
    if let Some(action) = panel.offered_action() {
        println!(
            "{}",
            format!("Available action on this page: {action} (marksflow admin {action})").muted()
        );
    }
    Ok(true)
}

/// Run `admin lock` / `admin publish`
///
/// Returns whether the action completed; cancellation counts as success.
pub async fn run_admin_action(
    repo: &dyn MarksRepository,
    page_size: u32,
    action: MarkAction,
    page: u32,
    selection: AdminSelection,
    assume_yes: bool,
) -> Result<bool> {
    let mut panel = open_panel(repo, page_size, action.source(), page).await?;

    if panel.records().is_empty() {
        println!("{}", format!("No {} marks found", panel.filter()).muted());
        return Ok(true);
    }

    match selection {
        AdminSelection::All => panel.toggle_all(),
        AdminSelection::Ids(ids) => {
            for id in ids {
                if !panel.selection().contains(id) {
                    panel.toggle(id)?;
                }
            }
        }
        AdminSelection::Interactive => {
            for id in interactive_select(&panel, action)? {
                panel.toggle(id)?;
            }
        }
    }

    if panel.selection().is_empty() {
        println!("No marks selected, aborting");
        return Ok(true);
    }

    print_panel(&panel);
    println!();
    println!("{} marks selected", panel.selection().len().accent());

    let interaction = CliInteraction::new(assume_yes);
    let outcome = panel.apply_offered_action(&interaction).await;
    if outcome.is_cancelled() {
        println!("Aborted");
        return Ok(true);
    }
    if !outcome.is_failed() {
        println!();
        print_status_tabs(panel.status_counts(), Some(panel.filter()), &ADMIN_TABS);
    }
    Ok(!outcome.is_failed())
}

/// Checklist of the loaded rows using dialoguer
fn interactive_select(panel: &LockPanel<'_>, action: MarkAction) -> Result<Vec<MarkId>> {
    let items: Vec<String> = panel
        .records()
        .iter()
        .map(|m| {
            format!(
                "#{} {} sem {} {} {} {}/{}",
                m.id,
                m.enrollment_number,
                m.semester,
                m.subject_code,
                m.mark_type,
                m.marks_obtained,
                m.max_marks
            )
        })
        .collect();

    let selections = MultiSelect::new()
        .with_prompt(format!(
            "Select marks to {action} (space to toggle, enter to confirm)"
        ))
        .items(&items)
        .interact()
        .map_err(|e| Error::Internal(format!("Failed to read selection: {e}")))?;

    Ok(selections
        .into_iter()
        .map(|i| panel.records()[i].id)
        .collect())
}
