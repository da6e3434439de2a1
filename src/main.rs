//! marksflow - internal marks lifecycle
//!
//! CLI binary for entering, submitting, locking and publishing internal marks.

use anyhow::Result;
use clap::{Parser, Subcommand};
use marksflow::api::create_repository;
use marksflow::config::Config;
use marksflow::types::{MarkAction, MarkId, MarkStatus, MarkType};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "marksflow")]
#[command(about = "Internal marks workflow - draft, submit, lock, publish")]
#[command(version)]
struct Cli {
    /// Path to config file (defaults to <config dir>/marksflow/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API root, e.g. http://localhost:8080/api
    #[arg(long, global = true, env = "MARKSFLOW_API_BASE")]
    api_base: Option<String>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review, lock and publish marks (admin)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Enter and submit marks (faculty)
    Faculty {
        #[command(subcommand)]
        action: FacultyAction,
    },

    /// Authentication management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(clap::Args)]
struct SelectArgs {
    /// Page of the status bucket to act on
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Select every mark on the page
    #[arg(long, group = "selection")]
    all: bool,

    /// Comma-separated mark ids on the page
    #[arg(long, value_delimiter = ',', group = "selection")]
    ids: Vec<MarkId>,
}

#[derive(Subcommand)]
enum AdminAction {
    /// List marks in one status bucket
    List {
        /// Status bucket
        #[arg(long, short, default_value = "submitted", value_parser = parse_status)]
        status: MarkStatus,

        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Lock submitted marks (interactive selection unless --all/--ids)
    Lock {
        #[command(flatten)]
        select: SelectArgs,
    },

    /// Publish locked marks (interactive selection unless --all/--ids)
    Publish {
        #[command(flatten)]
        select: SelectArgs,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum FacultyAction {
    /// List your marks
    List {
        /// Only this status
        #[arg(long, short, value_parser = parse_status)]
        status: Option<MarkStatus>,
    },

    /// List the students you can enter marks for
    Students,

    /// Enter marks for one subject and assessment, saved as drafts
    Enter {
        /// Semester (1-8)
        #[arg(long, default_value_t = 1)]
        semester: u8,

        /// Subject code, e.g. CS101
        #[arg(long)]
        subject: String,

        /// Assessment: MSE1, MSE2, MSE3, Assignment, Practical, Quiz
        #[arg(long = "type", default_value = "MSE1", value_parser = parse_mark_type)]
        mark_type: MarkType,

        /// Maximum marks
        #[arg(long, default_value_t = 100.0)]
        max: f64,

        /// ENROLLMENT=VALUE, repeatable; prompts per student when omitted
        #[arg(long = "mark", value_parser = cli::parse_mark_arg)]
        marks: Vec<(i64, String)>,
    },

    /// Submit the loaded draft marks (first page, `faculty_page_size` rows) for approval
    Submit {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Show where the token comes from
    Status,
    /// Show authentication setup instructions
    Setup,
}

fn parse_status(s: &str) -> std::result::Result<MarkStatus, String> {
    s.parse().map_err(|e: marksflow::error::Error| e.to_string())
}

fn parse_mark_type(s: &str) -> std::result::Result<MarkType, String> {
    s.parse().map_err(|e: marksflow::error::Error| e.to_string())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "marksflow=debug" } else { "marksflow=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn admin_selection(select: SelectArgs) -> cli::AdminSelection {
    if select.all {
        cli::AdminSelection::All
    } else if select.ids.is_empty() {
        cli::AdminSelection::Interactive
    } else {
        cli::AdminSelection::Ids(select.ids)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?.with_api_base(cli.api_base);
    config.validate()?;

    let ok = match cli.command {
        Commands::Auth { action } => {
            let action_str = match action {
                AuthAction::Status => "status",
                AuthAction::Setup => "setup",
            };
            cli::run_auth(&config, action_str).await?;
            true
        }
        Commands::Admin { action } => {
            let repo = create_repository(&config).await?;
            let page_size = config.admin_page_size;
            match action {
                AdminAction::List { status, page } => {
                    cli::run_admin_list(repo.as_ref(), page_size, status, page).await?
                }
                AdminAction::Lock { select } => {
                    cli::run_admin_action(
                        repo.as_ref(),
                        page_size,
                        MarkAction::Lock,
                        select.page,
                        admin_selection(select),
                        false,
                    )
                    .await?
                }
                AdminAction::Publish { select, yes } => {
                    cli::run_admin_action(
                        repo.as_ref(),
                        page_size,
                        MarkAction::Publish,
                        select.page,
                        admin_selection(select),
                        yes,
                    )
                    .await?
                }
            }
        }
        Commands::Faculty { action } => {
            let repo = create_repository(&config).await?;
            let page_size = config.faculty_page_size;
            match action {
                FacultyAction::List { status } => {
                    cli::run_faculty_list(repo.as_ref(), page_size, status).await?
                }
                FacultyAction::Students => cli::run_faculty_students(repo.as_ref(), page_size).await?,
                FacultyAction::Enter {
                    semester,
                    subject,
                    mark_type,
                    max,
                    marks,
                } => {
                    cli::run_faculty_enter(
                        repo.as_ref(),
                        page_size,
                        cli::EntryOptions {
                            semester,
                            subject_code: subject,
                            mark_type,
                            max_marks: max,
                            marks,
                        },
                    )
                    .await?
                }
                FacultyAction::Submit { yes } => {
                    cli::run_faculty_submit(repo.as_ref(), page_size, yes).await?
                }
            }
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
