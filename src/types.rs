//! Core types for the internal marks workflow

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Backend-assigned identifier of an internal mark
pub type MarkId = i64;

/// Default maximum marks when none is given
pub const DEFAULT_MAX_MARKS: f64 = 100.0;

/// Highest semester number
pub const MAX_SEMESTER: u8 = 8;

/// Lifecycle status of an internal mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkStatus {
    /// Entered by faculty, not yet forwarded
    Draft,
    /// Forwarded by faculty for review
    Submitted,
    /// Frozen by an admin, pending publication
    Locked,
    /// Visible to students (terminal)
    Published,
}

impl MarkStatus {
    /// Every status in lifecycle order
    pub const ALL: [Self; 4] = [Self::Draft, Self::Submitted, Self::Locked, Self::Published];

    /// Wire representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Locked => "locked",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for MarkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for MarkStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "locked" => Ok(Self::Locked),
            "published" => Ok(Self::Published),
            other => Err(Error::Parse(format!("unknown mark status: {other}"))),
        }
    }
}

/// Bulk action advancing marks one lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkAction {
    /// draft → submitted (faculty)
    Submit,
    /// submitted → locked (admin)
    Lock,
    /// locked → published (admin)
    Publish,
}

impl fmt::Display for MarkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submit => write!(f, "submit"),
            Self::Lock => write!(f, "lock"),
            Self::Publish => write!(f, "publish"),
        }
    }
}

/// Assessment kind an internal mark belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkType {
    /// Mid-semester exam 1
    #[serde(rename = "MSE1")]
    Mse1,
    /// Mid-semester exam 2
    #[serde(rename = "MSE2")]
    Mse2,
    /// Mid-semester exam 3
    #[serde(rename = "MSE3")]
    Mse3,
    /// Assignment
    Assignment,
    /// Practical
    Practical,
    /// Quiz
    Quiz,
}

impl MarkType {
    /// Every mark type, in the order offered to faculty
    pub const ALL: [Self; 6] = [
        Self::Mse1,
        Self::Mse2,
        Self::Mse3,
        Self::Assignment,
        Self::Practical,
        Self::Quiz,
    ];

    /// Wire representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mse1 => "MSE1",
            Self::Mse2 => "MSE2",
            Self::Mse3 => "MSE3",
            Self::Assignment => "Assignment",
            Self::Practical => "Practical",
            Self::Quiz => "Quiz",
        }
    }
}

impl fmt::Display for MarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for MarkType {
    type Err = Error;

    /// Accepts `MSE1`, `mse-1`, `MSE 1`, `assignment`, ...
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "mse1" => Ok(Self::Mse1),
            "mse2" => Ok(Self::Mse2),
            "mse3" => Ok(Self::Mse3),
            "assignment" => Ok(Self::Assignment),
            "practical" => Ok(Self::Practical),
            "quiz" => Ok(Self::Quiz),
            _ => Err(Error::Parse(format!("unknown mark type: {s}"))),
        }
    }
}

/// One assessment score for one student, subject and assessment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InternalMark {
    /// Backend identifier
    pub id: MarkId,
    /// Student identity
    pub enrollment_number: i64,
    /// Institute the student belongs to
    pub institute_id: Option<i64>,
    /// Semester (1..=8)
    pub semester: u8,
    /// Subject code, e.g. `CS101`
    pub subject_code: String,
    /// Subject display name
    pub subject_name: String,
    /// Assessment kind
    pub mark_type: MarkType,
    /// Score
    pub marks_obtained: f64,
    /// Maximum score
    pub max_marks: f64,
    /// Lifecycle status
    pub status: MarkStatus,
    /// Faculty user that entered the mark
    pub entered_by: Option<i64>,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
}

/// Count of marks per status, independent of the current page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts(BTreeMap<MarkStatus, u64>);

impl StatusCounts {
    /// Count for a status (zero when absent)
    pub fn get(&self, status: MarkStatus) -> u64 {
        self.0.get(&status).copied().unwrap_or(0)
    }

    /// Set the count for a status
    pub fn set(&mut self, status: MarkStatus, count: u64) {
        self.0.insert(status, count);
    }

    /// Sum over all statuses
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }
}

impl FromIterator<(MarkStatus, u64)> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = (MarkStatus, u64)>>(iter: I) -> Self {
        let mut counts = Self::default();
        for (status, count) in iter {
            *counts.0.entry(status).or_insert(0) += count;
        }
        counts
    }
}

/// One page of a marks listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarksPage {
    /// Records on this page
    pub records: Vec<InternalMark>,
    /// Per-status totals across all pages
    pub status_counts: StatusCounts,
    /// Number of pages for the active filter (at least 1)
    pub total_pages: u32,
}

/// Filter and paging for a marks listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarksQuery {
    /// Status filter; `None` lists every status
    pub status: Option<MarkStatus>,
    /// 1-based page number
    pub page: u32,
    /// Rows per page
    pub page_size: u32,
    /// Semester filter (faculty listing only)
    pub semester: Option<u8>,
    /// Subject filter (faculty listing only)
    pub subject_code: Option<String>,
}

impl MarksQuery {
    /// Query for the first page of one status bucket
    pub const fn for_status(status: MarkStatus, page_size: u32) -> Self {
        Self {
            status: Some(status),
            page: 1,
            page_size,
            semester: None,
            subject_code: None,
        }
    }
}

/// A mark to be created as a draft
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMarkEntry {
    /// Student identity
    pub enrollment_number: i64,
    /// Semester (1..=8)
    pub semester: u8,
    /// Subject code
    pub subject_code: String,
    /// Assessment kind
    pub mark_type: MarkType,
    /// Score
    pub marks_obtained: f64,
    /// Maximum score
    pub max_marks: f64,
}

impl NewMarkEntry {
    /// Check the entry before it is sent
    pub fn validate(&self) -> Result<()> {
        if self.subject_code.trim().is_empty() {
            return Err(Error::Validation("subject code is required".to_string()));
        }
        if !(1..=MAX_SEMESTER).contains(&self.semester) {
            return Err(Error::Validation(format!(
                "semester must be between 1 and {MAX_SEMESTER}, got {}",
                self.semester
            )));
        }
        if !self.max_marks.is_finite() || self.max_marks <= 0.0 {
            return Err(Error::Validation(format!(
                "max marks must be positive, got {}",
                self.max_marks
            )));
        }
        if !self.marks_obtained.is_finite()
            || self.marks_obtained < 0.0
            || self.marks_obtained > self.max_marks
        {
            return Err(Error::Validation(format!(
                "marks for {} must be between 0 and {}, got {}",
                self.enrollment_number, self.max_marks, self.marks_obtained
            )));
        }
        Ok(())
    }
}

/// Result of a bulk transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Action that was applied
    pub action: MarkAction,
    /// Number of ids sent
    pub requested: usize,
    /// Number of records the backend reports as transitioned
    pub succeeded: u64,
}

impl BulkOutcome {
    /// The backend transitioned fewer records than requested
    pub fn is_partial(&self) -> bool {
        self.succeeded < self.requested as u64
    }

    /// Requested records the backend did not report as transitioned
    pub fn unconfirmed(&self) -> u64 {
        (self.requested as u64).saturating_sub(self.succeeded)
    }
}

/// Student in the faculty's cohort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Student identity
    pub enrollment_number: i64,
    /// Display name
    #[serde(default)]
    pub student_name: String,
}
