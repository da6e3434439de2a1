//! HTTP marks repository implementation

use crate::api::{MarksRepository, validate_draft_batch};
use crate::error::{Error, Result};
use crate::lifecycle::Actor;
use crate::types::{
    BulkOutcome, DEFAULT_MAX_MARKS, InternalMark, MarkAction, MarkId, MarkStatus, MarksPage,
    MarksQuery, NewMarkEntry, StatusCounts, Student,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

// Wire types. The backend is not consistent about field casing, so every
// field accepts its snake_case, PascalCase and camelCase spellings.

#[derive(Deserialize)]
struct MarkRecord {
    #[serde(alias = "InternalMarkID", alias = "internalMarkId")]
    internal_mark_id: MarkId,
    #[serde(alias = "EnrollmentNumber", alias = "enrollmentNumber")]
    enrollment_number: i64,
    #[serde(default, alias = "InstituteID", alias = "instituteId")]
    institute_id: Option<i64>,
    #[serde(alias = "Semester")]
    semester: u8,
    #[serde(alias = "SubjectCode", alias = "subjectCode")]
    subject_code: String,
    #[serde(default, alias = "SubjectName", alias = "subjectName")]
    subject_name: Option<String>,
    #[serde(alias = "MarkType", alias = "markType")]
    mark_type: String,
    #[serde(alias = "MarksObtained", alias = "marksObtained")]
    marks_obtained: f64,
    #[serde(default, alias = "MaxMarks", alias = "maxMarks")]
    max_marks: Option<f64>,
    #[serde(alias = "Status")]
    status: String,
    #[serde(default, alias = "EnteredBy", alias = "enteredBy")]
    entered_by: Option<i64>,
    #[serde(default, alias = "CreatedAt", alias = "createdAt")]
    created_at: Option<DateTime<Utc>>,
}

impl MarkRecord {
    fn into_internal_mark(self) -> Result<InternalMark> {
        Ok(InternalMark {
            id: self.internal_mark_id,
            enrollment_number: self.enrollment_number,
            institute_id: self.institute_id,
            semester: self.semester,
            subject_code: self.subject_code,
            subject_name: self.subject_name.unwrap_or_default(),
            mark_type: self.mark_type.parse()?,
            marks_obtained: self.marks_obtained,
            max_marks: self
                .max_marks
                .filter(|m| *m > 0.0)
                .unwrap_or(DEFAULT_MAX_MARKS),
            status: self.status.parse()?,
            entered_by: self.entered_by,
            created_at: self.created_at,
        })
    }
}

#[derive(Deserialize)]
struct StatusCountRecord {
    #[serde(alias = "Status")]
    status: String,
    #[serde(alias = "Count")]
    count: u64,
}

#[derive(Deserialize)]
struct Pagination {
    #[serde(default, alias = "TotalPages", alias = "totalPages")]
    total_pages: Option<u32>,
}

// Go encodes empty slices as `null`, hence the Options.
#[derive(Deserialize)]
struct MarksListResponse {
    #[serde(default, alias = "Marks")]
    marks: Option<Vec<MarkRecord>>,
    #[serde(default, alias = "StatusCounts", alias = "statusCounts")]
    status_counts: Option<Vec<StatusCountRecord>>,
    #[serde(default, alias = "Pagination")]
    pagination: Option<Pagination>,
}

impl MarksListResponse {
    fn into_page(self) -> Result<MarksPage> {
        let records = self
            .marks
            .unwrap_or_default()
            .into_iter()
            .map(MarkRecord::into_internal_mark)
            .collect::<Result<Vec<_>>>()?;

        let status_counts = self
            .status_counts
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| match c.status.parse::<MarkStatus>() {
                Ok(status) => Some((status, c.count)),
                Err(_) => {
                    warn!(status = %c.status, "ignoring count for unknown status");
                    None
                }
            })
            .collect::<StatusCounts>();

        let total_pages = self
            .pagination
            .and_then(|p| p.total_pages)
            .unwrap_or(1)
            .max(1);

        Ok(MarksPage {
            records,
            status_counts,
            total_pages,
        })
    }
}

#[derive(Deserialize)]
struct StudentListResponse {
    #[serde(default, alias = "Students")]
    students: Option<Vec<StudentRecord>>,
}

#[derive(Deserialize)]
struct StudentRecord {
    #[serde(alias = "EnrollmentNumber", alias = "enrollmentNumber")]
    enrollment_number: i64,
    #[serde(default, alias = "StudentName", alias = "studentName")]
    student_name: Option<String>,
}

#[derive(Deserialize)]
struct CreateMarksResponse {
    #[serde(alias = "TotalRecords", alias = "totalRecords")]
    total_records: u64,
}

#[derive(Serialize)]
struct CreateMarksPayload<'a> {
    marks: &'a [NewMarkEntry],
}

#[derive(Serialize)]
struct TransitionPayload<'a> {
    mark_ids: &'a [MarkId],
}

/// Endpoint path and count field for a bulk action
const fn transition_endpoint(action: MarkAction) -> (&'static str, &'static str) {
    match action {
        MarkAction::Submit => ("/faculty/internal-marks/submit", "submitted_count"),
        MarkAction::Lock => ("/admin/marks/lock", "locked_count"),
        MarkAction::Publish => ("/admin/marks/publish", "published_count"),
    }
}

/// Marks repository backed by the REST API, using reqwest
pub struct HttpMarksRepository {
    client: Client,
    token: String,
    base_url: String,
}

impl HttpMarksRepository {
    /// Create a new HTTP repository
    ///
    /// # Arguments
    /// * `token` - Bearer token sent with every request
    /// * `base_url` - API root, e.g. `http://localhost:8080/api`
    /// * `timeout` - Optional request timeout; `None` keeps the transport default
    pub fn new(token: String, base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Response> {
        Ok(self
            .client
            .post(self.api_url(path))
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?)
    }
}

/// Decode a successful response, or turn a failure status into an error.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Auth(
            "token rejected by backend (401); obtain a new token".to_string(),
        ));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Rejected {
            status: status.as_u16(),
            reason: rejection_reason(status, &body),
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| Error::Parse(format!("unexpected response body: {e}")))
}

/// Machine-readable reason from an error body, falling back to the status text
fn rejection_reason(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|r| r.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

#[async_trait]
impl MarksRepository for HttpMarksRepository {
    async fn list_marks(&self, scope: Actor, query: &MarksQuery) -> Result<MarksPage> {
        let path = match scope {
            Actor::Admin => "/admin/internal-marks",
            Actor::Faculty => "/faculty/internal-marks",
        };
        debug!(%scope, status = ?query.status, page = query.page, "listing marks");

        let mut params: Vec<(&str, String)> = vec![
            ("page", query.page.to_string()),
            ("limit", query.page_size.to_string()),
        ];
        if let Some(status) = query.status {
            params.push(("status", status.to_string()));
        }
        if scope == Actor::Faculty {
            if let Some(semester) = query.semester {
                params.push(("semester", semester.to_string()));
            }
            if let Some(ref subject_code) = query.subject_code {
                params.push(("subject_code", subject_code.clone()));
            }
        }

        let response = self
            .client
            .get(self.api_url(path))
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .query(&params)
            .send()
            .await?;

        let page = read_json::<MarksListResponse>(response).await?.into_page()?;
        debug!(
            count = page.records.len(),
            total_pages = page.total_pages,
            "listed marks"
        );
        Ok(page)
    }

    async fn create_draft_batch(&self, entries: &[NewMarkEntry]) -> Result<u64> {
        validate_draft_batch(entries)?;
        debug!(count = entries.len(), "creating draft marks");

        let response = self
            .post_json("/faculty/internal-marks", &CreateMarksPayload { marks: entries })
            .await?;
        let created: CreateMarksResponse = read_json(response).await?;

        debug!(total_records = created.total_records, "created draft marks");
        Ok(created.total_records)
    }

    async fn bulk_transition(&self, ids: &[MarkId], action: MarkAction) -> Result<BulkOutcome> {
        if ids.is_empty() {
            return Err(Error::Validation(format!("Please select marks to {action}")));
        }
        let (path, count_field) = transition_endpoint(action);
        debug!(%action, count = ids.len(), "applying bulk transition");

        let response = self
            .post_json(path, &TransitionPayload { mark_ids: ids })
            .await?;
        let body: serde_json::Value = read_json(response).await?;
        let succeeded = body
            .get(count_field)
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| Error::Parse(format!("response is missing {count_field}")))?;

        let outcome = BulkOutcome {
            action,
            requested: ids.len(),
            succeeded,
        };
        if outcome.is_partial() {
            warn!(
                %action,
                requested = outcome.requested,
                succeeded,
                "backend transitioned fewer marks than requested"
            );
        } else {
            debug!(%action, succeeded, "applied bulk transition");
        }
        Ok(outcome)
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        debug!("listing students");
        let response = self
            .client
            .get(self.api_url("/faculty/students"))
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await?;

        let students: Vec<Student> = read_json::<StudentListResponse>(response)
            .await?
            .students
            .unwrap_or_default()
            .into_iter()
            .map(|s| Student {
                enrollment_number: s.enrollment_number,
                student_name: s.student_name.unwrap_or_default(),
            })
            .collect();
        debug!(count = students.len(), "listed students");
        Ok(students)
    }
}
