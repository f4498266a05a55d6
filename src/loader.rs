//! The parent → student → attendance lookup chain behind the homepage.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::model::{attendance::AttendanceRecord, student::Student};
use crate::store::{StoreError, StudentStore};

pub const PARENT_NOT_FOUND: &str = "Parent not found";
pub const STUDENT_NOT_FOUND: &str = "Student not found";
pub const ATTENDANCE_FETCH_FAILED: &str = "Error fetching attendance records";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StudentData {
    pub student: Student,
    /// Store order, never re-sorted
    pub attendance: Vec<AttendanceRecord>,
}

/// Why the homepage could not be loaded. `Display` is the message shown to
/// the parent; the store cause stays reachable through `source()`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{message}")]
    NotFound {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{}", ATTENDANCE_FETCH_FAILED)]
    FetchError(#[source] StoreError),

    #[error("{}", UNEXPECTED_ERROR)]
    Unknown { detail: String },
}

impl ResponseError for LoadError {
    fn status_code(&self) -> StatusCode {
        match self {
            LoadError::NotFound { .. } => StatusCode::NOT_FOUND,
            LoadError::FetchError(_) => StatusCode::BAD_GATEWAY,
            LoadError::Unknown { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

/// Resolves the parent for `auth_user_id`, then their single student, then
/// that student's attendance rows. Each step needs the previous id, so the
/// queries run one after another and stop at the first failure.
#[instrument(name = "load_student_data", skip(store, auth_user_id), fields(auth_user_id = %auth_user_id))]
pub async fn load_student_data(
    store: &dyn StudentStore,
    auth_user_id: &Uuid,
) -> Result<StudentData, LoadError> {
    let parent = store
        .parent_by_auth_user(auth_user_id)
        .await
        .map_err(|e| {
            warn!(error = %e, "Parent lookup failed");
            LoadError::NotFound {
                message: PARENT_NOT_FOUND,
                source: e,
            }
        })?;

    let student = store.student_by_parent(parent.id).await.map_err(|e| {
        // a parent with several students lands here too
        warn!(error = %e, parent_id = parent.id, "Student lookup failed");
        LoadError::NotFound {
            message: STUDENT_NOT_FOUND,
            source: e,
        }
    })?;

    let attendance = store
        .attendance_by_student(student.id)
        .await
        .map_err(|e| {
            warn!(error = %e, student_id = student.id, "Attendance lookup failed");
            LoadError::FetchError(e)
        })?;

    debug!(
        student_id = student.id,
        records = attendance.len(),
        "Student data loaded"
    );

    Ok(StudentData {
        student,
        attendance,
    })
}
