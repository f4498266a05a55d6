//! Read access to the externally owned `parents`, `students` and `attendance`
//! collections.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{attendance::AttendanceRecord, parent::Parent, student::Student};

#[cfg(test)]
pub mod memory;
pub mod rest;
pub mod sql;

pub use rest::RestStore;
pub use sql::SqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query returned no rows")]
    NoRows,

    #[error("query returned more than one row")]
    TooManyRows,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected payload shape: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Equality-filtered selects over the three collections. The two single-row
/// lookups must fail unless exactly one row matches.
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn parent_by_auth_user(&self, auth_user_id: &Uuid) -> Result<Parent, StoreError>;

    async fn student_by_parent(&self, parent_id: i64) -> Result<Student, StoreError>;

    /// Rows come back in store order.
    async fn attendance_by_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;
}

pub(crate) fn exactly_one<T>(rows: Vec<T>) -> Result<T, StoreError> {
    let mut rows = rows.into_iter();
    match (rows.next(), rows.next()) {
        (Some(row), None) => Ok(row),
        (None, _) => Err(StoreError::NoRows),
        (Some(_), Some(_)) => Err(StoreError::TooManyRows),
    }
}
