use async_trait::async_trait;
use sqlx::MySqlPool;
use uuid::Uuid;

use super::{StoreError, StudentStore, exactly_one};
use crate::model::{attendance::AttendanceRecord, parent::Parent, student::Student};

/// Reads straight from the MySQL tables.
#[derive(Clone)]
pub struct SqlStore {
    pool: MySqlPool,
}

impl SqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentStore for SqlStore {
    async fn parent_by_auth_user(&self, auth_user_id: &Uuid) -> Result<Parent, StoreError> {
        // LIMIT 2 is enough to tell "one" from "ambiguous"
        let rows = sqlx::query_as::<_, Parent>(
            r#"
            SELECT id
            FROM parents
            WHERE auth_user_id = ?
            LIMIT 2
            "#,
        )
        .bind(auth_user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        exactly_one(rows)
    }

    async fn student_by_parent(&self, parent_id: i64) -> Result<Student, StoreError> {
        let rows = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, parent_id, name, email, qr_code
            FROM students
            WHERE parent_id = ?
            LIMIT 2
            "#,
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;

        exactly_one(rows)
    }

    async fn attendance_by_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let rows = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, student_id, `type`, time
            FROM attendance
            WHERE student_id = ?
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
