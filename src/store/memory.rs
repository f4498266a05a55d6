use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Notify;
use uuid::Uuid;

use super::{StoreError, StudentStore, exactly_one};
use crate::model::{
    attendance::{AttendanceKind, AttendanceRecord},
    parent::Parent,
    student::Student,
};

/// Fixture store for tests. Rows are kept in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    pub parents: Vec<(Uuid, Parent)>,
    pub students: Vec<Student>,
    pub attendance: Vec<AttendanceRecord>,
    pub fail_attendance: bool,
    pub panic_on_attendance: bool,
    /// When set, the attendance query parks until notified.
    pub attendance_gate: Option<Arc<Notify>>,
}

pub const PARENT_USER: &str = "6655352e-f357-476e-9fad-f307ae6a9d35";

pub fn parent_user() -> Uuid {
    Uuid::parse_str(PARENT_USER).expect("fixture uuid")
}

pub fn record(id: i64, student_id: i64, kind: AttendanceKind, hour: u32) -> AttendanceRecord {
    AttendanceRecord {
        id,
        student_id,
        kind,
        time: Utc
            .with_ymd_and_hms(2024, 9, 2, hour, 0, 0)
            .single()
            .expect("fixture time"),
    }
}

impl MemoryStore {
    /// One parent with one student (id 7) and no attendance yet.
    pub fn seeded() -> Self {
        Self {
            parents: vec![(parent_user(), Parent { id: 3 })],
            students: vec![Student {
                id: 7,
                parent_id: 3,
                name: "Ada Lovelace".into(),
                email: "ada@school.example".into(),
                qr_code: "STU-0007".into(),
            }],
            ..Self::default()
        }
    }

    pub fn with_attendance(mut self, rows: Vec<AttendanceRecord>) -> Self {
        self.attendance = rows;
        self
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn parent_by_auth_user(&self, auth_user_id: &Uuid) -> Result<Parent, StoreError> {
        let rows = self
            .parents
            .iter()
            .filter(|(owner, _)| owner == auth_user_id)
            .map(|(_, parent)| *parent)
            .collect();
        exactly_one(rows)
    }

    async fn student_by_parent(&self, parent_id: i64) -> Result<Student, StoreError> {
        let rows = self
            .students
            .iter()
            .filter(|s| s.parent_id == parent_id)
            .cloned()
            .collect();
        exactly_one(rows)
    }

    async fn attendance_by_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        if let Some(gate) = &self.attendance_gate {
            gate.notified().await;
        }
        if self.panic_on_attendance {
            panic!("attendance fixture exploded");
        }
        if self.fail_attendance {
            return Err(StoreError::Status {
                status: 503,
                body: "upstream unavailable".into(),
            });
        }
        Ok(self
            .attendance
            .iter()
            .filter(|r| r.student_id == student_id)
            .cloned()
            .collect())
    }
}
