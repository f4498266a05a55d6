use std::fmt;

use askama::Template;
use chrono::{DateTime, FixedOffset, Offset, Utc};

use super::ViewState;
use crate::model::{attendance::AttendanceRecord, student::Student};

/// Formats attendance times the way an en-US browser prints
/// `Date::toLocaleString`, e.g. `9/2/2024, 8:05:00 AM`.
#[derive(Debug, Clone, Copy)]
pub struct TimestampFormat {
    offset: FixedOffset,
}

impl TimestampFormat {
    /// Falls back to UTC when the offset is out of range.
    pub fn with_offset_minutes(minutes: i32) -> Self {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    pub fn format(&self, time: &DateTime<Utc>) -> String {
        time.with_timezone(&self.offset)
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string()
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self::with_offset_minutes(0)
    }
}

/// One line of the attendance list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLine {
    pub id: i64,
    pub label: &'static str,
    pub time: String,
}

impl fmt::Display for EntryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.time)
    }
}

pub fn entry_lines(records: &[AttendanceRecord], format: &TimestampFormat) -> Vec<EntryLine> {
    records
        .iter()
        .map(|r| EntryLine {
            id: r.id,
            label: r.kind.label(),
            time: format.format(&r.time),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "homepage/loading.html")]
struct LoadingPage {
    message: &'static str,
}

#[derive(Template)]
#[template(path = "homepage/error.html")]
struct ErrorPage {
    message: String,
}

#[derive(Template)]
#[template(path = "homepage/attendance.html")]
struct AttendancePage<'a> {
    student: &'a Student,
    entries: Vec<EntryLine>,
}

/// Renders the homepage subtree for `state`. Pure: same state, same markup.
pub fn render(state: &ViewState, format: &TimestampFormat) -> askama::Result<String> {
    match state {
        ViewState::Loading => LoadingPage {
            message: "Loading...",
        }
        .render(),
        ViewState::Failed(e) => ErrorPage {
            message: e.to_string(),
        }
        .render(),
        ViewState::Loaded(data) => AttendancePage {
            student: &data.student,
            entries: entry_lines(&data.attendance, format),
        }
        .render(),
    }
}
