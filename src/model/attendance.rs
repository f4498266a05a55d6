use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceKind {
    TimeIn,
    TimeOut,
}

impl AttendanceKind {
    /// Human label shown in front of the timestamp.
    pub fn label(self) -> &'static str {
        match self {
            AttendanceKind::TimeIn => "Time In",
            AttendanceKind::TimeOut => "Time Out",
        }
    }
}

// sqlx hands the `type` column over as text
impl TryFrom<String> for AttendanceKind {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 101)]
    pub id: i64,

    #[schema(example = 7)]
    pub student_id: i64,

    #[serde(rename = "type")]
    #[sqlx(rename = "type", try_from = "String")]
    pub kind: AttendanceKind,

    #[serde(deserialize_with = "deserialize_time")]
    #[schema(value_type = String, format = DateTime, example = "2024-09-02T07:58:12Z")]
    pub time: DateTime<Utc>,
}

/// Accepts `timestamptz` output (RFC 3339 with an offset) and plain
/// `timestamp` output, which carries no zone and is read as UTC.
fn deserialize_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_time(&raw).ok_or_else(|| de::Error::custom(format!("invalid attendance time: {raw:?}")))
}

fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}
