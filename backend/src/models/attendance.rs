use crate::types::{AttendanceId, StudentId};
use crate::validation::rules;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Excused => "excused",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, AttendanceStatus::Absent)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "late" => Ok(AttendanceStatus::Late),
            "excused" => Ok(AttendanceStatus::Excused),
            other => Err(format!("unknown attendance status: {}", other)),
        }
    }
}

impl TryFrom<String> for AttendanceStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One stored attendance row. `date` is kept as the submitted `YYYY-MM-DD`
/// string.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[schema(value_type = String)]
    pub id: AttendanceId,
    #[schema(value_type = Option<String>)]
    pub student_id: Option<StudentId>,
    pub name: String,
    pub rrn: String,
    #[sqlx(try_from = "String")]
    pub status: AttendanceStatus,
    pub date: String,
    pub created_at: DateTime<Utc>,
}

impl AttendanceRecord {
    pub fn from_entry(entry: AttendanceEntry, now: DateTime<Utc>) -> Self {
        Self {
            id: AttendanceId::new(),
            student_id: entry.student_id,
            name: entry.name.trim().to_string(),
            rrn: entry.rrn.trim().to_string(),
            status: entry.status,
            date: entry.date,
            created_at: now,
        }
    }
}

/// One element of the `POST /submit-attendance` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub student_id: Option<StudentId>,
    #[validate(custom(function = "rules::validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "rules::validate_not_blank"))]
    pub rrn: String,
    pub status: AttendanceStatus,
    #[validate(custom(function = "rules::validate_attendance_date"))]
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentSummary {
    pub name: String,
    pub rrn: String,
}

/// Attendance row with the referenced student's name and rrn joined in, or
/// `null` when the reference is missing or dangling.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecordWithStudent {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub student: Option<StudentSummary>,
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AttendanceDateQuery {
    /// Calendar date in `YYYY-MM-DD` form.
    pub date: Option<String>,
}
