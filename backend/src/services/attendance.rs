//! Attendance submission and lookup.
//!
//! Submitting a batch stores every entry first and only then notifies the
//! guardians of absent students. A notification problem is logged and
//! reported per entry; it never undoes or fails the stored batch.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::attendance::{AttendanceEntry, AttendanceRecord, AttendanceRecordWithStudent};
use crate::repositories::{
    AttendanceRepository, AttendanceRepositoryTrait, StudentRepository, StudentRepositoryTrait,
};
use crate::services::notification::{AbsenceNotice, GuardianNotifier};
use crate::validation::validate_batch;

/// What happened to the guardian notification of one absent record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Sent { rrn: String, guardian_email: String },
    NoStudent { rrn: String },
    NoGuardianEmail { rrn: String },
    Failed { rrn: String, error: String },
}

impl NotificationOutcome {
    pub fn rrn(&self) -> &str {
        match self {
            Self::Sent { rrn, .. }
            | Self::NoStudent { rrn }
            | Self::NoGuardianEmail { rrn }
            | Self::Failed { rrn, .. } => rrn,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionReport {
    pub records: Vec<AttendanceRecord>,
    pub notifications: Vec<NotificationOutcome>,
}

impl SubmissionReport {
    pub fn sent(&self) -> usize {
        self.count(|o| matches!(o, NotificationOutcome::Sent { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, NotificationOutcome::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.notifications.len() - self.sent() - self.failed()
    }

    fn count(&self, pred: impl Fn(&NotificationOutcome) -> bool) -> usize {
        self.notifications.iter().filter(|o| pred(o)).count()
    }
}

#[derive(Clone)]
pub struct AttendanceService {
    attendance: Arc<dyn AttendanceRepositoryTrait>,
    students: Arc<dyn StudentRepositoryTrait>,
    notifier: Arc<dyn GuardianNotifier>,
}

impl AttendanceService {
    pub fn new(notifier: Arc<dyn GuardianNotifier>) -> Self {
        Self::with_repositories(
            Arc::new(AttendanceRepository::new()),
            Arc::new(StudentRepository::new()),
            notifier,
        )
    }

    pub fn with_repositories(
        attendance: Arc<dyn AttendanceRepositoryTrait>,
        students: Arc<dyn StudentRepositoryTrait>,
        notifier: Arc<dyn GuardianNotifier>,
    ) -> Self {
        Self {
            attendance,
            students,
            notifier,
        }
    }

    pub async fn submit(
        &self,
        db: &PgPool,
        entries: Vec<AttendanceEntry>,
    ) -> Result<SubmissionReport, AppError> {
        validate_batch(&entries)?;

        let now = Utc::now();
        let records: Vec<AttendanceRecord> = entries
            .into_iter()
            .map(|entry| AttendanceRecord::from_entry(entry, now))
            .collect();

        let records = self
            .attendance
            .insert_batch(db, &records)
            .await
            .map_err(|err| err.context("Failed to submit attendance records"))?;
        tracing::info!(count = records.len(), "Attendance records stored");

        let notifications = self.notify_absentees(db, &records).await;
        Ok(SubmissionReport {
            records,
            notifications,
        })
    }

    /// Notifies guardians of every absent record, one at a time, in record order.
    pub async fn notify_absentees(
        &self,
        db: &PgPool,
        records: &[AttendanceRecord],
    ) -> Vec<NotificationOutcome> {
        let mut outcomes = Vec::new();
        for record in records.iter().filter(|r| r.status.is_absent()) {
            outcomes.push(self.notify_one(db, record).await);
        }
        outcomes
    }

    async fn notify_one(&self, db: &PgPool, record: &AttendanceRecord) -> NotificationOutcome {
        let rrn = record.rrn.clone();
        let student = match self.students.find_by_rrn(db, &record.rrn).await {
            Ok(Some(student)) => student,
            Ok(None) => {
                tracing::info!(rrn = %rrn, "No student registered for absent rrn; skipping notification");
                return NotificationOutcome::NoStudent { rrn };
            }
            Err(err) => {
                tracing::error!(rrn = %rrn, error = ?err, "Student lookup failed");
                return NotificationOutcome::Failed {
                    rrn,
                    error: format!("{:?}", err),
                };
            }
        };

        let Some(guardian_email) = student.guardian_email else {
            tracing::info!(rrn = %rrn, "Student has no guardian email; skipping notification");
            return NotificationOutcome::NoGuardianEmail { rrn };
        };

        let notice = AbsenceNotice {
            guardian_email: guardian_email.clone(),
            student_name: record.name.clone(),
            rrn: rrn.clone(),
            date: record.date.clone(),
        };
        match self.notifier.notify_absence(&notice).await {
            Ok(()) => {
                tracing::info!(rrn = %rrn, to = %guardian_email, "Absence notification sent");
                NotificationOutcome::Sent {
                    rrn,
                    guardian_email,
                }
            }
            Err(err) => {
                // `{:#}` keeps the whole cause chain, e.g. the transport error under a MailError.
                let error = format!("{:#}", err);
                tracing::error!(rrn = %rrn, to = %guardian_email, error = %error, "Failed to send absence notification");
                NotificationOutcome::Failed { rrn, error }
            }
        }
    }

    pub async fn records_for_date(
        &self,
        db: &PgPool,
        date: &str,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        self.attendance.find_by_date(db, date).await
    }

    pub async fn records_for_date_with_students(
        &self,
        db: &PgPool,
        date: &str,
    ) -> Result<Vec<AttendanceRecordWithStudent>, AppError> {
        self.attendance.find_by_date_with_students(db, date).await
    }

    pub async fn available_dates(&self, db: &PgPool) -> Result<Vec<String>, AppError> {
        self.attendance.distinct_dates(db).await
    }
}
