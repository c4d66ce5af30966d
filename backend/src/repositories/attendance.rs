//! Attendance repository.
//!
//! Attendance rows are written in batches and never updated afterwards, so the
//! trait exposes batch insert and read queries only.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;

use crate::error::AppError;
use crate::models::attendance::{AttendanceRecord, AttendanceRecordWithStudent, StudentSummary};
use crate::repositories::transaction::{begin_transaction, commit_transaction};
use crate::types::AttendanceId;

const SELECT_COLUMNS: &str = "id, student_id, name, rrn, status, date, created_at";
// Seven binds per row keeps each statement far below the Postgres bind limit.
const INSERT_CHUNK_SIZE: usize = 1000;

/// Repository trait for attendance operations.
///
/// Mockable with `MockAttendanceRepositoryTrait` in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceRepositoryTrait: Send + Sync {
    /// Persists the whole batch in one transaction and returns the stored rows
    /// in input order.
    async fn insert_batch(
        &self,
        db: &PgPool,
        records: &[AttendanceRecord],
    ) -> Result<Vec<AttendanceRecord>, AppError>;

    /// Records whose date string equals `date`, in submission order.
    async fn find_by_date(&self, db: &PgPool, date: &str)
        -> Result<Vec<AttendanceRecord>, AppError>;

    /// Like `find_by_date`, with the referenced student's name and rrn joined.
    async fn find_by_date_with_students(
        &self,
        db: &PgPool,
        date: &str,
    ) -> Result<Vec<AttendanceRecordWithStudent>, AppError>;

    /// Distinct attendance dates, ascending.
    async fn distinct_dates(&self, db: &PgPool) -> Result<Vec<String>, AppError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AttendanceRepository;

impl AttendanceRepository {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, FromRow)]
struct JoinedAttendanceRow {
    #[sqlx(flatten)]
    record: AttendanceRecord,
    student_name: Option<String>,
    student_rrn: Option<String>,
}

impl From<JoinedAttendanceRow> for AttendanceRecordWithStudent {
    fn from(row: JoinedAttendanceRow) -> Self {
        let student = match (row.student_name, row.student_rrn) {
            (Some(name), Some(rrn)) => Some(StudentSummary { name, rrn }),
            _ => None,
        };
        Self {
            record: row.record,
            student,
        }
    }
}

#[async_trait]
impl AttendanceRepositoryTrait for AttendanceRepository {
    async fn insert_batch(
        &self,
        db: &PgPool,
        records: &[AttendanceRecord],
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = begin_transaction(db).await?;
        let mut stored: HashMap<AttendanceId, AttendanceRecord> =
            HashMap::with_capacity(records.len());

        for chunk in records.chunks(INSERT_CHUNK_SIZE) {
            let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
                "INSERT INTO attendance (id, student_id, name, rrn, status, date, created_at) ",
            );
            builder.push_values(chunk, |mut row, record| {
                row.push_bind(record.id)
                    .push_bind(record.student_id)
                    .push_bind(&record.name)
                    .push_bind(&record.rrn)
                    .push_bind(record.status.as_str())
                    .push_bind(&record.date)
                    .push_bind(record.created_at);
            });
            builder.push(" RETURNING ");
            builder.push(SELECT_COLUMNS);

            let rows = builder
                .build_query_as::<AttendanceRecord>()
                .fetch_all(&mut *tx)
                .await?;
            stored.extend(rows.into_iter().map(|row| (row.id, row)));
        }

        commit_transaction(tx).await?;

        records
            .iter()
            .map(|record| {
                stored.remove(&record.id).ok_or_else(|| {
                    AppError::InternalServerError(anyhow::anyhow!(
                        "attendance row {} missing from insert result",
                        record.id
                    ))
                })
            })
            .collect()
    }

    async fn find_by_date(
        &self,
        db: &PgPool,
        date: &str,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let query = format!(
            "SELECT {} FROM attendance WHERE date = $1 ORDER BY seq ASC",
            SELECT_COLUMNS
        );
        let rows = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(date)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    async fn find_by_date_with_students(
        &self,
        db: &PgPool,
        date: &str,
    ) -> Result<Vec<AttendanceRecordWithStudent>, AppError> {
        let rows = sqlx::query_as::<_, JoinedAttendanceRow>(
            r#"
            SELECT a.id, a.student_id, a.name, a.rrn, a.status, a.date, a.created_at,
                   s.name AS student_name, s.rrn AS student_rrn
            FROM attendance a
            LEFT JOIN students s ON s.id = a.student_id
            WHERE a.date = $1
            ORDER BY a.seq ASC
            "#,
        )
        .bind(date)
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn distinct_dates(&self, db: &PgPool) -> Result<Vec<String>, AppError> {
        let dates = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT date FROM attendance ORDER BY date ASC",
        )
        .fetch_all(db)
        .await?;
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::AttendanceStatus;
    use chrono::Utc;

    #[test]
    fn joined_row_without_student_yields_none() {
        let record = AttendanceRecord {
            id: AttendanceId::new(),
            student_id: None,
            name: "Asha".into(),
            rrn: "21CS001".into(),
            status: AttendanceStatus::Present,
            date: "2024-03-01".into(),
            created_at: Utc::now(),
        };
        let joined: AttendanceRecordWithStudent = JoinedAttendanceRow {
            record: record.clone(),
            student_name: None,
            student_rrn: None,
        }
        .into();
        assert!(joined.student.is_none());

        let joined: AttendanceRecordWithStudent = JoinedAttendanceRow {
            record,
            student_name: Some("Asha".into()),
            student_rrn: Some("21CS001".into()),
        }
        .into();
        assert_eq!(joined.student.map(|s| s.rrn).as_deref(), Some("21CS001"));
    }

    #[test]
    fn select_columns_match_record_fields() {
        for column in ["student_id", "status", "date"] {
            assert!(SELECT_COLUMNS.contains(column));
        }
    }
}
