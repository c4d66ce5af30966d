//! Semester result repository.
//!
//! A result and its subject rows are written together; subjects carry an
//! explicit position so they read back in submission order.

use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::error::AppError;
use crate::models::result::{ResultSummary, SemesterResult, SubjectGrade};
use crate::repositories::transaction::{begin_transaction, commit_transaction};
use crate::types::ResultId;
use chrono::{DateTime, Utc};

#[derive(Debug, FromRow)]
struct ResultRow {
    id: ResultId,
    name: String,
    rrn: String,
    sgpa: f64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ResultRepository;

impl ResultRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(
        &self,
        db: &PgPool,
        item: &SemesterResult,
    ) -> Result<SemesterResult, AppError> {
        let mut tx = begin_transaction(db).await?;

        let row = sqlx::query_as::<_, ResultRow>(
            "INSERT INTO results (id, name, rrn, sgpa, created_at) VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, name, rrn, sgpa, created_at",
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.rrn)
        .bind(item.sgpa)
        .bind(item.created_at)
        .fetch_one(&mut *tx)
        .await?;

        if !item.subjects.is_empty() {
            let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
                "INSERT INTO result_subjects \
                 (result_id, position, subject, grade, credit, grade_point, result) ",
            );
            builder.push_values(item.subjects.iter().enumerate(), |mut b, (position, s)| {
                b.push_bind(item.id)
                    .push_bind(position as i32)
                    .push_bind(&s.subject)
                    .push_bind(&s.grade)
                    .push_bind(s.credit)
                    .push_bind(s.grade_point)
                    .push_bind(&s.result);
            });
            builder.build().execute(&mut *tx).await?;
        }

        commit_transaction(tx).await?;

        Ok(SemesterResult {
            id: row.id,
            name: row.name,
            rrn: row.rrn,
            sgpa: row.sgpa,
            subjects: item.subjects.clone(),
            created_at: row.created_at,
        })
    }

    /// Every result without its subjects, oldest first.
    pub async fn list_summaries(&self, db: &PgPool) -> Result<Vec<ResultSummary>, AppError> {
        let rows = sqlx::query_as::<_, ResultSummary>(
            "SELECT id, name, rrn, sgpa FROM results ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// The earliest result recorded for `rrn`, with subjects in stored order.
    pub async fn find_by_rrn(
        &self,
        db: &PgPool,
        rrn: &str,
    ) -> Result<Option<SemesterResult>, AppError> {
        let Some(row) = sqlx::query_as::<_, ResultRow>(
            "SELECT id, name, rrn, sgpa, created_at FROM results \
             WHERE rrn = $1 ORDER BY created_at ASC, id ASC LIMIT 1",
        )
        .bind(rrn.trim())
        .fetch_optional(db)
        .await?
        else {
            return Ok(None);
        };

        let subjects = sqlx::query_as::<_, SubjectGrade>(
            "SELECT subject, grade, credit, grade_point, result FROM result_subjects \
             WHERE result_id = $1 ORDER BY position ASC",
        )
        .bind(row.id)
        .fetch_all(db)
        .await?;

        Ok(Some(SemesterResult {
            id: row.id,
            name: row.name,
            rrn: row.rrn,
            sgpa: row.sgpa,
            subjects,
            created_at: row.created_at,
        }))
    }
}
