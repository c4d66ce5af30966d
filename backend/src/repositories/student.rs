//! Student repository.
//!
//! Provides CRUD operations for students plus the rrn lookup used when
//! notifying guardians.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::student::{Student, UpdateStudent};
use crate::repositories::repository::Repository;
use crate::types::StudentId;

const TABLE_NAME: &str = "students";
const SELECT_COLUMNS: &str = "id, name, rrn, guardian_email, created_at, updated_at";

/// Lookups the attendance flow needs from the student collection.
///
/// Kept object-safe so the notification loop can be exercised with
/// `MockStudentRepositoryTrait` in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepositoryTrait: Send + Sync {
    /// Finds the earliest-registered student with the given rrn.
    async fn find_by_rrn(&self, db: &PgPool, rrn: &str) -> Result<Option<Student>, AppError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StudentRepository;

impl StudentRepository {
    pub fn new() -> Self {
        Self
    }

    fn base_select_query() -> String {
        format!("SELECT {} FROM {}", SELECT_COLUMNS, TABLE_NAME)
    }

    /// Applies the fields present in `changes` in a single statement so that
    /// concurrent partial updates of different fields do not overwrite each other.
    pub async fn update_partial(
        &self,
        db: &PgPool,
        id: StudentId,
        changes: &UpdateStudent,
    ) -> Result<Student, AppError> {
        let query = format!(
            "UPDATE {} SET name = COALESCE($2, name), rrn = COALESCE($3, rrn), \
             guardian_email = CASE WHEN $4 THEN $5 ELSE guardian_email END, updated_at = $6 \
             WHERE id = $1 RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        let email = changes.guardian_email_change();
        let row = sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .bind(changes.name.as_deref().map(str::trim))
            .bind(changes.rrn.as_deref().map(str::trim))
            .bind(email.is_some())
            .bind(email.flatten())
            .bind(Utc::now())
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".into()))?;
        Ok(row)
    }
}

#[async_trait]
impl StudentRepositoryTrait for StudentRepository {
    async fn find_by_rrn(&self, db: &PgPool, rrn: &str) -> Result<Option<Student>, AppError> {
        let query = format!(
            "{} WHERE rrn = $1 ORDER BY created_at ASC, id ASC LIMIT 1",
            Self::base_select_query()
        );
        let row = sqlx::query_as::<_, Student>(&query)
            .bind(rrn.trim())
            .fetch_optional(db)
            .await?;
        Ok(row)
    }
}

impl Repository<Student> for StudentRepository {
    const TABLE: &'static str = TABLE_NAME;
    type Id = StudentId;

    async fn find_all(&self, db: &PgPool) -> Result<Vec<Student>, AppError> {
        let query = format!("{} ORDER BY created_at ASC, id ASC", Self::base_select_query());
        let rows = sqlx::query_as::<_, Student>(&query).fetch_all(db).await?;
        Ok(rows)
    }

    async fn find_by_id(&self, db: &PgPool, id: StudentId) -> Result<Student, AppError> {
        let query = format!("{} WHERE id = $1", Self::base_select_query());
        let result = sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".into()))?;
        Ok(result)
    }

    async fn create(&self, db: &PgPool, item: &Student) -> Result<Student, AppError> {
        let query = format!(
            "INSERT INTO {} (id, name, rrn, guardian_email, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Student>(&query)
            .bind(item.id)
            .bind(&item.name)
            .bind(&item.rrn)
            .bind(&item.guardian_email)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(db)
            .await?;
        Ok(row)
    }

    async fn update(&self, db: &PgPool, item: &Student) -> Result<Student, AppError> {
        let query = format!(
            "UPDATE {} SET name = $2, rrn = $3, guardian_email = $4, updated_at = $5 \
             WHERE id = $1 RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Student>(&query)
            .bind(item.id)
            .bind(&item.name)
            .bind(&item.rrn)
            .bind(&item.guardian_email)
            .bind(item.updated_at)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".into()))?;
        Ok(row)
    }

    async fn delete(&self, db: &PgPool, id: StudentId) -> Result<Student, AppError> {
        let query = format!(
            "DELETE FROM {} WHERE id = $1 RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".into()))?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_select_columns_include_expected_fields() {
        assert!(SELECT_COLUMNS.contains("guardian_email"));
        assert!(SELECT_COLUMNS.contains("rrn"));
        assert_eq!(<StudentRepository as Repository<Student>>::TABLE, "students");
    }

    #[test]
    fn mock_student_repository_is_send_sync() {
        fn check_send_sync<T: Send + Sync>() {}
        check_send_sync::<MockStudentRepositoryTrait>();
    }
}
