//! Repository trait and common functionality
//!
//! Record collections with a plain id-keyed lifecycle implement this trait so
//! handlers reach them through the same calls.

use crate::error::AppError;
use sqlx::PgPool;

/// Standard repository trait for id-keyed records.
#[allow(async_fn_in_trait)]
pub trait Repository<T> {
    /// Target table name.
    const TABLE: &'static str;
    /// Primary key type for the record.
    type Id;

    /// Find all records of type T, oldest first.
    async fn find_all(&self, db: &PgPool) -> Result<Vec<T>, AppError>;

    /// Find a single record by ID
    async fn find_by_id(&self, db: &PgPool, id: Self::Id) -> Result<T, AppError>;

    /// Create a new record
    async fn create(&self, db: &PgPool, item: &T) -> Result<T, AppError>;

    /// Update an existing record
    async fn update(&self, db: &PgPool, item: &T) -> Result<T, AppError>;

    /// Delete a record by ID, returning what was removed.
    async fn delete(&self, db: &PgPool, id: Self::Id) -> Result<T, AppError>;
}
