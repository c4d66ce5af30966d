//! Validation for request payloads.
//!
//! Payload structs derive `Validate`; field rules that the derive macros do
//! not cover live in [`rules`].

pub mod rules;

pub use validator::Validate;

use crate::error::AppError;

/// Validates every item of a JSON array body. Messages are prefixed with the
/// item index, e.g. `[2].date: date_format`.
pub fn validate_batch<T: Validate>(items: &[T]) -> Result<(), AppError> {
    let mut messages = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if let Err(errors) = item.validate() {
            if let AppError::Validation(inner) = AppError::from(errors) {
                messages.extend(inner.into_iter().map(|m| format!("[{}].{}", index, m)));
            }
        }
    }
    if messages.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(messages))
    }
}
