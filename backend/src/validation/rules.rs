//! Common validation rules shared across request payloads.

use chrono::NaiveDate;
use validator::{ValidateEmail, ValidationError};

/// Calendar date format used for attendance records.
pub const ATTENDANCE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Rejects empty or whitespace-only strings.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Accepts a blank value (used to clear an optional address) or a valid email.
pub fn validate_optional_email(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.to_string().validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email"))
}

/// Validates an attendance date string.
///
/// Requirements:
/// - Exactly `YYYY-MM-DD` (zero padded, so lexical order matches calendar order)
/// - A real calendar date
pub fn validate_attendance_date(value: &str) -> Result<(), ValidationError> {
    let well_formed = value.len() == 10
        && value.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });
    if !well_formed {
        return Err(ValidationError::new("date_format"));
    }

    NaiveDate::parse_from_str(value, ATTENDANCE_DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| ValidationError::new("date_invalid"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_blank_rejects_whitespace() {
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("21CS001").is_ok());
    }

    #[test]
    fn optional_email_allows_blank_or_valid_address() {
        assert!(validate_optional_email("").is_ok());
        assert!(validate_optional_email("  ").is_ok());
        assert!(validate_optional_email(" parent@example.com ").is_ok());
        assert_eq!(validate_optional_email("broken").unwrap_err().code, "email");
    }

    #[test]
    fn attendance_date_accepts_iso_day() {
        assert!(validate_attendance_date("2024-03-01").is_ok());
        assert!(validate_attendance_date("2024-02-29").is_ok());
    }

    #[test]
    fn attendance_date_rejects_unpadded_or_other_formats() {
        assert!(validate_attendance_date("2024-3-1").is_err());
        assert!(validate_attendance_date("01/03/2024").is_err());
        assert!(validate_attendance_date("2024-03-01T00:00:00Z").is_err());
        assert!(validate_attendance_date("").is_err());
    }

    #[test]
    fn attendance_date_rejects_impossible_days() {
        let err = validate_attendance_date("2023-02-29").unwrap_err();
        assert_eq!(err.code, "date_invalid");
        assert!(validate_attendance_date("2024-13-01").is_err());
    }
}
