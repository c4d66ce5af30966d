use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::validation::rules::ATTENDANCE_DATE_FORMAT;

/// Returns the current time in the configured timezone.
pub fn now_in_timezone(tz: &Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(tz)
}

/// Returns today's date in the configured timezone.
pub fn today_local(tz: &Tz) -> NaiveDate {
    now_in_timezone(tz).date_naive()
}

/// Formats a date the way attendance rows store it (`YYYY-MM-DD`).
pub fn format_attendance_date(date: NaiveDate) -> String {
    date.format(ATTENDANCE_DATE_FORMAT).to_string()
}

/// The attendance date string for "today" in the configured timezone.
pub fn today_attendance_date(tz: &Tz) -> String {
    format_attendance_date(today_local(tz))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_in_timezone_returns_datetime_in_tz() {
        let tz = chrono_tz::Asia::Kolkata;
        let result = now_in_timezone(&tz);
        assert_eq!(result.timezone(), tz);
    }

    #[test]
    fn attendance_dates_are_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_attendance_date(date), "2024-03-05");
    }

    #[test]
    fn today_attendance_date_matches_local_date() {
        let tz = chrono_tz::UTC;
        let today = today_attendance_date(&tz);
        assert_eq!(today.len(), 10);
        assert_eq!(
            NaiveDate::parse_from_str(&today, ATTENDANCE_DATE_FORMAT).ok(),
            Some(today_local(&tz))
        );
    }
}
