pub mod attendance;
pub mod notification;

pub use attendance::{AttendanceService, NotificationOutcome, SubmissionReport};
pub use notification::{AbsenceNotice, GuardianNotifier};
