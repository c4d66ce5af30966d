pub mod email;
pub mod time;

pub use email::{EmailService, MailError, OutgoingEmail};
pub use time::*;
