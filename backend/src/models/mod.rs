//! Data models shared across database access and API handlers.

pub mod attendance;
pub mod result;
pub mod student;
