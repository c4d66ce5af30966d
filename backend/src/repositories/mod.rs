pub mod attendance;
pub mod repository;
pub mod result;
pub mod student;
pub mod transaction;

pub use attendance::{AttendanceRepository, AttendanceRepositoryTrait};
pub use repository::Repository;
pub use result::ResultRepository;
pub use student::{StudentRepository, StudentRepositoryTrait};
