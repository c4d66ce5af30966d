pub mod attendance;
pub mod results;
pub mod students;
