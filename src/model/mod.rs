pub mod attendance;
pub mod parent;
pub mod student;
