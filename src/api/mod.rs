pub mod homepage;
pub mod student;
