pub mod student;
pub mod submission;
