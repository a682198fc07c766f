// Collaborating surfaces: where questions come from and how answers are marked
pub mod grader;
pub mod questions;
pub mod tutor;
