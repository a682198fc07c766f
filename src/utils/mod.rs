// Utility functions module
pub mod clock;
pub mod config;
pub mod formatters;
pub mod ids;
pub mod points;
pub mod streak;
