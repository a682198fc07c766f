// Data models
pub mod attempt;
pub mod curriculum;
pub mod group;
pub mod stats;
pub mod user;
