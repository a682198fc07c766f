pub mod analytics;
pub mod app;
pub mod attempts;
pub mod auth;
pub mod chat;
pub mod exam;
pub mod groups;
pub mod progress;
pub mod ranking;
