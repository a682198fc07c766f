// Math Mastery
// IB Mathematics practice core: accounts, progression, rankings, study groups

pub mod api;
pub mod commands;
pub mod error;
pub mod features;
pub mod models;
pub mod storage;
pub mod utils;
