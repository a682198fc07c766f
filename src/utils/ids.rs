// Record id generation
// `<prefix>_<unix millis>_<9 random chars>`: unique, and sorts by creation time

use chrono::{DateTime, Utc};
use rand::distr::Alphanumeric;
use rand::Rng;

const SUFFIX_LEN: usize = 9;

pub fn generate_id(prefix: &str, now: DateTime<Utc>) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();
    format!("{}_{}_{}", prefix, now.timestamp_millis(), suffix)
}
