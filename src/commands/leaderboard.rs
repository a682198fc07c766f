// Leaderboard commands - global, category, daily and personal rank

use anyhow::{anyhow, Result};

use crate::features::app::App;
use crate::models::stats::{LeaderboardEntry, RankingCategory};
use crate::utils::formatters::{format_number, format_percent, truncate};

/// Rows shown in the text board
const DISPLAY_ROWS: usize = 10;

fn medal(position: usize) -> String {
    match position {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("{}.", n),
    }
}

fn score_label(category: RankingCategory, entry: &LeaderboardEntry) -> String {
    match category {
        RankingCategory::Overall => format!("{} pts", format_number(entry.score.round() as i64)),
        RankingCategory::Questions => format!("{} questions", entry.total_questions),
        RankingCategory::Streak => format!("{} days", entry.current_streak),
        RankingCategory::Score => format_percent(entry.average_score),
        RankingCategory::Level => format!("Level {}", entry.level),
    }
}

pub fn leaderboard(app: &App, args: &[&str]) -> Result<String> {
    let category = match args.first() {
        Some(raw) => raw.parse::<RankingCategory>().map_err(|e| anyhow!(e))?,
        None => RankingCategory::Overall,
    };

    let board = app.leaderboard(category);
    if board.is_empty() {
        return Ok("No users yet. Be the first to `signup`!".to_string());
    }

    let mut out = format!("🏆 {} Leaderboard\n", category.label());
    for entry in board.iter().take(DISPLAY_ROWS) {
        out.push_str(&format!(
            "\n{} {} - {} (Level {} {})",
            medal(entry.position),
            truncate(&entry.username, 20),
            score_label(category, entry),
            entry.level,
            entry.level_name
        ));
    }

    // Signed-in users outside the top rows still see their own place
    if let Some(user) = app.current_user() {
        if let Some(own) = board.iter().find(|e| e.id == user.id) {
            if own.position > DISPLAY_ROWS {
                out.push_str(&format!(
                    "\n...\n{} {} - {}",
                    medal(own.position),
                    own.username,
                    score_label(category, own)
                ));
            }
        }
    }
    Ok(out)
}

pub fn daily(app: &App) -> String {
    let board = app.daily_leaderboard();
    if board.is_empty() {
        return "Nobody has practised today yet.".to_string();
    }

    let mut out = String::from("📅 Active Today\n");
    for entry in &board {
        out.push_str(&format!(
            "\n{} {} - Level {} | {} questions",
            medal(entry.position),
            entry.username,
            entry.level,
            entry.total_questions
        ));
    }
    out
}

pub fn rank(app: &App) -> Result<String> {
    let Some(entry) = app.my_ranking()? else {
        return Ok("You are not ranked yet.".to_string());
    };

    let mut out = format!(
        "📈 You are #{} with {} pts",
        entry.position,
        format_number(entry.ranking_score.round() as i64)
    );
    if let Some(cmp) = app.my_comparison()? {
        if let Some(above) = cmp.above {
            out.push_str(&format!(
                "\n⬆️ {} pts behind {}",
                format_number(above.difference.round() as i64),
                above.username
            ));
        }
        if let Some(below) = cmp.below {
            out.push_str(&format!(
                "\n⬇️ {} pts ahead of {}",
                format_number(below.difference.round() as i64),
                below.username
            ));
        }
    }
    Ok(out)
}
