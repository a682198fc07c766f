// Practice commands - draw a question and answer it

use anyhow::Result;

use super::{parse_arg, rest};
use crate::features::app::App;
use crate::models::curriculum::{Difficulty, Paper, Topic};
use crate::utils::formatters::format_marks;

const PRACTICE_USAGE: &str = "practice <topic> <difficulty> <paper>";

pub fn practice(app: &mut App, args: &[&str]) -> Result<String> {
    let topic: Topic = parse_arg(args, 0, PRACTICE_USAGE)?;
    let difficulty: Difficulty = parse_arg(args, 1, PRACTICE_USAGE)?;
    let paper: Paper = parse_arg(args, 2, PRACTICE_USAGE)?;

    let question = app.practice(topic, difficulty, paper);
    let mut out = format!(
        "📝 {} | {} | {} | [{} marks]\n",
        question.topic, question.difficulty, question.paper, question.marks
    );
    if let Some(title) = &question.title {
        out.push_str(&format!("{}\n", title));
    }
    out.push_str(&question.text);
    out.push_str("\n\nReply with `answer <your working>`.");
    Ok(out)
}

pub fn answer(app: &mut App, args: &[&str]) -> Result<String> {
    let submission = app.submit_answer(&rest(args, 0))?;
    let grade = &submission.grade;

    let mut out = format!(
        "📊 Marks: {}\n{}",
        format_marks(grade.awarded, grade.total),
        grade.feedback
    );
    for achievement in &submission.unlocked {
        out.push_str(&format!(
            "\n{} Achievement unlocked: {} - {}",
            achievement.icon, achievement.name, achievement.description
        ));
    }
    if app.current_user().is_none() {
        out.push_str("\n\nSign in to track your progress and level up.");
    }
    Ok(out)
}
