// Mock exam commands

use anyhow::{anyhow, Result};

use super::{arg, parse_arg, rest};
use crate::features::app::App;
use crate::features::exam::ExamQuestion;
use crate::models::curriculum::Paper;
use crate::utils::config::DEFAULT_EXAM_MINUTES;
use crate::utils::formatters::{format_marks, truncate};

const USAGE: &str = "exam <start|show|answer|status|finish|history> ...";
const ANSWER_USAGE: &str = "exam answer <question-number> <working>";

fn render(q: &ExamQuestion) -> String {
    let mut out = format!(
        "Question {} (Section {:?}) - {} | {} | [{} marks]\n",
        q.number, q.section, q.question.topic, q.question.difficulty, q.question.marks
    );
    if let Some(title) = &q.question.title {
        out.push_str(&format!("{}\n", title));
    }
    out.push_str(&q.question.text);
    out
}

pub fn exam(app: &mut App, args: &[&str]) -> Result<String> {
    let sub = arg(args, 0, USAGE)?;
    let args = &args[1..];

    match sub.to_lowercase().as_str() {
        "start" => start(app, args),
        "show" => {
            let number: usize = parse_arg(args, 0, "exam show <question-number>")?;
            let exam = app.exam().ok_or_else(|| anyhow!("No exam in progress."))?;
            let q = exam
                .question(number)
                .ok_or_else(|| anyhow!("There is no question {}.", number))?;
            Ok(render(q))
        }
        "answer" => {
            let number: usize = parse_arg(args, 0, ANSWER_USAGE)?;
            let text = rest(args, 1);
            if text.is_empty() {
                return Err(anyhow!("Usage: {}", ANSWER_USAGE));
            }
            app.answer_exam_question(number, &text)?;
            Ok(format!("✏️ Saved answer to question {}.", number))
        }
        "status" => status(app),
        "finish" => {
            let score = app.finish_exam()?;
            Ok(format!(
                "🎓 Exam finished!\nScore: {} ({}%)\nPredicted IB grade: {}",
                format_marks(score.earned_marks, score.total_marks),
                score.percentage,
                score.grade
            ))
        }
        "history" => Ok(history(app)),
        other => Err(anyhow!("Unknown exam command '{}'. Usage: {}", other, USAGE)),
    }
}

fn start(app: &mut App, args: &[&str]) -> Result<String> {
    let paper: Paper = parse_arg(args, 0, "exam start <paper> [minutes]")?;
    let minutes = match args.get(1) {
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|m| *m > 0)
            .ok_or_else(|| anyhow!("Minutes must be a positive number"))?,
        None => DEFAULT_EXAM_MINUTES,
    };

    let exam = app.start_exam(paper, minutes);
    let mut out = format!(
        "⏱️ {} {} mock exam started: {} questions, {} marks, {} minutes.\n",
        exam.course,
        exam.paper,
        exam.questions.len(),
        exam.total_marks(),
        exam.duration_minutes
    );
    for q in &exam.questions {
        out.push_str(&format!(
            "\n{}. [{}] {}",
            q.number,
            q.question.marks,
            truncate(&q.question.text, 60)
        ));
    }
    out.push_str("\n\nUse `exam show <n>` to read a question and `exam answer <n> <working>` to answer.");
    Ok(out)
}

fn status(app: &App) -> Result<String> {
    let exam = app.exam().ok_or_else(|| anyhow!("No exam in progress."))?;
    let remaining = exam.time_remaining(app.now());
    Ok(format!(
        "{} / {} answered | {}:{:02} remaining",
        exam.answered(),
        exam.questions.len(),
        remaining.num_minutes(),
        remaining.num_seconds() % 60
    ))
}

fn history(app: &App) -> String {
    let history = app.mock_exam_history();
    if history.is_empty() {
        return "No mock exams taken yet.".to_string();
    }
    let mut out = String::from("📜 Mock Exam History\n");
    for record in &history {
        out.push_str(&format!(
            "\n{} | {} {} | {} ({}%) | Grade {}",
            record.date.format("%Y-%m-%d"),
            record.course,
            record.paper,
            format_marks(record.earned_marks, record.total_marks),
            record.percentage,
            record.grade
        ));
    }
    out
}
