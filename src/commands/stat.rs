// Stat commands - personal stats, topic breakdown, insights

use anyhow::Result;

use crate::features::app::App;
use crate::utils::formatters::{format_marks, format_percent, format_relative_time};

/// Recent activity rows shown under the topic breakdown
const RECENT_ROWS: usize = 5;

pub fn stats(app: &App) -> String {
    let Some(user) = app.current_user() else {
        return "Not signed in. Use `topics` for this device's practice statistics.".to_string();
    };
    let s = &user.stats;

    let mut out = format!(
        "📊 Stats - {}\n\
        Level {} {} ({} XP)\n\
        Questions: {} | Marks: {} | Average: {}\n\
        Streak: {} days (longest {}) | Days active: {}",
        user.username,
        user.level,
        user.level_name,
        user.experience,
        s.total_questions,
        format_marks(s.earned_marks, s.total_marks),
        format_percent(s.average_score),
        s.current_streak,
        s.longest_streak,
        s.total_days_active
    );

    if user.achievements.is_empty() {
        out.push_str("\n\nNo achievements yet.");
    } else {
        out.push_str(&format!("\n\n🏅 Achievements ({})", user.achievements.len()));
        for a in &user.achievements {
            out.push_str(&format!("\n{} {} - {}", a.icon, a.name, a.description));
        }
    }
    out
}

pub fn topics(app: &App) -> String {
    let summary = app.topic_summary();
    if summary.all.is_empty() {
        return "No practice recorded yet. Try `practice calculus standard 1`.".to_string();
    }

    let mut out = String::from("📚 Topic Breakdown\n");
    for (topic, t) in &summary.all {
        out.push_str(&format!(
            "\n{} - {} attempts, {} correct, {}",
            topic,
            t.attempts,
            t.correct,
            format_percent(t.average_score)
        ));
    }
    if let (Some((best, _)), Some((worst, _))) = (&summary.best, &summary.worst) {
        out.push_str(&format!("\n\nStrongest: {} | Weakest: {}", best, worst));
    }

    let stats = app.attempts().statistics();
    let now = app.now();
    if !stats.recent_activity.is_empty() {
        out.push_str("\n\nRecent activity:");
        for record in stats.recent_activity.iter().take(RECENT_ROWS) {
            out.push_str(&format!(
                "\n{} | {} {} {} | {} ({})",
                format_relative_time((now - record.date).num_seconds()),
                record.topic,
                record.difficulty,
                record.paper,
                record.marks,
                format_percent(record.score)
            ));
        }
    }
    out
}

pub fn insights(app: &App) -> Result<String> {
    let report = app.insights()?;
    let o = &report.overall;

    let rank = if o.rank == 0 {
        "unranked".to_string()
    } else {
        format!("#{}", o.rank)
    };
    let mut out = format!(
        "🔎 Insights\nRank {} | Level {} {} | {} questions | {} average\n",
        rank,
        o.level,
        o.level_name,
        o.total_questions,
        format_percent(o.average_score)
    );

    if !report.strengths.is_empty() {
        out.push_str("\n💪 Strengths");
        for s in &report.strengths {
            out.push_str(&format!("\n• {}: {}", s.area, s.detail));
        }
        out.push('\n');
    }
    if !report.weaknesses.is_empty() {
        out.push_str("\n🎯 To work on");
        for w in &report.weaknesses {
            out.push_str(&format!("\n• {}: {}", w.area, w.recommendation));
        }
        out.push('\n');
    }

    out.push_str("\n💡 Recommendations");
    for r in &report.recommendations {
        out.push_str(&format!("\n• {}", r));
    }

    out.push_str("\n\n🏁 Goals");
    for g in &report.goals {
        out.push_str(&format!(
            "\n{} {} - {:.0}%",
            if g.completed { "✅" } else { "⬜" },
            g.name,
            g.progress
        ));
    }
    Ok(out)
}

pub fn reset(app: &mut App) -> String {
    app.reset_statistics();
    "🧹 Practice statistics cleared.".to_string()
}

#[cfg(test)]
mod tests {
    use crate::commands::tests::shell;
    use crate::commands::Reply;

    fn run(shell: &mut crate::commands::Shell, line: &str) -> String {
        match shell.execute(line).unwrap() {
            Reply::Output(text) => text,
            Reply::Quit => String::new(),
        }
    }

    #[test]
    fn test_stats_and_topics() {
        let mut shell = shell();
        assert!(run(&mut shell, "stats").contains("Not signed in"));
        assert!(run(&mut shell, "topics").contains("No practice"));

        run(&mut shell, "signup alice a@x.com pw1");
        run(&mut shell, "practice stats hard 3");
        run(&mut shell, "answer P(A) = 0.3");

        let text = run(&mut shell, "stats");
        assert!(text.contains("Questions: 1"));
        assert!(text.contains("Getting Started"));

        let text = run(&mut shell, "topics");
        assert!(text.contains("Stats & Probability - 1 attempts"));
        assert!(text.contains("just now"));

        let text = run(&mut shell, "insights");
        assert!(text.contains("Rank #1"));
        assert!(text.contains("Goals"));

        run(&mut shell, "reset-stats");
        assert!(run(&mut shell, "topics").contains("No practice"));
    }

    #[test]
    fn test_insights_need_session() {
        let mut shell = shell();
        assert!(shell.execute("insights").is_err());
    }
}
