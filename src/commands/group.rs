// Group commands - create, join, leave, list, leaderboard, competitions

use anyhow::{anyhow, Result};

use super::{arg, parse_arg, rest};
use crate::features::app::App;
use crate::models::group::Group;
use crate::utils::config::MAX_COMPETITION_DAYS;
use crate::utils::formatters::{format_percent, truncate};

const USAGE: &str = "group <create|join|leave|list|mine|board|compete> ...";
const CREATE_USAGE: &str = "group create <public|private> <name> [| description]";
const COMPETE_USAGE: &str = "group compete <group-id> <days> <name>";

fn summary(group: &Group) -> String {
    format!(
        "{} [{}] - {} member{} | {} questions | {} avg{}",
        group.name,
        group.id,
        group.members.len(),
        if group.members.len() == 1 { "" } else { "s" },
        group.stats.total_questions,
        format_percent(group.stats.average_score),
        if group.description.is_empty() {
            String::new()
        } else {
            format!("\n   {}", truncate(&group.description, 80))
        }
    )
}

fn listing(title: &str, groups: &[&Group], empty: &str) -> String {
    if groups.is_empty() {
        return empty.to_string();
    }
    let mut out = format!("👥 {}\n", title);
    for group in groups {
        out.push_str(&format!("\n• {}", summary(group)));
    }
    out
}

pub fn group(app: &mut App, args: &[&str]) -> Result<String> {
    let sub = arg(args, 0, USAGE)?;
    let args = &args[1..];

    match sub.to_lowercase().as_str() {
        "create" => create(app, args),
        "join" => {
            let group = app.join_group(arg(args, 0, "group join <group-id>")?)?;
            Ok(format!("✅ Joined {}.", summary(&group)))
        }
        "leave" => {
            let id = arg(args, 0, "group leave <group-id>")?;
            app.leave_group(id)?;
            Ok(format!("👋 Left group {}.", id))
        }
        "list" => Ok(listing("Public Groups", &app.public_groups(), "No public groups yet.")),
        "mine" => Ok(listing("Your Groups", &app.my_groups()?, "You are not in any groups.")),
        "board" => board(app, arg(args, 0, "group board <group-id>")?),
        "compete" => compete(app, args),
        other => Err(anyhow!("Unknown group command '{}'. Usage: {}", other, USAGE)),
    }
}

fn create(app: &mut App, args: &[&str]) -> Result<String> {
    let is_public = match arg(args, 0, CREATE_USAGE)?.to_lowercase().as_str() {
        "public" => true,
        "private" => false,
        _ => return Err(anyhow!("Usage: {}", CREATE_USAGE)),
    };
    let text = rest(args, 1);
    let (name, description) = match text.split_once('|') {
        Some((name, description)) => (name.trim(), description.trim()),
        None => (text.trim(), ""),
    };

    let group = app.create_group(name, description, is_public)?;
    Ok(format!(
        "✅ Created {} group {}\nShare the id `{}` so others can join.",
        if group.is_public { "public" } else { "private" },
        group.name,
        group.id
    ))
}

fn board(app: &mut App, group_id: &str) -> Result<String> {
    let standings = app.group_leaderboard(group_id)?;
    let name = app
        .groups()
        .get_group(group_id)
        .map(|g| g.name.clone())
        .unwrap_or_default();

    let mut out = format!("🏆 {} Leaderboard\n", name);
    for (_, standing) in &standings {
        out.push_str(&format!(
            "\n{}. {} - Level {} {} | {} XP | {} questions | {}",
            standing.rank,
            standing.username,
            standing.level,
            standing.level_name,
            standing.experience,
            standing.total_questions,
            format_percent(standing.average_score)
        ));
    }
    Ok(out)
}

fn compete(app: &mut App, args: &[&str]) -> Result<String> {
    let group_id = arg(args, 0, COMPETE_USAGE)?;
    let days: i64 = parse_arg(args, 1, COMPETE_USAGE)?;
    if !(1..=MAX_COMPETITION_DAYS).contains(&days) {
        return Err(anyhow!(
            "Competitions last between 1 and {} days",
            MAX_COMPETITION_DAYS
        ));
    }
    let name = rest(args, 2);

    let competition = app.create_competition(group_id, &name, "", days)?;
    Ok(format!(
        "🏁 Competition {} runs until {}.",
        competition.name,
        competition.end_date.format("%Y-%m-%d %H:%M UTC")
    ))
}

#[cfg(test)]
mod tests {
    use crate::commands::tests::shell;
    use crate::commands::Reply;

    #[test]
    fn test_group_lifecycle() {
        let mut shell = shell();
        shell.execute("signup alice a@x.com pw1").unwrap();
        assert!(shell.execute("group create secret Club").is_err());
        shell.execute("group create public Calc Club | weekly calculus drills").unwrap();

        let id = shell.app().groups().public_groups()[0].id.clone();
        assert_eq!(shell.app().groups().get_group(&id).unwrap().description, "weekly calculus drills");

        shell.execute("signup bob b@x.com pw2").unwrap();
        shell.execute(&format!("group join {}", id)).unwrap();
        assert!(shell.execute(&format!("group join {}", id)).is_err());

        let Reply::Output(text) = shell.execute(&format!("group board {}", id)).unwrap() else {
            panic!("expected output");
        };
        assert!(text.contains("1. "));
        assert!(text.contains("2. "));

        let Reply::Output(text) = shell.execute("group mine").unwrap() else {
            panic!("expected output");
        };
        assert!(text.contains("Calc Club"));

        shell.execute(&format!("group leave {}", id)).unwrap();
        assert_eq!(shell.app().groups().get_group(&id).unwrap().members.len(), 1);
        assert!(shell.execute("group board group_missing").is_err());
        assert!(shell.execute("group compete").is_err());
    }

    #[test]
    fn test_compete_rejects_bad_lengths() {
        let mut shell = shell();
        shell.execute("signup alice a@x.com pw1").unwrap();
        shell.execute("group create public Club").unwrap();
        let id = shell.app().groups().public_groups()[0].id.clone();

        for days in ["100000000", "0", "-3", "366"] {
            let err = shell
                .execute(&format!("group compete {} {} Sprint", id, days))
                .unwrap_err();
            assert!(err.to_string().contains("between 1 and 365"));
        }

        let Reply::Output(text) = shell.execute(&format!("group compete {} 365 Sprint", id)).unwrap() else {
            panic!("expected output");
        };
        assert!(text.contains("Sprint"));
    }
}
