// Account commands - signup, signin, signout, whoami

use anyhow::Result;

use super::{arg, rest};
use crate::features::app::App;
use crate::models::user::User;
use crate::utils::formatters::format_percent;

const SIGNUP_USAGE: &str = "signup <username> <email> <password> [course]";
const SIGNIN_USAGE: &str = "signin <username|email> <password>";

fn profile_line(user: &User) -> String {
    format!(
        "{} ({}) - Level {} {} | {} XP | {} questions | {} average | 🔥 {} day streak",
        user.username,
        user.course,
        user.level,
        user.level_name,
        user.experience,
        user.stats.total_questions,
        format_percent(user.stats.average_score),
        user.stats.current_streak
    )
}

pub fn signup(app: &mut App, args: &[&str]) -> Result<String> {
    let username = arg(args, 0, SIGNUP_USAGE)?;
    let email = arg(args, 1, SIGNUP_USAGE)?;
    let password = arg(args, 2, SIGNUP_USAGE)?;
    let course = rest(args, 3);

    let user = app.sign_up(username, email, password, Some(course.as_str()))?;
    Ok(format!("✅ Welcome, {}! You are signed in.\n{}", user.username, profile_line(&user)))
}

pub fn signin(app: &mut App, args: &[&str]) -> Result<String> {
    let identifier = arg(args, 0, SIGNIN_USAGE)?;
    let password = arg(args, 1, SIGNIN_USAGE)?;

    let user = app.sign_in(identifier, password)?;
    Ok(format!("✅ Welcome back, {}!\n{}", user.username, profile_line(&user)))
}

pub fn signout(app: &mut App) -> String {
    match app.current_user().map(|u| u.username.clone()) {
        Some(name) => {
            app.sign_out();
            format!("👋 Signed out {}.", name)
        }
        None => "Not signed in.".to_string(),
    }
}

/// Own profile, or another user's when a username is given
pub fn whoami(app: &App, args: &[&str]) -> Result<String> {
    if let Some(username) = args.first() {
        return Ok(profile_line(app.find_user(username)?));
    }
    Ok(match app.current_user() {
        Some(user) => profile_line(user),
        None => "Not signed in. Use `signup` or `signin`.".to_string(),
    })
}
