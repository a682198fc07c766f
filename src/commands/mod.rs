// Text commands for the interactive shell
// Each command maps one input line to an App operation and renders plain text

pub mod account;
pub mod chat;
pub mod exam;
pub mod group;
pub mod help;
pub mod leaderboard;
pub mod practice;
pub mod stat;

use anyhow::{anyhow, Result};
use std::str::FromStr;

use crate::features::app::App;

/// What the loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Quit,
}

pub struct Shell {
    app: App,
}

impl Shell {
    pub fn new(app: App) -> Self {
        Self { app }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Run one input line
    pub fn execute(&mut self, line: &str) -> Result<Reply> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Reply::Output(String::new()));
        };
        let args: Vec<&str> = words.collect();
        let app = &mut self.app;

        let output = match command.to_lowercase().as_str() {
            "signup" => account::signup(app, &args)?,
            "signin" | "login" => account::signin(app, &args)?,
            "signout" | "logout" => account::signout(app),
            "whoami" | "profile" => account::whoami(app, &args)?,
            "practice" => practice::practice(app, &args)?,
            "answer" => practice::answer(app, &args)?,
            "leaderboard" | "lb" => leaderboard::leaderboard(app, &args)?,
            "daily" => leaderboard::daily(app),
            "rank" => leaderboard::rank(app)?,
            "group" => group::group(app, &args)?,
            "stats" => stat::stats(app),
            "topics" => stat::topics(app),
            "insights" => stat::insights(app)?,
            "reset-stats" => stat::reset(app),
            "ask" => chat::ask(app, &args)?,
            "chat" => chat::chat(app, &args)?,
            "exam" => exam::exam(app, &args)?,
            "help" => help::help(),
            "quit" | "exit" => return Ok(Reply::Quit),
            other => return Err(anyhow!("Unknown command '{}'. Type `help` for a list.", other)),
        };
        Ok(Reply::Output(output))
    }
}

/// Positional argument or a usage error
pub(crate) fn arg<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str> {
    args.get(index)
        .copied()
        .ok_or_else(|| anyhow!("Usage: {}", usage))
}

/// Positional argument parsed through `FromStr`
pub(crate) fn parse_arg<T>(args: &[&str], index: usize, usage: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = arg(args, index, usage)?;
    raw.parse::<T>().map_err(|e| anyhow!("{}", e))
}

/// Everything from `index` on, joined by single spaces
pub(crate) fn rest(args: &[&str], index: usize) -> String {
    args.get(index..).map(|r| r.join(" ")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::utils::config::Config;
    use std::sync::Arc;

    pub(crate) fn shell() -> Shell {
        Shell::new(App::with_defaults(Arc::new(MemoryStore::new()), Config::default()))
    }

    fn output(reply: Reply) -> String {
        match reply {
            Reply::Output(text) => text,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_dispatch() {
        let mut shell = shell();
        assert_eq!(shell.execute("quit").unwrap(), Reply::Quit);
        assert_eq!(shell.execute("   ").unwrap(), Reply::Output(String::new()));
        assert!(shell.execute("dance").is_err());
        assert!(output(shell.execute("help").unwrap()).contains("signup"));
    }

    #[test]
    fn test_session_commands() {
        let mut shell = shell();
        let text = output(shell.execute("signup alice a@x.com pw1 AA HL").unwrap());
        assert!(text.contains("alice"));
        assert_eq!(shell.app().current_user().unwrap().course, "AA HL");

        assert!(output(shell.execute("whoami").unwrap()).contains("alice"));
        shell.execute("signout").unwrap();
        assert!(output(shell.execute("whoami").unwrap()).contains("Not signed in"));
        assert!(shell.execute("signin alice nope").is_err());
        shell.execute("signin alice pw1").unwrap();
        assert!(shell.app().current_user().is_some());
    }

    #[test]
    fn test_profile_lookup() {
        let mut shell = shell();
        shell.execute("signup alice a@x.com pw1").unwrap();
        shell.execute("signup bob b@x.com pw2").unwrap();

        let text = output(shell.execute("whoami alice").unwrap());
        assert!(text.starts_with("alice"));
        assert!(output(shell.execute("profile bob").unwrap()).starts_with("bob"));
        assert!(shell.execute("whoami carol").is_err());
    }

    #[test]
    fn test_practice_round() {
        let mut shell = shell();
        shell.execute("signup alice a@x.com pw1").unwrap();
        let text = output(shell.execute("practice calculus standard 1").unwrap());
        assert!(text.contains("Calculus"));
        let text = output(shell.execute("answer x = 4").unwrap());
        assert!(text.contains("Getting Started"));
        assert!(shell.execute("answer again").is_err());
        assert!(shell.execute("practice calculus impossible 1").is_err());
    }

    #[test]
    fn test_args() {
        let args = ["a", "b", "c"];
        assert_eq!(arg(&args, 1, "x").unwrap(), "b");
        assert!(arg(&args, 3, "x y z w").unwrap_err().to_string().contains("Usage"));
        assert_eq!(rest(&args, 1), "b c");
        assert_eq!(rest(&args, 5), "");
        assert_eq!(parse_arg::<u32>(&["7"], 0, "n").unwrap(), 7);
    }
}
