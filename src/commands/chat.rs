// Tutor commands - ask a question, review or clear the conversation

use anyhow::{anyhow, Result};

use super::{arg, rest};
use crate::api::tutor::ChatRole;
use crate::features::app::App;
use crate::utils::formatters::truncate;

const ASK_USAGE: &str = "ask <question>";
const CHAT_USAGE: &str = "chat <history|clear>";

pub fn ask(app: &mut App, args: &[&str]) -> Result<String> {
    let message = rest(args, 0);
    if message.is_empty() {
        return Err(anyhow!("Usage: {}", ASK_USAGE));
    }
    let reply = app.ask_tutor(&message)?;
    Ok(format!("🤖 {}", reply))
}

pub fn chat(app: &mut App, args: &[&str]) -> Result<String> {
    match arg(args, 0, CHAT_USAGE)?.to_lowercase().as_str() {
        "history" => Ok(history(app)),
        "clear" => {
            app.clear_chat();
            Ok("🧹 Chat history cleared.".to_string())
        }
        other => Err(anyhow!("Unknown chat command '{}'. Usage: {}", other, CHAT_USAGE)),
    }
}

fn history(app: &App) -> String {
    let messages = app.chat_history();
    if messages.is_empty() {
        return "No conversation yet. Try `ask how do I differentiate x^3`.".to_string();
    }
    let mut out = String::from("💬 Chat History\n");
    for message in messages {
        let who = match message.role {
            ChatRole::User => "You",
            ChatRole::Assistant => "Tutor",
        };
        let first_line = message.content.lines().next().unwrap_or_default();
        out.push_str(&format!(
            "\n[{}] {}: {}",
            message.timestamp.format("%H:%M"),
            who,
            truncate(first_line, 70)
        ));
    }
    out
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
    fn test_ask_and_clear() {
        let mut shell = shell();
        assert!(shell.execute("ask").is_err());
        assert!(run(&mut shell, "chat history").contains("No conversation yet"));

        assert!(run(&mut shell, "ask what is the chain rule for a derivative").contains("Chain rule"));
        let text = run(&mut shell, "chat history");
        assert!(text.contains("You: what is the chain rule"));
        assert!(text.contains("Tutor: "));
        assert_eq!(shell.app().chat_history().len(), 2);

        assert!(run(&mut shell, "chat clear").contains("cleared"));
        assert!(shell.app().chat_history().is_empty());
        assert!(shell.execute("chat forget").is_err());
    }
}
