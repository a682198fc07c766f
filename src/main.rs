// Math Mastery - Terminal Edition
// Interactive IB Mathematics practice tracker

use std::env;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mathmastery::commands::{Reply, Shell};
use mathmastery::features::app::App;
use mathmastery::storage::FileStore;
use mathmastery::utils::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout belongs to the shell
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "mathmastery=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    info!("Starting Math Mastery with data in {}", config.data_dir.display());

    let store = Arc::new(FileStore::open(&config.data_dir)?);
    let mut shell = Shell::new(App::with_defaults(store, config));

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(b"Math Mastery - type `help` for commands.\n")
        .await?;
    if let Some(user) = shell.app().current_user() {
        let greeting = format!("Welcome back, {}!\n", user.username);
        stdout.write_all(greeting.as_bytes()).await?;
    }

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down...");
                break;
            }
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            break;
        };

        match shell.execute(&line) {
            Ok(Reply::Output(text)) if text.is_empty() => {}
            Ok(Reply::Output(text)) => {
                stdout.write_all(text.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
            }
            Ok(Reply::Quit) => break,
            Err(e) => {
                debug!("Command error: {:?}", e);
                let message = format!("❌ Error: {}\n", e);
                stdout.write_all(message.as_bytes()).await?;
            }
        }
    }

    stdout.write_all(b"\n").await?;
    info!("Goodbye!");
    Ok(())
}
