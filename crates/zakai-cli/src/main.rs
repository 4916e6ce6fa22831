//! `zakai`: an interactive chat session in the terminal.

mod config;
mod repl;
mod terminal;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::{ZakaiConfig, API_KEY_ENV};
use repl::{history_outline, parse_line, Command, HELP};
use std::path::{Path, PathBuf};
use terminal::TerminalSurface;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use zakai_agent::{RenderSurface, SessionController, UserAction};
use zakai_session::Session;

#[derive(Parser)]
#[command(name = "zakai", version, about = "ZakAI: chat with documents and images")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "zakai.toml")]
    config: PathBuf,

    /// Model to use (overrides config)
    #[arg(short, long)]
    model: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session (default)
    Chat,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = ZakaiConfig::load(&cli.config).await?;
    config.apply_overrides(std::env::var(API_KEY_ENV).ok(), cli.model);

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => chat(config).await,
    }
}

async fn chat(config: ZakaiConfig) -> anyhow::Result<()> {
    let controller = SessionController::new(&config.chat);
    let mut session = Session::new(config.chat.system_prompt.clone());
    let mut surface = TerminalSurface::stdio(&config.output_dir);

    info!(
        session_id = %session.id,
        model = %config.chat.model.model_id,
        provider = ?config.chat.model.provider,
        "Chat session started"
    );
    surface.info(&format!(
        "ZakAI chat ({}). Type /help for commands.",
        config.chat.model.model_id
    ));
    if !zakai_ingest::sheet::engine_available() {
        warn!("Built without the spreadsheet feature; .xls and .xlsx uploads cannot be read");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        surface.prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let action = match parse_line(&line) {
            Command::Empty => continue,
            Command::Quit => break,
            Command::Help => {
                surface.line(HELP);
                continue;
            }
            Command::History => {
                for entry in history_outline(&session) {
                    surface.line(&entry);
                }
                continue;
            }
            Command::Upload(path) => match read_upload(&path).await {
                Ok(action) => action,
                Err(e) => {
                    surface.error(&format!("{e:#}"));
                    continue;
                }
            },
            Command::Text(text) => UserAction::SubmitText(text),
        };

        if let Err(e) = controller.handle(&mut session, action, &mut surface).await {
            error!(session_id = %session.id, error = %e, "Action failed");
            surface.error(&e.to_string());
        }
    }

    info!(
        session_id = %session.id,
        messages = session.message_count(),
        "Chat session ended"
    );
    Ok(())
}

async fn read_upload(path: &Path) -> anyhow::Result<UserAction> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("'{}' is not a file name", path.display()))?
        .to_string();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    Ok(UserAction::UploadFile { file_name, bytes })
}
