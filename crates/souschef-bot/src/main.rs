mod deliver;
mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use souschef_core::config::SousChefConfig;
use souschef_core::dialogue::Dialogue;
use souschef_core::llm::LlmService;
use souschef_core::storage::create_backend;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing_subscriber::EnvFilter;

use crate::handlers::Command;

#[derive(Parser)]
#[command(
    name = "souschef",
    about = "Sous-Chef: a Telegram bot that turns your ingredients into recipes",
    version
)]
struct Cli {
    /// Config file layered over ~/.config/souschef/config.toml
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Keep everything in memory, even when a MongoDB URI is configured
    #[arg(long)]
    memory: bool,
    /// Print the effective config (secrets masked) and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SousChefConfig::load(cli.config.as_deref()).context("failed to load config")?;
    if cli.memory {
        config.storage.backend = "memory".to_string();
    }

    init_tracing(&config);
    config.validate();

    if cli.print_config {
        print!("{}", toml::to_string_pretty(&masked(&config))?);
        return Ok(());
    }

    let token = config.telegram_token()?;
    let llm = LlmService::from_config(&config.llm)?;
    tracing::info!(provider = %config.llm.provider, model = llm.model(), "LLM ready");

    let storage = create_backend(&config).await;
    tracing::info!(backend = storage.kind(), "storage ready");

    let engine = Arc::new(Dialogue::new(storage, llm));
    let bot = Bot::new(token);

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!("could not register bot commands: {e}");
    }

    tracing::info!("Sous-Chef is listening");
    Dispatcher::builder(bot, handlers::schema())
        .dependencies(dptree::deps![engine])
        .default_handler(|upd| async move {
            tracing::debug!(update = ?upd.id, "unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "an error occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("Sous-Chef stopped");
    Ok(())
}

/// `RUST_LOG` wins over `logging.level`; output goes to stderr.
fn init_tracing(config: &SousChefConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn masked(config: &SousChefConfig) -> SousChefConfig {
    let hide = |value: &Option<String>| value.as_ref().map(|_| "********".to_string());
    let mut shown = config.clone();
    shown.telegram.token = hide(&config.telegram.token);
    shown.llm.api_key = hide(&config.llm.api_key);
    shown.storage.uri = hide(&config.storage.uri);
    shown
}
