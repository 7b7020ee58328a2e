use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;
use teloxide::update_listeners::{webhooks, Polling};

use tubemux::cli::{Cli, Commands};
use tubemux::core::validation::is_supported_link;
use tubemux::core::{config, init_logger, install_panic_hook, log_tools_configuration};
use tubemux::download::ytdlp::log_ytdlp_version;
use tubemux::download::{Orchestrator, RequestId};
use tubemux::telegram::{create_bot, schema, setup_bot_commands, ConversationState, HandlerDeps};
use tubemux::AppError;

/// Main entry point
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
/// Without a subcommand the bot runs, in webhook mode when WEBHOOK_URL is set.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    install_panic_hook();
    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run { webhook }) => {
            log::info!("Running bot (webhook: {})", webhook);
            run_bot(webhook).await
        }
        Some(Commands::Fetch { url, resolution, output }) => run_cli_fetch(url, resolution, output).await,
        None => {
            let webhook = config::WEBHOOK_URL.is_some();
            log::info!("No command specified, running bot (webhook: {})", webhook);
            run_bot(webhook).await
        }
    }
}

async fn run_bot(use_webhook: bool) -> Result<()> {
    log::info!("Starting bot...");
    log_tools_configuration();
    log_ytdlp_version(&config::YTDL_BIN).await;

    if config::BOT_TOKEN.is_empty() {
        return Err(anyhow::anyhow!("BOT_TOKEN environment variable not set"));
    }

    let bot = create_bot(&config::BOT_TOKEN)?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let orchestrator = Arc::new(Orchestrator::from_env()?);
    let deps = HandlerDeps::new(Arc::new(ConversationState::new()), orchestrator);

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema(deps))
        .enable_ctrlc_handler()
        .build();

    if use_webhook {
        let base = config::WEBHOOK_URL
            .clone()
            .ok_or_else(|| anyhow::anyhow!("WEBHOOK_URL must be set for webhook mode"))?;
        let url = url::Url::parse(&config::webhook_endpoint(&base, &config::BOT_TOKEN))?;
        let address = SocketAddr::from(([0, 0, 0, 0], *config::PORT));

        log::info!("Starting bot in webhook mode on {} (public base {})", address, base);
        let listener = webhooks::axum(bot, webhooks::Options::new(address, url)).await?;

        dispatcher
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the webhook listener"),
            )
            .await;
    } else {
        log::info!("Starting bot in long polling mode");
        if let Err(e) = bot.delete_webhook().await {
            log::warn!("Failed to delete webhook before polling: {}", e);
        }
        let listener = Polling::builder(bot).drop_pending_updates().build();

        dispatcher
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    }

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}

/// Run CLI fetch command
async fn run_cli_fetch(url: String, resolution: String, output: PathBuf) -> Result<()> {
    if !is_supported_link(&url) {
        return Err(AppError::UnsupportedLink.into());
    }

    let orchestrator = Orchestrator::from_env()?;
    let id = RequestId::new(0);

    println!("URL: {}", url);
    println!("Resolution: {}", resolution);

    let result = orchestrator.fetch_and_mux(&id, &url, &resolution).await?;

    fs_err::tokio::create_dir_all(&output).await?;
    let dest = output.join(format!("{}-{}.mp4", id.dir_name(), resolution));
    fs_err::tokio::copy(&result.path, &dest).await?;
    result.cleanup().await;

    println!("Saved {}", dest.display());
    Ok(())
}
