use anyhow::Result;
use dotenvy::dotenv;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio::time::sleep;

use chanbot::cli::{ChannelCommands, Cli, Commands};
use chanbot::core::{config, init_logger, install_panic_hook};
use chanbot::storage::ChannelStore;
use chanbot::telegram::input::channel_input_from_fields;
use chanbot::telegram::{create_bot, schema, setup_bot_commands, AppContext, Bot, ScreenStorage};

/// Main entry point for the channel directory bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Panics inside the dispatcher task go to the log before the restart
    install_panic_hook();

    // Load .env before any config value is read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run) => {
            log::info!("Running bot");
            run_bot().await
        }
        Some(Commands::Channels { action }) => run_channels_command(action),
        None => {
            log::info!("No command specified, running bot in default mode");
            run_bot().await
        }
    }
}

/// Offline maintenance of the channel table
fn run_channels_command(action: ChannelCommands) -> Result<()> {
    let store = ChannelStore::open(&config::DATABASE_PATH)
        .map_err(|e| anyhow::anyhow!("Failed to open channel store: {}", e))?;

    match action {
        ChannelCommands::List { json } => {
            let channels = store.list_channels()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&channels)?);
            } else if channels.is_empty() {
                println!("No channels stored in {}", config::DATABASE_PATH.as_str());
            } else {
                for c in &channels {
                    match &c.thumbnail {
                        Some(thumb) => println!("{:>4}  {}  {}  (thumbnail: {})", c.id, c.name, c.link, thumb),
                        None => println!("{:>4}  {}  {}", c.id, c.name, c.link),
                    }
                }
            }
        }
        ChannelCommands::Add { name, link, thumbnail } => {
            let input = channel_input_from_fields(&name, &link, thumbnail.as_deref())
                .map_err(|reason| anyhow::anyhow!("Invalid channel: {}", reason))?;
            let id = store.add_channel(&input.name, &input.link, input.thumbnail.as_deref())?;
            println!("Added channel {} with id {}", input.name, id);
        }
        ChannelCommands::Remove { id } => {
            if store.remove_channel(id)? {
                println!("Removed channel {}", id);
            } else {
                println!("No channel with id {}", id);
            }
        }
    }

    Ok(())
}

/// Waits for the Bot API to answer `getMe`, retrying transient failures.
async fn wait_for_bot_api(bot: &Bot) -> Result<teloxide::types::Me> {
    let max_retries = config::retry::STARTUP_MAX_RETRIES;
    let mut attempt = 0;
    loop {
        match bot.get_me().await {
            Ok(me) => return Ok(me),
            Err(e) => {
                let err_str = e.to_string();
                let is_retryable = err_str.contains("restart")
                    || err_str.contains("network")
                    || err_str.contains("connection")
                    || err_str.contains("timed out")
                    || err_str.contains("Connection refused");

                attempt += 1;
                if attempt >= max_retries || !is_retryable {
                    return Err(anyhow::anyhow!(
                        "Failed to connect to Bot API after {} retries: {}",
                        attempt,
                        e
                    ));
                }

                log::warn!(
                    "Bot API not ready (attempt {}/{}): {}. Retrying in {} seconds...",
                    attempt,
                    max_retries,
                    err_str,
                    config::retry::STARTUP_RETRY_DELAY_SECS
                );
                sleep(Duration::from_secs(config::retry::STARTUP_RETRY_DELAY_SECS)).await;
            }
        }
    }
}

/// Run the bot with long polling until shutdown or the restart budget is spent
async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");

    let bot = create_bot()?;

    let me = wait_for_bot_api(&bot).await?;
    log::info!("Bot username: {:?}, Bot ID: {}", me.username.as_deref(), me.id);

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let store = ChannelStore::open(&config::DATABASE_PATH)
        .map_err(|e| anyhow::anyhow!("Failed to open channel store: {}", e))?;
    let ctx = AppContext::new(store, *config::admin::ADMIN_USER_ID);
    let handler = schema(ctx);

    // Screens survive dispatcher restarts but not process restarts
    let dialogues = ScreenStorage::new();

    let max_retries = config::retry::MAX_DISPATCHER_RETRIES;
    let mut retry_count = 0;

    loop {
        let bot_clone = bot.clone();
        let handler_clone = handler.clone();
        let dialogues_clone = dialogues.clone();

        // Run the dispatcher in its own task so a panic surfaces on the JoinHandle
        let handle = tokio::spawn(async move {
            let listener = Polling::builder(bot_clone.clone()).drop_pending_updates().build();

            Dispatcher::builder(bot_clone, handler_clone)
                .dependencies(dptree::deps![dialogues_clone])
                .enable_ctrlc_handler()
                .build()
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await
        });

        match handle.await {
            Ok(()) => {
                log::info!("Dispatcher shutdown gracefully");
                break;
            }
            Err(join_err) if join_err.is_panic() => {
                log::error!("Dispatcher panicked: {}", join_err);

                if retry_count >= max_retries {
                    log::error!("Max retries reached after panic. Exiting...");
                    return Err(anyhow::anyhow!("Dispatcher panicked {} times", retry_count + 1));
                }
                retry_count += 1;
                let delay = config::retry::backoff_delay(retry_count);
                log::info!(
                    "Restarting dispatcher in {:?} (attempt {}/{})...",
                    delay,
                    retry_count,
                    max_retries
                );
                sleep(delay).await;
            }
            Err(join_err) => {
                log::warn!("Dispatcher task was cancelled: {}", join_err);
                break;
            }
        }
    }

    Ok(())
}
