// Entry point of the plugin-driven Discord bot.
//
// **Architecture Overview:**
// - `core/` = Plugin machinery (loader, command table, event bus, publication)
// - `infra/` = Implementations of core ports (the filesystem plugin source)
// - `discord/` = Serenity adapters (event translation, command upload)
//
// This file's job is to:
// 1. Load configuration and command line flags
// 2. Scan the plugin folder into a `PluginHost`
// 3. Set up the Discord framework and forward every event to the host
// 4. Publish the collected commands once the bot is logged in

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

mod cli;
mod config;

use crate::cli::Cli;
use crate::config::BotConfig;
use crate::core::builtins;
use crate::core::commands::{publish_commands, PublishTarget};
use crate::core::events::INTERACTION_CREATE;
use crate::core::plugins::{PluginHost, PluginLoader};
use crate::discord::commands::SerenityCommandPublisher;
use crate::discord::{Data, Error};
use crate::infra::plugins::FsPluginSource;
use anyhow::Context as _;
use clap::Parser;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Forwards every gateway event to the plugins' handlers.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    let bot_event = discord::events::translate(ctx, event);
    let handled = data.host.emit(&bot_event).await;
    if handled > 0 {
        tracing::trace!(event = bot_event.name(), handled, "Dispatched gateway event");
    }
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            tracing::error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::EventHandler { error, .. } => {
            tracing::error!("Error in event handler: {}", error);
        }
        // Slash commands are dispatched by the plugins' interaction_create handler.
        poise::FrameworkError::UnknownInteraction { interaction, .. } => {
            tracing::trace!(command = %interaction.data.name, "Left to plugin dispatch");
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Panics inside spawned handler tasks would otherwise only reach stderr.
fn install_panic_logger() {
    std::panic::set_hook(Box::new(|info| {
        tracing::warn!("Error not handled !");
        tracing::error!("{}", info);
    }));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists), RUST_LOG included
    dotenv::dotenv().ok();

    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    install_panic_logger();

    let cli = Cli::parse();
    let config = BotConfig::from_env()?;
    let plugins_path = cli
        .plugins
        .clone()
        .unwrap_or_else(|| config.plugins_path.clone());

    // ========================================================================
    // PLUGINS
    // ========================================================================

    let host = Arc::new(PluginHost::new());
    let mut loader = PluginLoader::new(FsPluginSource::new(&plugins_path), builtins::catalog());
    if config.check_interaction_create_handler {
        loader = loader.with_exclusive_event(INTERACTION_CREATE);
    }

    let report = loader
        .load_all(&host)
        .await
        .with_context(|| format!("Failed to load plugins from {}", plugins_path.display()))?;
    tracing::info!(
        commands = report.commands,
        events = report.events,
        skipped = report.skipped.len(),
        "Plugins ready"
    );

    let target: Option<PublishTarget> = cli.publish_target(config.base_guild_id);

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let setup_host = Arc::clone(&host);
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            // Commands come from plugins and are dispatched by the base plugin.
            commands: vec![],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, _framework| {
            Box::pin(async move {
                tracing::info!("Logged in as {}", ready.user.name);

                match target {
                    Some(target) => {
                        let guilds = ready.guilds.iter().map(|g| g.id.get()).collect();
                        let publisher = SerenityCommandPublisher::new(ctx.http.clone(), guilds);
                        let summary =
                            publish_commands(setup_host.commands(), &publisher, target).await;
                        if !summary.succeeded() {
                            tracing::warn!("The bot keeps running with possibly stale commands.");
                        }
                    }
                    None => tracing::info!("Command upload skipped (--no-upload)."),
                }

                Ok(Data { host: setup_host })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    tracing::info!("Bot starting up.");
    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    client.start().await.context("Error running bot")?;
    Ok(())
}
