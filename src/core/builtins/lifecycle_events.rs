// Event handlers and init hooks shipped with the starter.

use crate::core::commands::CommandReply;
use crate::core::events::{BotEvent, EventHandler};
use crate::core::plugins::{PluginHost, PluginInit};
use async_trait::async_trait;

/// Logs once the gateway session is ready.
pub struct LogReady;

#[async_trait]
impl EventHandler for LogReady {
    async fn handle(&self, event: &BotEvent, host: &PluginHost) -> anyhow::Result<()> {
        if let BotEvent::Ready {
            bot_name,
            guild_ids,
        } = event
        {
            tracing::info!(
                bot = %bot_name,
                guilds = guild_ids.len(),
                "Bot is ready ! {}",
                ready_summary(host)
            );
        }
        Ok(())
    }
}

/// One-line inventory of what the loader put into the host.
pub fn ready_summary(host: &PluginHost) -> String {
    let plugins = host.plugin_names();
    let commands = host.commands().names();
    format!(
        "{} plugins ({}), {} commands ({}), {} event handlers",
        plugins.len(),
        plugins.join(", "),
        commands.len(),
        commands.join(", "),
        host.events().total()
    )
}

pub struct LogGuildCreate;

#[async_trait]
impl EventHandler for LogGuildCreate {
    async fn handle(&self, event: &BotEvent, _host: &PluginHost) -> anyhow::Result<()> {
        if let BotEvent::GuildCreate { guild_id, name } = event {
            tracing::info!(guild_id, "Guild available: {}", name);
        }
        Ok(())
    }
}

/// Traces user messages. Content stays empty without the message content intent.
pub struct LogMessage;

#[async_trait]
impl EventHandler for LogMessage {
    async fn handle(&self, event: &BotEvent, _host: &PluginHost) -> anyhow::Result<()> {
        let BotEvent::Message(message) = event else {
            return Ok(());
        };
        if message.author_is_bot {
            return Ok(());
        }

        tracing::debug!(
            guild_id = ?message.guild_id,
            channel_id = message.channel_id,
            author_id = message.author_id,
            chars = message.content.chars().count(),
            "Message received"
        );
        Ok(())
    }
}

/// Routes slash command interactions to the command table.
///
/// Only one plugin should subscribe this: two dispatchers would both try to
/// answer the same interaction.
pub struct DispatchInteraction;

#[async_trait]
impl EventHandler for DispatchInteraction {
    async fn handle(&self, event: &BotEvent, host: &PluginHost) -> anyhow::Result<()> {
        let invocation = match event {
            BotEvent::InteractionCreate(invocation) => invocation,
            _ => return Ok(()),
        };

        let Some(command) = host.commands().get(&invocation.command_name) else {
            tracing::warn!(
                command = %invocation.command_name,
                "Received an interaction for an unknown command"
            );
            return Ok(());
        };

        tracing::debug!(
            plugin = %command.plugin,
            user = %invocation.user_name,
            "Running /{}",
            invocation.command_name
        );

        let reply = match command.handler.execute(invocation, host).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(
                    plugin = %command.plugin,
                    user_id = invocation.user_id,
                    user = %invocation.user_name,
                    "An error occurred in the \"{}\" command: {:#}",
                    invocation.command_name,
                    e
                );
                CommandReply::ephemeral("There was an error while executing this command!")
            }
        };

        invocation.respond(reply).await
    }
}

/// Init hook that only announces the plugin.
pub struct AnnounceInit;

#[async_trait]
impl PluginInit for AnnounceInit {
    async fn init(&self, plugin: &str, host: &PluginHost) -> anyhow::Result<()> {
        tracing::info!(
            plugin,
            registered_commands = host.commands().len(),
            "Plugin initialized"
        );
        Ok(())
    }
}
