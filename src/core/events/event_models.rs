// Platform-agnostic gateway events.
//
// The Discord layer translates serenity's events into these so plugin
// handlers never touch serenity types. Event names are the snake_case names
// used by the gateway ("ready", "interaction_create", ...) and are what event
// manifests refer to.

use crate::core::commands::CommandReply;
use crate::core::plugins::PluginHost;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const READY: &str = "ready";
pub const GUILD_CREATE: &str = "guild_create";
pub const MESSAGE: &str = "message";
pub const INTERACTION_CREATE: &str = "interaction_create";

#[derive(Debug, Clone)]
pub enum BotEvent {
    Ready { bot_name: String, guild_ids: Vec<u64> },
    GuildCreate { guild_id: u64, name: String },
    Message(MessageEvent),
    InteractionCreate(CommandInvocation),
    /// Any gateway event without a dedicated payload.
    Other { name: String },
}

impl BotEvent {
    pub fn name(&self) -> &str {
        match self {
            BotEvent::Ready { .. } => READY,
            BotEvent::GuildCreate { .. } => GUILD_CREATE,
            BotEvent::Message(_) => MESSAGE,
            BotEvent::InteractionCreate(_) => INTERACTION_CREATE,
            BotEvent::Other { name } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub author_id: u64,
    pub author_is_bot: bool,
    pub content: String,
}

/// Answers the interaction that triggered a command.
#[async_trait]
pub trait InteractionResponder: Send + Sync {
    async fn respond(&self, reply: CommandReply) -> anyhow::Result<()>;
}

/// A slash command invocation, with option values flattened to strings.
#[derive(Clone)]
pub struct CommandInvocation {
    pub command_name: String,
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub user_id: u64,
    pub user_name: String,
    pub options: BTreeMap<String, String>,
    pub responder: Arc<dyn InteractionResponder>,
}

impl CommandInvocation {
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    pub async fn respond(&self, reply: CommandReply) -> anyhow::Result<()> {
        self.responder.respond(reply).await
    }
}

impl std::fmt::Debug for CommandInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandInvocation")
            .field("command_name", &self.command_name)
            .field("guild_id", &self.guild_id)
            .field("channel_id", &self.channel_id)
            .field("user_id", &self.user_id)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Compiled half of an event manifest. Receives the host as its last argument.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &BotEvent, host: &PluginHost) -> anyhow::Result<()>;
}
