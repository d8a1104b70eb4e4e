// Built-in handlers. Manifest `handler` keys resolve against `catalog()`.

pub mod general_commands;
pub mod lifecycle_events;

use crate::core::plugins::HandlerCatalog;
use general_commands::{EchoCommand, HelpCommand, PingCommand};
use lifecycle_events::{AnnounceInit, DispatchInteraction, LogGuildCreate, LogMessage, LogReady};

pub fn catalog() -> HandlerCatalog {
    HandlerCatalog::new()
        .with_command("ping", PingCommand)
        .with_command("help", HelpCommand)
        .with_command("echo", EchoCommand)
        .with_event("log_ready", LogReady)
        .with_event("log_guild_create", LogGuildCreate)
        .with_event("log_message", LogMessage)
        .with_event("dispatch_interaction", DispatchInteraction)
        .with_init("announce", AnnounceInit)
}
