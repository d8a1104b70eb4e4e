// Discord layer - serenity adapters for the core plugin machinery.

#[path = "commands/command_sync.rs"]
pub mod commands;

#[path = "events/event_bridge.rs"]
pub mod events;

use crate::core::plugins::PluginHost;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Data shared with the framework's event handler.
pub struct Data {
    pub host: Arc<PluginHost>,
}
