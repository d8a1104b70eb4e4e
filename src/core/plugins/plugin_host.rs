use super::plugin_models::PluginDescriptor;
use crate::core::commands::CommandRegistry;
use crate::core::events::{BotEvent, EventBus};
use dashmap::DashMap;

/// Everything plugins register into. Handlers receive it as their last
/// argument, the way a client object is handed to every callback.
pub struct PluginHost {
    commands: CommandRegistry,
    events: EventBus,
    plugins: DashMap<String, PluginDescriptor>,
}

impl PluginHost {
    pub fn new() -> Self {
        Self {
            commands: CommandRegistry::new(),
            events: EventBus::new(),
            plugins: DashMap::new(),
        }
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn record_plugin(&self, name: &str, descriptor: PluginDescriptor) {
        self.plugins.insert(name.to_string(), descriptor);
    }

    /// Names of the plugins that were loaded (not skipped), sorted.
    pub fn plugin_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.plugins.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Dispatch an event to every subscribed handler.
    pub async fn emit(&self, event: &BotEvent) -> usize {
        self.events.emit(event, self).await
    }
}

impl Default for PluginHost {
    fn default() -> Self {
        Self::new()
    }
}
