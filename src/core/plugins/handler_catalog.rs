// Compiled handlers, addressed by the keys plugin manifests use.

use crate::core::commands::CommandHandler;
use crate::core::events::EventHandler;
use crate::core::plugins::PluginHost;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Hook run once when an enabled plugin is loaded.
#[async_trait]
pub trait PluginInit: Send + Sync {
    async fn init(&self, plugin: &str, host: &PluginHost) -> anyhow::Result<()>;
}

#[derive(Default, Clone)]
pub struct HandlerCatalog {
    commands: HashMap<String, Arc<dyn CommandHandler>>,
    events: HashMap<String, Arc<dyn EventHandler>>,
    inits: HashMap<String, Arc<dyn PluginInit>>,
}

impl HandlerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command(mut self, key: &str, handler: impl CommandHandler + 'static) -> Self {
        self.commands.insert(key.to_string(), Arc::new(handler));
        self
    }

    pub fn with_event(mut self, key: &str, handler: impl EventHandler + 'static) -> Self {
        self.events.insert(key.to_string(), Arc::new(handler));
        self
    }

    pub fn with_init(mut self, key: &str, hook: impl PluginInit + 'static) -> Self {
        self.inits.insert(key.to_string(), Arc::new(hook));
        self
    }

    pub fn command(&self, key: &str) -> Option<Arc<dyn CommandHandler>> {
        self.commands.get(key).cloned()
    }

    pub fn event(&self, key: &str) -> Option<Arc<dyn EventHandler>> {
        self.events.get(key).cloned()
    }

    pub fn init(&self, key: &str) -> Option<Arc<dyn PluginInit>> {
        self.inits.get(key).cloned()
    }
}
