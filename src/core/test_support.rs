// Shared fakes for the core unit tests.

use crate::core::commands::{CommandHandler, CommandReply, CommandSpec, RegisteredCommand};
use crate::core::events::{BotEvent, CommandInvocation, EventHandler, InteractionResponder};
use crate::core::plugins::{LoaderError, PluginHost, PluginInit, PluginSection, PluginSource};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn ready_event() -> BotEvent {
    BotEvent::Ready {
        bot_name: "test-bot".into(),
        guild_ids: vec![1, 2],
    }
}

pub fn registered(plugin: &str, name: &str, handler: StaticReply) -> RegisteredCommand {
    RegisteredCommand {
        plugin: plugin.to_string(),
        spec: CommandSpec::new(name, format!("The {} command", name)),
        handler: Arc::new(handler),
    }
}

/// Build an invocation whose replies land in the returned responder.
pub fn invocation(
    command: &str,
    options: &[(&str, &str)],
) -> (CommandInvocation, Arc<RecordingResponder>) {
    let responder = Arc::new(RecordingResponder::default());
    let options: BTreeMap<String, String> = options
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let invocation = CommandInvocation {
        command_name: command.to_string(),
        guild_id: Some(100),
        channel_id: 200,
        user_id: 300,
        user_name: "tester".into(),
        options,
        responder: responder.clone(),
    };
    (invocation, responder)
}

pub struct StaticReply {
    content: String,
}

impl StaticReply {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }
}

#[async_trait]
impl CommandHandler for StaticReply {
    async fn execute(
        &self,
        _invocation: &CommandInvocation,
        _host: &PluginHost,
    ) -> anyhow::Result<CommandReply> {
        Ok(CommandReply::public(self.content.clone()))
    }
}

pub struct FailingCommand;

#[async_trait]
impl CommandHandler for FailingCommand {
    async fn execute(
        &self,
        _invocation: &CommandInvocation,
        _host: &PluginHost,
    ) -> anyhow::Result<CommandReply> {
        anyhow::bail!("command exploded")
    }
}

#[derive(Default, Clone)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventHandler for CountingHandler {
    async fn handle(&self, _event: &BotEvent, _host: &PluginHost) -> anyhow::Result<()> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FailingHandler;

#[async_trait]
impl EventHandler for FailingHandler {
    async fn handle(&self, _event: &BotEvent, _host: &PluginHost) -> anyhow::Result<()> {
        anyhow::bail!("handler exploded")
    }
}

#[derive(Default, Clone)]
pub struct RecordingInit {
    plugins: Arc<Mutex<Vec<String>>>,
    failure: Option<String>,
}

impl RecordingInit {
    pub fn failing(reason: &str) -> Self {
        Self {
            plugins: Arc::default(),
            failure: Some(reason.to_string()),
        }
    }

    pub fn plugins(&self) -> Vec<String> {
        self.plugins.lock().unwrap().clone()
    }
}

#[async_trait]
impl PluginInit for RecordingInit {
    async fn init(&self, plugin: &str, _host: &PluginHost) -> anyhow::Result<()> {
        if let Some(reason) = &self.failure {
            anyhow::bail!("{}", reason);
        }
        self.plugins.lock().unwrap().push(plugin.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingResponder {
    replies: Mutex<Vec<CommandReply>>,
}

impl RecordingResponder {
    pub fn replies(&self) -> Vec<CommandReply> {
        self.replies.lock().unwrap().clone()
    }
}

#[async_trait]
impl InteractionResponder for RecordingResponder {
    async fn respond(&self, reply: CommandReply) -> anyhow::Result<()> {
        self.replies.lock().unwrap().push(reply);
        Ok(())
    }
}

#[derive(Default)]
struct MemoryPlugin {
    descriptor: Option<String>,
    sections: HashMap<PluginSection, BTreeMap<String, String>>,
}

/// In-memory plugin tree.
#[derive(Default)]
pub struct MemoryPluginSource {
    plugins: BTreeMap<String, MemoryPlugin>,
}

impl MemoryPluginSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descriptor(mut self, plugin: &str, raw: &str) -> Self {
        self.plugins.entry(plugin.to_string()).or_default().descriptor = Some(raw.to_string());
        self
    }

    pub fn command(self, plugin: &str, file: &str, raw: &str) -> Self {
        self.file(plugin, PluginSection::Commands, file, raw)
    }

    pub fn event(self, plugin: &str, file: &str, raw: &str) -> Self {
        self.file(plugin, PluginSection::Events, file, raw)
    }

    fn file(mut self, plugin: &str, section: PluginSection, file: &str, raw: &str) -> Self {
        self.plugins
            .entry(plugin.to_string())
            .or_default()
            .sections
            .entry(section)
            .or_default()
            .insert(file.to_string(), raw.to_string());
        self
    }

    fn plugin(&self, plugin: &str) -> Result<&MemoryPlugin, LoaderError> {
        self.plugins
            .get(plugin)
            .ok_or_else(|| LoaderError::MissingRoot(plugin.to_string()))
    }
}

impl PluginSource for MemoryPluginSource {
    fn list_plugins(&self) -> Result<Vec<String>, LoaderError> {
        Ok(self.plugins.keys().cloned().collect())
    }

    fn read_descriptor(&self, plugin: &str) -> Result<Option<String>, LoaderError> {
        Ok(self.plugin(plugin)?.descriptor.clone())
    }

    fn has_section(&self, plugin: &str, section: PluginSection) -> Result<bool, LoaderError> {
        Ok(self.plugin(plugin)?.sections.contains_key(&section))
    }

    fn list_section(
        &self,
        plugin: &str,
        section: PluginSection,
    ) -> Result<Vec<String>, LoaderError> {
        Ok(self
            .plugin(plugin)?
            .sections
            .get(&section)
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn read_file(
        &self,
        plugin: &str,
        section: PluginSection,
        file: &str,
    ) -> Result<String, LoaderError> {
        self.plugin(plugin)?
            .sections
            .get(&section)
            .and_then(|files| files.get(file))
            .cloned()
            .ok_or_else(|| LoaderError::MissingRoot(format!("{}/{}", plugin, file)))
    }
}
