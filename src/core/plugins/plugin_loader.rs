// Plugin loader - the directory-convention scanner.
//
// Layout of the plugin root:
//
//   <root>/<plugin>/plugin.json        optional descriptor (enabled flag, init hook)
//   <root>/<plugin>/commands/*.json    command manifests
//   <root>/<plugin>/events/*.json      event manifests
//
// Loading is a boot-time step: any error propagates and stops startup.

use super::handler_catalog::HandlerCatalog;
use super::plugin_host::PluginHost;
use super::plugin_models::{
    CommandManifest, EventManifest, LoadReport, PluginDescriptor, PluginSection,
    DEBUG_ARTIFACT_SUFFIX, DESCRIPTOR_FILE,
};
use super::plugin_source::PluginSource;
use crate::core::commands::RegisteredCommand;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Plugin directory not found: {0}")]
    MissingRoot(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {file} in plugin '{plugin}': {source}")]
    Manifest {
        plugin: String,
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Plugin '{plugin}' references unknown {kind} handler '{key}'")]
    UnknownHandler {
        plugin: String,
        kind: &'static str,
        key: String,
    },

    #[error("Invalid command in plugin '{plugin}': {reason}")]
    InvalidCommand { plugin: String, reason: String },

    #[error("Init hook of plugin '{plugin}' failed: {reason}")]
    Init { plugin: String, reason: String },

    #[error(
        "Multiple handlers for the '{event}' event (plugins '{first}' and '{second}'), \
         only one plugin may handle it"
    )]
    DuplicateExclusiveEvent {
        event: String,
        first: String,
        second: String,
    },
}

pub struct PluginLoader<S: PluginSource> {
    source: S,
    catalog: HandlerCatalog,
    /// Events that at most one handler may subscribe to.
    exclusive_events: Vec<String>,
}

impl<S: PluginSource> PluginLoader<S> {
    pub fn new(source: S, catalog: HandlerCatalog) -> Self {
        Self {
            source,
            catalog,
            exclusive_events: Vec::new(),
        }
    }

    pub fn with_exclusive_event(mut self, event: impl Into<String>) -> Self {
        self.exclusive_events.push(event.into());
        self
    }

    /// Scan the plugin root and register everything found into `host`.
    pub async fn load_all(&self, host: &PluginHost) -> Result<LoadReport, LoaderError> {
        let plugins = self.source.list_plugins()?;
        tracing::info!("{} plugins found !", plugins.len());

        let mut report = LoadReport {
            found: plugins.clone(),
            ..Default::default()
        };

        for plugin in &plugins {
            tracing::info!("Loading the plugin '{}'.", plugin);

            let descriptor = self.read_descriptor(plugin)?;
            if !descriptor.enabled {
                tracing::warn!(
                    plugin = %plugin,
                    "Plugin ignored as it is disabled ({}) !",
                    DESCRIPTOR_FILE
                );
                report.skipped.push(plugin.clone());
                continue;
            }

            if let Some(key) = &descriptor.init {
                let hook = self
                    .catalog
                    .init(key)
                    .ok_or_else(|| LoaderError::UnknownHandler {
                        plugin: plugin.clone(),
                        kind: "init",
                        key: key.clone(),
                    })?;
                hook.init(plugin, host)
                    .await
                    .map_err(|e| LoaderError::Init {
                        plugin: plugin.clone(),
                        reason: format!("{:#}", e),
                    })?;
            }

            if self.source.has_section(plugin, PluginSection::Commands)? {
                report.commands += self.load_commands(plugin, host)?;
            }
            if self.source.has_section(plugin, PluginSection::Events)? {
                report.events += self.load_events(plugin, host)?;
            }

            host.record_plugin(plugin, descriptor);
            report.loaded.push(plugin.clone());
        }

        tracing::info!("{} plugins loaded !", report.loaded.len());
        Ok(report)
    }

    fn read_descriptor(&self, plugin: &str) -> Result<PluginDescriptor, LoaderError> {
        match self.source.read_descriptor(plugin)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| LoaderError::Manifest {
                plugin: plugin.to_string(),
                file: DESCRIPTOR_FILE.to_string(),
                source,
            }),
            None => Ok(PluginDescriptor::default()),
        }
    }

    /// Section files minus debugger artifacts.
    fn section_files(
        &self,
        plugin: &str,
        section: PluginSection,
    ) -> Result<Vec<String>, LoaderError> {
        Ok(self
            .source
            .list_section(plugin, section)?
            .into_iter()
            .filter(|file| !file.ends_with(DEBUG_ARTIFACT_SUFFIX))
            .collect())
    }

    fn load_commands(&self, plugin: &str, host: &PluginHost) -> Result<usize, LoaderError> {
        let files = self.section_files(plugin, PluginSection::Commands)?;

        for file in &files {
            tracing::info!("\t command: {}", file);
            let raw = self.source.read_file(plugin, PluginSection::Commands, file)?;
            let manifest: CommandManifest =
                serde_json::from_str(&raw).map_err(|source| LoaderError::Manifest {
                    plugin: plugin.to_string(),
                    file: format!("commands/{}", file),
                    source,
                })?;

            manifest
                .spec
                .validate()
                .map_err(|reason| LoaderError::InvalidCommand {
                    plugin: plugin.to_string(),
                    reason,
                })?;

            let handler =
                self.catalog
                    .command(&manifest.handler)
                    .ok_or_else(|| LoaderError::UnknownHandler {
                        plugin: plugin.to_string(),
                        kind: "command",
                        key: manifest.handler.clone(),
                    })?;

            host.commands().register(RegisteredCommand {
                plugin: plugin.to_string(),
                spec: manifest.spec,
                handler,
            });
        }

        Ok(files.len())
    }

    fn load_events(&self, plugin: &str, host: &PluginHost) -> Result<usize, LoaderError> {
        let files = self.section_files(plugin, PluginSection::Events)?;

        for file in &files {
            tracing::info!("\t event: {}", file);
            let raw = self.source.read_file(plugin, PluginSection::Events, file)?;
            let manifest: EventManifest =
                serde_json::from_str(&raw).map_err(|source| LoaderError::Manifest {
                    plugin: plugin.to_string(),
                    file: format!("events/{}", file),
                    source,
                })?;

            let handler =
                self.catalog
                    .event(&manifest.handler)
                    .ok_or_else(|| LoaderError::UnknownHandler {
                        plugin: plugin.to_string(),
                        kind: "event",
                        key: manifest.handler.clone(),
                    })?;

            if self.exclusive_events.contains(&manifest.name) {
                if let Some(first) = host.events().subscribers(&manifest.name).first() {
                    let err = LoaderError::DuplicateExclusiveEvent {
                        event: manifest.name.clone(),
                        first: first.clone(),
                        second: plugin.to_string(),
                    };
                    tracing::error!("{}", err);
                    return Err(err);
                }
            }

            host.events()
                .subscribe(manifest.name, plugin, manifest.once, handler);
        }

        Ok(files.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::INTERACTION_CREATE;
    use crate::core::test_support::{
        ready_event, CountingHandler, MemoryPluginSource, RecordingInit, StaticReply,
    };
    use std::sync::Arc;

    fn command_json(name: &str, handler: &str) -> String {
        format!(
            r#"{{"name": "{}", "description": "The {} command", "handler": "{}"}}"#,
            name, name, handler
        )
    }

    fn event_json(name: &str, once: bool, handler: &str) -> String {
        format!(
            r#"{{"name": "{}", "once": {}, "handler": "{}"}}"#,
            name, once, handler
        )
    }

    fn catalog(counter: &Arc<CountingHandler>, init: &Arc<RecordingInit>) -> HandlerCatalog {
        HandlerCatalog::new()
            .with_command("reply", StaticReply::new("ok"))
            .with_event("count", counter.as_ref().clone())
            .with_init("record", init.as_ref().clone())
    }

    #[tokio::test]
    async fn loads_enabled_plugins_and_skips_disabled_ones() {
        let source = MemoryPluginSource::new()
            .command("alpha", "ping.json", &command_json("ping", "reply"))
            .command("alpha", "help.json", &command_json("help", "reply"))
            .event("alpha", "ready.json", &event_json("ready", true, "count"))
            .command("beta", "echo.json", &command_json("echo", "reply"))
            .descriptor("gamma", r#"{"enabled": false, "init": "record"}"#)
            .command("gamma", "secret.json", &command_json("secret", "reply"))
            .event("gamma", "message.json", &event_json("message", false, "count"));

        let counter = Arc::new(CountingHandler::default());
        let init = Arc::new(RecordingInit::default());
        let loader = PluginLoader::new(source, catalog(&counter, &init));
        let host = PluginHost::new();

        let report = loader.load_all(&host).await.unwrap();

        assert_eq!(report.found, vec!["alpha", "beta", "gamma"]);
        assert_eq!(report.loaded, vec!["alpha", "beta"]);
        assert_eq!(report.skipped, vec!["gamma"]);
        assert_eq!(report.commands, 3);
        assert_eq!(report.events, 1);

        assert_eq!(host.commands().names(), vec!["echo", "help", "ping"]);
        assert!(host.events().subscribers("message").is_empty());
        assert_eq!(host.events().total(), 1);
        assert_eq!(host.plugin_names(), vec!["alpha", "beta"]);
        assert!(init.plugins().is_empty());
    }

    #[tokio::test]
    async fn debug_artifacts_are_not_loaded() {
        // The .map file is not valid JSON; loading it would fail.
        let source = MemoryPluginSource::new()
            .command("alpha", "ping.json", &command_json("ping", "reply"))
            .command("alpha", "ping.json.map", "{\"version\":3,")
            .event("alpha", "ready.json", &event_json("ready", false, "count"))
            .event("alpha", "ready.json.map", "garbage");

        let counter = Arc::new(CountingHandler::default());
        let init = Arc::new(RecordingInit::default());
        let loader = PluginLoader::new(source, catalog(&counter, &init));
        let host = PluginHost::new();

        let report = loader.load_all(&host).await.unwrap();

        assert_eq!(report.commands, 1);
        assert_eq!(report.events, 1);
    }

    #[tokio::test]
    async fn init_hook_runs_for_enabled_plugins() {
        let source = MemoryPluginSource::new()
            .descriptor("base_events", r#"{"init": "record"}"#)
            .descriptor("quiet", "{}");

        let counter = Arc::new(CountingHandler::default());
        let init = Arc::new(RecordingInit::default());
        let loader = PluginLoader::new(source, catalog(&counter, &init));
        let host = PluginHost::new();

        let report = loader.load_all(&host).await.unwrap();

        assert_eq!(report.loaded, vec!["base_events", "quiet"]);
        assert_eq!(init.plugins(), vec!["base_events"]);
    }

    #[tokio::test]
    async fn loaded_events_fire_through_the_host() {
        let source = MemoryPluginSource::new().event(
            "alpha",
            "ready.json",
            &event_json("ready", true, "count"),
        );

        let counter = Arc::new(CountingHandler::default());
        let init = Arc::new(RecordingInit::default());
        let loader = PluginLoader::new(source, catalog(&counter, &init));
        let host = PluginHost::new();
        loader.load_all(&host).await.unwrap();

        host.emit(&ready_event()).await;
        host.emit(&ready_event()).await;

        assert_eq!(counter.count(), 1);
    }

    #[tokio::test]
    async fn second_interaction_handler_is_fatal_when_checked() {
        let source = MemoryPluginSource::new()
            .event("a", "interaction.json", &event_json(INTERACTION_CREATE, false, "count"))
            .event("b", "interaction.json", &event_json(INTERACTION_CREATE, false, "count"));

        let counter = Arc::new(CountingHandler::default());
        let init = Arc::new(RecordingInit::default());
        let loader = PluginLoader::new(source, catalog(&counter, &init))
            .with_exclusive_event(INTERACTION_CREATE);

        let err = loader.load_all(&PluginHost::new()).await.unwrap_err();
        match err {
            LoaderError::DuplicateExclusiveEvent { first, second, .. } => {
                assert_eq!(first, "a");
                assert_eq!(second, "b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn duplicate_interaction_handlers_allowed_without_check() {
        let source = MemoryPluginSource::new()
            .event("a", "interaction.json", &event_json(INTERACTION_CREATE, false, "count"))
            .event("b", "interaction.json", &event_json(INTERACTION_CREATE, false, "count"));

        let counter = Arc::new(CountingHandler::default());
        let init = Arc::new(RecordingInit::default());
        let loader = PluginLoader::new(source, catalog(&counter, &init));
        let host = PluginHost::new();

        loader.load_all(&host).await.unwrap();
        assert_eq!(host.events().subscribers(INTERACTION_CREATE).len(), 2);
    }

    #[tokio::test]
    async fn unknown_handler_stops_loading() {
        let source =
            MemoryPluginSource::new().command("alpha", "ping.json", &command_json("ping", "nope"));

        let counter = Arc::new(CountingHandler::default());
        let init = Arc::new(RecordingInit::default());
        let loader = PluginLoader::new(source, catalog(&counter, &init));

        let err = loader.load_all(&PluginHost::new()).await.unwrap_err();
        assert!(matches!(
            err,
            LoaderError::UnknownHandler { kind: "command", .. }
        ));
    }

    #[tokio::test]
    async fn malformed_manifest_and_invalid_name_are_errors() {
        let counter = Arc::new(CountingHandler::default());
        let init = Arc::new(RecordingInit::default());

        let malformed = MemoryPluginSource::new().command("alpha", "ping.json", "{ not json");
        let err = PluginLoader::new(malformed, catalog(&counter, &init))
            .load_all(&PluginHost::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("commands/ping.json"));

        let invalid = MemoryPluginSource::new().command(
            "alpha",
            "ping.json",
            &command_json("Ping Pong", "reply"),
        );
        let err = PluginLoader::new(invalid, catalog(&counter, &init))
            .load_all(&PluginHost::new())
            .await
            .unwrap_err();
        assert!(matches!(err, LoaderError::InvalidCommand { .. }));
    }

    #[tokio::test]
    async fn failing_init_hook_stops_loading() {
        let source = MemoryPluginSource::new().descriptor("alpha", r#"{"init": "explode"}"#);
        let catalog =
            HandlerCatalog::new().with_init("explode", RecordingInit::failing("no database"));

        let err = PluginLoader::new(source, catalog)
            .load_all(&PluginHost::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no database"));
    }
}
