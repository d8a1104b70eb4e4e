use crate::core::commands::CommandSpec;
use serde::{Deserialize, Serialize};

/// File name of the optional per-plugin descriptor.
pub const DESCRIPTOR_FILE: &str = "plugin.json";

/// Suffix of debugger artifacts that may sit next to plugin files.
pub const DEBUG_ARTIFACT_SUFFIX: &str = ".map";

/// Contents of `plugin.json`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Key of an init hook in the handler catalog.
    #[serde(default)]
    pub init: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl Default for PluginDescriptor {
    fn default() -> Self {
        Self {
            enabled: true,
            init: None,
            description: None,
        }
    }
}

/// One file of a plugin's `commands/` folder.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandManifest {
    #[serde(flatten)]
    pub spec: CommandSpec,
    pub handler: String,
}

/// One file of a plugin's `events/` folder.
#[derive(Debug, Clone, Deserialize)]
pub struct EventManifest {
    /// Gateway event name, e.g. `ready` or `interaction_create`.
    pub name: String,
    #[serde(default)]
    pub once: bool,
    pub handler: String,
}

/// The two conventional folders of a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginSection {
    Commands,
    Events,
}

impl PluginSection {
    pub fn dir_name(self) -> &'static str {
        match self {
            PluginSection::Commands => "commands",
            PluginSection::Events => "events",
        }
    }
}

/// Outcome of a full plugin scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub found: Vec<String>,
    pub loaded: Vec<String>,
    pub skipped: Vec<String>,
    pub commands: usize,
    pub events: usize,
}
