// Command domain models.
//
// A command is split in two halves: the declarative `CommandSpec` (what Discord
// sees once commands are published) and the `CommandHandler` that runs when a
// user invokes it. Plugins describe the spec in JSON and point at a handler by key.

use crate::core::events::CommandInvocation;
use crate::core::plugins::PluginHost;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_NAME_LEN: usize = 32;
const MAX_DESCRIPTION_LEN: usize = 100;
const MAX_OPTIONS: usize = 25;

/// Declarative description of a slash command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOptionSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOptionSpec {
    pub kind: OptionKind,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    String,
    Integer,
    Number,
    Boolean,
    User,
    Channel,
    Role,
}

impl CommandSpec {
    #[cfg(test)]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn option(mut self, option: CommandOptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Check the spec against Discord's application command rules so a bad
    /// manifest fails at boot instead of at publication time.
    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.name)?;
        validate_description(&self.name, &self.description)?;

        if self.options.len() > MAX_OPTIONS {
            return Err(format!(
                "command '{}' declares {} options (max {})",
                self.name,
                self.options.len(),
                MAX_OPTIONS
            ));
        }

        let mut seen_optional = false;
        for option in &self.options {
            validate_name(&option.name)?;
            validate_description(&option.name, &option.description)?;

            if option.required && seen_optional {
                return Err(format!(
                    "required option '{}' of command '{}' follows an optional one",
                    option.name, self.name
                ));
            }
            seen_optional |= !option.required;
        }

        let mut names: Vec<&str> = self.options.iter().map(|o| o.name.as_str()).collect();
        names.sort_unstable();
        if let Some(dup) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(format!(
                "option '{}' is declared twice on command '{}'",
                dup[0], self.name
            ));
        }

        Ok(())
    }

    /// JSON body as sent to the application command endpoint.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
impl CommandOptionSpec {
    pub fn new(kind: OptionKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: description.into(),
            required: false,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(format!(
            "name '{}' must be between 1 and {} characters",
            name, MAX_NAME_LEN
        ));
    }

    let valid = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
    if !valid {
        return Err(format!(
            "name '{}' may only contain lowercase letters, digits, '-' and '_'",
            name
        ));
    }

    Ok(())
}

fn validate_description(owner: &str, description: &str) -> Result<(), String> {
    let len = description.chars().count();
    if len == 0 || len > MAX_DESCRIPTION_LEN {
        return Err(format!(
            "description of '{}' must be between 1 and {} characters",
            owner, MAX_DESCRIPTION_LEN
        ));
    }
    Ok(())
}

/// What a command sends back to the invoking user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub content: String,
    pub ephemeral: bool,
}

impl CommandReply {
    pub fn public(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
        }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }
}

/// Compiled half of a command. The host is passed so handlers can reach the
/// rest of the bot (the command table, loaded plugins).
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(
        &self,
        invocation: &CommandInvocation,
        host: &PluginHost,
    ) -> anyhow::Result<CommandReply>;
}

/// An entry of the command table.
#[derive(Clone)]
pub struct RegisteredCommand {
    pub plugin: String,
    pub spec: CommandSpec,
    pub handler: Arc<dyn CommandHandler>,
}

impl std::fmt::Debug for RegisteredCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("plugin", &self.plugin)
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}
