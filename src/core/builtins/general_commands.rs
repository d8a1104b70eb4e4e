// Commands shipped with the starter. Plugins reference them by key from their
// `commands/*.json` manifests.

use crate::core::commands::{CommandHandler, CommandReply};
use crate::core::events::CommandInvocation;
use crate::core::plugins::PluginHost;
use async_trait::async_trait;

pub struct PingCommand;

#[async_trait]
impl CommandHandler for PingCommand {
    async fn execute(
        &self,
        _invocation: &CommandInvocation,
        _host: &PluginHost,
    ) -> anyhow::Result<CommandReply> {
        Ok(CommandReply::public("Pong !"))
    }
}

/// Lists every registered command with its description.
pub struct HelpCommand;

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn execute(
        &self,
        _invocation: &CommandInvocation,
        host: &PluginHost,
    ) -> anyhow::Result<CommandReply> {
        if host.commands().is_empty() {
            return Ok(CommandReply::ephemeral("No commands are loaded."));
        }

        let specs = host.commands().specs();

        let mut text = format!("**Available commands ({})**\n", specs.len());
        for spec in specs {
            text.push_str(&format!("• `/{}` - {}\n", spec.name, spec.description));
        }

        Ok(CommandReply::ephemeral(text))
    }
}

/// Repeats its `text` option back to the caller.
pub struct EchoCommand;

#[async_trait]
impl CommandHandler for EchoCommand {
    async fn execute(
        &self,
        invocation: &CommandInvocation,
        _host: &PluginHost,
    ) -> anyhow::Result<CommandReply> {
        let text = invocation
            .option("text")
            .ok_or_else(|| anyhow::anyhow!("missing required option 'text'"))?;
        Ok(CommandReply::ephemeral(text))
    }
}
