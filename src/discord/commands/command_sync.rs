// Serenity-backed command publisher.

use crate::core::commands::{CommandPublisher, CommandSpec, OptionKind, PublishError};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

pub struct SerenityCommandPublisher {
    http: Arc<serenity::Http>,
    /// Guilds from the Ready payload; the cache is still filling at that point.
    guilds: Vec<u64>,
}

impl SerenityCommandPublisher {
    pub fn new(http: Arc<serenity::Http>, guilds: Vec<u64>) -> Self {
        Self { http, guilds }
    }
}

pub fn to_create_command(spec: &CommandSpec) -> serenity::CreateCommand {
    let mut command =
        serenity::CreateCommand::new(spec.name.clone()).description(spec.description.clone());

    for option in &spec.options {
        command = command.add_option(
            serenity::CreateCommandOption::new(
                option_type(option.kind),
                option.name.clone(),
                option.description.clone(),
            )
            .required(option.required),
        );
    }

    command
}

fn option_type(kind: OptionKind) -> serenity::CommandOptionType {
    match kind {
        OptionKind::String => serenity::CommandOptionType::String,
        OptionKind::Integer => serenity::CommandOptionType::Integer,
        OptionKind::Number => serenity::CommandOptionType::Number,
        OptionKind::Boolean => serenity::CommandOptionType::Boolean,
        OptionKind::User => serenity::CommandOptionType::User,
        OptionKind::Channel => serenity::CommandOptionType::Channel,
        OptionKind::Role => serenity::CommandOptionType::Role,
    }
}

#[async_trait]
impl CommandPublisher for SerenityCommandPublisher {
    async fn set_global_commands(&self, commands: &[CommandSpec]) -> Result<usize, PublishError> {
        let builders = commands.iter().map(to_create_command).collect();
        let created = serenity::Command::set_global_commands(&self.http, builders)
            .await
            .map_err(|e| PublishError::Global(e.to_string()))?;
        Ok(created.len())
    }

    async fn set_guild_commands(
        &self,
        guild_id: u64,
        commands: &[CommandSpec],
    ) -> Result<usize, PublishError> {
        let builders = commands.iter().map(to_create_command).collect();
        let created = serenity::GuildId::new(guild_id)
            .set_commands(&self.http, builders)
            .await
            .map_err(|e| PublishError::Guild {
                guild_id,
                reason: e.to_string(),
            })?;
        Ok(created.len())
    }

    fn known_guilds(&self) -> Vec<u64> {
        self.guilds.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::command_models::CommandOptionSpec;

    #[test]
    fn builder_carries_name_description_and_options() {
        let spec = CommandSpec::new("echo", "Repeat a message").option(
            CommandOptionSpec::new(OptionKind::String, "text", "What to repeat").required(true),
        );

        let json = serde_json::to_value(to_create_command(&spec)).unwrap();

        assert_eq!(json["name"], "echo");
        assert_eq!(json["description"], "Repeat a message");
        assert_eq!(json["options"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["options"][0]["name"], "text");
    }

    #[test]
    fn known_guilds_come_from_ready() {
        let publisher =
            SerenityCommandPublisher::new(Arc::new(serenity::Http::new("token")), vec![1, 2]);
        assert_eq!(publisher.known_guilds(), vec![1, 2]);
    }
}
