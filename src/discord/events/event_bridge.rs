// Translates serenity's gateway events into core `BotEvent`s.
//
// This layer stays thin: copy primitives out of the Discord types, nothing else.
// Slash command interactions carry a responder that answers through the HTTP client.

use crate::core::commands::CommandReply;
use crate::core::events::{BotEvent, CommandInvocation, InteractionResponder, MessageEvent};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::collections::BTreeMap;
use std::sync::Arc;

pub fn translate(ctx: &serenity::Context, event: &serenity::FullEvent) -> BotEvent {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => BotEvent::Ready {
            bot_name: data_about_bot.user.name.clone(),
            guild_ids: data_about_bot.guilds.iter().map(|g| g.id.get()).collect(),
        },
        serenity::FullEvent::GuildCreate { guild, .. } => BotEvent::GuildCreate {
            guild_id: guild.id.get(),
            name: guild.name.clone(),
        },
        serenity::FullEvent::Message { new_message } => BotEvent::Message(MessageEvent {
            guild_id: new_message.guild_id.map(|id| id.get()),
            channel_id: new_message.channel_id.get(),
            author_id: new_message.author.id.get(),
            author_is_bot: new_message.author.bot,
            content: new_message.content.clone(),
        }),
        serenity::FullEvent::InteractionCreate {
            interaction: serenity::Interaction::Command(command),
        } => BotEvent::InteractionCreate(invocation_from(ctx, command)),
        other => BotEvent::Other {
            name: other.snake_case_name().to_string(),
        },
    }
}

fn invocation_from(
    ctx: &serenity::Context,
    command: &serenity::CommandInteraction,
) -> CommandInvocation {
    let options: BTreeMap<String, String> = command
        .data
        .options
        .iter()
        .filter_map(|opt| option_value(&opt.value).map(|value| (opt.name.clone(), value)))
        .collect();

    CommandInvocation {
        command_name: command.data.name.clone(),
        guild_id: command.guild_id.map(|id| id.get()),
        channel_id: command.channel_id.get(),
        user_id: command.user.id.get(),
        user_name: command.user.name.clone(),
        options,
        responder: Arc::new(SerenityResponder {
            http: ctx.http.clone(),
            interaction: command.clone(),
        }),
    }
}

/// Scalar option values as strings. Subcommands and attachments are not
/// flattened.
fn option_value(value: &serenity::CommandDataOptionValue) -> Option<String> {
    use serenity::CommandDataOptionValue as V;

    match value {
        V::String(s) => Some(s.clone()),
        V::Integer(i) => Some(i.to_string()),
        V::Number(n) => Some(n.to_string()),
        V::Boolean(b) => Some(b.to_string()),
        V::User(id) => Some(id.get().to_string()),
        V::Channel(id) => Some(id.get().to_string()),
        V::Role(id) => Some(id.get().to_string()),
        _ => None,
    }
}

pub struct SerenityResponder {
    http: Arc<serenity::Http>,
    interaction: serenity::CommandInteraction,
}

#[async_trait]
impl InteractionResponder for SerenityResponder {
    async fn respond(&self, reply: CommandReply) -> anyhow::Result<()> {
        let message = serenity::CreateInteractionResponseMessage::new()
            .content(reply.content)
            .ephemeral(reply.ephemeral);

        self.interaction
            .create_response(
                self.http.as_ref(),
                serenity::CreateInteractionResponse::Message(message),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_options_are_stringified() {
        use poise::serenity_prelude::CommandDataOptionValue as V;

        assert_eq!(option_value(&V::String("hi".into())), Some("hi".into()));
        assert_eq!(option_value(&V::Integer(-3)), Some("-3".into()));
        assert_eq!(option_value(&V::Boolean(true)), Some("true".into()));
        assert_eq!(
            option_value(&V::User(serenity::UserId::new(42))),
            Some("42".into())
        );
        assert_eq!(option_value(&V::SubCommand(vec![])), None);
    }
}
