// Command publication - pushes the command table to Discord.
//
// The remote "set" calls replace the whole collection, so there is no diffing
// and no rollback here. Errors are logged and swallowed: a failed upload must
// not take the running bot down.

use super::command_models::CommandSpec;
use super::command_registry::CommandRegistry;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to publish global commands: {0}")]
    Global(String),

    #[error("Failed to publish commands in guild {guild_id}: {reason}")]
    Guild { guild_id: u64, reason: String },
}

/// Port onto the platform's command-registration API.
#[async_trait]
pub trait CommandPublisher: Send + Sync {
    /// Replace the global command collection. Returns how many were accepted.
    async fn set_global_commands(&self, commands: &[CommandSpec]) -> Result<usize, PublishError>;

    /// Replace one guild's command collection.
    async fn set_guild_commands(
        &self,
        guild_id: u64,
        commands: &[CommandSpec],
    ) -> Result<usize, PublishError>;

    /// Guilds the client currently knows about.
    fn known_guilds(&self) -> Vec<u64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishTarget {
    Global,
    Guild(u64),
}

impl std::fmt::Display for PublishTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishTarget::Global => write!(f, "all the guilds"),
            PublishTarget::Guild(id) => write!(f, "the guild '{}'", id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub commands: usize,
    pub global: bool,
    pub guilds: Vec<u64>,
    pub failed_guilds: Vec<u64>,
    pub error: Option<String>,
}

impl PublishSummary {
    pub fn succeeded(&self) -> bool {
        self.error.is_none() && self.failed_guilds.is_empty()
    }
}

/// Publish every registered command to `target`.
///
/// `Guild(id)` makes exactly one guild call. `Global` makes one global call
/// followed by one guild call per known guild; a failing guild is logged and
/// the remaining guilds are still refreshed.
pub async fn publish_commands<P>(
    registry: &CommandRegistry,
    publisher: &P,
    target: PublishTarget,
) -> PublishSummary
where
    P: CommandPublisher + ?Sized,
{
    let specs = registry.specs();
    let mut summary = PublishSummary {
        commands: specs.len(),
        ..Default::default()
    };

    tracing::info!("The commands will be loaded in {}.", target);
    tracing::info!(
        "Starting refreshing {} application (/) commands !",
        specs.len()
    );
    for spec in &specs {
        tracing::debug!(command = %spec.name, body = %spec.to_json(), "Publishing command");
    }

    if let Err(err) = try_publish(publisher, &specs, target, &mut summary).await {
        tracing::error!("Command upload failed: {}", err);
        summary.error = Some(err.to_string());
        return summary;
    }

    if summary.failed_guilds.is_empty() {
        tracing::info!(
            "Successfully reloaded {} application (/) commands !",
            specs.len()
        );
    } else {
        tracing::warn!(
            failed = summary.failed_guilds.len(),
            "Reloaded application (/) commands with failures"
        );
    }

    summary
}

async fn try_publish<P>(
    publisher: &P,
    specs: &[CommandSpec],
    target: PublishTarget,
    summary: &mut PublishSummary,
) -> Result<(), PublishError>
where
    P: CommandPublisher + ?Sized,
{
    match target {
        PublishTarget::Guild(guild_id) => {
            publisher.set_guild_commands(guild_id, specs).await?;
            summary.guilds.push(guild_id);
        }
        PublishTarget::Global => {
            publisher.set_global_commands(specs).await?;
            summary.global = true;

            for guild_id in publisher.known_guilds() {
                match publisher.set_guild_commands(guild_id, specs).await {
                    Ok(_) => summary.guilds.push(guild_id),
                    Err(err) => {
                        tracing::warn!("{}", err);
                        summary.failed_guilds.push(guild_id);
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{registered, StaticReply};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Global(usize),
        Guild(u64, usize),
    }

    struct MockPublisher {
        guilds: Vec<u64>,
        calls: Mutex<Vec<Call>>,
        fail_global: bool,
        fail_guild: Option<u64>,
    }

    impl MockPublisher {
        fn new(guilds: Vec<u64>) -> Self {
            Self {
                guilds,
                calls: Mutex::new(Vec::new()),
                fail_global: false,
                fail_guild: None,
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandPublisher for MockPublisher {
        async fn set_global_commands(
            &self,
            commands: &[CommandSpec],
        ) -> Result<usize, PublishError> {
            self.calls.lock().unwrap().push(Call::Global(commands.len()));
            if self.fail_global {
                return Err(PublishError::Global("401 Unauthorized".into()));
            }
            Ok(commands.len())
        }

        async fn set_guild_commands(
            &self,
            guild_id: u64,
            commands: &[CommandSpec],
        ) -> Result<usize, PublishError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Guild(guild_id, commands.len()));
            if self.fail_guild == Some(guild_id) {
                return Err(PublishError::Guild {
                    guild_id,
                    reason: "Missing Access".into(),
                });
            }
            Ok(commands.len())
        }

        fn known_guilds(&self) -> Vec<u64> {
            self.guilds.clone()
        }
    }

    fn registry_with(names: &[&str]) -> CommandRegistry {
        let registry = CommandRegistry::new();
        for name in names {
            registry.register(registered("example", name, StaticReply::new("ok")));
        }
        registry
    }

    #[tokio::test]
    async fn guild_target_calls_single_guild_once() {
        let registry = registry_with(&["ping", "help"]);
        let publisher = MockPublisher::new(vec![1, 2, 3]);

        let summary = publish_commands(&registry, &publisher, PublishTarget::Guild(42)).await;

        assert_eq!(publisher.calls(), vec![Call::Guild(42, 2)]);
        assert_eq!(summary.guilds, vec![42]);
        assert!(!summary.global);
        assert!(summary.succeeded());
    }

    #[tokio::test]
    async fn global_target_refreshes_every_known_guild() {
        let registry = registry_with(&["ping"]);
        let publisher = MockPublisher::new(vec![10, 20]);

        let summary = publish_commands(&registry, &publisher, PublishTarget::Global).await;

        assert_eq!(
            publisher.calls(),
            vec![Call::Global(1), Call::Guild(10, 1), Call::Guild(20, 1)]
        );
        assert!(summary.global);
        assert_eq!(summary.guilds, vec![10, 20]);
        assert_eq!(summary.commands, 1);
    }

    #[tokio::test]
    async fn global_failure_is_swallowed() {
        let registry = registry_with(&["ping"]);
        let mut publisher = MockPublisher::new(vec![10]);
        publisher.fail_global = true;

        let summary = publish_commands(&registry, &publisher, PublishTarget::Global).await;

        // No guild call once the global set failed.
        assert_eq!(publisher.calls(), vec![Call::Global(1)]);
        assert!(!summary.succeeded());
        assert!(summary.error.unwrap().contains("401"));
    }

    #[tokio::test]
    async fn one_failing_guild_does_not_stop_the_others() {
        let registry = registry_with(&["ping"]);
        let mut publisher = MockPublisher::new(vec![1, 2, 3]);
        publisher.fail_guild = Some(2);

        let summary = publish_commands(&registry, &publisher, PublishTarget::Global).await;

        assert_eq!(publisher.calls().len(), 4);
        assert_eq!(summary.guilds, vec![1, 3]);
        assert_eq!(summary.failed_guilds, vec![2]);
        assert!(summary.error.is_none());
    }

    #[test]
    fn target_display_matches_log_wording() {
        assert_eq!(PublishTarget::Global.to_string(), "all the guilds");
        assert_eq!(PublishTarget::Guild(7).to_string(), "the guild '7'");
    }
}
