use super::command_models::{CommandSpec, RegisteredCommand};
use dashmap::DashMap;

/// Process-wide, name-keyed command table.
///
/// Filled once while plugins load, read on every interaction and once more
/// when commands are published.
pub struct CommandRegistry {
    commands: DashMap<String, RegisteredCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: DashMap::new(),
        }
    }

    /// Insert a command under its spec name. A name collision replaces the
    /// earlier entry; the replaced command is returned so the caller can log it.
    pub fn register(&self, command: RegisteredCommand) -> Option<RegisteredCommand> {
        let name = command.spec.name.clone();
        let replaced = self.commands.insert(name.clone(), command);

        if let Some(previous) = &replaced {
            tracing::warn!(
                command = %name,
                previous_plugin = %previous.plugin,
                "Command registered twice, keeping the latest definition"
            );
        }

        replaced
    }

    /// Cloned out so no map guard is held across an `.await`.
    pub fn get(&self, name: &str) -> Option<RegisteredCommand> {
        self.commands.get(name).map(|entry| entry.value().clone())
    }

    /// All specs, sorted by name.
    pub fn specs(&self) -> Vec<CommandSpec> {
        let mut specs: Vec<CommandSpec> = self
            .commands
            .iter()
            .map(|entry| entry.value().spec.clone())
            .collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{registered, StaticReply};

    #[test]
    fn register_and_lookup() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());

        registry.register(registered("example", "ping", StaticReply::new("Pong !")));
        registry.register(registered("example", "echo", StaticReply::new("...")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("ping").unwrap().plugin, "example");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn duplicate_name_keeps_latest() {
        let registry = CommandRegistry::new();
        assert!(registry
            .register(registered("first", "ping", StaticReply::new("a")))
            .is_none());

        let replaced = registry.register(registered("second", "ping", StaticReply::new("b")));

        assert_eq!(replaced.unwrap().plugin, "first");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("ping").unwrap().plugin, "second");
    }

    #[test]
    fn specs_and_names_are_sorted() {
        let registry = CommandRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.register(registered("p", name, StaticReply::new("x")));
        }

        let names: Vec<String> = registry.specs().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
        assert_eq!(registry.names(), vec!["alpha", "mid", "zeta"]);
    }
}
