// The core module contains the plugin machinery.
// Nothing here depends on serenity; the Discord layer adapts into it.

#[path = "plugins/mod.rs"]
pub mod plugins;

#[path = "commands/mod.rs"]
pub mod commands;

#[path = "events/mod.rs"]
pub mod events;

#[path = "builtins/mod.rs"]
pub mod builtins;

#[cfg(test)]
#[path = "test_support.rs"]
pub mod test_support;
