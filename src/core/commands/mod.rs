pub mod command_models;
pub mod command_publisher;
pub mod command_registry;

pub use command_models::{
    CommandHandler, CommandReply, CommandSpec, OptionKind, RegisteredCommand,
};
pub use command_publisher::{
    publish_commands, CommandPublisher, PublishError, PublishTarget,
};
pub use command_registry::CommandRegistry;
