pub mod event_bus;
pub mod event_models;

pub use event_bus::EventBus;
pub use event_models::{
    BotEvent, CommandInvocation, EventHandler, InteractionResponder, MessageEvent,
    INTERACTION_CREATE,
};
