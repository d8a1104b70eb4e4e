// The infra module contains implementations of core traits.

#[path = "plugins/mod.rs"]
pub mod plugins;
