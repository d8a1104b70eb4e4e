pub mod handler_catalog;
pub mod plugin_host;
pub mod plugin_loader;
pub mod plugin_models;
pub mod plugin_source;

pub use handler_catalog::{HandlerCatalog, PluginInit};
pub use plugin_host::PluginHost;
pub use plugin_loader::{LoaderError, PluginLoader};
pub use plugin_models::{PluginSection, DESCRIPTOR_FILE};
pub use plugin_source::PluginSource;
